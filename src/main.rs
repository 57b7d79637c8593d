use std::{
    io::{self, BufRead, Write},
    process::ExitCode,
};

use anyhow::{bail, Context, Result};
use asset_registry::{
    config::{self, AppConfig},
    format,
    models::{
        Asset, AssetFields, AssetStatus, Category, CategoryFields, Employee, EmployeeFields,
        RecordId, RecordStatus, ReturnReason, ScrapReason, Transaction,
    },
    services::{search_assets, search_employees, AssetHistoryReport, RegistryServices, StockReport},
    RegistryClient, ServiceError,
};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "command failed");
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let context = CliContext::initialize()?;
    let json = cli.json;

    match cli.command {
        Commands::Employees(command) => handle_employees_command(&context, command, json).await,
        Commands::Categories(command) => handle_categories_command(&context, command, json).await,
        Commands::Assets(command) => handle_assets_command(&context, command, json).await,
        Commands::Stock => handle_stock(&context, json).await,
        Commands::Issue(args) => handle_issue(&context, args, json).await,
        Commands::Return(args) => handle_return(&context, args, json).await,
        Commands::Scrap(args) => handle_scrap(&context, args, json).await,
        Commands::History(args) => handle_history(&context, args, json).await,
    }
}

#[derive(Parser)]
#[command(
    name = "asset-registry",
    about = "Manage company assets, employees and asset custody",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    Employees(EmployeesCommands),
    #[command(subcommand)]
    Categories(CategoriesCommands),
    #[command(subcommand)]
    Assets(AssetsCommands),
    /// Available stock grouped by branch
    Stock,
    /// Hand an available asset to an employee
    Issue(IssueArgs),
    /// Take an assigned asset back
    Return(ReturnArgs),
    /// Permanently retire an asset
    Scrap(ScrapArgs),
    /// Custody log and utilization of one asset
    History(HistoryArgs),
}

#[derive(Subcommand)]
enum EmployeesCommands {
    List(ListEmployeesArgs),
    Show(IdArgs),
    Create(EmployeeArgs),
    Update(UpdateEmployeeArgs),
    Delete(IdArgs),
}

#[derive(Subcommand)]
enum CategoriesCommands {
    List(StatusArgs),
    Create(CategoryArgs),
    Update(UpdateCategoryArgs),
    Delete(IdArgs),
}

#[derive(Subcommand)]
enum AssetsCommands {
    List(ListAssetsArgs),
    Show(IdArgs),
    Create(CreateAssetArgs),
    Update(UpdateAssetArgs),
}

#[derive(Args)]
struct IdArgs {
    #[arg(help = "Record id")]
    id: RecordId,
}

#[derive(Args)]
struct StatusArgs {
    #[arg(long, help = "Only records with this status (active, inactive)")]
    status: Option<RecordStatus>,
}

#[derive(Args)]
struct ListEmployeesArgs {
    #[arg(long, help = "Only employees with this status (active, inactive)")]
    status: Option<RecordStatus>,
    #[arg(long, help = "Case-insensitive match on name, employee id or email")]
    search: Option<String>,
}

#[derive(Args)]
struct EmployeeArgs {
    #[arg(long)]
    employee_id: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    designation: Option<String>,
    #[arg(long)]
    branch: Option<String>,
    #[arg(long, help = "Joining date (YYYY-MM-DD)")]
    joining_date: Option<NaiveDate>,
}

#[derive(Args)]
struct UpdateEmployeeArgs {
    #[arg(help = "Employee record id")]
    id: RecordId,
    #[arg(long)]
    employee_id: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    designation: Option<String>,
    #[arg(long)]
    branch: Option<String>,
    #[arg(long, help = "Joining date (YYYY-MM-DD)")]
    joining_date: Option<NaiveDate>,
    #[arg(long, help = "active or inactive")]
    status: Option<RecordStatus>,
}

#[derive(Args)]
struct CategoryArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args)]
struct UpdateCategoryArgs {
    #[arg(help = "Category id")]
    id: RecordId,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    status: Option<RecordStatus>,
}

#[derive(Args)]
struct ListAssetsArgs {
    #[arg(
        long,
        help = "available, assigned, repair or scrapped; scrapped assets are hidden otherwise"
    )]
    status: Option<AssetStatus>,
    #[arg(long, help = "Only assets in this category")]
    category: Option<RecordId>,
    #[arg(long, help = "Case-insensitive match on asset id, serial number, make or model")]
    search: Option<String>,
}

#[derive(Args)]
struct CreateAssetArgs {
    #[arg(long)]
    asset_id: String,
    #[arg(long)]
    serial_number: String,
    #[arg(long)]
    category: RecordId,
    #[arg(long)]
    make: Option<String>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, help = "Purchase date (YYYY-MM-DD)")]
    purchase_date: Option<NaiveDate>,
    #[arg(long)]
    purchase_price: Option<Decimal>,
    #[arg(long)]
    branch: Option<String>,
}

#[derive(Args)]
struct UpdateAssetArgs {
    #[arg(help = "Asset record id")]
    id: RecordId,
    #[arg(long)]
    category: Option<RecordId>,
    #[arg(long)]
    make: Option<String>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    purchase_price: Option<Decimal>,
    #[arg(long)]
    branch: Option<String>,
}

#[derive(Args)]
struct IssueArgs {
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "List available assets and active employees instead of issuing"
    )]
    list: bool,
    #[arg(long, required_unless_present = "list", help = "Asset record id")]
    asset: Option<RecordId>,
    #[arg(long, required_unless_present = "list", help = "Employee record id")]
    employee: Option<RecordId>,
    #[arg(long, default_value = "")]
    remarks: String,
}

#[derive(Args)]
struct ReturnArgs {
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "List assigned assets instead of returning one"
    )]
    list: bool,
    #[arg(long, required_unless_present = "list", help = "Asset record id")]
    asset: Option<RecordId>,
    #[arg(
        long,
        required_unless_present = "list",
        help = "upgrade, repair, resignation, transfer, no-longer-needed or other"
    )]
    reason: Option<ReturnReason>,
    #[arg(long, default_value = "")]
    remarks: String,
}

#[derive(Args)]
struct ScrapArgs {
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "List assets that can still be scrapped"
    )]
    list: bool,
    #[arg(long, required_unless_present = "list", help = "Asset record id")]
    asset: Option<RecordId>,
    #[arg(
        long,
        required_unless_present = "list",
        help = "obsolete, beyond-repair, lost, stolen, damaged, end-of-life or other"
    )]
    reason: Option<ScrapReason>,
    #[arg(long, default_value = "", help = "Why the asset is being retired")]
    remarks: String,
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Skip the confirmation prompt"
    )]
    yes: bool,
}

#[derive(Args)]
struct HistoryArgs {
    #[arg(help = "Asset record id")]
    id: RecordId,
}

struct CliContext {
    config: AppConfig,
    services: RegistryServices,
}

impl CliContext {
    fn initialize() -> Result<Self> {
        let config = config::load_config().context("failed to load application config")?;
        config::init_tracing(config.log_level(), config.log_json);

        let client = RegistryClient::from_config(&config)
            .with_context(|| format!("failed to build client for {}", config.api_base_url))?;
        debug!(base_url = client.base_url(), "registry client ready");

        Ok(Self {
            config,
            services: RegistryServices::new(client),
        })
    }

    fn currency(&self, amount: Decimal) -> String {
        format::currency(&self.config.currency_symbol, amount)
    }
}

async fn handle_employees_command(
    context: &CliContext,
    command: EmployeesCommands,
    json: bool,
) -> Result<()> {
    let service = &context.services.employees;
    match command {
        EmployeesCommands::List(args) => {
            let employees = service.list(args.status).await?;
            let matches = search_employees(&employees, args.search.as_deref().unwrap_or_default());
            if json {
                return print_json(&matches);
            }
            println!("Employees {} result(s)", matches.len());
            for employee in matches {
                render_employee(employee);
            }
        }
        EmployeesCommands::Show(args) => {
            let employee = service.get(args.id).await?;
            if json {
                return print_json(&employee);
            }
            render_employee(&employee);
            println!("  email {}", employee.email);
            println!("  phone {}", format::or_dash(employee.phone.as_deref()));
            println!("  designation {}", format::or_dash(employee.designation.as_deref()));
            println!("  joined {}", format::date(employee.joining_date));
        }
        EmployeesCommands::Create(args) => {
            let mut fields =
                EmployeeFields::new(args.employee_id, args.first_name, args.last_name, args.email);
            fields.phone = args.phone;
            fields.department = args.department;
            fields.designation = args.designation;
            fields.branch = args.branch;
            fields.joining_date = args.joining_date;

            let employee = service.create(fields).await?;
            if json {
                return print_json(&employee);
            }
            println!("Employee {} created (id {})", employee.label(), employee.id);
        }
        EmployeesCommands::Update(args) => {
            let current = service.get(args.id).await?;
            let mut fields = EmployeeFields::from(&current);
            if let Some(employee_id) = args.employee_id {
                fields.employee_id = employee_id;
            }
            if let Some(first_name) = args.first_name {
                fields.first_name = first_name;
            }
            if let Some(last_name) = args.last_name {
                fields.last_name = last_name;
            }
            if let Some(email) = args.email {
                fields.email = email;
            }
            if args.phone.is_some() {
                fields.phone = args.phone;
            }
            if args.department.is_some() {
                fields.department = args.department;
            }
            if args.designation.is_some() {
                fields.designation = args.designation;
            }
            if args.branch.is_some() {
                fields.branch = args.branch;
            }
            if args.joining_date.is_some() {
                fields.joining_date = args.joining_date;
            }
            if let Some(status) = args.status {
                fields.status = status;
            }

            let employee = service.update(args.id, fields).await?;
            if json {
                return print_json(&employee);
            }
            render_employee(&employee);
        }
        EmployeesCommands::Delete(args) => {
            service.delete(args.id).await?;
            if !json {
                println!("Employee {} deleted", args.id);
            }
        }
    }
    Ok(())
}

async fn handle_categories_command(
    context: &CliContext,
    command: CategoriesCommands,
    json: bool,
) -> Result<()> {
    let service = &context.services.categories;
    match command {
        CategoriesCommands::List(args) => {
            let categories = service.list(args.status).await?;
            if json {
                return print_json(&categories);
            }
            println!("Categories {} result(s)", categories.len());
            for category in &categories {
                render_category(category);
            }
        }
        CategoriesCommands::Create(args) => {
            let mut fields = CategoryFields::new(args.name);
            fields.description = args.description;
            let category = service.create(fields).await?;
            if json {
                return print_json(&category);
            }
            println!("Category {} created (id {})", category.name, category.id);
        }
        CategoriesCommands::Update(args) => {
            let current = service.find(args.id).await?;
            let mut fields = CategoryFields::from(&current);
            if let Some(name) = args.name {
                fields.name = name;
            }
            if args.description.is_some() {
                fields.description = args.description;
            }
            if let Some(status) = args.status {
                fields.status = status;
            }
            let category = service.update(args.id, fields).await?;
            if json {
                return print_json(&category);
            }
            render_category(&category);
        }
        CategoriesCommands::Delete(args) => {
            service.delete(args.id).await?;
            if !json {
                println!("Category {} deleted", args.id);
            }
        }
    }
    Ok(())
}

async fn handle_assets_command(
    context: &CliContext,
    command: AssetsCommands,
    json: bool,
) -> Result<()> {
    let service = &context.services.assets;
    match command {
        AssetsCommands::List(args) => {
            let assets = service.list(args.status, args.category).await?;
            let matches = search_assets(&assets, args.search.as_deref().unwrap_or_default());
            if json {
                return print_json(&matches);
            }
            println!("Assets {} result(s)", matches.len());
            for asset in matches {
                render_asset(context, asset);
            }
        }
        AssetsCommands::Show(args) => {
            let asset = service.get(args.id).await?;
            if json {
                return print_json(&asset);
            }
            render_asset(context, &asset);
            println!("  serial {}", asset.serial_number);
            println!("  description {}", format::or_dash(asset.description.as_deref()));
            println!("  purchased {}", format::date(asset.purchase_date));
            println!(
                "  assigned to {} since {}",
                format::employee_label(asset.assigned_employee.as_ref()),
                format::date(asset.assigned_date)
            );
        }
        AssetsCommands::Create(args) => {
            let mut fields = AssetFields::new(args.asset_id, args.serial_number, args.category);
            fields.make = args.make;
            fields.model = args.model;
            fields.description = args.description;
            fields.purchase_date = args.purchase_date;
            fields.purchase_price = args.purchase_price;
            fields.branch = args.branch;

            ensure_active_category(context, fields.category_id).await?;
            let asset = service.create(fields).await?;
            if json {
                return print_json(&asset);
            }
            println!("Asset {} registered (id {})", asset.asset_id, asset.id);
        }
        AssetsCommands::Update(args) => {
            let current = service.get(args.id).await?;
            let mut fields = AssetFields::try_from(&current).map_err(anyhow::Error::msg)?;
            if let Some(category) = args.category {
                ensure_active_category(context, category).await?;
                fields.category_id = category;
            }
            if args.make.is_some() {
                fields.make = args.make;
            }
            if args.model.is_some() {
                fields.model = args.model;
            }
            if args.description.is_some() {
                fields.description = args.description;
            }
            if args.purchase_price.is_some() {
                fields.purchase_price = args.purchase_price;
            }
            if args.branch.is_some() {
                fields.branch = args.branch;
            }

            let asset = service.update(args.id, fields).await?;
            if json {
                return print_json(&asset);
            }
            render_asset(context, &asset);
        }
    }
    Ok(())
}

async fn handle_stock(context: &CliContext, json: bool) -> Result<()> {
    let report = context.services.stock.report().await?;
    if json {
        return print_json(&report);
    }
    render_stock(context, &report);
    Ok(())
}

async fn handle_issue(context: &CliContext, args: IssueArgs, json: bool) -> Result<()> {
    let services = &context.services;
    if args.list {
        let choices = IssueChoices {
            assets: services.assets.issuable().await?,
            employees: services.employees.active().await?,
        };
        if json {
            return print_json(&choices);
        }
        render_asset_choices(context, "Available assets", &choices.assets);
        println!("Active employees {} result(s)", choices.employees.len());
        for employee in &choices.employees {
            render_employee(employee);
        }
        return Ok(());
    }

    let (Some(asset), Some(employee)) = (args.asset, args.employee) else {
        bail!("--asset and --employee are required");
    };
    let active = services.employees.active().await?;
    if !active.iter().any(|e| e.id == employee) {
        return Err(invalid(format!("employee {employee} is not active")));
    }
    services.assets.issue(asset, employee, &args.remarks).await?;
    println!("Asset {asset} issued to employee {employee}");
    Ok(())
}

async fn handle_return(context: &CliContext, args: ReturnArgs, json: bool) -> Result<()> {
    if args.list {
        let assets = context.services.assets.returnable().await?;
        if json {
            return print_json(&assets);
        }
        render_asset_choices(context, "Assigned assets", &assets);
        return Ok(());
    }

    let (Some(asset), Some(reason)) = (args.asset, args.reason) else {
        bail!("--asset and --reason are required");
    };
    context
        .services
        .assets
        .return_asset(asset, reason, &args.remarks)
        .await?;
    println!("Asset {asset} returned ({reason})");
    Ok(())
}

async fn handle_scrap(context: &CliContext, args: ScrapArgs, json: bool) -> Result<()> {
    if args.list {
        let assets = context.services.assets.scrappable().await?;
        if json {
            return print_json(&assets);
        }
        render_asset_choices(context, "Scrappable assets", &assets);
        return Ok(());
    }

    let (Some(asset), Some(reason)) = (args.asset, args.reason) else {
        bail!("--asset and --reason are required");
    };
    if args.remarks.trim().is_empty() {
        return Err(invalid("remarks are required when scrapping an asset".into()));
    }
    if !args.yes && !confirm(&format!("Scrap asset {asset}? This cannot be undone."))? {
        bail!("scrap of asset {asset} cancelled");
    }
    context
        .services
        .assets
        .scrap(asset, reason, &args.remarks)
        .await?;
    println!("Asset {asset} scrapped ({reason})");
    Ok(())
}

/// Assets and employees offered by the issue form.
#[derive(Serialize)]
struct IssueChoices {
    assets: Vec<Asset>,
    employees: Vec<Employee>,
}

async fn ensure_active_category(context: &CliContext, id: RecordId) -> Result<()> {
    let active = context.services.categories.active().await?;
    if active.iter().any(|c| c.id == id) {
        Ok(())
    } else {
        Err(invalid(format!("category {id} is not active")))
    }
}

fn invalid(message: String) -> anyhow::Error {
    ServiceError::ValidationError(message).into()
}

async fn handle_history(context: &CliContext, args: HistoryArgs, json: bool) -> Result<()> {
    let report = context.services.assets.history(args.id).await?;
    if json {
        return print_json(&report);
    }
    render_history(context, &report);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_employee(employee: &Employee) {
    println!(
        "- Employee {} • {} • {} • {} • status {}",
        employee.id,
        employee.label(),
        format::or_dash(employee.department.as_deref()),
        format::or_dash(employee.branch.as_deref()),
        employee.status
    );
}

fn render_category(category: &Category) {
    println!(
        "- Category {} • {} • {} • status {}",
        category.id,
        category.name,
        format::or_dash(category.description.as_deref()),
        category.status
    );
}

fn render_asset(context: &CliContext, asset: &Asset) {
    let price = asset
        .purchase_price
        .map(|p| context.currency(p))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "- Asset {} • {} • {} • {} • {} • {} • status {}",
        asset.id,
        asset.asset_id,
        format::or_dash(Some(asset.make_model().as_str())),
        format::or_dash(asset.category_name()),
        format::or_dash(asset.branch.as_deref()),
        price,
        asset.status
    );
}

fn render_asset_choices(context: &CliContext, title: &str, assets: &[Asset]) {
    println!("{title} {} result(s)", assets.len());
    for asset in assets {
        render_asset(context, asset);
    }
}

fn render_stock(context: &CliContext, report: &StockReport) {
    println!(
        "Available stock: {} asset(s) worth {}",
        report.total_assets,
        context.currency(report.total_value)
    );
    for branch in &report.branches {
        println!(
            "- {} • {} asset(s) • {} • {}",
            branch.branch,
            branch.count,
            context.currency(branch.total_value),
            branch.asset_ids.join(", ")
        );
    }
}

fn render_history(context: &CliContext, report: &AssetHistoryReport) {
    render_asset(context, &report.asset);
    match &report.utilization {
        Some(u) => println!(
            "Utilization {}% ({} of {} day(s) issued)",
            u.utilization_rate, u.issue_days, u.days_since_purchase
        ),
        None => println!("Utilization unavailable (no purchase date)"),
    }
    if report.transactions.is_empty() {
        println!("No transactions recorded");
    }
    for tx in &report.transactions {
        render_transaction(tx);
    }
}

fn render_transaction(tx: &Transaction) {
    println!(
        "  • {} {} • {} • reason {} • remarks {}",
        format::timestamp(tx.transaction_date),
        format::transaction_kind(tx),
        format::employee_label(tx.employee.as_ref()),
        format::or_dash(tx.reason.as_deref()),
        format::or_dash(tx.remarks.as_deref())
    );
}
