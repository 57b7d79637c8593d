//! Registry workflows: the list, form and custody operations an
//! administrator performs, each one request (or a fetch then a request)
//! against the registry API.

pub mod assets;
pub mod categories;
pub mod employees;
pub mod stock;

use crate::client::RegistryClient;

pub use assets::{search_assets, AssetHistoryReport, AssetService};
pub use categories::CategoryService;
pub use employees::{search_employees, EmployeeService};
pub use stock::{summarize, BranchStock, StockReport, StockService};

/// Every workflow, sharing one HTTP connection pool.
#[derive(Clone, Debug)]
pub struct RegistryServices {
    pub assets: AssetService,
    pub employees: EmployeeService,
    pub categories: CategoryService,
    pub stock: StockService,
}

impl RegistryServices {
    pub fn new(client: RegistryClient) -> Self {
        Self {
            assets: AssetService::new(client.clone()),
            employees: EmployeeService::new(client.clone()),
            categories: CategoryService::new(client.clone()),
            stock: StockService::new(client),
        }
    }
}
