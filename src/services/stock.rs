use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use crate::{
    client::RegistryClient,
    errors::{OperationResultExt, ServiceError},
    models::{Asset, AssetFilter, AssetStatus},
};

const UNASSIGNED_BRANCH: &str = "Unassigned";

/// Available stock, in total and per branch.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReport {
    pub total_assets: usize,
    pub total_value: Decimal,
    pub branches: Vec<BranchStock>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchStock {
    pub branch: String,
    pub count: usize,
    pub total_value: Decimal,
    pub asset_ids: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct StockService {
    client: RegistryClient,
}

impl StockService {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn report(&self) -> Result<StockReport, ServiceError> {
        let filter = AssetFilter {
            status: Some(AssetStatus::Available),
            category_id: None,
        };
        let assets = self
            .client
            .assets()
            .list(&filter)
            .await
            .or_failed("fetch stock data")?;
        Ok(summarize(&assets))
    }
}

/// Totals the given assets and groups them by branch in first-seen order.
/// Missing prices count as zero; missing or empty branches are grouped as
/// `Unassigned`. Branch names are used exactly as stored.
pub fn summarize(assets: &[Asset]) -> StockReport {
    let mut report = StockReport::default();

    for asset in assets {
        let price = asset.purchase_price.unwrap_or_default();
        let branch = asset
            .branch
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or(UNASSIGNED_BRANCH);

        report.total_assets += 1;
        report.total_value += price;

        let position = match report.branches.iter().position(|b| b.branch == branch) {
            Some(position) => position,
            None => {
                report.branches.push(BranchStock {
                    branch: branch.to_string(),
                    count: 0,
                    total_value: Decimal::ZERO,
                    asset_ids: Vec::new(),
                });
                report.branches.len() - 1
            }
        };
        let group = &mut report.branches[position];
        group.count += 1;
        group.total_value += price;
        group.asset_ids.push(asset.asset_id.clone());
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn asset(asset_id: &str, branch: Option<&str>, price: serde_json::Value) -> Asset {
        serde_json::from_value(json!({
            "id": 1,
            "assetId": asset_id,
            "serialNumber": format!("SN-{asset_id}"),
            "branch": branch,
            "purchasePrice": price,
            "status": "available",
        }))
        .unwrap()
    }

    #[test]
    fn groups_by_branch_in_first_seen_order() {
        let assets = vec![
            asset("A1", Some("Pune"), json!("1000.00")),
            asset("A2", Some("Chennai"), json!(250.5)),
            asset("A3", Some("Pune"), json!(null)),
            asset("A4", None, json!("99.99")),
            asset("A5", Some(""), json!(0.01)),
            asset("A6", Some("  "), json!(5)),
        ];

        let report = summarize(&assets);
        assert_eq!(report.total_assets, 6);
        assert_eq!(report.total_value, dec!(1355.50));

        let names: Vec<_> = report.branches.iter().map(|b| b.branch.as_str()).collect();
        assert_eq!(names, vec!["Pune", "Chennai", "Unassigned", "  "]);

        let pune = &report.branches[0];
        assert_eq!(pune.count, 2);
        assert_eq!(pune.total_value, dec!(1000));
        assert_eq!(pune.asset_ids, vec!["A1", "A3"]);

        let unassigned = &report.branches[2];
        assert_eq!(unassigned.count, 2);
        assert_eq!(unassigned.total_value, dec!(100.00));
    }

    #[test]
    fn empty_stock() {
        let report = summarize(&[]);
        assert_eq!(report.total_assets, 0);
        assert_eq!(report.total_value, Decimal::ZERO);
        assert!(report.branches.is_empty());
    }
}
