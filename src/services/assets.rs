use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    client::RegistryClient,
    errors::{OperationResultExt, ServiceError},
    models::{
        Asset, AssetAction, AssetFields, AssetFilter, AssetStatus, IssueRequest, RecordId,
        ReturnReason, ReturnRequest, ScrapReason, ScrapRequest, Transaction,
    },
    utilization::{self, Utilization},
};

/// An asset with its chronologically ordered custody log.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetHistoryReport {
    pub asset: Asset,
    pub transactions: Vec<Transaction>,
    /// `None` when the asset has no purchase date.
    pub utilization: Option<Utilization>,
}

/// Service for the asset list, forms, custody workflows and history.
#[derive(Clone, Debug)]
pub struct AssetService {
    client: RegistryClient,
}

impl AssetService {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }

    /// Lists assets. Scrapped assets only appear when asked for explicitly.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<AssetStatus>,
        category_id: Option<RecordId>,
    ) -> Result<Vec<Asset>, ServiceError> {
        let wants_scrapped = status == Some(AssetStatus::Scrapped);
        let filter = AssetFilter {
            status: status.filter(|_| !wants_scrapped),
            category_id,
        };
        let assets = self
            .client
            .assets()
            .list(&filter)
            .await
            .or_failed("fetch assets")?;
        Ok(assets
            .into_iter()
            .filter(|asset| asset.is_scrapped() == wants_scrapped)
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: RecordId) -> Result<Asset, ServiceError> {
        self.client
            .assets()
            .get(id)
            .await
            .or_failed("fetch asset details")
    }

    /// Assets that can be handed to an employee.
    pub async fn issuable(&self) -> Result<Vec<Asset>, ServiceError> {
        self.list(Some(AssetStatus::Available), None).await
    }

    /// Assets currently held by an employee.
    pub async fn returnable(&self) -> Result<Vec<Asset>, ServiceError> {
        self.list(Some(AssetStatus::Assigned), None).await
    }

    /// Every asset that has not been retired yet.
    pub async fn scrappable(&self) -> Result<Vec<Asset>, ServiceError> {
        self.list(None, None).await
    }

    /// Registers a new asset. Every asset enters the registry as `available`.
    #[instrument(skip(self, fields))]
    pub async fn create(&self, fields: AssetFields) -> Result<Asset, ServiceError> {
        let fields = fields.normalized();
        fields.validate()?;
        if fields.status != AssetStatus::Available {
            return Err(ServiceError::ValidationError(format!(
                "new asset {} must be available, not {}",
                fields.asset_id, fields.status
            )));
        }
        let asset = self
            .client
            .assets()
            .create(&fields)
            .await
            .or_failed("save asset")?;
        info!(id = asset.id, asset_id = %asset.asset_id, "asset registered");
        Ok(asset)
    }

    /// Updates an asset's registry details. The status must stay as it is;
    /// it only moves through issue, return and scrap.
    #[instrument(skip(self, fields))]
    pub async fn update(&self, id: RecordId, fields: AssetFields) -> Result<Asset, ServiceError> {
        let fields = fields.normalized();
        fields.validate()?;
        let current = self.get(id).await?;
        if current.status != fields.status {
            return Err(ServiceError::ValidationError(format!(
                "asset {} is {}; status changes only through issue, return or scrap",
                current.asset_id, current.status
            )));
        }
        self.client
            .assets()
            .update(id, &fields)
            .await
            .or_failed("save asset")
    }

    #[instrument(skip(self, remarks))]
    pub async fn issue(
        &self,
        asset_id: RecordId,
        employee_id: RecordId,
        remarks: &str,
    ) -> Result<(), ServiceError> {
        self.ensure_permitted(asset_id, AssetAction::Issue).await?;
        let body = IssueRequest {
            asset_id,
            employee_id,
            remarks: remarks.trim().to_string(),
        };
        self.client
            .assets()
            .issue(&body)
            .await
            .or_failed(AssetAction::Issue.operation())?;
        info!(asset_id, employee_id, "asset issued");
        Ok(())
    }

    #[instrument(skip(self, remarks))]
    pub async fn return_asset(
        &self,
        asset_id: RecordId,
        reason: ReturnReason,
        remarks: &str,
    ) -> Result<(), ServiceError> {
        self.ensure_permitted(asset_id, AssetAction::Return).await?;
        let body = ReturnRequest {
            asset_id,
            reason: reason.to_string(),
            remarks: remarks.trim().to_string(),
        };
        self.client
            .assets()
            .return_asset(&body)
            .await
            .or_failed(AssetAction::Return.operation())?;
        info!(asset_id, %reason, "asset returned");
        Ok(())
    }

    /// Retires an asset for good. Remarks are mandatory.
    #[instrument(skip(self, remarks))]
    pub async fn scrap(
        &self,
        asset_id: RecordId,
        reason: ScrapReason,
        remarks: &str,
    ) -> Result<(), ServiceError> {
        let remarks = remarks.trim();
        if remarks.is_empty() {
            return Err(ServiceError::ValidationError(
                "remarks are required when scrapping an asset".to_string(),
            ));
        }
        self.ensure_permitted(asset_id, AssetAction::Scrap).await?;
        let body = ScrapRequest {
            asset_id,
            reason: reason.to_string(),
            remarks: remarks.to_string(),
        };
        self.client
            .assets()
            .scrap(&body)
            .await
            .or_failed(AssetAction::Scrap.operation())?;
        info!(asset_id, %reason, "asset scrapped");
        Ok(())
    }

    pub async fn history(&self, id: RecordId) -> Result<AssetHistoryReport, ServiceError> {
        self.history_at(id, Utc::now()).await
    }

    /// History with utilization measured up to `now`.
    #[instrument(skip(self))]
    pub async fn history_at(
        &self,
        id: RecordId,
        now: DateTime<Utc>,
    ) -> Result<AssetHistoryReport, ServiceError> {
        let history = self
            .client
            .assets()
            .history(id)
            .await
            .or_failed("fetch asset history")?;

        let mut transactions = history.transactions;
        transactions.sort_by_key(|tx| tx.transaction_date);
        let utilization = utilization::for_asset(&history.asset, &transactions, now);

        Ok(AssetHistoryReport {
            asset: history.asset,
            transactions,
            utilization,
        })
    }

    /// Fetches the asset and checks `action` is possible in its current
    /// status. A failed fetch is reported as a failure of `action` itself.
    async fn ensure_permitted(
        &self,
        asset_id: RecordId,
        action: AssetAction,
    ) -> Result<Asset, ServiceError> {
        let asset = self
            .client
            .assets()
            .get(asset_id)
            .await
            .or_failed(action.operation())?;
        if !action.permits(asset.status) {
            return Err(ServiceError::InvalidTransition {
                asset_id,
                action,
                status: asset.status,
            });
        }
        Ok(asset)
    }
}

/// Case-insensitive match on asset id, serial number, make or model.
pub fn search_assets<'a>(assets: &'a [Asset], text: &str) -> Vec<&'a Asset> {
    let needle = text.trim().to_lowercase();
    assets
        .iter()
        .filter(|asset| {
            needle.is_empty()
                || [
                    Some(asset.asset_id.as_str()),
                    Some(asset.serial_number.as_str()),
                    asset.make.as_deref(),
                    asset.model.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn asset(asset_id: &str, serial: &str, make: Option<&str>, model: Option<&str>) -> Asset {
        serde_json::from_value(json!({
            "id": 1,
            "assetId": asset_id,
            "serialNumber": serial,
            "make": make,
            "model": model,
            "status": "available",
        }))
        .unwrap()
    }

    #[test]
    fn search_matches_any_identifying_field() {
        let assets = vec![
            asset("LAP-001", "SN-AAA", Some("Dell"), Some("Latitude")),
            asset("MON-002", "SN-BBB", Some("LG"), None),
            asset("PHN-003", "XYZ-9", None, Some("Pixel")),
        ];

        let ids = |hits: Vec<&Asset>| hits.iter().map(|a| a.asset_id.clone()).collect::<Vec<_>>();

        assert_eq!(ids(search_assets(&assets, "dell")), vec!["LAP-001"]);
        assert_eq!(ids(search_assets(&assets, "sn-")), vec!["LAP-001", "MON-002"]);
        assert_eq!(ids(search_assets(&assets, "PIXEL")), vec!["PHN-003"]);
        assert_eq!(search_assets(&assets, "").len(), 3);
        assert!(search_assets(&assets, "macbook").is_empty());
    }
}
