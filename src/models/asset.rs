use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::serde_helpers::{deserialize_optional_decimal, deserialize_optional_timestamp};
use super::{non_blank, Category, Employee, RecordId, Transaction};

/// Lifecycle status of an asset. `Scrapped` is terminal.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AssetStatus {
    #[default]
    Available,
    Assigned,
    Repair,
    Scrapped,
}

impl AssetStatus {
    pub fn is_terminal(self) -> bool {
        self == AssetStatus::Scrapped
    }
}

/// Custody operations the registry performs atomically on the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssetAction {
    Issue,
    Return,
    Scrap,
}

impl AssetAction {
    /// Whether an asset currently in `status` can undergo this action.
    pub fn permits(self, status: AssetStatus) -> bool {
        match self {
            AssetAction::Issue => status == AssetStatus::Available,
            AssetAction::Return => status == AssetStatus::Assigned,
            AssetAction::Scrap => !status.is_terminal(),
        }
    }

    /// Name of the action in failure messages (`Failed to issue asset`).
    pub fn operation(self) -> &'static str {
        match self {
            AssetAction::Issue => "issue asset",
            AssetAction::Return => "return asset",
            AssetAction::Scrap => "scrap asset",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: RecordId,
    pub asset_id: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub category_id: Option<RecordId>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub purchase_price: Option<Decimal>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub status: AssetStatus,
    #[serde(default)]
    pub assigned_employee_id: Option<RecordId>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub assigned_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub assigned_employee: Option<Employee>,
}

impl Asset {
    pub fn is_scrapped(&self) -> bool {
        self.status.is_terminal()
    }

    /// `Make Model`, skipping whichever half is missing.
    pub fn make_model(&self) -> String {
        format!(
            "{} {}",
            self.make.as_deref().unwrap_or_default(),
            self.model.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }
}

/// Payload for creating or updating an asset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssetFields {
    #[validate(length(min = 1, message = "asset id is required"))]
    pub asset_id: String,
    #[validate(length(min = 1, message = "serial number is required"))]
    pub serial_number: String,
    pub category_id: RecordId,
    pub make: Option<String>,
    pub model: Option<String>,
    pub description: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<Decimal>,
    pub branch: Option<String>,
    pub status: AssetStatus,
}

impl AssetFields {
    pub fn new(
        asset_id: impl Into<String>,
        serial_number: impl Into<String>,
        category_id: RecordId,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            serial_number: serial_number.into(),
            category_id,
            make: None,
            model: None,
            description: None,
            purchase_date: None,
            purchase_price: None,
            branch: None,
            status: AssetStatus::Available,
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            asset_id: self.asset_id.trim().to_string(),
            serial_number: self.serial_number.trim().to_string(),
            make: non_blank(self.make),
            model: non_blank(self.model),
            description: non_blank(self.description),
            branch: non_blank(self.branch),
            ..self
        }
    }
}

/// Fails for records that predate category assignment; the edit form
/// requires one.
impl TryFrom<&Asset> for AssetFields {
    type Error = String;

    fn try_from(asset: &Asset) -> Result<Self, Self::Error> {
        let category_id = asset
            .category_id
            .or_else(|| asset.category.as_ref().map(|c| c.id))
            .ok_or_else(|| format!("asset {} has no category", asset.asset_id))?;
        Ok(Self {
            asset_id: asset.asset_id.clone(),
            serial_number: asset.serial_number.clone(),
            category_id,
            make: asset.make.clone(),
            model: asset.model.clone(),
            description: asset.description.clone(),
            purchase_date: asset.purchase_date.map(|d| d.date_naive()),
            purchase_price: asset.purchase_price,
            branch: asset.branch.clone(),
            status: asset.status,
        })
    }
}

/// Exact-match query parameters for `GET /assets`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AssetStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<RecordId>,
}

/// Response of `GET /assets/:id/history`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetHistory {
    pub asset: Asset,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}
