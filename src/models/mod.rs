//! Registry records as they travel over the wire.

pub mod asset;
pub mod category;
pub mod employee;
pub mod serde_helpers;
pub mod transaction;

use serde::{Deserialize, Serialize};

pub use asset::{Asset, AssetAction, AssetFields, AssetFilter, AssetHistory, AssetStatus};
pub use category::{Category, CategoryFields, CategoryFilter};
pub use employee::{Employee, EmployeeFields, EmployeeFilter};
pub use transaction::{
    IssueRequest, ReturnReason, ReturnRequest, ScrapReason, ScrapRequest, Transaction,
    TransactionType,
};

/// Storage key assigned by the registry server.
pub type RecordId = i64;

/// Activity flag shared by employees and categories.
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
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

/// Treats blank strings from forms as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
