use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::serde_helpers::deserialize_timestamp;
use super::{Employee, RecordId};

#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum TransactionType {
    Issue,
    Return,
    Scrap,
}

/// Immutable custody event. Ordered by `transaction_date`, the log is the
/// history of who held an asset and when.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub asset_id: RecordId,
    #[serde(default)]
    pub employee_id: Option<RecordId>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub transaction_date: DateTime<Utc>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub employee: Option<Employee>,
}

/// Reasons offered when an asset comes back from an employee.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ReturnReason {
    #[strum(to_string = "Upgrade")]
    Upgrade,
    #[strum(to_string = "Repair")]
    Repair,
    #[strum(to_string = "Resignation")]
    Resignation,
    #[strum(to_string = "Transfer")]
    Transfer,
    #[strum(to_string = "No Longer Needed", serialize = "no-longer-needed")]
    NoLongerNeeded,
    #[strum(to_string = "Other")]
    Other,
}

/// Reasons offered when an asset is retired.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ScrapReason {
    #[strum(to_string = "Obsolete")]
    Obsolete,
    #[strum(to_string = "Beyond Repair", serialize = "beyond-repair")]
    BeyondRepair,
    #[strum(to_string = "Lost")]
    Lost,
    #[strum(to_string = "Stolen")]
    Stolen,
    #[strum(to_string = "Damaged")]
    Damaged,
    #[strum(to_string = "End of Life", serialize = "end-of-life")]
    EndOfLife,
    #[strum(to_string = "Other")]
    Other,
}

/// Body of `POST /assets/issue`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    pub asset_id: RecordId,
    pub employee_id: RecordId,
    pub remarks: String,
}

/// Body of `POST /assets/return`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    pub asset_id: RecordId,
    pub reason: String,
    pub remarks: String,
}

/// Body of `POST /assets/scrap`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapRequest {
    pub asset_id: RecordId,
    pub reason: String,
    pub remarks: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn decodes_history_entry() {
        let tx: Transaction = serde_json::from_value(json!({
            "assetId": 5,
            "employeeId": null,
            "type": "scrap",
            "transactionDate": "2024-05-02T14:00:00.000Z",
            "reason": "Lost",
        }))
        .unwrap();
        assert_eq!(tx.kind, TransactionType::Scrap);
        assert!(tx.employee_id.is_none());
        assert!(tx.remarks.is_none());
    }

    #[test]
    fn reasons_render_as_offered_and_parse_loosely() {
        assert_eq!(ReturnReason::NoLongerNeeded.to_string(), "No Longer Needed");
        assert_eq!(ScrapReason::EndOfLife.to_string(), "End of Life");
        assert_eq!(
            ReturnReason::from_str("no-longer-needed").unwrap(),
            ReturnReason::NoLongerNeeded
        );
        assert_eq!(ScrapReason::from_str("beyond repair").unwrap(), ScrapReason::BeyondRepair);
        assert_eq!(ScrapReason::from_str("stolen").unwrap(), ScrapReason::Stolen);
        assert!(ScrapReason::from_str("melted").is_err());
    }

    #[test]
    fn issue_request_wire_shape() {
        let body = IssueRequest {
            asset_id: 9,
            employee_id: 2,
            remarks: String::new(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"assetId": 9, "employeeId": 2, "remarks": ""})
        );
    }
}
