use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::serde_helpers::deserialize_optional_timestamp;
use super::{non_blank, RecordId, RecordStatus};

/// An employee who can hold assets. `employee_id` is the business key,
/// `id` the storage key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: RecordId,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub joining_date: Option<DateTime<Utc>>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// `First Last (EMP001)`, as shown next to custody events.
    pub fn label(&self) -> String {
        format!("{} ({})", self.full_name(), self.employee_id)
    }

    pub fn is_active(&self) -> bool {
        self.status == RecordStatus::Active
    }
}

/// Payload for creating or updating an employee.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFields {
    #[validate(length(min = 1, message = "employee id is required"))]
    pub employee_id: String,
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub branch: Option<String>,
    pub status: RecordStatus,
    pub joining_date: Option<NaiveDate>,
}

impl EmployeeFields {
    pub fn new(
        employee_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
            department: None,
            designation: None,
            branch: None,
            status: RecordStatus::Active,
            joining_date: None,
        }
    }

    /// Trims required fields and drops blank optional ones.
    pub fn normalized(self) -> Self {
        Self {
            employee_id: self.employee_id.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: non_blank(self.phone),
            department: non_blank(self.department),
            designation: non_blank(self.designation),
            branch: non_blank(self.branch),
            ..self
        }
    }
}

impl From<&Employee> for EmployeeFields {
    fn from(employee: &Employee) -> Self {
        Self {
            employee_id: employee.employee_id.clone(),
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            email: employee.email.clone(),
            phone: employee.phone.clone(),
            department: employee.department.clone(),
            designation: employee.designation.clone(),
            branch: employee.branch.clone(),
            status: employee.status,
            joining_date: employee.joining_date.map(|d| d.date_naive()),
        }
    }
}

/// Exact-match query parameters for `GET /employees`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EmployeeFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
}
