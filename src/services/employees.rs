use tracing::{info, instrument};
use validator::Validate;

use crate::{
    client::RegistryClient,
    errors::{OperationResultExt, ServiceError},
    models::{Employee, EmployeeFields, EmployeeFilter, RecordId, RecordStatus},
};

/// Service for the employee directory and its forms.
#[derive(Clone, Debug)]
pub struct EmployeeService {
    client: RegistryClient,
}

impl EmployeeService {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, status: Option<RecordStatus>) -> Result<Vec<Employee>, ServiceError> {
        self.client
            .employees()
            .list(&EmployeeFilter { status })
            .await
            .or_failed("fetch employees")
    }

    /// Employees eligible to receive an asset.
    pub async fn active(&self) -> Result<Vec<Employee>, ServiceError> {
        self.list(Some(RecordStatus::Active)).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: RecordId) -> Result<Employee, ServiceError> {
        self.client
            .employees()
            .get(id)
            .await
            .or_failed("fetch employee details")
    }

    #[instrument(skip(self, fields))]
    pub async fn create(&self, fields: EmployeeFields) -> Result<Employee, ServiceError> {
        let fields = fields.normalized();
        fields.validate()?;
        let employee = self
            .client
            .employees()
            .create(&fields)
            .await
            .or_failed("save employee")?;
        info!(id = employee.id, employee_id = %employee.employee_id, "employee created");
        Ok(employee)
    }

    #[instrument(skip(self, fields))]
    pub async fn update(
        &self,
        id: RecordId,
        fields: EmployeeFields,
    ) -> Result<Employee, ServiceError> {
        let fields = fields.normalized();
        fields.validate()?;
        self.client
            .employees()
            .update(id, &fields)
            .await
            .or_failed("save employee")
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> Result<(), ServiceError> {
        self.client
            .employees()
            .delete(id)
            .await
            .or_failed("delete employee")?;
        info!(id, "employee deleted");
        Ok(())
    }
}

/// Case-insensitive match on first name, last name, employee id or email.
pub fn search_employees<'a>(employees: &'a [Employee], text: &str) -> Vec<&'a Employee> {
    let needle = text.trim().to_lowercase();
    employees
        .iter()
        .filter(|emp| {
            needle.is_empty()
                || [&emp.first_name, &emp.last_name, &emp.employee_id, &emp.email]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_covers_names_ids_and_email() {
        let employees: Vec<Employee> = serde_json::from_value(json!([
            {"id": 1, "employeeId": "EMP001", "firstName": "Meera", "lastName": "Nair",
             "email": "meera@corp.in"},
            {"id": 2, "employeeId": "EMP002", "firstName": "John", "lastName": "Doe",
             "email": "jd@corp.in"},
        ]))
        .unwrap();

        assert_eq!(search_employees(&employees, "nair")[0].id, 1);
        assert_eq!(search_employees(&employees, "emp002")[0].id, 2);
        assert_eq!(search_employees(&employees, "corp.in").len(), 2);
        assert!(search_employees(&employees, "zed").is_empty());
    }
}
