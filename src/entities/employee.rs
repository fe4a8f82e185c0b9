// 👤 Employee Entity - optionally attached to a Division (advisory id)

use crate::error::FieldError;
use crate::record::{
    format_optional_id, parse_optional_id, EntityKind, FieldKind, FieldSpec, Record, RecordId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    pub position: String,
    pub department: String,
    pub email: String,
    /// Division id; may dangle after the division is deleted
    pub division_id: Option<RecordId>,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeField {
    Name,
    Position,
    Department,
    Email,
    Division,
}

const FIELDS: &[FieldSpec<EmployeeField>] = &[
    FieldSpec::new(EmployeeField::Name, "Name", true, FieldKind::Text),
    FieldSpec::new(EmployeeField::Position, "Position", true, FieldKind::Text),
    FieldSpec::new(EmployeeField::Department, "Department", true, FieldKind::Text),
    FieldSpec::new(EmployeeField::Email, "Email", true, FieldKind::Text),
    FieldSpec::new(
        EmployeeField::Division,
        "Division",
        false,
        FieldKind::Reference(EntityKind::Division),
    ),
];

impl Employee {
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        department: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Employee {
            id: 0,
            name: name.into(),
            position: position.into(),
            department: department.into(),
            email: email.into(),
            division_id: None,
            active: true,
        }
    }

    pub fn seed() -> Vec<Employee> {
        vec![
            Employee {
                id: 1,
                ..Employee::new("John Doe", "Developer", "IT", "john@example.com")
            },
            Employee {
                id: 2,
                ..Employee::new("Jane Smith", "Designer", "Creative", "jane@example.com")
            },
        ]
    }
}

impl Record for Employee {
    type Field = EmployeeField;

    const KIND: EntityKind = EntityKind::Employee;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn blank() -> Self {
        Employee::new("", "", "", "")
    }

    fn fields() -> &'static [FieldSpec<EmployeeField>] {
        FIELDS
    }

    fn get(&self, field: EmployeeField) -> String {
        match field {
            EmployeeField::Name => self.name.clone(),
            EmployeeField::Position => self.position.clone(),
            EmployeeField::Department => self.department.clone(),
            EmployeeField::Email => self.email.clone(),
            EmployeeField::Division => format_optional_id(self.division_id),
        }
    }

    fn set(&mut self, field: EmployeeField, input: &str) -> Result<(), FieldError> {
        match field {
            EmployeeField::Name => self.name = input.to_string(),
            EmployeeField::Position => self.position = input.to_string(),
            EmployeeField::Department => self.department = input.to_string(),
            EmployeeField::Email => self.email = input.to_string(),
            EmployeeField::Division => self.division_id = parse_optional_id("Division", input)?,
        }
        Ok(())
    }

    fn search_text(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.position.clone(),
            self.department.clone(),
            self.email.clone(),
        ]
    }

    fn active(&self) -> Option<bool> {
        Some(self.active)
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_division_reference() {
        let mut employee = Employee::seed()[0].clone();
        assert_eq!(employee.get(EmployeeField::Division), "");

        employee.set(EmployeeField::Division, "2").unwrap();
        assert_eq!(employee.division_id, Some(2));

        employee.set(EmployeeField::Division, "").unwrap();
        assert_eq!(employee.division_id, None);
    }

    #[test]
    fn test_employee_json_uses_camel_case() {
        let json = serde_json::to_value(&Employee::seed()[1]).unwrap();
        assert!(json.get("divisionId").is_some());
        assert_eq!(json["department"], "Creative");
    }
}
