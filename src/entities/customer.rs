// 🤝 Customer Entity

use crate::error::FieldError;
use crate::record::{EntityKind, FieldKind, FieldSpec, Record, RecordId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    Name,
    Company,
    Email,
    Phone,
}

const FIELDS: &[FieldSpec<CustomerField>] = &[
    FieldSpec::new(CustomerField::Name, "Name", true, FieldKind::Text),
    FieldSpec::new(CustomerField::Company, "Company", true, FieldKind::Text),
    FieldSpec::new(CustomerField::Email, "Email", true, FieldKind::Text),
    FieldSpec::new(CustomerField::Phone, "Phone", true, FieldKind::Text),
];

impl Customer {
    pub fn new(
        name: impl Into<String>,
        company: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Customer {
            id: 0,
            name: name.into(),
            company: company.into(),
            email: email.into(),
            phone: phone.into(),
            active: true,
        }
    }

    pub fn seed() -> Vec<Customer> {
        vec![
            Customer {
                id: 1,
                ..Customer::new("Alice Johnson", "Tech Corp", "alice@techcorp.com", "123-456-7890")
            },
            Customer {
                id: 2,
                ..Customer::new("Bob Williams", "Innovate Inc", "bob@innovate.com", "987-654-3210")
            },
        ]
    }
}

impl Record for Customer {
    type Field = CustomerField;

    const KIND: EntityKind = EntityKind::Customer;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn blank() -> Self {
        Customer::new("", "", "", "")
    }

    fn fields() -> &'static [FieldSpec<CustomerField>] {
        FIELDS
    }

    fn get(&self, field: CustomerField) -> String {
        match field {
            CustomerField::Name => self.name.clone(),
            CustomerField::Company => self.company.clone(),
            CustomerField::Email => self.email.clone(),
            CustomerField::Phone => self.phone.clone(),
        }
    }

    fn set(&mut self, field: CustomerField, input: &str) -> Result<(), FieldError> {
        let value = input.to_string();
        match field {
            CustomerField::Name => self.name = value,
            CustomerField::Company => self.company = value,
            CustomerField::Email => self.email = value,
            CustomerField::Phone => self.phone = value,
        }
        Ok(())
    }

    fn search_text(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.company.clone(),
            self.email.clone(),
            self.phone.clone(),
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
    fn test_customer_blank_is_active_and_new() {
        let customer = Customer::blank();
        assert!(customer.is_new());
        assert_eq!(customer.active(), Some(true));
    }

    #[test]
    fn test_customer_search_fields() {
        let alice = Customer::seed()[0].clone();
        assert_eq!(
            alice.search_text(),
            vec!["Alice Johnson", "Tech Corp", "alice@techcorp.com", "123-456-7890"]
        );
    }
}
