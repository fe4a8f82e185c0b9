// 🏭 Vendor Entity

use crate::error::FieldError;
use crate::record::{EntityKind, FieldKind, FieldSpec, Record, RecordId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    /// Free-text purchasing category, e.g. "Office Supplies"
    pub category: String,
    /// Contact person
    pub contact: String,
    pub email: String,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorField {
    Name,
    Category,
    Contact,
    Email,
}

const FIELDS: &[FieldSpec<VendorField>] = &[
    FieldSpec::new(VendorField::Name, "Name", true, FieldKind::Text),
    FieldSpec::new(VendorField::Category, "Category", true, FieldKind::Text),
    FieldSpec::new(VendorField::Contact, "Contact", true, FieldKind::Text),
    FieldSpec::new(VendorField::Email, "Email", true, FieldKind::Text),
];

impl Vendor {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        contact: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Vendor {
            id: 0,
            name: name.into(),
            category: category.into(),
            contact: contact.into(),
            email: email.into(),
            active: true,
        }
    }

    pub fn seed() -> Vec<Vendor> {
        vec![
            Vendor {
                id: 1,
                ..Vendor::new(
                    "Office Supplies Co",
                    "Office Supplies",
                    "Sarah Brown",
                    "sarah@officesupplies.com",
                )
            },
            Vendor {
                id: 2,
                ..Vendor::new(
                    "Tech Solutions Inc",
                    "IT Services",
                    "Mike Johnson",
                    "mike@techsolutions.com",
                )
            },
        ]
    }
}

impl Record for Vendor {
    type Field = VendorField;

    const KIND: EntityKind = EntityKind::Vendor;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn blank() -> Self {
        Vendor::new("", "", "", "")
    }

    fn fields() -> &'static [FieldSpec<VendorField>] {
        FIELDS
    }

    fn get(&self, field: VendorField) -> String {
        match field {
            VendorField::Name => self.name.clone(),
            VendorField::Category => self.category.clone(),
            VendorField::Contact => self.contact.clone(),
            VendorField::Email => self.email.clone(),
        }
    }

    fn set(&mut self, field: VendorField, input: &str) -> Result<(), FieldError> {
        let value = input.to_string();
        match field {
            VendorField::Name => self.name = value,
            VendorField::Category => self.category = value,
            VendorField::Contact => self.contact = value,
            VendorField::Email => self.email = value,
        }
        Ok(())
    }

    fn search_text(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.category.clone(),
            self.contact.clone(),
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
