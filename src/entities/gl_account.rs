// 📒 GL Account Entity - general ledger account with a fixed account type

use crate::error::FieldError;
use crate::record::{EntityKind, FieldKind, FieldSpec, Record, RecordId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// GL ACCOUNT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlAccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl GlAccountType {
    pub const OPTIONS: &'static [&'static str] =
        &["Asset", "Liability", "Equity", "Revenue", "Expense"];

    pub fn as_str(&self) -> &'static str {
        match self {
            GlAccountType::Asset => "Asset",
            GlAccountType::Liability => "Liability",
            GlAccountType::Equity => "Equity",
            GlAccountType::Revenue => "Revenue",
            GlAccountType::Expense => "Expense",
        }
    }
}

impl FromStr for GlAccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Ok(GlAccountType::Asset),
            "liability" => Ok(GlAccountType::Liability),
            "equity" => Ok(GlAccountType::Equity),
            "revenue" => Ok(GlAccountType::Revenue),
            "expense" => Ok(GlAccountType::Expense),
            other => Err(format!("Unknown account type: {}", other)),
        }
    }
}

// ============================================================================
// GL ACCOUNT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlAccount {
    #[serde(default)]
    pub id: RecordId,

    /// Chart-of-accounts code, e.g. "1000"
    pub code: String,

    pub name: String,

    #[serde(rename = "type")]
    pub account_type: GlAccountType,

    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlAccountField {
    Code,
    Name,
    Type,
}

const FIELDS: &[FieldSpec<GlAccountField>] = &[
    FieldSpec::new(GlAccountField::Code, "Code", true, FieldKind::Text),
    FieldSpec::new(GlAccountField::Name, "Name", true, FieldKind::Text),
    FieldSpec::new(
        GlAccountField::Type,
        "Type",
        true,
        FieldKind::Choice(GlAccountType::OPTIONS),
    ),
];

impl GlAccount {
    pub fn new(code: impl Into<String>, name: impl Into<String>, account_type: GlAccountType) -> Self {
        GlAccount {
            id: 0,
            code: code.into(),
            name: name.into(),
            account_type,
            active: true,
        }
    }

    pub fn seed() -> Vec<GlAccount> {
        vec![
            GlAccount {
                id: 1,
                ..GlAccount::new("1000", "Cash", GlAccountType::Asset)
            },
            GlAccount {
                id: 2,
                ..GlAccount::new("2000", "Accounts Payable", GlAccountType::Liability)
            },
        ]
    }
}

impl Record for GlAccount {
    type Field = GlAccountField;

    const KIND: EntityKind = EntityKind::GlAccount;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn blank() -> Self {
        GlAccount::new("", "", GlAccountType::Asset)
    }

    fn fields() -> &'static [FieldSpec<GlAccountField>] {
        FIELDS
    }

    fn get(&self, field: GlAccountField) -> String {
        match field {
            GlAccountField::Code => self.code.clone(),
            GlAccountField::Name => self.name.clone(),
            GlAccountField::Type => self.account_type.as_str().to_string(),
        }
    }

    fn set(&mut self, field: GlAccountField, input: &str) -> Result<(), FieldError> {
        match field {
            GlAccountField::Code => self.code = input.to_string(),
            GlAccountField::Name => self.name = input.to_string(),
            GlAccountField::Type => {
                self.account_type = input
                    .parse()
                    .map_err(|e: String| FieldError::new("Type", e))?
            }
        }
        Ok(())
    }

    fn search_text(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            self.account_type.as_str().to_string(),
        ]
    }

    fn active(&self) -> Option<bool> {
        Some(self.active)
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
