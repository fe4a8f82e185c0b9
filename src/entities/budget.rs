// 📊 Budget Entity - the only collection served over HTTP
//
// JSON shape matches the mock API: { id, name, startDate, endDate, status }

use crate::error::FieldError;
use crate::record::{parse_date, EntityKind, FieldKind, FieldSpec, Record, RecordId};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// BUDGET STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStatus {
    /// Budget currently in force
    Active,

    /// Being prepared, not yet approved
    #[default]
    Draft,

    /// Closed period, kept for reference
    Archived,
}

impl BudgetStatus {
    pub const OPTIONS: &'static [&'static str] = &["Active", "Draft", "Archived"];

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::Active => "Active",
            BudgetStatus::Draft => "Draft",
            BudgetStatus::Archived => "Archived",
        }
    }
}

impl FromStr for BudgetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(BudgetStatus::Active),
            "draft" => Ok(BudgetStatus::Draft),
            "archived" => Ok(BudgetStatus::Archived),
            other => Err(format!("Unknown status: {}", other)),
        }
    }
}

// ============================================================================
// BUDGET ENTITY
// ============================================================================

/// Any field missing from a request body takes its default
/// (empty name, 1970-01-01, Draft).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Budget {
    /// Assigned by the store; absent in create requests
    pub id: RecordId,

    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetField {
    Name,
    StartDate,
    EndDate,
    Status,
}

const FIELDS: &[FieldSpec<BudgetField>] = &[
    FieldSpec::new(BudgetField::Name, "Name", true, FieldKind::Text),
    FieldSpec::new(BudgetField::StartDate, "Start Date", true, FieldKind::Date),
    FieldSpec::new(BudgetField::EndDate, "End Date", true, FieldKind::Date),
    FieldSpec::new(
        BudgetField::Status,
        "Status",
        true,
        FieldKind::Choice(BudgetStatus::OPTIONS),
    ),
];

impl Budget {
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        status: BudgetStatus,
    ) -> Self {
        Budget {
            id: 0,
            name: name.into(),
            start_date,
            end_date,
            status,
        }
    }

    /// The two budgets the mock server starts with
    pub fn seed() -> Vec<Budget> {
        vec![
            Budget {
                id: 1,
                ..Budget::new(
                    "FY 2024 Budget",
                    ymd(2024, 1, 1),
                    ymd(2024, 12, 31),
                    BudgetStatus::Active,
                )
            },
            Budget {
                id: 2,
                ..Budget::new(
                    "Q1 2024 Forecast",
                    ymd(2024, 1, 1),
                    ymd(2024, 3, 31),
                    BudgetStatus::Draft,
                )
            },
        ]
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

impl Record for Budget {
    type Field = BudgetField;

    const KIND: EntityKind = EntityKind::Budget;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn blank() -> Self {
        let today = Local::now().date_naive();
        Budget::new("", today, today, BudgetStatus::Draft)
    }

    fn fields() -> &'static [FieldSpec<BudgetField>] {
        FIELDS
    }

    fn get(&self, field: BudgetField) -> String {
        match field {
            BudgetField::Name => self.name.clone(),
            BudgetField::StartDate => self.start_date.to_string(),
            BudgetField::EndDate => self.end_date.to_string(),
            BudgetField::Status => self.status.as_str().to_string(),
        }
    }

    fn set(&mut self, field: BudgetField, input: &str) -> Result<(), FieldError> {
        match field {
            BudgetField::Name => self.name = input.to_string(),
            BudgetField::StartDate => self.start_date = parse_date("Start Date", input)?,
            BudgetField::EndDate => self.end_date = parse_date("End Date", input)?,
            BudgetField::Status => {
                self.status = input
                    .parse()
                    .map_err(|e: String| FieldError::new("Status", e))?
            }
        }
        Ok(())
    }

    fn search_text(&self) -> Vec<String> {
        vec![self.name.clone(), self.status.as_str().to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_json_shape() {
        let budget = Budget::seed()[0].clone();
        let json = serde_json::to_value(&budget).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "name": "FY 2024 Budget",
                "startDate": "2024-01-01",
                "endDate": "2024-12-31",
                "status": "Active"
            })
        );
    }

    #[test]
    fn test_budget_deserialize_without_id() {
        let budget: Budget = serde_json::from_value(serde_json::json!({
            "name": "New Budget",
            "startDate": "2025-01-01",
            "endDate": "2025-12-31",
            "status": "Draft"
        }))
        .unwrap();

        assert_eq!(budget.id, 0);
        assert!(budget.is_new());
        assert_eq!(budget.status, BudgetStatus::Draft);
    }

    #[test]
    fn test_budget_partial_body_takes_defaults() {
        let budget: Budget =
            serde_json::from_value(serde_json::json!({ "name": "Partial" })).unwrap();

        assert_eq!(budget.name, "Partial");
        assert_eq!(budget.start_date.to_string(), "1970-01-01");
        assert_eq!(budget.status, BudgetStatus::Draft);
    }

    #[test]
    fn test_budget_set_fields() {
        let mut budget = Budget::blank();
        budget.set(BudgetField::Name, "FY 2025").unwrap();
        budget.set(BudgetField::StartDate, "2025-01-01").unwrap();
        budget.set(BudgetField::Status, "archived").unwrap();

        assert_eq!(budget.name, "FY 2025");
        assert_eq!(budget.get(BudgetField::StartDate), "2025-01-01");
        assert_eq!(budget.status, BudgetStatus::Archived);

        let err = budget.set(BudgetField::Status, "Closed").unwrap_err();
        assert_eq!(err.field, "Status");
        assert!(budget.set(BudgetField::EndDate, "31/12/2025").is_err());
    }

    #[test]
    fn test_budget_has_no_active_flag() {
        let mut budget = Budget::seed()[0].clone();
        budget.set_active(false);
        assert_eq!(budget.active(), None);
        assert_eq!(budget, Budget::seed()[0]);
    }
}
