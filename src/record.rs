// Record schema - what every managed entity kind looks like to the store,
// the façade and the views.
//
// One trait, implemented once per kind. The store and the views never know
// which concrete entity they hold.

use crate::error::{FieldError, StoreError, StoreResult};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Integer identity of a record within its collection
pub type RecordId = u64;

/// Marks a form whose record has not been created yet
pub const NEW_RECORD_ID: RecordId = 0;

// ============================================================================
// ENTITY KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Budget,
    BudgetEntry,
    Employee,
    Customer,
    Vendor,
    Division,
    GlAccount,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Budget => "Budget",
            EntityKind::BudgetEntry => "Budget Entry",
            EntityKind::Employee => "Employee",
            EntityKind::Customer => "Customer",
            EntityKind::Vendor => "Vendor",
            EntityKind::Division => "Division",
            EntityKind::GlAccount => "GL Account",
        }
    }

    /// REST collection name (`/api/<collection>`)
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Budget => "budgets",
            EntityKind::BudgetEntry => "entries",
            EntityKind::Employee => "employees",
            EntityKind::Customer => "customers",
            EntityKind::Vendor => "vendors",
            EntityKind::Division => "divisions",
            EntityKind::GlAccount => "glaccounts",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FIELD SPECS
// ============================================================================

/// How a field is edited in a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// `YYYY-MM-DD`
    Date,
    Number,
    /// One of a fixed set of options, cycled in the form
    Choice(&'static [&'static str]),
    /// Foreign key into another collection (advisory, never checked)
    Reference(EntityKind),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec<F: 'static> {
    pub field: F,
    pub label: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl<F> FieldSpec<F> {
    pub const fn new(field: F, label: &'static str, required: bool, kind: FieldKind) -> Self {
        FieldSpec {
            field,
            label,
            required,
            kind,
        }
    }
}

// ============================================================================
// RECORD TRAIT
// ============================================================================

/// A managed record kind.
///
/// Field mutation goes through `set`, keyed by the kind's own `Field` enum,
/// so every editable field is matched exhaustively per entity.
pub trait Record:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Field: Copy + PartialEq + fmt::Debug + Send + Sync + 'static;

    const KIND: EntityKind;

    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);

    /// Empty record used by the "create" form
    fn blank() -> Self;

    fn fields() -> &'static [FieldSpec<Self::Field>];

    /// Display value of a field (also the initial form input)
    fn get(&self, field: Self::Field) -> String;

    /// Parse `input` into `field`
    fn set(&mut self, field: Self::Field, input: &str) -> Result<(), FieldError>;

    /// Text fields the list filter matches against
    fn search_text(&self) -> Vec<String>;

    /// `None` for kinds without an active flag
    fn active(&self) -> Option<bool> {
        None
    }

    fn set_active(&mut self, _active: bool) {}

    /// Kind-specific consistency check against the rest of the collection
    fn check(&self, _siblings: &[Self]) -> StoreResult<()> {
        Ok(())
    }

    fn is_new(&self) -> bool {
        self.id() == NEW_RECORD_ID
    }
}

/// Required-field check, the only validation applied before a save
pub fn validate_required<T: Record>(record: &T) -> StoreResult<()> {
    let errors: Vec<FieldError> = T::fields()
        .iter()
        .filter(|spec| spec.required && record.get(spec.field).trim().is_empty())
        .map(|spec| FieldError::required(spec.label))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(StoreError::Validation {
            kind: T::KIND,
            errors,
        })
    }
}

/// Case-insensitive substring match over the record's search fields.
/// An empty (or blank) query matches everything.
pub fn matches_query<T: Record>(record: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    record
        .search_text()
        .iter()
        .any(|text| text.to_lowercase().contains(&needle))
}

/// Shallow-merge a JSON object over a record (partial update bodies).
/// An `id` key in the patch is ignored; identity never changes.
pub fn merge_json<T: Record>(base: &T, patch: &serde_json::Value) -> StoreResult<T> {
    let Some(patch) = patch.as_object() else {
        return Err(StoreError::Malformed(serde::de::Error::custom(
            "update body must be a JSON object",
        )));
    };

    let mut merged = serde_json::to_value(base)?;
    if let Some(target) = merged.as_object_mut() {
        for (key, value) in patch {
            if key == "id" {
                continue;
            }
            target.insert(key.clone(), value.clone());
        }
    }

    let mut record: T = serde_json::from_value(merged)?;
    record.set_id(base.id());
    Ok(record)
}

// ============================================================================
// FIELD PARSERS (shared by the entity `set` impls)
// ============================================================================

pub fn parse_date(label: &'static str, input: &str) -> Result<NaiveDate, FieldError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| FieldError::new(label, "Expected a date like 2024-01-31"))
}

pub fn parse_amount(label: &'static str, input: &str) -> Result<f64, FieldError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FieldError::new(label, "Expected a number"))
}

pub fn parse_id(label: &'static str, input: &str) -> Result<RecordId, FieldError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(NEW_RECORD_ID);
    }
    trimmed
        .parse::<RecordId>()
        .map_err(|_| FieldError::new(label, "Expected a record id"))
}

/// Blank input and `0` both mean "no reference"
pub fn parse_optional_id(
    label: &'static str,
    input: &str,
) -> Result<Option<RecordId>, FieldError> {
    parse_id(label, input).map(|id| (id != NEW_RECORD_ID).then_some(id))
}

pub fn format_optional_id(id: Option<RecordId>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Budget, BudgetStatus, Customer};

    #[test]
    fn test_validate_required_reports_every_blank_field() {
        let mut customer = Customer::blank();
        customer.name = "Alice".to_string();

        let err = validate_required(&customer).unwrap_err();
        let fields: Vec<&str> = err.field_errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["Company", "Email", "Phone"]);
    }

    #[test]
    fn test_validate_required_whitespace_is_blank() {
        let mut customer = Customer::seed()[0].clone();
        customer.phone = "   ".to_string();
        assert!(validate_required(&customer).is_err());
    }

    #[test]
    fn test_matches_query_case_insensitive() {
        let bob = Customer::seed()[1].clone();
        assert!(matches_query(&bob, "BOB"));
        assert!(matches_query(&bob, "innovate"));
        assert!(matches_query(&bob, ""));
        assert!(!matches_query(&bob, "alice"));
    }

    #[test]
    fn test_merge_json_overlays_fields_and_keeps_id() {
        let budget = Budget::seed()[1].clone();
        let patch = serde_json::json!({ "status": "Active", "id": 99 });

        let merged = merge_json(&budget, &patch).unwrap();
        assert_eq!(merged.id, budget.id);
        assert_eq!(merged.status, BudgetStatus::Active);
        assert_eq!(merged.name, budget.name);
    }

    #[test]
    fn test_merge_json_rejects_bad_values() {
        let budget = Budget::seed()[0].clone();
        let patch = serde_json::json!({ "startDate": "not a date" });
        assert!(matches!(
            merge_json(&budget, &patch),
            Err(StoreError::Malformed(_))
        ));

        let not_object = serde_json::json!(["status"]);
        assert!(merge_json(&budget, &not_object).is_err());
    }

    #[test]
    fn test_field_parsers() {
        assert_eq!(parse_optional_id("Parent", "").unwrap(), None);
        assert_eq!(parse_optional_id("Parent", "0").unwrap(), None);
        assert_eq!(parse_optional_id("Parent", " 4 ").unwrap(), Some(4));
        assert!(parse_optional_id("Parent", "four").is_err());

        assert_eq!(parse_amount("Amount", "").unwrap(), 0.0);
        assert_eq!(parse_amount("Amount", "12.5").unwrap(), 12.5);
        assert!(parse_amount("Amount", "NaN").is_err());

        assert!(parse_date("Date", "2024-02-30").is_err());
        assert_eq!(
            parse_date("Date", "2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }
}
