// 🧾 Budget Entry - one amount booked against an entity, GL account and
// division on a date. The three references are advisory ids, never checked.

use crate::error::{FieldError, StoreResult};
use crate::facade::Facade;
use crate::record::{
    parse_amount, parse_date, parse_id, EntityKind, FieldKind, FieldSpec, Record, RecordId,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetEntry {
    #[serde(default)]
    pub id: RecordId,

    /// Employee, customer or vendor id (0 = unassigned)
    pub entity_id: RecordId,

    pub gl_account_id: RecordId,
    pub division_id: RecordId,
    pub amount: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetEntryField {
    Entity,
    GlAccount,
    Division,
    Amount,
    Date,
}

const FIELDS: &[FieldSpec<BudgetEntryField>] = &[
    FieldSpec::new(BudgetEntryField::Entity, "Entity", false, FieldKind::Number),
    FieldSpec::new(
        BudgetEntryField::GlAccount,
        "GL Account",
        false,
        FieldKind::Reference(EntityKind::GlAccount),
    ),
    FieldSpec::new(
        BudgetEntryField::Division,
        "Division",
        false,
        FieldKind::Reference(EntityKind::Division),
    ),
    FieldSpec::new(BudgetEntryField::Amount, "Amount", false, FieldKind::Number),
    FieldSpec::new(BudgetEntryField::Date, "Date", true, FieldKind::Date),
];

impl BudgetEntry {
    /// Unassigned zero-amount entry
    pub fn blank_on(date: NaiveDate) -> Self {
        BudgetEntry {
            id: 0,
            entity_id: 0,
            gl_account_id: 0,
            division_id: 0,
            amount: 0.0,
            date,
        }
    }

    pub fn seed() -> Vec<BudgetEntry> {
        vec![
            BudgetEntry {
                id: 1,
                entity_id: 1,
                gl_account_id: 1,
                division_id: 1,
                amount: 1000.0,
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default(),
            },
            BudgetEntry {
                id: 2,
                entity_id: 2,
                gl_account_id: 2,
                division_id: 2,
                amount: 2000.0,
                date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap_or_default(),
            },
        ]
    }

    pub fn total(entries: &[BudgetEntry]) -> f64 {
        entries.iter().map(|e| e.amount).sum()
    }
}

impl Record for BudgetEntry {
    type Field = BudgetEntryField;

    const KIND: EntityKind = EntityKind::BudgetEntry;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn blank() -> Self {
        BudgetEntry::blank_on(Local::now().date_naive())
    }

    fn fields() -> &'static [FieldSpec<BudgetEntryField>] {
        FIELDS
    }

    fn get(&self, field: BudgetEntryField) -> String {
        match field {
            BudgetEntryField::Entity => self.entity_id.to_string(),
            BudgetEntryField::GlAccount => self.gl_account_id.to_string(),
            BudgetEntryField::Division => self.division_id.to_string(),
            BudgetEntryField::Amount => format!("{:.2}", self.amount),
            BudgetEntryField::Date => self.date.to_string(),
        }
    }

    fn set(&mut self, field: BudgetEntryField, input: &str) -> Result<(), FieldError> {
        match field {
            BudgetEntryField::Entity => self.entity_id = parse_id("Entity", input)?,
            BudgetEntryField::GlAccount => self.gl_account_id = parse_id("GL Account", input)?,
            BudgetEntryField::Division => self.division_id = parse_id("Division", input)?,
            BudgetEntryField::Amount => self.amount = parse_amount("Amount", input)?,
            BudgetEntryField::Date => self.date = parse_date("Date", input)?,
        }
        Ok(())
    }

    fn search_text(&self) -> Vec<String> {
        vec![self.date.to_string(), format!("{:.2}", self.amount)]
    }
}

impl Facade<BudgetEntry> {
    /// Append `count` unassigned entries dated `date`
    pub fn add_blank_entries(
        &mut self,
        count: usize,
        date: NaiveDate,
    ) -> StoreResult<Vec<BudgetEntry>> {
        (0..count)
            .map(|_| self.create(BudgetEntry::blank_on(date)))
            .collect()
    }
}
