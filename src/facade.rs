// CRUD Façade - the operation set a view calls, over any Repository
//
// The view never knows whether the collection lives in memory or behind
// the mock API; both go through the same calls.

use crate::error::StoreResult;
use crate::record::{matches_query, validate_required, Record, RecordId};
use crate::store::{MemoryStore, Repository};
use tracing::debug;

pub struct Facade<T: Record> {
    repo: Box<dyn Repository<T>>,
}

impl<T: Record> Facade<T> {
    pub fn new(repo: Box<dyn Repository<T>>) -> Self {
        Facade { repo }
    }

    /// Local collection seeded with `records`
    pub fn in_memory(records: Vec<T>) -> Self {
        Self::new(Box::new(MemoryStore::with_records(records)))
    }

    pub fn list(&self) -> StoreResult<Vec<T>> {
        self.repo.list()
    }

    pub fn get(&self, id: RecordId) -> StoreResult<Option<T>> {
        self.repo.get(id)
    }

    /// Full collection narrowed by `query` and the active flag
    pub fn filter(&self, query: &str, include_inactive: bool) -> StoreResult<Vec<T>> {
        Ok(filter_records(&self.repo.list()?, query, include_inactive))
    }

    /// Validate and add; the id is assigned by the repository
    pub fn create(&mut self, record: T) -> StoreResult<T> {
        self.validate(&record)?;
        self.repo.add(record)
    }

    /// Form submit: create when the id is the 0 sentinel, otherwise replace
    /// by id. Replacing an unknown id changes nothing and returns `None`.
    pub fn save(&mut self, record: T) -> StoreResult<Option<T>> {
        if record.is_new() {
            return self.create(record).map(Some);
        }
        self.validate(&record)?;
        self.repo.update(record)
    }

    /// Flip the active flag, nothing else. Kinds without the flag come back
    /// unchanged; unknown ids give `None`.
    pub fn toggle_active(&mut self, id: RecordId) -> StoreResult<Option<T>> {
        let Some(mut record) = self.repo.get(id)? else {
            return Ok(None);
        };
        let Some(active) = record.active() else {
            return Ok(Some(record));
        };

        record.set_active(!active);
        debug!(kind = %T::KIND, id, active = !active, "active flag toggled");
        self.repo.update(record)
    }

    pub fn remove(&mut self, id: RecordId) -> StoreResult<()> {
        self.repo.remove(id)
    }

    fn validate(&self, record: &T) -> StoreResult<()> {
        validate_required(record)?;
        let siblings = self.repo.list()?;
        record.check(&siblings)
    }
}

/// Client-side filter, recomputed from the full collection on every change
pub fn filter_records<T: Record>(records: &[T], query: &str, include_inactive: bool) -> Vec<T> {
    records
        .iter()
        .filter(|r| include_inactive || r.active().unwrap_or(true))
        .filter(|r| matches_query(*r, query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Budget, Customer, Division, GlAccount};
    use crate::error::StoreError;

    fn names(customers: &[Customer]) -> Vec<&str> {
        customers.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_filter_by_name_any_case() {
        let facade = Facade::in_memory(Customer::seed());

        for query in ["bob", "BOB", "Bob"] {
            let hits = facade.filter(query, false).unwrap();
            assert_eq!(names(&hits), vec!["Bob Williams"]);
        }
    }

    #[test]
    fn test_filter_empty_query_returns_active_or_all() {
        let mut facade = Facade::in_memory(Customer::seed());
        facade.toggle_active(1).unwrap();

        assert_eq!(names(&facade.filter("", false).unwrap()), vec!["Bob Williams"]);
        assert_eq!(
            names(&facade.filter("", true).unwrap()),
            vec!["Alice Johnson", "Bob Williams"]
        );
    }

    #[test]
    fn test_toggle_active_hides_and_restores() {
        let mut facade = Facade::in_memory(Customer::seed());
        let before = facade.get(2).unwrap().unwrap();

        facade.toggle_active(2).unwrap();
        assert_eq!(names(&facade.filter("", false).unwrap()), vec!["Alice Johnson"]);

        let after = facade.toggle_active(2).unwrap().unwrap();
        assert_eq!(after, before);
        assert_eq!(facade.filter("", false).unwrap().len(), 2);
    }

    #[test]
    fn test_toggle_active_without_flag_is_noop() {
        let mut facade = Facade::in_memory(Budget::seed());
        let budget = facade.toggle_active(1).unwrap().unwrap();
        assert_eq!(budget, Budget::seed()[0]);
        assert_eq!(facade.filter("", false).unwrap().len(), 2);
    }

    #[test]
    fn test_toggle_unknown_id() {
        let mut facade = Facade::in_memory(GlAccount::seed());
        assert!(facade.toggle_active(9).unwrap().is_none());
    }

    #[test]
    fn test_save_creates_on_sentinel_id() {
        let mut facade = Facade::in_memory(Customer::seed());
        let created = facade
            .save(Customer::new("Carol Diaz", "Widgets", "carol@widgets.io", "555-0100"))
            .unwrap()
            .unwrap();

        assert_eq!(created.id, 3);
        assert_eq!(facade.list().unwrap().len(), 3);
    }

    #[test]
    fn test_save_updates_existing() {
        let mut facade = Facade::in_memory(Customer::seed());
        let mut alice = facade.get(1).unwrap().unwrap();
        alice.phone = "000-000-0000".to_string();

        facade.save(alice).unwrap();
        assert_eq!(facade.get(1).unwrap().unwrap().phone, "000-000-0000");
        assert_eq!(facade.list().unwrap().len(), 2);
    }

    #[test]
    fn test_save_rejects_missing_required_fields() {
        let mut facade = Facade::in_memory(Customer::seed());
        let err = facade.save(Customer::blank()).unwrap_err();

        assert!(matches!(err, StoreError::Validation { .. }));
        assert_eq!(err.field_errors().len(), 4);
        assert_eq!(facade.list().unwrap().len(), 2);
    }

    #[test]
    fn test_save_rejects_division_cycle() {
        let mut facade = Facade::in_memory(Division::seed());
        let child = facade
            .save(Division::new("Field Sales", "FS", Some(1)))
            .unwrap()
            .unwrap();

        let mut sales = facade.get(1).unwrap().unwrap();
        sales.parent_id = Some(child.id);

        assert!(matches!(facade.save(sales), Err(StoreError::Cycle { .. })));
        assert!(facade.get(1).unwrap().unwrap().is_root());
    }

    #[test]
    fn test_remove_leaves_dangling_references() {
        let mut facade = Facade::in_memory(Division::seed());
        let child = facade
            .save(Division::new("Field Sales", "FS", Some(1)))
            .unwrap()
            .unwrap();

        facade.remove(1).unwrap();
        let orphan = facade.get(child.id).unwrap().unwrap();
        assert_eq!(orphan.parent_id, Some(1));
    }
}
