// 🏢 Division Entity - organisational tree via parent_id
//
// The parent reference is advisory: deleting a division leaves its
// children pointing at a missing id. Reparenting a division under itself
// or one of its descendants is rejected on save.

use crate::error::{FieldError, StoreError, StoreResult};
use crate::record::{
    format_optional_id, parse_optional_id, EntityKind, FieldKind, FieldSpec, Record, RecordId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Division {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    /// Short code, e.g. "SAL"
    pub code: String,
    /// Root divisions have no parent
    pub parent_id: Option<RecordId>,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivisionField {
    Name,
    Code,
    Parent,
}

const FIELDS: &[FieldSpec<DivisionField>] = &[
    FieldSpec::new(DivisionField::Name, "Name", true, FieldKind::Text),
    FieldSpec::new(DivisionField::Code, "Code", false, FieldKind::Text),
    FieldSpec::new(
        DivisionField::Parent,
        "Parent",
        false,
        FieldKind::Reference(EntityKind::Division),
    ),
];

impl Division {
    pub fn new(name: impl Into<String>, code: impl Into<String>, parent_id: Option<RecordId>) -> Self {
        Division {
            id: 0,
            name: name.into(),
            code: code.into(),
            parent_id,
            active: true,
        }
    }

    pub fn seed() -> Vec<Division> {
        vec![
            Division {
                id: 1,
                ..Division::new("Sales", "SAL", None)
            },
            Division {
                id: 2,
                ..Division::new("Marketing", "MKT", None)
            },
        ]
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Names from the root down to this division. Stops at a dangling
    /// parent id.
    pub fn path(&self, all: &[Division]) -> Vec<String> {
        let mut path = vec![self.name.clone()];
        let mut current = self.parent_id;
        let mut steps = 0;

        while let Some(parent_id) = current {
            let Some(parent) = all.iter().find(|d| d.id == parent_id) else {
                break;
            };
            path.insert(0, parent.name.clone());
            current = parent.parent_id;

            steps += 1;
            if steps > all.len() {
                break;
            }
        }

        path
    }
}

impl Record for Division {
    type Field = DivisionField;

    const KIND: EntityKind = EntityKind::Division;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn blank() -> Self {
        Division::new("", "", None)
    }

    fn fields() -> &'static [FieldSpec<DivisionField>] {
        FIELDS
    }

    fn get(&self, field: DivisionField) -> String {
        match field {
            DivisionField::Name => self.name.clone(),
            DivisionField::Code => self.code.clone(),
            DivisionField::Parent => format_optional_id(self.parent_id),
        }
    }

    fn set(&mut self, field: DivisionField, input: &str) -> Result<(), FieldError> {
        match field {
            DivisionField::Name => self.name = input.to_string(),
            DivisionField::Code => self.code = input.to_string(),
            DivisionField::Parent => self.parent_id = parse_optional_id("Parent", input)?,
        }
        Ok(())
    }

    fn search_text(&self) -> Vec<String> {
        vec![self.name.clone(), self.code.clone()]
    }

    fn active(&self) -> Option<bool> {
        Some(self.active)
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Walk up from the proposed parent; reaching `self` means a cycle
    fn check(&self, siblings: &[Division]) -> StoreResult<()> {
        let Some(parent_id) = self.parent_id else {
            return Ok(());
        };
        if self.is_new() {
            return Ok(());
        }

        let mut current = Some(parent_id);
        let mut steps = 0;
        while let Some(id) = current {
            if id == self.id {
                return Err(StoreError::Cycle {
                    id: self.id,
                    parent_id,
                });
            }
            current = siblings
                .iter()
                .find(|d| d.id == id)
                .and_then(|d| d.parent_id);

            steps += 1;
            if steps > siblings.len() {
                break;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sales(1) -> Inside Sales(3) -> EMEA(4), Marketing(2)
    fn tree() -> Vec<Division> {
        let mut all = Division::seed();
        all.push(Division {
            id: 3,
            ..Division::new("Inside Sales", "ISL", Some(1))
        });
        all.push(Division {
            id: 4,
            ..Division::new("EMEA", "EMEA", Some(3))
        });
        all
    }

    #[test]
    fn test_division_self_parent_rejected() {
        let all = tree();
        let mut sales = all[0].clone();
        sales.parent_id = Some(1);

        assert!(matches!(
            sales.check(&all),
            Err(StoreError::Cycle { id: 1, parent_id: 1 })
        ));
    }

    #[test]
    fn test_division_reparent_under_descendant_rejected() {
        let all = tree();
        let mut sales = all[0].clone();
        sales.parent_id = Some(4);

        assert!(matches!(sales.check(&all), Err(StoreError::Cycle { .. })));
    }

    #[test]
    fn test_division_reparent_elsewhere_allowed() {
        let all = tree();
        let mut emea = all[3].clone();
        emea.parent_id = Some(2);
        assert!(emea.check(&all).is_ok());

        let mut marketing = all[1].clone();
        marketing.parent_id = Some(4);
        assert!(marketing.check(&all).is_ok());
    }

    #[test]
    fn test_division_dangling_parent_tolerated() {
        let all = tree();
        let mut marketing = all[1].clone();
        marketing.parent_id = Some(99);
        assert!(marketing.check(&all).is_ok());
    }

    #[test]
    fn test_division_path() {
        let all = tree();
        assert_eq!(all[3].path(&all), vec!["Sales", "Inside Sales", "EMEA"]);
        assert_eq!(all[1].path(&all), vec!["Marketing"]);
        assert!(all[1].is_root());
    }
}
