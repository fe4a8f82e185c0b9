// Entity Models - one Record implementation per managed kind
//
// Each entity has:
// - Integer identity assigned by its store (0 = not yet created)
// - A Field enum for typed form edits
// - Seed fixtures for the initial collection

pub mod budget;
pub mod budget_entry;
pub mod customer;
pub mod division;
pub mod employee;
pub mod gl_account;
pub mod vendor;

pub use budget::{Budget, BudgetField, BudgetStatus};
pub use budget_entry::{BudgetEntry, BudgetEntryField};
pub use customer::{Customer, CustomerField};
pub use division::{Division, DivisionField};
pub use employee::{Employee, EmployeeField};
pub use gl_account::{GlAccount, GlAccountField, GlAccountType};
pub use vendor::{Vendor, VendorField};
