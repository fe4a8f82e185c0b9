// Budget Admin - Core Library
// Exposes all modules for use in the TUI, the mock API server, and tests

pub mod error;      // Error taxonomy (StoreError, FieldError)
pub mod record;     // Record trait, field schema, search and merge helpers
pub mod store;      // Repository trait + in-memory store
pub mod facade;     // CRUD façade the views call
pub mod view;       // List+Modal view state machine
pub mod entities;   // Budget, entries and reference data
pub mod config;     // Environment configuration
pub mod logging;    // tracing subscriber setup

// Mock API (axum)
#[cfg(feature = "server")]
pub mod api;

// HTTP-backed repository (reqwest)
#[cfg(feature = "client")]
pub mod client;

// Re-export commonly used types
pub use error::{FieldError, StoreError, StoreResult};
pub use record::{EntityKind, FieldKind, FieldSpec, Record, RecordId, NEW_RECORD_ID};
pub use store::{MemoryStore, Repository};
pub use facade::Facade;
pub use view::{Form, ListView, LoadState, Mode};
pub use entities::{
    Budget, BudgetStatus,
    BudgetEntry,
    Customer, Vendor, Employee,
    Division,
    GlAccount, GlAccountType,
};
pub use config::{ClientConfig, ServerConfig};

#[cfg(feature = "client")]
pub use client::HttpStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
