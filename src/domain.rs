//! Domain models and core rules for resource lending.
//!
//! This module contains the entity records, input validators, the role
//! classifier, and the [`Ledger`] aggregate that enforces the borrowing
//! rules.

mod config;
pub use config::Config;

/// Strict ISO date parsing and calendar arithmetic.
pub mod dates;

mod error;
pub use error::{Error, ErrorKind};

/// Ledger aggregate and all lending operations.
pub mod ledger;
pub use ledger::Ledger;

mod resource;
pub use resource::Resource;

/// Email-domain role classification.
pub mod role;
pub use role::Role;

/// Sequence ID allocation (`T001`, `S042`, ...).
pub mod seq;

mod student;
pub use student::Student;

mod transaction;
pub use transaction::{Status, Transaction};

/// Input validators shared by the ledger and the CLI boundary.
pub mod validate;
