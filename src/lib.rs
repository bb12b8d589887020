//! Campus Resource Borrow & Return Management
//!
//! Students check out limited-quantity resources from a staff-managed
//! inventory and return them by a due date. Collections are stored as flat
//! JSON files and rewritten after every mutation.

pub mod domain;
pub use domain::{
    Config, Error, ErrorKind, Ledger, Resource, Role, Status, Student, Transaction,
};

/// Filesystem storage for the ledger collections.
pub mod storage;
pub use storage::Store;
