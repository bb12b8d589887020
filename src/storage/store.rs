//! A filesystem backed lending ledger.
//!
//! The [`Store`] wraps the filesystem agnostic [`Ledger`]: it loads the
//! configuration and all three collections once at startup, keeps the
//! ledger as the in-process source of truth, and rewrites the affected
//! collection files synchronously after every successful mutation. A save
//! failure is reported to the caller but the in-memory mutation is not
//! rolled back, so memory and disk can diverge until the next successful
//! save.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::domain::{Config, Error, Ledger, Resource, Student, Transaction};

use super::json::{self, LoadError, SaveError};

const STUDENTS_FILE: &str = "students.json";
const RESOURCES_FILE: &str = "resources.json";
const TRANSACTIONS_FILE: &str = "transactions.json";

/// Name of the configuration file inside the data root.
pub const CONFIG_FILE: &str = "config.toml";

/// Errors opening a data root.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    /// The data directory could not be created.
    #[error("could not create data directory '{path}': {source}")]
    CreateRoot {
        /// The data root.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// One of the collection files was unreadable or corrupted.
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Errors from a mutating store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The domain rejected the operation; nothing was written.
    #[error(transparent)]
    Domain(#[from] Error),

    /// The mutation applied in memory but persisting it failed.
    #[error(transparent)]
    Save(#[from] SaveError),
}

/// A lending ledger persisted to flat JSON files in a data directory.
#[derive(Debug)]
pub struct Store {
    root: PathBuf,
    ledger: Ledger,
}

impl Store {
    /// Opens (and if necessary creates) a data root and loads everything.
    ///
    /// A missing `config.toml` falls back to the default configuration;
    /// missing collection files are created empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or any
    /// collection file is unreadable or corrupted.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, OpenError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| OpenError::CreateRoot {
            path: root.clone(),
            source,
        })?;

        let config = load_config(&root);
        let students = json::load_records(&root.join(STUDENTS_FILE))?;
        let resources = json::load_records(&root.join(RESOURCES_FILE))?;
        let transactions = json::load_records(&root.join(TRANSACTIONS_FILE))?;

        tracing::debug!(
            "Loaded {} students, {} resources, {} transactions from {}",
            students.len(),
            resources.len(),
            transactions.len(),
            root.display(),
        );

        Ok(Self {
            root,
            ledger: Ledger::with_collections(config, students, resources, transactions),
        })
    }

    /// The data root this store reads and writes.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read access to the in-memory ledger.
    ///
    /// All queries go through here; mutations go through the store so they
    /// are persisted.
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Persists all three collections.
    ///
    /// # Errors
    ///
    /// Returns the first save failure encountered.
    pub fn save_all(&self) -> Result<(), SaveError> {
        self.save_students()?;
        self.save_resources()?;
        self.save_transactions()
    }

    /// Adds a student and persists the student collection.
    ///
    /// # Errors
    ///
    /// Propagates domain rejections and save failures.
    pub fn add_student(
        &mut self,
        student_id: &str,
        name: &str,
        email: &str,
    ) -> Result<Student, StoreError> {
        let student = self.ledger.add_student(student_id, name, email)?;
        self.save_students()?;
        Ok(student)
    }

    /// Registers a student under the next `S` sequence ID and persists.
    ///
    /// # Errors
    ///
    /// Propagates domain rejections and save failures.
    pub fn register_student(&mut self, name: &str, email: &str) -> Result<Student, StoreError> {
        let student = self.ledger.register_student(name, email)?;
        self.save_students()?;
        Ok(student)
    }

    /// Adds a resource and persists the resource collection.
    ///
    /// # Errors
    ///
    /// Propagates domain rejections and save failures.
    pub fn add_resource(
        &mut self,
        resource_id: &str,
        name: &str,
        category: &str,
        quantity: u32,
    ) -> Result<Resource, StoreError> {
        let resource = self
            .ledger
            .add_resource(resource_id, name, category, quantity)?;
        self.save_resources()?;
        Ok(resource)
    }

    /// Overwrites a resource quantity and persists.
    ///
    /// # Errors
    ///
    /// Propagates domain rejections and save failures.
    pub fn update_resource_quantity(
        &mut self,
        resource_id: &str,
        new_quantity: u32,
    ) -> Result<(), StoreError> {
        self.ledger
            .update_resource_quantity(resource_id, new_quantity)?;
        self.save_resources()?;
        Ok(())
    }

    /// Removes a resource and persists.
    ///
    /// # Errors
    ///
    /// Propagates domain rejections and save failures.
    pub fn remove_resource(&mut self, resource_id: &str) -> Result<(), StoreError> {
        self.ledger.remove_resource(resource_id)?;
        self.save_resources()?;
        Ok(())
    }

    /// Borrows a unit and persists both affected collections.
    ///
    /// # Errors
    ///
    /// Propagates domain rejections and save failures.
    pub fn borrow_resource(
        &mut self,
        student_id: &str,
        resource_id: &str,
        borrow_date: Option<&str>,
    ) -> Result<Transaction, StoreError> {
        let transaction = self
            .ledger
            .borrow_resource(student_id, resource_id, borrow_date)?;
        self.save_resources()?;
        self.save_transactions()?;
        Ok(transaction)
    }

    /// Returns a unit by transaction ID and persists both collections.
    ///
    /// # Errors
    ///
    /// Propagates domain rejections and save failures.
    pub fn return_resource(
        &mut self,
        transaction_id: &str,
        return_date: Option<&str>,
    ) -> Result<Transaction, StoreError> {
        let transaction = self.ledger.return_resource(transaction_id, return_date)?;
        self.save_resources()?;
        self.save_transactions()?;
        Ok(transaction)
    }

    /// Returns a unit by (student, resource) pair and persists.
    ///
    /// # Errors
    ///
    /// Propagates domain rejections and save failures.
    pub fn return_by_student_resource(
        &mut self,
        student_id: &str,
        resource_id: &str,
        return_date: Option<&str>,
    ) -> Result<Transaction, StoreError> {
        let transaction =
            self.ledger
                .return_by_student_resource(student_id, resource_id, return_date)?;
        self.save_resources()?;
        self.save_transactions()?;
        Ok(transaction)
    }

    fn save_students(&self) -> Result<(), SaveError> {
        json::save_records(&self.root.join(STUDENTS_FILE), self.ledger.students())
    }

    fn save_resources(&self) -> Result<(), SaveError> {
        json::save_records(&self.root.join(RESOURCES_FILE), self.ledger.resources())
    }

    fn save_transactions(&self) -> Result<(), SaveError> {
        json::save_records(
            &self.root.join(TRANSACTIONS_FILE),
            self.ledger.transactions(),
        )
    }
}

fn load_config(root: &Path) -> Config {
    let path = root.join(CONFIG_FILE);
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}
