use serde::{Deserialize, Serialize};

/// A registered borrower.
///
/// Students are created by staff or on first login, and are never mutated
/// or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique key, `S` plus a zero-padded sequence number for
    /// self-registered students.
    pub student_id: String,
    /// Full name.
    pub name: String,
    /// Campus email address, stored as entered.
    pub email: String,
}

impl Student {
    /// Case-insensitive email comparison, used by the login flow.
    #[must_use]
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }
}
