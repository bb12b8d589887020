//! Role classification from email domains.

use std::fmt;

use crate::domain::{validate, Error};

/// Who the caller is, derived solely from their email domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// A borrower; may register on first login.
    Student,
    /// Inventory management; may add, restock, and remove resources.
    Staff,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Staff => write!(f, "staff"),
        }
    }
}

/// Classifies an email address against the configured domain suffix lists.
///
/// The address is trimmed and lower-cased; the domain is everything after
/// the first `@`. Student suffixes are consulted before staff suffixes, so
/// a domain matching both lists classifies as student. Matching is by
/// suffix, not equality: a configured `edu` matches `sub.campus.edu`.
///
/// # Errors
///
/// Returns a validation error if the address is empty or has no `@`, and
/// [`Error::UnrecognizedDomain`] if no suffix matches.
pub fn classify(
    email: &str,
    student_domains: &[String],
    staff_domains: &[String],
) -> Result<Role, Error> {
    let email = validate::require_nonempty(email, "email")?.to_lowercase();

    let Some((_, domain)) = email.split_once('@') else {
        return Err(Error::MalformedEmail);
    };

    if student_domains.iter().any(|d| domain.ends_with(d.as_str())) {
        return Ok(Role::Student);
    }
    if staff_domains.iter().any(|d| domain.ends_with(d.as_str())) {
        return Ok(Role::Staff);
    }

    Err(Error::UnrecognizedDomain(domain.to_string()))
}
