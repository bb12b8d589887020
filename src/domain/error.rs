/// Errors produced by the domain layer.
///
/// Every variant belongs to one of three categories (see [`ErrorKind`]):
/// validation failures the caller can correct, lookups that found nothing,
/// and actions that would violate a state invariant.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// A required field was empty after trimming.
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A numeric field did not parse as an integer.
    #[error("{field} must be an integer")]
    NotAnInteger {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A numeric field was negative.
    #[error("{field} must be >= 0")]
    NegativeInteger {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A date string did not match `YYYY-MM-DD`.
    #[error("invalid date format '{0}': use YYYY-MM-DD")]
    InvalidDate(String),

    /// An email address was missing the `@` separator.
    #[error("email must contain '@'")]
    MalformedEmail,

    /// An email domain matched neither the student nor the staff suffixes.
    #[error("email domain '{0}' is not recognized for student or staff")]
    UnrecognizedDomain(String),

    /// No student exists with the given ID.
    #[error("student '{0}' not found")]
    StudentNotFound(String),

    /// No resource exists with the given ID.
    #[error("resource '{0}' not found")]
    ResourceNotFound(String),

    /// No transaction exists with the given ID.
    #[error("transaction '{0}' not found")]
    TransactionNotFound(String),

    /// The resource referenced by a transaction no longer exists.
    #[error("resource '{0}' for this transaction no longer exists")]
    ResourceMissingForTransaction(String),

    /// No active borrow exists for the (student, resource) pair.
    #[error("no active borrow found for student '{student}' and resource '{resource}'")]
    NoActiveBorrow {
        /// Student ID.
        student: String,
        /// Resource ID.
        resource: String,
    },

    /// A student with the given ID already exists.
    #[error("student ID '{0}' already exists")]
    DuplicateStudent(String),

    /// A resource with the given ID already exists.
    #[error("resource ID '{0}' already exists")]
    DuplicateResource(String),

    /// The resource has no available units.
    #[error("resource '{0}' is not available (quantity is 0)")]
    Unavailable(String),

    /// The student already holds an unreturned borrow of this resource.
    #[error("student '{student}' already has resource '{resource}' borrowed and not returned")]
    AlreadyBorrowed {
        /// Student ID.
        student: String,
        /// Resource ID.
        resource: String,
    },

    /// The transaction has already been returned.
    #[error("transaction '{0}' is already returned")]
    AlreadyReturned(String),

    /// The resource still has units out on loan.
    #[error("cannot remove resource '{0}': it is currently borrowed")]
    CurrentlyBorrowed(String),

    /// Several active borrows match the (student, resource) pair.
    #[error(
        "multiple active borrows found for student '{student}' and resource '{resource}'; \
         return by transaction ID instead"
    )]
    AmbiguousReturn {
        /// Student ID.
        student: String,
        /// Resource ID.
        resource: String,
    },
}

/// The broad category of a domain [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input; always caller-correctable.
    Validation,
    /// A referenced record does not exist.
    NotFound,
    /// The action would violate a state invariant.
    Conflict,
}

impl Error {
    /// Returns the category this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyField { .. }
            | Self::NotAnInteger { .. }
            | Self::NegativeInteger { .. }
            | Self::InvalidDate(_)
            | Self::MalformedEmail
            | Self::UnrecognizedDomain(_) => ErrorKind::Validation,

            Self::StudentNotFound(_)
            | Self::ResourceNotFound(_)
            | Self::TransactionNotFound(_)
            | Self::ResourceMissingForTransaction(_)
            | Self::NoActiveBorrow { .. } => ErrorKind::NotFound,

            Self::DuplicateStudent(_)
            | Self::DuplicateResource(_)
            | Self::Unavailable(_)
            | Self::AlreadyBorrowed { .. }
            | Self::AlreadyReturned(_)
            | Self::CurrentlyBorrowed(_)
            | Self::AmbiguousReturn { .. } => ErrorKind::Conflict,
        }
    }

    /// Whether this error is a state-invariant conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self.kind(), ErrorKind::Conflict)
    }
}
