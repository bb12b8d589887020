use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a borrow transaction.
///
/// "Overdue" is deliberately not a state: it is derived from the due date
/// at whatever reference date the caller supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The unit is out and `return_date` is null.
    Borrowed,
    /// The unit came back; the record is now immutable history.
    Returned,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Borrowed => write!(f, "borrowed"),
            Self::Returned => write!(f, "returned"),
        }
    }
}

/// One student holding one unit of one resource for a bounded period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique key, `T` plus a zero-padded sequence number. Monotonic and
    /// never reused.
    pub transaction_id: String,
    /// The borrowing student. No foreign-key cascade is enforced.
    pub student_id: String,
    /// The borrowed resource. A resource may be removed while returned
    /// transactions still reference it.
    pub resource_id: String,
    /// The day the unit went out.
    pub borrow_date: NaiveDate,
    /// `borrow_date` plus the configured due-day offset.
    pub due_date: NaiveDate,
    /// Null exactly while the status is [`Status::Borrowed`].
    pub return_date: Option<NaiveDate>,
    /// Current lifecycle state.
    pub status: Status,
}

impl Transaction {
    /// Whether this transaction is overdue as of `as_of`.
    ///
    /// Returned transactions are never overdue. A transaction due today is
    /// not overdue today: the comparison is strict.
    #[must_use]
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        self.status == Status::Borrowed && as_of > self.due_date
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::dates;

    use super::*;

    fn borrowed() -> Transaction {
        Transaction {
            transaction_id: "T001".to_string(),
            student_id: "S001".to_string(),
            resource_id: "R1".to_string(),
            borrow_date: dates::parse_iso("2024-01-01").unwrap(),
            due_date: dates::parse_iso("2024-01-04").unwrap(),
            return_date: None,
            status: Status::Borrowed,
        }
    }

    #[test]
    fn overdue_requires_a_strictly_later_date() {
        let tx = borrowed();
        assert!(!tx.is_overdue(dates::parse_iso("2024-01-03").unwrap()));
        assert!(!tx.is_overdue(dates::parse_iso("2024-01-04").unwrap()));
        assert!(tx.is_overdue(dates::parse_iso("2024-01-05").unwrap()));
    }

    #[test]
    fn returned_transactions_are_never_overdue() {
        let mut tx = borrowed();
        tx.status = Status::Returned;
        tx.return_date = Some(dates::parse_iso("2024-01-05").unwrap());
        assert!(!tx.is_overdue(dates::parse_iso("2024-02-01").unwrap()));
    }

    #[test]
    fn serializes_dates_as_iso_strings_and_open_returns_as_null() {
        let json = serde_json::to_value(borrowed()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "transaction_id": "T001",
                "student_id": "S001",
                "resource_id": "R1",
                "borrow_date": "2024-01-01",
                "due_date": "2024-01-04",
                "return_date": null,
                "status": "borrowed",
            })
        );
    }

    #[test]
    fn deserializes_both_status_words() {
        let tx: Transaction = serde_json::from_value(serde_json::json!({
            "transaction_id": "T002",
            "student_id": "S001",
            "resource_id": "R1",
            "borrow_date": "2024-01-01",
            "due_date": "2024-01-04",
            "return_date": "2024-01-02",
            "status": "returned",
        }))
        .unwrap();

        assert_eq!(tx.status, Status::Returned);
        assert_eq!(tx.return_date, Some(dates::parse_iso("2024-01-02").unwrap()));
    }
}
