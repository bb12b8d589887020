//! Sequence ID allocation.
//!
//! Transaction and student IDs are a single-letter prefix followed by a
//! zero-padded number: `T001`, `S042`. The next ID in a sequence is one
//! greater than the largest numeric suffix among the existing IDs carrying
//! that prefix. Numbers are never reused, so the sequence stays monotonic
//! even if records elsewhere are deleted.

/// Allocates the next ID for `prefix`, zero-padded to `width` digits.
///
/// IDs that do not start with `prefix`, or whose remainder is not purely
/// numeric, are ignored. When nothing matches the sequence starts at 1.
/// Numbers larger than `width` digits simply grow wider.
pub fn next_id<'a, I>(prefix: char, width: usize, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max = existing
        .into_iter()
        .filter_map(|id| numeric_suffix(id, prefix))
        .max();

    let next = max.map_or(1, |n| n + 1);
    format!("{prefix}{next:0width$}")
}

fn numeric_suffix(id: &str, prefix: char) -> Option<u32> {
    let rest = id.strip_prefix(prefix)?;
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn starts_at_one() {
        assert_eq!(next_id('T', 3, []), "T001");
    }

    #[test]
    fn increments_past_the_maximum() {
        let ids = ["T001", "T003", "T002"];
        assert_eq!(next_id('T', 3, ids), "T004");
    }

    #[test]
    fn ignores_foreign_prefixes_and_junk() {
        let ids = ["S009", "T002", "Tabc", "T", "99", "T01x"];
        assert_eq!(next_id('T', 3, ids), "T003");
    }

    #[test]
    fn survives_gaps_without_reuse() {
        // T002 was never written back after a crash; the sequence still
        // moves forward from the highest number seen.
        let ids = ["T001", "T005"];
        assert_eq!(next_id('T', 3, ids), "T006");
    }

    #[test_case(3, "T1000"; "grows past the pad width")]
    #[test_case(4, "T1000"; "exactly the pad width")]
    #[test_case(5, "T01000"; "wider pad")]
    fn padding_follows_width(width: usize, expected: &str) {
        assert_eq!(next_id('T', width, ["T999"]), expected);
    }

    #[test]
    fn student_sequence_is_independent() {
        let ids = ["S001", "T007"];
        assert_eq!(next_id('S', 3, ids), "S002");
    }
}
