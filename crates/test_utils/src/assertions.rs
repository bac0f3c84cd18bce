//! Custom Test Assertions
//!
//! Assertion helpers with messages that show the offending values.

use chrono::{DateTime, Utc};
use core_kernel::{is_canonical, StorageReference};
use domain_loads::Load;

/// Asserts that `value` is in 36-character `8-4-4-4-12` hex form
///
/// # Panics
///
/// Panics with the offending value otherwise
pub fn assert_canonical(value: &str) {
    assert!(
        is_canonical(value),
        "expected a canonical 8-4-4-4-12 reference, got {:?} ({} chars)",
        value,
        value.len()
    );
}

/// Asserts that no load still points at `reference`
pub fn assert_no_load_references(loads: &[Load], reference: &StorageReference) {
    let holders: Vec<String> = loads
        .iter()
        .filter(|l| l.receipt_storage_id.as_ref() == Some(reference))
        .map(|l| l.id.to_string())
        .collect();
    assert!(
        holders.is_empty(),
        "reference {} is still attached to loads {:?}",
        reference,
        holders
    );
}

/// Asserts that timestamps never decrease
pub fn assert_chronological(timestamps: &[DateTime<Utc>]) {
    if let Some(pair) = timestamps.windows(2).find(|w| w[0] > w[1]) {
        panic!("timestamps out of order: {} before {}", pair[0], pair[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::LoadBuilder;
    use crate::fixtures::{ReferenceFixtures, TemporalFixtures};

    #[test]
    fn test_assert_canonical_accepts_fixture() {
        assert_canonical(ReferenceFixtures::PRIMARY);
        assert_canonical(ReferenceFixtures::UPPER);
    }

    #[test]
    #[should_panic(expected = "expected a canonical")]
    fn test_assert_canonical_rejects_compact() {
        assert_canonical("3f2b8c1a9d4e4f6ab7c80123456789ab");
    }

    #[test]
    #[should_panic(expected = "still attached")]
    fn test_assert_no_load_references_fails_when_attached() {
        let load = LoadBuilder::new().with_receipt(ReferenceFixtures::primary()).build();
        assert_no_load_references(&[load], &ReferenceFixtures::primary());
    }

    #[test]
    fn test_assert_chronological() {
        assert_chronological(&[TemporalFixtures::morning(), TemporalFixtures::late_evening()]);
        assert_chronological(&[]);
    }
}
