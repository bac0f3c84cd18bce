//! Pre-built Test Fixtures
//!
//! Canonical references used across the suite, plus each of the raw shapes
//! a client may submit for them.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::StorageReference;

/// Fixed storage references
pub struct ReferenceFixtures;

impl ReferenceFixtures {
    pub const PRIMARY: &'static str = "3f2b8c1a-9d4e-4f6a-b7c8-0123456789ab";
    pub const SECONDARY: &'static str = "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d";
    /// Upper-case canonical form, kept as-is by the parser
    pub const UPPER: &'static str = "ABCDEF01-2345-4678-9ABC-DEF012345678";

    pub fn primary() -> StorageReference {
        Self::parse(Self::PRIMARY)
    }

    pub fn secondary() -> StorageReference {
        Self::parse(Self::SECONDARY)
    }

    fn parse(raw: &str) -> StorageReference {
        StorageReference::parse(raw).unwrap_or_else(|e| panic!("fixture {raw:?} must parse: {e}"))
    }
}

/// The raw forms a client may submit for [`ReferenceFixtures::PRIMARY`]
pub struct RawReferenceFixtures;

impl RawReferenceFixtures {
    /// 32 hex digits with no hyphens
    pub fn compact() -> String {
        ReferenceFixtures::PRIMARY.replace('-', "")
    }

    /// Upload URL carrying the reference in its `token` parameter
    pub fn token_url() -> String {
        format!(
            "https://blobs.example.com/api/upload?token={}&expires=3600",
            ReferenceFixtures::PRIMARY
        )
    }

    /// Upload URL carrying the compact reference as its last path segment
    pub fn path_url() -> String {
        format!("https://blobs.example.com/api/upload/{}?sig=abc", Self::compact())
    }

    /// Inputs that must be rejected
    pub fn invalid() -> Vec<String> {
        vec![
            String::new(),
            "   ".to_string(),
            "not-a-reference".to_string(),
            "3f2b8c1a9d4e".to_string(),
            "zz2b8c1a9d4e4f6ab7c80123456789ab".to_string(),
            "https://blobs.example.com/api/upload/?token=".to_string(),
        ]
    }
}

/// Fixed instants
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// 2026-03-10 04:30 UTC, i.e. 10:00 in Asia/Kolkata
    pub fn morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 4, 30, 0).single().unwrap_or_default()
    }

    /// 2026-03-10 20:00 UTC, already 2026-03-11 in Asia/Kolkata
    pub fn late_evening() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 20, 0, 0).single().unwrap_or_default()
    }
}
