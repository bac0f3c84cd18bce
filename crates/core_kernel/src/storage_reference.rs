//! Canonical references to blobs in the object store
//!
//! Upload and download URLs minted by the blob store have shown up in three
//! shapes over time: a path ending in the blob id, a query string carrying a
//! `token` parameter, and a bare 32-hex-digit id. Every entry point funnels
//! raw input through [`StorageReference::parse`], which is tolerant on input
//! and strict on output: the result is always the 36-character hyphenated
//! form, so stored references compare with plain string equality.
//!
//! Surrounding whitespace is stripped before any rule runs, so a reference
//! pasted with a trailing newline still resolves.
//!
//! Extraction rules, first match wins:
//!
//! 1. a `token=` query parameter: its value, up to the next `&`
//! 2. otherwise, if the input contains `/`: the last path segment with any
//!    `?...` suffix removed
//! 3. a candidate already in `8-4-4-4-12` hex form is returned as-is
//! 4. a candidate whose first 32 characters are hex digits is hyphenated
//! 5. anything else is rejected
//!
//! ```rust
//! use core_kernel::StorageReference;
//!
//! let r = StorageReference::parse("https://store/x?token=ab12ab12-0000-4fff-8fff-abcdefabcdef&exp=1").unwrap();
//! assert_eq!(r.as_str(), "ab12ab12-0000-4fff-8fff-abcdefabcdef");
//!
//! let r = StorageReference::parse("a1b2c3d4e5f60718293a4b5c6d7e8f90extra").unwrap();
//! assert_eq!(r.as_str(), "a1b2c3d4-e5f6-0718-293a-4b5c6d7e8f90");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::FieldValue;

/// Length of the hyphenated canonical form
pub const CANONICAL_LEN: usize = 36;

/// Number of hex digits in a reference
pub const HEX_DIGITS: usize = 32;

const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

const TOKEN_PARAM: &str = "token";

/// The raw input could not be turned into a canonical reference
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid storage reference: {raw:?}")]
pub struct InvalidReference {
    /// The offending input, echoed back for diagnostics
    pub raw: String,
}

/// A canonical, 36-character hyphenated blob reference
///
/// Letter case is kept as the client sent it, and equality is exact, so the
/// upper and lower case spellings of one id are different references. Callers
/// must use one case consistently for a given blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorageReference(String);

impl StorageReference {
    /// Normalizes any known raw shape into a canonical reference
    pub fn parse(raw: &str) -> Result<Self, InvalidReference> {
        let candidate = extract_candidate(raw.trim());

        if is_canonical(candidate) {
            return Ok(Self(candidate.to_string()));
        }

        match candidate.get(..HEX_DIGITS) {
            Some(compact) if compact.bytes().all(|b| b.is_ascii_hexdigit()) => {
                Ok(Self(hyphenate(compact)))
            }
            _ => Err(InvalidReference { raw: raw.to_string() }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Returns true if `value` is exactly in `8-4-4-4-12` hex form
pub fn is_canonical(value: &str) -> bool {
    if value.len() != CANONICAL_LEN {
        return false;
    }
    let mut groups = value.split('-');
    let shape_ok = GROUPS.iter().all(|&len| {
        groups
            .next()
            .is_some_and(|g| g.len() == len && g.bytes().all(|b| b.is_ascii_hexdigit()))
    });
    shape_ok && groups.next().is_none()
}

fn extract_candidate(raw: &str) -> &str {
    if let Some(token) = query_param(raw, TOKEN_PARAM) {
        return token;
    }
    if raw.contains('/') {
        let segment = raw.rsplit('/').next().unwrap_or(raw);
        return segment.split('?').next().unwrap_or(segment);
    }
    raw
}

fn query_param<'a>(raw: &'a str, name: &str) -> Option<&'a str> {
    raw.split(['?', '&'])
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
}

fn hyphenate(compact: &str) -> String {
    let mut out = String::with_capacity(CANONICAL_LEN);
    let mut offset = 0;
    for (i, len) in GROUPS.iter().enumerate() {
        if i > 0 {
            out.push('-');
        }
        out.push_str(&compact[offset..offset + len]);
        offset += len;
    }
    out
}

impl fmt::Display for StorageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StorageReference {
    type Err = InvalidReference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StorageReference {
    type Error = InvalidReference;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StorageReference> for String {
    fn from(reference: StorageReference) -> String {
        reference.0
    }
}

impl AsRef<str> for StorageReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&StorageReference> for FieldValue {
    fn from(reference: &StorageReference) -> Self {
        FieldValue::Text(reference.0.clone())
    }
}

impl From<StorageReference> for FieldValue {
    fn from(reference: StorageReference) -> Self {
        FieldValue::Text(reference.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = "ab12ab12-0000-4fff-8fff-abcdefabcdef";

    #[test]
    fn test_canonical_passes_through() {
        assert_eq!(StorageReference::parse(CANONICAL).unwrap().as_str(), CANONICAL);
    }

    #[test]
    fn test_token_parameter_wins_over_path() {
        let raw = format!("https://store/api/upload/other?exp=1&token={}&sig=z", CANONICAL);
        assert_eq!(StorageReference::parse(&raw).unwrap().as_str(), CANONICAL);
    }

    #[test]
    fn test_parameter_must_be_named_token() {
        let raw = format!("https://store/x?notatoken={}", "zz");
        assert!(StorageReference::parse(&raw).is_err());
    }

    #[test]
    fn test_path_segment_with_query_suffix() {
        let raw = format!("https://store/api/storage/{}?download=1", CANONICAL);
        assert_eq!(StorageReference::parse(&raw).unwrap().as_str(), CANONICAL);
    }

    #[test]
    fn test_bare_hex_is_hyphenated() {
        let r = StorageReference::parse("a1b2c3d4e5f60718293a4b5c6d7e8f90extra").unwrap();
        assert_eq!(r.as_str(), "a1b2c3d4-e5f6-0718-293a-4b5c6d7e8f90");
    }

    #[test]
    fn test_case_is_preserved() {
        let upper = CANONICAL.to_uppercase();
        assert_eq!(StorageReference::parse(&upper).unwrap().as_str(), upper);
        assert_ne!(
            StorageReference::parse(&upper).unwrap(),
            StorageReference::parse(CANONICAL).unwrap()
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let r = StorageReference::parse("  ab12ab12-0000-4fff-8fff-abcdefabcdef\n").unwrap();
        assert_eq!(r.as_str(), "ab12ab12-0000-4fff-8fff-abcdefabcdef");
    }

    #[test]
    fn test_rejects_short_and_garbage() {
        for raw in ["", "   ", "abc", "ab12ab12-0000-4fff-8fff", "https://store/", "token=",
                    "zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz", "ab12ab12-0000-4fff-8fff-abcdefabcdefXX"] {
            let err = StorageReference::parse(raw).unwrap_err();
            assert_eq!(err.raw, raw);
        }
    }

    #[test]
    fn test_is_canonical_shape() {
        assert!(is_canonical(CANONICAL));
        assert!(!is_canonical("ab12ab120-000-4fff-8fff-abcdefabcdef"));
        assert!(!is_canonical("ab12ab12-0000-4fff-8fff-abcdefabcdeg"));
    }

    #[test]
    fn test_deserialize_normalizes() {
        let r: StorageReference =
            serde_json::from_str("\"https://store/files/a1b2c3d4e5f60718293a4b5c6d7e8f90\"").unwrap();
        assert_eq!(r.as_str(), "a1b2c3d4-e5f6-0718-293a-4b5c6d7e8f90");
        assert!(serde_json::from_str::<StorageReference>("\"nope\"").is_err());
    }
}
