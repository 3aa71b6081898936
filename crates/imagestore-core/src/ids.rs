//! Typed identifier for documents.
//!
//! Documents are keyed by the integer the metadata store assigns on insert.
//! [`DocumentId`] wraps that integer so it cannot be confused with an image
//! ordinal or a row count.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Store-assigned identifier of a document row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(i64);

impl DocumentId {
    /// Wrap a raw row id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Return the raw row id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

impl From<i64> for DocumentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<DocumentId> for i64 {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse() {
        let id = DocumentId::new(23);
        assert_eq!(id.to_string(), "23");
        let parsed: DocumentId = "23".parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("abc".parse::<DocumentId>().is_err());
        assert!("".parse::<DocumentId>().is_err());
    }

    #[test]
    fn serde_transparent() {
        let id = DocumentId::new(9);
        assert_eq!(serde_json::to_string(&id).unwrap(), "9");
        let back: DocumentId = serde_json::from_str("9").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn raw_conversions() {
        let id: DocumentId = 17i64.into();
        let raw: i64 = id.into();
        assert_eq!(raw, 17);
        assert_eq!(id.get(), 17);
    }
}
