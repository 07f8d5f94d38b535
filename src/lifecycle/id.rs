//! Run identifiers and share tokens.

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Unique identifier for a run.
///
/// Format: `run_{timestamp_ms}_{random_hex}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(String);

impl RunId {
    /// Generate a new run ID.
    pub fn new() -> Self {
        Self(format!("run_{}_{}", Utc::now().timestamp_millis(), random_hex(8)))
    }

    /// Parse a run ID from a string.
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_prefix("run_")?;
        let (millis, random) = rest.split_once('_')?;
        millis.parse::<i64>().ok()?;
        if random.is_empty() || !random.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(s.to_string()))
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for RunId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RunId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        RunId::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid run id: {}", s)))
    }
}

/// Generate an opaque token for public report links.
///
/// 96 bits from the OS random source, hex encoded.
pub fn share_token() -> String {
    random_hex(12)
}

fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    getrandom::getrandom(&mut bytes).expect("Failed to generate random bytes");
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn run_id_format() {
        let id = RunId::new();
        assert!(id.as_str().starts_with("run_"));
        assert!(RunId::parse(id.as_str()).is_some());
    }

    #[test]
    fn run_ids_are_unique() {
        let ids: HashSet<RunId> = (0..500).map(|_| RunId::new()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(RunId::parse("sess_1_ab").is_none());
        assert!(RunId::parse("run_abc_ff").is_none());
        assert!(RunId::parse("run_123_zz").is_none());
        assert!(RunId::parse("run_123").is_none());
    }

    #[test]
    fn serde_roundtrip_as_string() {
        let id = RunId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: RunId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn share_tokens_differ() {
        assert_ne!(share_token(), share_token());
        assert_eq!(share_token().len(), 24);
    }

    #[test]
    fn share_tokens_are_random_hex() {
        let tokens: HashSet<String> = (0..200).map(|_| share_token()).collect();
        assert_eq!(tokens.len(), 200);
        assert!(tokens
            .iter()
            .all(|t| t.chars().all(|c| c.is_ascii_hexdigit())));
    }

    #[test]
    fn run_id_random_part_is_eight_bytes() {
        let id = RunId::new();
        let random = id.as_str().rsplit('_').next().unwrap();
        assert_eq!(hex::decode(random).unwrap().len(), 8);
    }
}
