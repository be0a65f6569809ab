//! Access policy carried in the first path segment
//!
//! `Referer=a.com,b.com;NotBefore=1700000000000;PoW=4` becomes a map of
//! option name to raw value. Options are interpreted by the stages that
//! consume them; the parser itself never rejects input.

use std::collections::HashMap;

/// Comma-separated allow-list of referrer hostnames
pub const REFERER: &str = "Referer";
/// Earliest allowed instant, milliseconds since the Unix epoch
pub const NOT_BEFORE: &str = "NotBefore";
/// Latest allowed instant, milliseconds since the Unix epoch
pub const NOT_AFTER: &str = "NotAfter";
/// Proof-of-work difficulty
pub const POW: &str = "PoW";

/// Parsed policy options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    options: HashMap<String, String>,
}

impl AccessPolicy {
    /// Parse a raw policy segment
    ///
    /// Parts are separated by `;` and split on the first `=`. Keys and values
    /// are trimmed. Parts without `=` or with an empty key are skipped; a
    /// repeated key keeps its last value.
    pub fn parse(raw: &str) -> Self {
        let options = raw
            .split(';')
            .filter_map(|part| part.split_once('='))
            .map(|(key, value)| (key.trim(), value.trim()))
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        Self { options }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Option value, treating an empty value as absent
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let policy = AccessPolicy::parse("Referer=a.com;NotBefore=1000");
        assert_eq!(policy.len(), 2);
        assert_eq!(policy.get(REFERER), Some("a.com"));
        assert_eq!(policy.get(NOT_BEFORE), Some("1000"));
    }

    #[test]
    fn test_parse_trims_and_skips() {
        let policy = AccessPolicy::parse(" PoW = 4 ;garbage;=orphan; ;x=");
        assert_eq!(policy.get(POW), Some("4"));
        assert_eq!(policy.get("x"), Some(""));
        assert_eq!(policy.non_empty("x"), None);
        assert_eq!(policy.len(), 2);
    }

    #[test]
    fn test_parse_splits_on_first_equals() {
        let policy = AccessPolicy::parse("k=a=b");
        assert_eq!(policy.get("k"), Some("a=b"));
    }

    #[test]
    fn test_parse_last_value_wins() {
        let policy = AccessPolicy::parse("PoW=1;PoW=3");
        assert_eq!(policy.get(POW), Some("3"));
    }

    #[test]
    fn test_parse_plain_segment_is_empty_policy() {
        assert!(AccessPolicy::parse("public").is_empty());
        assert!(AccessPolicy::parse("").is_empty());
    }
}
