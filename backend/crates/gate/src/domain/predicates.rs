//! Pure admission predicates
//!
//! Both predicates see only the policy and request data, never I/O.

use crate::domain::policy::{AccessPolicy, NOT_AFTER, NOT_BEFORE, REFERER};
use url::Url;

/// Whether `now_ms` lies inside the policy's `[NotBefore, NotAfter]` window
///
/// Bounds are inclusive. An absent bound, or one without a leading integer,
/// imposes no constraint.
pub fn time_window_allows(policy: &AccessPolicy, now_ms: i64) -> bool {
    if let Some(not_before) = policy.non_empty(NOT_BEFORE).and_then(parse_bound) {
        if now_ms < not_before {
            return false;
        }
    }
    if let Some(not_after) = policy.non_empty(NOT_AFTER).and_then(parse_bound) {
        if now_ms > not_after {
            return false;
        }
    }
    true
}

/// Whether the referrer is on the policy's allow-list
///
/// Without a `Referer` option every request passes. Otherwise the hostname
/// of the referrer (or the raw header when it is not a URL) must equal one
/// list entry exactly; an absent header is treated as an empty string.
pub fn referer_allows(policy: &AccessPolicy, referer: Option<&str>) -> bool {
    let Some(allowed) = policy.non_empty(REFERER) else {
        return true;
    };

    let host = referer_host(referer.unwrap_or(""));
    allowed.split(',').map(str::trim).any(|entry| entry == host)
}

/// Hostname of a referrer URL, or the raw value when it does not parse
fn referer_host(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => url.host_str().unwrap_or("").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Leading-integer parse: optional sign then digits, trailing text ignored
fn parse_bound(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (sign, digits) = match raw.as_bytes().first() {
        Some(b'-') => (-1, &raw[1..]),
        Some(b'+') => (1, &raw[1..]),
        _ => (1, raw),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        tracing::debug!(bound = raw, "Unparseable time bound ignored");
        return None;
    }
    // Overflowing bounds saturate so a far-off bound still constrains
    match digits[..end].parse::<i64>() {
        Ok(v) => Some(sign * v),
        Err(_) if sign < 0 => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}
