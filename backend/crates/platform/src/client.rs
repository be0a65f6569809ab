//! Client request helpers
//!
//! Common functions for reading client-supplied HTTP headers.

use http::{HeaderMap, header};
use std::net::IpAddr;

/// Read a header as a trimmed, non-empty string
///
/// Header names are case-insensitive in `HeaderMap`, so `Referer` and
/// `referer` resolve to the same entry.
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Extract the `Referer` header, treating an empty value as absent
pub fn extract_referer(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, header::REFERER.as_str())
}

/// Whether the request declares itself a top-level document navigation
///
/// Browsers send `Sec-Fetch-Dest: document` when the user navigates to the
/// URL directly; `fetch()` calls send `empty`.
pub fn is_document_navigation(headers: &HeaderMap) -> bool {
    header_str(headers, "sec-fetch-dest") == Some("document")
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP. Used for logging only.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    // Check X-Forwarded-For header (first IP in the list)
    if let Some(xff) = header_str(headers, "x-forwarded-for") {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}
