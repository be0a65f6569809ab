//! Interactive solver page
//!
//! Served instead of the JSON challenge when the browser navigates to a
//! gated URL directly. The page fetches the challenge itself, solves it in a
//! Web Worker and posts the answer back to the same URL.

/// HTML document for document navigations
pub const SOLVER_PAGE: &str = include_str!("../../assets/solver.html");

/// Scripts are loaded from the static asset tree only
pub const SOLVER_PAGE_CSP: &str = "default-src 'self';";

/// Cache directive for the solver page
pub const SOLVER_PAGE_CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate";

/// Cache directive for raw challenges
pub const CHALLENGE_CACHE_CONTROL: &str = "no-store";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_loads_solver_script_from_static_tree() {
        assert!(SOLVER_PAGE.starts_with("<!DOCTYPE html>"));
        assert!(SOLVER_PAGE.contains(r#"src="/web/pow.js""#));
        assert!(!SOLVER_PAGE.contains("<script>"));
    }
}
