//! Unified error interface for roost.
//!
//! Every roost error type implements [`ErrorCode`] so that operators can
//! grep logs for a stable code and so that callers can tell configuration
//! problems (fix the table, restart) from transient resolution failures.
//!
//! # Code Format
//!
//! - UPPER_SNAKE_CASE
//! - Prefixed with the owning concern: `ROUTE_`, `RESOLVE_`, `LOOKUP_`, `CONFIG_`
//! - Stable once published
//!
//! # Example
//!
//! ```
//! use roost_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum LookupError {
//!     Timeout,
//!     Malformed,
//! }
//!
//! impl ErrorCode for LookupError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Timeout => "LOOKUP_TIMEOUT",
//!             Self::Malformed => "LOOKUP_MALFORMED",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//! }
//!
//! assert_eq!(LookupError::Timeout.code(), "LOOKUP_TIMEOUT");
//! assert!(!LookupError::Malformed.is_recoverable());
//! ```

/// Machine-readable error code plus recoverability.
pub trait ErrorCode {
    /// Returns a stable, machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether the condition may clear on its own.
    ///
    /// - `true`: transient (timeouts, backing store unavailable)
    /// - `false`: needs a code or configuration change
    ///
    /// Recoverability is informational only. A recoverable failure during
    /// an authorization check is still a denial for that request.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code follows roost conventions.
///
/// # Panics
///
/// Panics if the code is empty, lacks `expected_prefix`, or is not
/// UPPER_SNAKE_CASE.
///
/// # Example
///
/// ```
/// use roost_types::{ErrorCode, assert_error_code};
///
/// struct E;
///
/// impl ErrorCode for E {
///     fn code(&self) -> &'static str { "ROUTE_BAD_PATTERN" }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_code(&E, "ROUTE_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{code}' must start with prefix '{expected_prefix}'"
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{code}' must be UPPER_SNAKE_CASE"
    );
}

/// Asserts [`assert_error_code`] for every error in `errors`.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
