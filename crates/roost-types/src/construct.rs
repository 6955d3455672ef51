//! Fallible construction.
//!
//! [`TryNew`] is implemented by every type whose constructor validates its
//! input: identifiers, compiled route patterns, route tables. Construction
//! either yields a value that upholds its invariants or an error that says
//! which one was violated; there is no half-built state.
//!
//! | Pattern | Use When |
//! |---------|----------|
//! | `new()` | Construction always succeeds |
//! | [`TryNew`] | Construction validates its input |
//! | `TryFrom<T>` | Converting from another type |
//!
//! # Example
//!
//! ```
//! use roost_types::TryNew;
//!
//! /// A redirect target: must be an absolute in-app path.
//! #[derive(Debug)]
//! struct RedirectTarget(String);
//!
//! #[derive(Debug, PartialEq)]
//! struct NotAbsolute;
//!
//! impl TryNew for RedirectTarget {
//!     type Error = NotAbsolute;
//!     type Args = String;
//!
//!     fn try_new(value: String) -> Result<Self, Self::Error> {
//!         if !value.starts_with('/') {
//!             return Err(NotAbsolute);
//!         }
//!         Ok(RedirectTarget(value))
//!     }
//! }
//!
//! assert!(RedirectTarget::try_new("/dashboard".to_string()).is_ok());
//! assert_eq!(
//!     RedirectTarget::try_new("https://evil.example".to_string()).unwrap_err(),
//!     NotAbsolute
//! );
//! ```

/// Trait for fallible construction with validation.
///
/// Types implementing `TryNew` should not also expose a plain `new()`
/// performing the same validation; the `try_` prefix keeps fallibility
/// visible at the call site.
///
/// `Args` may be a single value, a tuple, or a dedicated struct when a
/// constructor needs several inputs.
pub trait TryNew {
    /// The error type returned when validation fails.
    type Error;

    /// Arguments required for construction.
    type Args;

    /// Attempts to create a new instance.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if validation fails.
    fn try_new(args: Self::Args) -> Result<Self, Self::Error>
    where
        Self: Sized;
}
