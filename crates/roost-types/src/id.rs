//! Identifier types for roost.
//!
//! Identifiers are opaque strings minted by the systems that own them:
//! the identity provider for principals and the backing stores for
//! resources. roost never parses them, it only compares and forwards.

use crate::{ErrorCode, TryNew};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when an identifier fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The identifier was empty or whitespace only.
    #[error("{kind} must not be empty")]
    Empty {
        /// Which identifier kind was rejected.
        kind: &'static str,
    },

    /// The identifier contains a path separator.
    ///
    /// Resource ids are extracted from single path segments, so a `/`
    /// can never be a legitimate part of one.
    #[error("{kind} must not contain '/': {value}")]
    ContainsSlash {
        /// Which identifier kind was rejected.
        kind: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl ErrorCode for IdError {
    fn code(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "ID_EMPTY",
            Self::ContainsSlash { .. } => "ID_CONTAINS_SLASH",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

fn validate(kind: &'static str, value: &str) -> Result<(), IdError> {
    if value.trim().is_empty() {
        return Err(IdError::Empty { kind });
    }
    if value.contains('/') {
        return Err(IdError::ContainsSlash {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Identifier of an authenticated principal.
///
/// Opaque: whatever the session provider hands back (a user UUID from
/// the identity store, a service account name, ...).
///
/// # Example
///
/// ```
/// use roost_types::{PrincipalId, TryNew};
///
/// let id = PrincipalId::try_new("user-42".to_string()).unwrap();
/// assert_eq!(id.as_str(), "user-42");
/// assert_eq!(id.to_string(), "principal:user-42");
///
/// assert!(PrincipalId::try_new(String::new()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryNew for PrincipalId {
    type Error = IdError;
    type Args = String;

    fn try_new(value: String) -> Result<Self, Self::Error> {
        validate("principal id", &value)?;
        Ok(Self(value))
    }
}

impl TryFrom<String> for PrincipalId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<PrincipalId> for String {
    fn from(id: PrincipalId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "principal:{}", self.0)
    }
}

/// Identifier of a protected resource (house, event, application, ...).
///
/// Usually extracted from a `:param` path segment, so it is guaranteed
/// to be non-empty and slash-free.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId(String);

impl ResourceId {
    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryNew for ResourceId {
    type Error = IdError;
    type Args = String;

    fn try_new(value: String) -> Result<Self, Self::Error> {
        validate("resource id", &value)?;
        Ok(Self(value))
    }
}

impl TryFrom<String> for ResourceId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
