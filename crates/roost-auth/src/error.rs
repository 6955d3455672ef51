//! Error taxonomy.
//!
//! ```text
//! RouteConfigError   table load time   aborts startup, operators only
//! ResolutionFailure  request time      recovered locally into a denial
//! LookupError        collaborators     what providers/oracles return
//! ```
//!
//! A denied decision is not an error: it is `false`, surfaced as a
//! redirect. None of these types ever reach an end user.

use crate::{Permission, ResourceType};
use roost_types::ErrorCode;
use std::time::Duration;
use thiserror::Error;

/// Invalid route table. Detected when the table is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteConfigError {
    /// The path pattern cannot be compiled.
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Two dynamic segments in one pattern share a name.
    #[error("route pattern '{pattern}' binds parameter ':{name}' more than once")]
    DuplicateParam { pattern: String, name: String },

    /// Two rules share the exact same pattern string.
    #[error("route pattern '{pattern}' is declared more than once")]
    DuplicatePattern { pattern: String },

    /// No role holds the required permission, so the route is unreachable.
    #[error("route '{pattern}' requires '{permission}', which no role is granted")]
    UnreachablePermission {
        pattern: String,
        permission: Permission,
    },

    /// A public rule also declares access requirements.
    #[error("public route '{pattern}' must not declare a permission or resource check")]
    PublicWithRequirements { pattern: String },

    /// Resource-check fields are missing or inconsistent.
    #[error("route '{pattern}' has an incomplete resource check: {reason}")]
    IncompleteResourceCheck { pattern: String, reason: String },

    /// The fallback is not an absolute in-app path.
    #[error("route '{pattern}' has invalid fallback path '{fallback}'")]
    InvalidFallback { pattern: String, fallback: String },
}

impl RouteConfigError {
    /// The pattern of the offending rule.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::InvalidPattern { pattern, .. }
            | Self::DuplicateParam { pattern, .. }
            | Self::DuplicatePattern { pattern }
            | Self::UnreachablePermission { pattern, .. }
            | Self::PublicWithRequirements { pattern }
            | Self::IncompleteResourceCheck { pattern, .. }
            | Self::InvalidFallback { pattern, .. } => pattern,
        }
    }

    pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn incomplete_resource_check(pattern: &str, reason: impl Into<String>) -> Self {
        Self::IncompleteResourceCheck {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

impl ErrorCode for RouteConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidPattern { .. } => "ROUTE_INVALID_PATTERN",
            Self::DuplicateParam { .. } => "ROUTE_DUPLICATE_PARAM",
            Self::DuplicatePattern { .. } => "ROUTE_DUPLICATE_PATTERN",
            Self::UnreachablePermission { .. } => "ROUTE_UNREACHABLE_PERMISSION",
            Self::PublicWithRequirements { .. } => "ROUTE_PUBLIC_WITH_REQUIREMENTS",
            Self::IncompleteResourceCheck { .. } => "ROUTE_INCOMPLETE_RESOURCE_CHECK",
            Self::InvalidFallback { .. } => "ROUTE_INVALID_FALLBACK",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Failure reported by a session provider or membership oracle.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The backing store could not be reached or answered with an error.
    #[error("backing store unavailable: {0}")]
    Unavailable(String),

    /// The backing store answered with data that does not make sense.
    #[error("malformed lookup result: {0}")]
    Malformed(String),

    /// Any other backend error.
    #[error("lookup failed")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ErrorCode for LookupError {
    fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "LOOKUP_UNAVAILABLE",
            Self::Malformed(_) => "LOOKUP_MALFORMED",
            Self::Backend(_) => "LOOKUP_BACKEND",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Backend(_))
    }
}

/// A collaborator failed during a decision.
///
/// Always converted into a denial where it happens; carried only so
/// that the denial can be logged with a cause.
#[derive(Debug, Error)]
pub enum ResolutionFailure {
    /// Session lookup did not finish in time.
    #[error("session resolution timed out after {0:?}")]
    SessionTimeout(Duration),

    /// Session lookup failed.
    #[error("session resolution failed: {0}")]
    Session(#[source] LookupError),

    /// Membership lookup did not finish in time.
    #[error("{resource_type} membership lookup timed out after {after:?}")]
    OracleTimeout {
        resource_type: ResourceType,
        after: Duration,
    },

    /// Membership lookup failed.
    #[error("{resource_type} membership lookup failed: {source}")]
    Oracle {
        resource_type: ResourceType,
        #[source]
        source: LookupError,
    },

    /// Membership lookup panicked or was cancelled.
    #[error("{resource_type} membership lookup aborted: {reason}")]
    OracleAborted {
        resource_type: ResourceType,
        reason: String,
    },

    /// No oracle is registered for the resource type.
    #[error("no membership oracle registered for {0}")]
    NoOracle(ResourceType),

    /// A matched rule's resource parameter could not form a resource id.
    #[error("route parameter does not form a resource id: {0}")]
    BadResourceParam(#[from] roost_types::IdError),
}

impl ErrorCode for ResolutionFailure {
    fn code(&self) -> &'static str {
        match self {
            Self::SessionTimeout(_) => "RESOLVE_SESSION_TIMEOUT",
            Self::Session(_) => "RESOLVE_SESSION_FAILED",
            Self::OracleTimeout { .. } => "RESOLVE_ORACLE_TIMEOUT",
            Self::Oracle { .. } => "RESOLVE_ORACLE_FAILED",
            Self::OracleAborted { .. } => "RESOLVE_ORACLE_ABORTED",
            Self::NoOracle(_) => "RESOLVE_NO_ORACLE",
            Self::BadResourceParam(_) => "RESOLVE_BAD_RESOURCE_PARAM",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::SessionTimeout(_) | Self::OracleTimeout { .. } => true,
            Self::Session(e) => e.is_recoverable(),
            Self::Oracle { source, .. } => source.is_recoverable(),
            Self::OracleAborted { .. } | Self::NoOracle(_) | Self::BadResourceParam(_) => false,
        }
    }
}
