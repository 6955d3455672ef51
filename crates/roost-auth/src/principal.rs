//! Principals and the session-provider boundary.
//!
//! ```text
//! Credentials ──► SessionProvider ──► SessionClaims { principal_id, role_claim }
//!                                          │
//!                           normalize_role_claim(policy)
//!                                          │
//!                                          ▼
//!                                 Principal { id, role }
//! ```
//!
//! The provider only establishes identity. It never decides access, and
//! raw role strings never travel past [`SessionClaims::into_principal`].

use crate::{normalize_role_claim, LookupError, Role, UnknownRolePolicy};
use async_trait::async_trait;
use roost_types::{PrincipalId, TryNew};
use serde::{Deserialize, Serialize};

/// The authenticated actor of one authorization decision.
///
/// Immutable. Built fresh per request from [`SessionClaims`] and dropped
/// with the request.
///
/// # Example
///
/// ```
/// use roost_auth::{Principal, Role};
/// use roost_types::{PrincipalId, TryNew};
///
/// let id = PrincipalId::try_new("u-1".to_string()).unwrap();
/// let principal = Principal::new(id, Role::Manager);
/// assert_eq!(principal.role(), Role::Manager);
/// assert_eq!(principal.to_string(), "principal:u-1@manager");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    id: PrincipalId,
    role: Role,
}

impl Principal {
    /// Creates a principal with an already-normalized role.
    #[must_use]
    pub fn new(id: PrincipalId, role: Role) -> Self {
        Self { id, role }
    }

    /// The principal's identifier.
    #[must_use]
    pub fn id(&self) -> &PrincipalId {
        &self.id
    }

    /// The principal's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.id, self.role)
    }
}

/// Transport-level credential material (session cookie, bearer token).
///
/// `Debug` never prints the token.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    token: Option<String>,
}

impl Credentials {
    /// No credentials at all.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Credentials carrying a session token.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// The raw token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns `true` if no token was presented.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.token.is_none()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Raw identity claims as returned by a [`SessionProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Identifier as issued by the identity store.
    pub principal_id: String,
    /// Role claim from session metadata, if present.
    #[serde(default)]
    pub role_claim: Option<String>,
}

impl SessionClaims {
    /// Creates claims.
    #[must_use]
    pub fn new(principal_id: impl Into<String>, role_claim: Option<&str>) -> Self {
        Self {
            principal_id: principal_id.into(),
            role_claim: role_claim.map(str::to_string),
        }
    }

    /// Converts raw claims into a [`Principal`].
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Malformed`] if the principal id is invalid.
    /// Returns `Ok(None)` when the role claim is unusable and `policy`
    /// is [`UnknownRolePolicy::Deny`].
    pub fn into_principal(
        self,
        policy: UnknownRolePolicy,
    ) -> Result<Option<Principal>, LookupError> {
        let id = PrincipalId::try_new(self.principal_id)
            .map_err(|e| LookupError::Malformed(e.to_string()))?;
        Ok(normalize_role_claim(self.role_claim.as_deref(), policy)
            .map(|role| Principal::new(id, role)))
    }
}

/// Resolves request credentials to identity claims.
///
/// Implementations live in the host application (cookie store, JWT
/// verifier, identity service client). They must not perform
/// authorization.
///
/// # Contract
///
/// - `Ok(Some(_))`: a live session
/// - `Ok(None)`: no session (anonymous, expired, revoked)
/// - `Err(_)`: the lookup itself failed; callers treat it as no session
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Resolves `credentials` to session claims.
    async fn resolve_session(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<SessionClaims>, LookupError>;
}
