//! In-memory collaborators.
//!
//! Fixed-data implementations of [`SessionProvider`] and
//! [`MembershipOracle`] for dry runs, demos, and tests. Production hosts
//! implement the traits over their own stores.

use async_trait::async_trait;
use parking_lot::RwLock;
use roost_auth::{
    Credentials, LookupError, MembershipOracle, Resource, Role, SessionClaims, SessionProvider,
};
use roost_types::PrincipalId;
use std::collections::{HashMap, HashSet};

/// Membership records held in memory.
///
/// A record links a principal id to a resource; the role is not
/// consulted.
///
/// # Example
///
/// ```
/// use roost_runtime::auth::InMemoryMemberships;
/// use roost_auth::{Resource, ResourceType};
///
/// let houses = InMemoryMemberships::new();
/// let h1 = Resource::new(ResourceType::House, "H1").unwrap();
/// houses.grant("u1", h1.clone());
/// assert!(houses.contains("u1", &h1));
/// houses.revoke("u1", &h1);
/// assert!(!houses.contains("u1", &h1));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryMemberships {
    records: RwLock<HashSet<(String, Resource)>>,
}

impl InMemoryMemberships {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an active membership.
    pub fn grant(&self, principal_id: impl Into<String>, resource: Resource) {
        self.records.write().insert((principal_id.into(), resource));
    }

    /// Ends a membership. Returns `true` if one existed.
    pub fn revoke(&self, principal_id: &str, resource: &Resource) -> bool {
        self.records
            .write()
            .remove(&(principal_id.to_string(), resource.clone()))
    }

    /// Returns `true` if the membership is recorded.
    #[must_use]
    pub fn contains(&self, principal_id: &str, resource: &Resource) -> bool {
        self.records
            .read()
            .contains(&(principal_id.to_string(), resource.clone()))
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns `true` if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl MembershipOracle for InMemoryMemberships {
    async fn has_active_membership(
        &self,
        principal: &PrincipalId,
        _role: Role,
        resource: &Resource,
    ) -> Result<bool, LookupError> {
        Ok(self.contains(principal.as_str(), resource))
    }
}

/// Session claims keyed by token.
#[derive(Debug, Default)]
pub struct StaticSessions {
    sessions: RwLock<HashMap<String, SessionClaims>>,
}

impl StaticSessions {
    /// Creates an empty provider; every token resolves to no session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a live session for `token` (builder form).
    #[must_use]
    pub fn with_session(self, token: impl Into<String>, claims: SessionClaims) -> Self {
        self.insert(token, claims);
        self
    }

    /// Adds or replaces the session for `token`.
    pub fn insert(&self, token: impl Into<String>, claims: SessionClaims) {
        self.sessions.write().insert(token.into(), claims);
    }

    /// Ends the session for `token`.
    pub fn end(&self, token: &str) -> Option<SessionClaims> {
        self.sessions.write().remove(token)
    }
}

#[async_trait]
impl SessionProvider for StaticSessions {
    async fn resolve_session(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<SessionClaims>, LookupError> {
        Ok(credentials
            .token()
            .and_then(|token| self.sessions.read().get(token).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roost_auth::ResourceType;
    use roost_types::TryNew;

    #[tokio::test]
    async fn memberships_answer_by_principal_and_resource() {
        let store = InMemoryMemberships::new();
        let h1 = Resource::new(ResourceType::House, "H1").unwrap();
        let e1 = Resource::new(ResourceType::Event, "H1").unwrap();
        store.grant("u1", h1.clone());

        let u1 = PrincipalId::try_new("u1".to_string()).unwrap();
        assert!(store.has_active_membership(&u1, Role::Base, &h1).await.unwrap());
        // Same id, different type.
        assert!(!store.has_active_membership(&u1, Role::Base, &e1).await.unwrap());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn sessions_resolve_by_token() {
        let sessions =
            StaticSessions::new().with_session("tok-1", SessionClaims::new("u1", Some("resident")));

        let claims = sessions
            .resolve_session(&Credentials::with_token("tok-1"))
            .await
            .unwrap();
        assert_eq!(claims.map(|c| c.principal_id), Some("u1".to_string()));

        assert!(sessions
            .resolve_session(&Credentials::with_token("tok-2"))
            .await
            .unwrap()
            .is_none());
        assert!(sessions
            .resolve_session(&Credentials::anonymous())
            .await
            .unwrap()
            .is_none());

        assert!(sessions.end("tok-1").is_some());
        assert!(sessions
            .resolve_session(&Credentials::with_token("tok-1"))
            .await
            .unwrap()
            .is_none());
    }
}
