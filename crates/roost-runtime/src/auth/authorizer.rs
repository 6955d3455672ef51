//! The decision engine.

use super::{ResourceAccessResolver, ScopedAuthorizer};
use async_trait::async_trait;
use roost_auth::{catalog, AuthorizationPolicy, Permission, Principal, Resource};
use std::sync::Arc;

/// Composes the permission catalog with resource access resolution.
///
/// Stateless apart from the oracle registry, which is read-only; clone
/// freely and share across requests.
///
/// # Audit Logging
///
/// | Outcome | Level |
/// |---------|-------|
/// | allowed | `debug` |
/// | denied: no principal | `debug` |
/// | denied: missing permission | `warn` |
/// | denied: no resource access | `warn` |
/// | super bypass | `info` (from the resolver) |
///
/// # Example
///
/// ```
/// use roost_runtime::auth::{Authorizer, InMemoryMemberships, ResourceAccessResolver};
/// use roost_auth::{AuthorizationPolicy, Permission, Principal, Resource, ResourceType, Role};
/// use roost_types::{PrincipalId, TryNew};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let houses = Arc::new(InMemoryMemberships::new());
/// let h1 = Resource::new(ResourceType::House, "H1").unwrap();
/// houses.grant("u1", h1.clone());
///
/// let authorizer = Authorizer::new(
///     ResourceAccessResolver::new(Duration::from_secs(2)).with_oracle(ResourceType::House, houses),
/// );
/// let resident = Principal::new(PrincipalId::try_new("u1".into()).unwrap(), Role::Base);
///
/// assert!(authorizer.can(Some(&resident), Permission::ViewHouse, Some(&h1)).await);
/// assert!(!authorizer.can(Some(&resident), Permission::ManageHouse, Some(&h1)).await);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Authorizer {
    resolver: Arc<ResourceAccessResolver>,
}

impl Authorizer {
    /// Creates an authorizer over `resolver`.
    #[must_use]
    pub fn new(resolver: ResourceAccessResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    /// The underlying resolver.
    #[must_use]
    pub fn resolver(&self) -> &ResourceAccessResolver {
        &self.resolver
    }

    /// A memoizing view for one principal during one request.
    ///
    /// Each decision is bounded at twice the oracle timeout.
    #[must_use]
    pub fn scoped(&self, principal: Option<Principal>) -> ScopedAuthorizer {
        ScopedAuthorizer::new(Arc::new(self.clone()), principal)
            .with_limit(self.resolver.timeout() * 2)
    }
}

#[async_trait]
impl AuthorizationPolicy for Authorizer {
    async fn resolve_access(&self, principal: &Principal, resource: &Resource) -> bool {
        self.resolver.resolve_access(principal, resource).await
    }

    async fn can(
        &self,
        principal: Option<&Principal>,
        permission: Permission,
        resource: Option<&Resource>,
    ) -> bool {
        let Some(principal) = principal else {
            tracing::debug!(permission = %permission, "denied: no principal");
            return false;
        };

        if !catalog::has_permission(principal, permission) {
            tracing::warn!(
                principal = %principal.id(),
                role = %principal.role(),
                permission = %permission,
                resource = ?resource.map(ToString::to_string),
                "denied: role lacks permission"
            );
            return false;
        }

        let Some(resource) = resource else {
            tracing::debug!(
                principal = %principal.id(),
                role = %principal.role(),
                permission = %permission,
                "allowed"
            );
            return true;
        };

        let allowed = self.resolver.resolve_access(principal, resource).await;
        if allowed {
            tracing::debug!(
                principal = %principal.id(),
                role = %principal.role(),
                permission = %permission,
                resource = %resource,
                "allowed"
            );
        } else {
            tracing::warn!(
                principal = %principal.id(),
                role = %principal.role(),
                permission = %permission,
                resource = %resource,
                "denied: no resource access"
            );
        }
        allowed
    }
}
