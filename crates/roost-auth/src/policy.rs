//! Authorization policy trait.
//!
//! Defines [`AuthorizationPolicy`], the decision seam consumed by the
//! enforcement points. The trait lives here so that hosts can supply
//! their own policy (or a test double) without depending on the runtime.
//!
//! # Architecture
//!
//! ```text
//! AuthorizationPolicy trait (roost-auth)   <- abstract, no runtime deps
//!          │
//!          ├── Authorizer (roost-runtime)        <- oracle registry + timeouts
//!          │         │
//!          │         └── ScopedAuthorizer        <- per-request memo
//!          │
//!          └── custom impls for tests or embedded hosts
//! ```
//!
//! # Decision
//!
//! ```text
//! can(principal, permission, resource)
//!   = principal.is_some()
//!   ∧ has_permission(principal, permission)
//!   ∧ (resource.is_none() ∨ resolve_access(principal, resource))
//! ```

use crate::{catalog, Permission, Principal, Resource};
use async_trait::async_trait;

/// Abstract authorization policy.
///
/// Implementors provide [`resolve_access`](Self::resolve_access); the
/// composition in [`can`](Self::can) is shared so that resource access
/// can never substitute for a missing base permission.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use roost_auth::{AuthorizationPolicy, Permission, Principal, Resource, Role};
/// use roost_types::{PrincipalId, TryNew};
///
/// struct NoMemberships;
///
/// #[async_trait]
/// impl AuthorizationPolicy for NoMemberships {
///     async fn resolve_access(&self, _principal: &Principal, _resource: &Resource) -> bool {
///         false
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let policy = NoMemberships;
/// let resident = Principal::new(PrincipalId::try_new("u1".into()).unwrap(), Role::Base);
///
/// assert!(policy.can(Some(&resident), Permission::ViewHouse, None).await);
/// assert!(!policy.can(Some(&resident), Permission::ManageFinance, None).await);
/// assert!(!policy.can(None, Permission::ViewHouse, None).await);
/// # }
/// ```
#[async_trait]
pub trait AuthorizationPolicy: Send + Sync {
    /// Whether `principal` may act on `resource`.
    ///
    /// Must return `false` on any failure; implementations never
    /// propagate errors.
    async fn resolve_access(&self, principal: &Principal, resource: &Resource) -> bool;

    /// The single yes/no decision.
    ///
    /// # Default Implementation
    ///
    /// 1. Absent principal: `false`.
    /// 2. Missing base permission: `false`.
    /// 3. No resource: `true`.
    /// 4. Otherwise [`resolve_access`](Self::resolve_access).
    async fn can(
        &self,
        principal: Option<&Principal>,
        permission: Permission,
        resource: Option<&Resource>,
    ) -> bool {
        let Some(principal) = principal else {
            return false;
        };
        if !catalog::has_permission(principal, permission) {
            return false;
        }
        match resource {
            None => true,
            Some(resource) => self.resolve_access(principal, resource).await,
        }
    }
}
