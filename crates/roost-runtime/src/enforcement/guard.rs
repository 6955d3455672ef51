//! The in-view guard.
//!
//! Wraps a protected fragment inside an already-rendered view. While the
//! decision is pending nothing protected is shown; once it lands the
//! guard either shows the fragment or navigates away, exactly once.
//!
//! ```text
//!            observe(true)
//!   Pending ─────────────────► Allowed ◄──┐
//!      │                          │       │ observe(true)
//!      │ observe(false)           │ observe(false)
//!      ▼                          ▼       │
//!   Denied ◄──────────────────────────────┘
//!      │ observe(false): stays, no new redirect
//! ```

use crate::auth::ScopedAuthorizer;
use roost_auth::{Permission, Resource};

/// Where a guard's decision stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    /// No decision yet.
    #[default]
    Pending,
    /// Protected content may be shown.
    Allowed,
    /// Access was refused; a redirect has been issued.
    Denied,
}

/// What the host should put on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardView {
    /// The loading placeholder.
    Loading,
    /// The protected fragment.
    Content,
    /// Nothing.
    Empty,
}

/// A guard around one protected fragment.
///
/// # Example
///
/// ```
/// use roost_runtime::enforcement::{Guard, GuardView};
/// use roost_auth::Permission;
///
/// let mut guard = Guard::new(Permission::ManageHouse, None, "/dashboard");
/// assert_eq!(guard.view(), GuardView::Loading);
///
/// assert_eq!(guard.observe(false).as_deref(), Some("/dashboard"));
/// assert_eq!(guard.observe(false), None);
/// assert_eq!(guard.view(), GuardView::Empty);
/// ```
#[derive(Debug, Clone)]
pub struct Guard {
    permission: Permission,
    resource: Option<Resource>,
    fallback: String,
    state: GuardState,
}

impl Guard {
    /// Creates a pending guard.
    #[must_use]
    pub fn new(
        permission: Permission,
        resource: Option<Resource>,
        fallback: impl Into<String>,
    ) -> Self {
        Self {
            permission,
            resource,
            fallback: fallback.into(),
            state: GuardState::Pending,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> GuardState {
        self.state
    }

    /// The guarded permission.
    #[must_use]
    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// What to render now.
    #[must_use]
    pub fn view(&self) -> GuardView {
        match self.state {
            GuardState::Pending => GuardView::Loading,
            GuardState::Allowed => GuardView::Content,
            GuardState::Denied => GuardView::Empty,
        }
    }

    /// Feeds a decision in.
    ///
    /// Returns the redirect location only when this call moves the guard
    /// into [`GuardState::Denied`]; repeated denials yield `None`.
    pub fn observe(&mut self, allowed: bool) -> Option<String> {
        let previous = self.state;
        self.state = if allowed {
            GuardState::Allowed
        } else {
            GuardState::Denied
        };

        if previous != GuardState::Denied && self.state == GuardState::Denied {
            tracing::debug!(
                permission = %self.permission,
                location = %self.fallback,
                "guard denied, redirecting"
            );
            Some(self.fallback.clone())
        } else {
            None
        }
    }

    /// Asks `authorizer` and feeds the answer into [`observe`](Self::observe).
    ///
    /// A policy that panics or exceeds the authorizer's decision limit
    /// counts as a denial.
    pub async fn evaluate(&mut self, authorizer: &ScopedAuthorizer) -> Option<String> {
        let allowed = authorizer
            .can(self.permission, self.resource.as_ref())
            .await;
        self.observe(allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Authorizer, InMemoryMemberships, ResourceAccessResolver};
    use async_trait::async_trait;
    use roost_auth::{AuthorizationPolicy, Principal, ResourceType, Role};
    use roost_types::{PrincipalId, TryNew};
    use std::sync::Arc;
    use std::time::Duration;

    fn h1() -> Resource {
        Resource::new(ResourceType::House, "H1").unwrap()
    }

    #[test]
    fn starts_pending_and_loading() {
        let guard = Guard::new(Permission::ViewHouse, Some(h1()), "/dashboard");
        assert_eq!(guard.state(), GuardState::Pending);
        assert_eq!(guard.view(), GuardView::Loading);
    }

    #[test]
    fn redirects_once_per_denial() {
        let mut guard = Guard::new(Permission::ManageHouse, None, "/dashboard");
        assert_eq!(guard.observe(false).as_deref(), Some("/dashboard"));
        for _ in 0..5 {
            assert_eq!(guard.observe(false), None);
        }
        assert_eq!(guard.state(), GuardState::Denied);
    }

    #[test]
    fn regained_then_lost_access_redirects_again() {
        let mut guard = Guard::new(Permission::ManageHouse, None, "/dashboard");
        assert!(guard.observe(true).is_none());
        assert_eq!(guard.view(), GuardView::Content);
        assert!(guard.observe(false).is_some());
        assert!(guard.observe(true).is_none());
        assert!(guard.observe(false).is_some());
    }

    #[tokio::test]
    async fn evaluates_through_scoped_authorizer() {
        let houses = Arc::new(InMemoryMemberships::new());
        houses.grant("u1", h1());
        let authorizer = Authorizer::new(
            ResourceAccessResolver::new(Duration::from_millis(100))
                .with_oracle(ResourceType::House, houses),
        );
        let resident = Principal::new(PrincipalId::try_new("u1".to_string()).unwrap(), Role::Base);
        let scoped = authorizer.scoped(Some(resident));

        let mut view = Guard::new(Permission::ViewHouse, Some(h1()), "/dashboard");
        assert!(view.evaluate(&scoped).await.is_none());
        assert_eq!(view.view(), GuardView::Content);

        let mut manage = Guard::new(Permission::ManageHouse, Some(h1()), "/dashboard");
        assert_eq!(manage.evaluate(&scoped).await.as_deref(), Some("/dashboard"));
        assert_eq!(manage.evaluate(&scoped).await, None);
        assert_eq!(scoped.memoized(), 2);
    }

    struct Exploding;

    #[async_trait]
    impl AuthorizationPolicy for Exploding {
        async fn resolve_access(&self, _principal: &Principal, _resource: &Resource) -> bool {
            panic!("policy bug")
        }
    }

    struct Stalled;

    #[async_trait]
    impl AuthorizationPolicy for Stalled {
        async fn resolve_access(&self, _principal: &Principal, _resource: &Resource) -> bool {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            true
        }
    }

    fn resident() -> Option<Principal> {
        Some(Principal::new(PrincipalId::try_new("u1".to_string()).unwrap(), Role::Base))
    }

    #[tokio::test]
    async fn panicking_policy_denies() {
        let scoped = ScopedAuthorizer::new(Arc::new(Exploding), resident());
        let mut guard = Guard::new(Permission::ViewHouse, Some(h1()), "/dashboard");
        assert_eq!(guard.evaluate(&scoped).await.as_deref(), Some("/dashboard"));
        assert_eq!(guard.view(), GuardView::Empty);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_policy_denies_after_limit() {
        let scoped = ScopedAuthorizer::new(Arc::new(Stalled), resident())
            .with_limit(Duration::from_millis(100));
        let mut guard = Guard::new(Permission::ViewHouse, Some(h1()), "/dashboard");
        assert_eq!(guard.evaluate(&scoped).await.as_deref(), Some("/dashboard"));
        assert_eq!(guard.state(), GuardState::Denied);
    }
}
