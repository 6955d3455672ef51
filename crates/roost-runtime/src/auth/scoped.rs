//! Request-scoped decisions.

use super::bounded::run_bounded;
use parking_lot::Mutex;
use roost_auth::{AuthorizationPolicy, Permission, Principal, Resource};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on one decision when no other limit is given.
pub const DEFAULT_DECISION_LIMIT: Duration = Duration::from_secs(4);

/// One principal's decisions for the lifetime of one request.
///
/// A page that renders several guarded affordances for the same
/// resource asks the oracle once. Drop it with the request; it must
/// never outlive a single navigation, or revoked memberships would keep
/// answering `true`.
///
/// Each policy call runs bounded: a policy that panics or outlives the
/// decision limit yields `false`, and that denial is not memoized.
pub struct ScopedAuthorizer {
    policy: Arc<dyn AuthorizationPolicy>,
    principal: Option<Principal>,
    limit: Duration,
    memo: Mutex<HashMap<(Permission, Option<Resource>), bool>>,
}

impl std::fmt::Debug for ScopedAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedAuthorizer")
            .field("principal", &self.principal)
            .field("limit", &self.limit)
            .field("memoized", &self.memo.lock().len())
            .finish_non_exhaustive()
    }
}

impl ScopedAuthorizer {
    /// Scopes `policy` to `principal`, bounded by [`DEFAULT_DECISION_LIMIT`].
    #[must_use]
    pub fn new(policy: Arc<dyn AuthorizationPolicy>, principal: Option<Principal>) -> Self {
        Self {
            policy,
            principal,
            limit: DEFAULT_DECISION_LIMIT,
            memo: Mutex::new(HashMap::new()),
        }
    }

    /// Sets the per-decision limit.
    #[must_use]
    pub fn with_limit(mut self, limit: Duration) -> Self {
        self.limit = limit;
        self
    }

    /// The principal decisions are made for.
    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// `can` for the scoped principal, memoized per `(permission, resource)`.
    ///
    /// Concurrent first calls for the same key may both reach the policy;
    /// they agree, so the memo keeps whichever lands last.
    pub async fn can(&self, permission: Permission, resource: Option<&Resource>) -> bool {
        let key = (permission, resource.cloned());
        let cached = self.memo.lock().get(&key).copied();
        if let Some(cached) = cached {
            return cached;
        }

        let policy = Arc::clone(&self.policy);
        let principal = self.principal.clone();
        let target = key.1.clone();
        let call =
            async move { policy.can(principal.as_ref(), permission, target.as_ref()).await };

        match run_bounded(self.limit, call).await {
            Ok(decision) => {
                self.memo.lock().insert(key, decision);
                decision
            }
            Err(interrupted) => {
                tracing::error!(
                    principal = ?self.principal.as_ref().map(|p| p.id().to_string()),
                    permission = %permission,
                    reason = interrupted.reason(),
                    "authorization decision aborted, denying"
                );
                false
            }
        }
    }

    /// Number of memoized decisions.
    #[must_use]
    pub fn memoized(&self) -> usize {
        self.memo.lock().len()
    }
}
