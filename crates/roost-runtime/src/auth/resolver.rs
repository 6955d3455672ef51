//! Resource access resolution.
//!
//! # Flow
//!
//! ```text
//! resolve_access(principal, resource)
//!     │
//!     ├─ role == super ──────────────────────────────► true  (info, audited)
//!     │
//!     ├─ oracle = registry[resource.type] ── missing ─► false (warn)
//!     │
//!     └─ run_bounded(timeout, oracle.has_active_membership(..))
//!            ├─ Ok(true)                              ► true
//!            ├─ Ok(false)                             ► false
//!            └─ Err / panic / timeout                 ► false (warn)
//! ```
//!
//! Per-type membership rules (admin assignment, active residency,
//! original submitter) belong to the oracles. The resolver knows nothing
//! about them.

use super::bounded::{run_bounded, Interrupted};
use roost_auth::{MembershipOracle, Principal, ResolutionFailure, Resource, ResourceType};
use roost_types::ErrorCode;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Registry of membership oracles keyed by resource type.
///
/// Built at startup and read-only afterwards.
///
/// # Example
///
/// ```
/// use roost_runtime::auth::{InMemoryMemberships, ResourceAccessResolver};
/// use roost_auth::ResourceType;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let houses = Arc::new(InMemoryMemberships::new());
/// let resolver = ResourceAccessResolver::new(Duration::from_secs(2))
///     .with_oracle(ResourceType::House, houses);
///
/// assert!(resolver.has_oracle(ResourceType::House));
/// assert!(!resolver.has_oracle(ResourceType::Event));
/// ```
#[derive(Debug, Clone)]
pub struct ResourceAccessResolver {
    oracles: HashMap<ResourceType, Arc<dyn MembershipOracle>>,
    timeout: Duration,
}

impl ResourceAccessResolver {
    /// Creates a resolver with no oracles.
    ///
    /// Every non-super check is denied until an oracle is registered for
    /// the resource type.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            oracles: HashMap::new(),
            timeout,
        }
    }

    /// Registers `oracle` for `resource_type` (builder form).
    #[must_use]
    pub fn with_oracle(
        mut self,
        resource_type: ResourceType,
        oracle: Arc<dyn MembershipOracle>,
    ) -> Self {
        self.register(resource_type, oracle);
        self
    }

    /// Registers `oracle` for `resource_type`, returning the one it replaces.
    pub fn register(
        &mut self,
        resource_type: ResourceType,
        oracle: Arc<dyn MembershipOracle>,
    ) -> Option<Arc<dyn MembershipOracle>> {
        let previous = self.oracles.insert(resource_type, oracle);
        if previous.is_some() {
            tracing::warn!(resource_type = %resource_type, "membership oracle replaced");
        }
        previous
    }

    /// Returns `true` if an oracle is registered for `resource_type`.
    #[must_use]
    pub fn has_oracle(&self, resource_type: ResourceType) -> bool {
        self.oracles.contains_key(&resource_type)
    }

    /// Resource types with a registered oracle, in catalog order.
    #[must_use]
    pub fn registered_types(&self) -> Vec<ResourceType> {
        ResourceType::ALL
            .into_iter()
            .filter(|t| self.oracles.contains_key(t))
            .collect()
    }

    /// Timeout applied to each oracle call.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether `principal` may act on `resource`.
    ///
    /// Never fails: every [`ResolutionFailure`] is logged and becomes `false`.
    pub async fn resolve_access(&self, principal: &Principal, resource: &Resource) -> bool {
        if principal.role().bypasses_resource_checks() {
            tracing::info!(
                principal = %principal.id(),
                role = %principal.role(),
                resource = %resource,
                "resource check bypassed"
            );
            return true;
        }

        match self.lookup(principal, resource).await {
            Ok(found) => {
                tracing::debug!(
                    principal = %principal.id(),
                    role = %principal.role(),
                    resource = %resource,
                    found,
                    "membership resolved"
                );
                found
            }
            Err(failure) => {
                tracing::warn!(
                    principal = %principal.id(),
                    role = %principal.role(),
                    resource = %resource,
                    code = failure.code(),
                    error = %failure,
                    "membership lookup failed, denying"
                );
                false
            }
        }
    }

    /// Consults the oracle for `resource` without the super bypass.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionFailure`] if no oracle is registered, or the
    /// oracle fails, panics, or exceeds the timeout.
    pub async fn lookup(
        &self,
        principal: &Principal,
        resource: &Resource,
    ) -> Result<bool, ResolutionFailure> {
        let resource_type = resource.resource_type();
        let oracle = self
            .oracles
            .get(&resource_type)
            .cloned()
            .ok_or(ResolutionFailure::NoOracle(resource_type))?;

        let id = principal.id().clone();
        let role = principal.role();
        let target = resource.clone();
        let call = async move { oracle.has_active_membership(&id, role, &target).await };

        match run_bounded(self.timeout, call).await {
            Ok(Ok(found)) => Ok(found),
            Ok(Err(source)) => Err(ResolutionFailure::Oracle {
                resource_type,
                source,
            }),
            Err(Interrupted::TimedOut) => Err(ResolutionFailure::OracleTimeout {
                resource_type,
                after: self.timeout,
            }),
            Err(other) => Err(ResolutionFailure::OracleAborted {
                resource_type,
                reason: other.reason().to_string(),
            }),
        }
    }
}
