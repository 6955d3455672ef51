//! The request gate.
//!
//! Runs once per navigation, before anything protected is produced.
//!
//! # Decision Flow
//!
//! ```text
//! evaluate(path, credentials)
//!   │
//!   ├─ match_path(path) is public ───────────────────────► Allow
//!   │
//!   ├─ resolve session ── none / error / timeout ────────► Redirect(login?redirectTo=path)
//!   │
//!   ├─ no rule matched ──────────────────────────────────► Allow  (signed in is enough)
//!   ├─ rule has no permission ───────────────────────────► Allow
//!   │
//!   ├─ resource id unusable ─────────────────────────────► Redirect(fallback)
//!   ├─ can(principal, permission, resource) == false ────► Redirect(fallback)
//!   │    (error, panic, timeout inside can count as false)
//!   └─ otherwise ────────────────────────────────────────► Allow
//! ```
//!
//! The redirect never says why access was denied.

use super::RedirectTargets;
use crate::auth::{Authorizer, ResourceAccessResolver, SessionResolver};
use crate::config::{ConfigError, GateConfig};
use crate::routes::{load_table, SharedRouteTable};
use roost_auth::{
    AuthorizationPolicy, Credentials, MembershipOracle, Principal, ResolutionFailure,
    ResourceType, SessionProvider,
};
use roost_types::ErrorCode;
use std::sync::Arc;
use std::time::Duration;

/// What the gate tells the transport to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Let the request through.
    Allow,
    /// Respond with a redirect to this location.
    Redirect(String),
}

impl GateOutcome {
    /// Returns `true` for [`GateOutcome::Allow`].
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// The redirect location, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::Redirect(location) => Some(location),
        }
    }
}

/// A gate decision with the details operators need.
///
/// Only [`outcome`](Self::outcome) may reach the end user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDecision {
    /// The transport action.
    pub outcome: GateOutcome,
    /// Pattern of the matched rule, `None` for unlisted paths.
    pub matched: Option<String>,
    /// The resolved principal, `None` for public routes and anonymous requests.
    pub principal: Option<Principal>,
}

/// The request-intercepting enforcement point.
#[derive(Clone)]
pub struct Gate {
    routes: SharedRouteTable,
    sessions: SessionResolver,
    policy: Arc<dyn AuthorizationPolicy>,
    targets: RedirectTargets,
    decision_limit: Duration,
}

impl std::fmt::Debug for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gate")
            .field("rules", &self.routes.load().len())
            .field("sessions", &self.sessions)
            .field("targets", &self.targets)
            .field("decision_limit", &self.decision_limit)
            .finish_non_exhaustive()
    }
}

impl Gate {
    /// Assembles a gate from its parts.
    ///
    /// `decision_limit` bounds each `can` call as a whole, in case
    /// `policy` is not an [`Authorizer`] with its own oracle timeout.
    #[must_use]
    pub fn new(
        routes: SharedRouteTable,
        sessions: SessionResolver,
        policy: Arc<dyn AuthorizationPolicy>,
        targets: RedirectTargets,
        decision_limit: Duration,
    ) -> Self {
        Self {
            routes,
            sessions,
            policy,
            targets,
            decision_limit,
        }
    }

    /// Starts a [`GateBuilder`] from a loaded configuration.
    #[must_use]
    pub fn builder(config: GateConfig) -> GateBuilder {
        GateBuilder::new(config)
    }

    /// The live route table.
    #[must_use]
    pub fn routes(&self) -> &SharedRouteTable {
        &self.routes
    }

    /// Decides what to do with a navigation to `path`.
    pub async fn evaluate(&self, path: &str, credentials: &Credentials) -> GateOutcome {
        self.decide(path, credentials).await.outcome
    }

    /// Like [`evaluate`](Self::evaluate), keeping the matched rule and principal.
    pub async fn decide(&self, path: &str, credentials: &Credentials) -> GateDecision {
        let table = self.routes.load();
        let matched = table.match_path(path);
        let pattern = matched.as_ref().map(|m| m.pattern().as_str().to_string());

        if matched.as_ref().is_some_and(|m| m.is_public()) {
            tracing::debug!(path, "public route");
            return GateDecision {
                outcome: GateOutcome::Allow,
                matched: pattern,
                principal: None,
            };
        }

        let Some(principal) = self.sessions.resolve(credentials).await else {
            tracing::debug!(path, rule = ?pattern, "no session, redirecting to login");
            return GateDecision {
                outcome: GateOutcome::Redirect(self.targets.login(path)),
                matched: pattern,
                principal: None,
            };
        };

        let outcome = match matched {
            None => {
                tracing::debug!(path, principal = %principal.id(), "unlisted path, signed in");
                GateOutcome::Allow
            }
            Some(ref m) => match m.rule().required_permission {
                None => GateOutcome::Allow,
                Some(permission) => {
                    let fallback = m.redirect_target(self.targets.default_fallback()).to_string();
                    match m.resource() {
                        Err(e) => {
                            let failure = ResolutionFailure::from(e);
                            tracing::warn!(
                                path,
                                principal = %principal.id(),
                                code = failure.code(),
                                error = %failure,
                                "unusable resource parameter, denying"
                            );
                            GateOutcome::Redirect(fallback)
                        }
                        Ok(resource) => {
                            if self.bounded_can(&principal, permission, resource).await {
                                GateOutcome::Allow
                            } else {
                                tracing::info!(
                                    path,
                                    principal = %principal.id(),
                                    permission = %permission,
                                    location = %fallback,
                                    "access denied, redirecting"
                                );
                                GateOutcome::Redirect(fallback)
                            }
                        }
                    }
                }
            },
        };

        GateDecision {
            outcome,
            matched: pattern,
            principal: Some(principal),
        }
    }

    async fn bounded_can(
        &self,
        principal: &Principal,
        permission: roost_auth::Permission,
        resource: Option<roost_auth::Resource>,
    ) -> bool {
        let policy = Arc::clone(&self.policy);
        let who = principal.clone();
        let call = async move { policy.can(Some(&who), permission, resource.as_ref()).await };

        match crate::auth::run_bounded(self.decision_limit, call).await {
            Ok(allowed) => allowed,
            Err(interrupted) => {
                tracing::error!(
                    principal = %principal.id(),
                    permission = %permission,
                    reason = interrupted.reason(),
                    "authorization decision aborted, denying"
                );
                false
            }
        }
    }
}

/// Builds a [`Gate`] from configuration and host collaborators.
///
/// # Example
///
/// ```
/// use roost_runtime::auth::{InMemoryMemberships, StaticSessions};
/// use roost_runtime::config::GateConfig;
/// use roost_runtime::enforcement::{Gate, GateOutcome};
/// use roost_auth::{Credentials, ResourceType};
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let gate = Gate::builder(GateConfig::default())
///     .session_provider(Arc::new(StaticSessions::new()))
///     .oracle(ResourceType::House, Arc::new(InMemoryMemberships::new()))
///     .build()
///     .unwrap();
///
/// let anonymous = Credentials::anonymous();
/// assert_eq!(gate.evaluate("/houses", &anonymous).await, GateOutcome::Allow);
/// assert_eq!(
///     gate.evaluate("/admin/H1/residents", &anonymous).await,
///     GateOutcome::Redirect("/login?redirectTo=/admin/H1/residents".into())
/// );
/// # }
/// ```
pub struct GateBuilder {
    config: GateConfig,
    provider: Option<Arc<dyn SessionProvider>>,
    resolver: ResourceAccessResolver,
    policy: Option<Arc<dyn AuthorizationPolicy>>,
}

impl GateBuilder {
    fn new(config: GateConfig) -> Self {
        let resolver = ResourceAccessResolver::new(config.timeouts.oracle());
        Self {
            config,
            provider: None,
            resolver,
            policy: None,
        }
    }

    /// Sets the session provider. Without one, every request is anonymous.
    #[must_use]
    pub fn session_provider(mut self, provider: Arc<dyn SessionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Registers a membership oracle for `resource_type`.
    #[must_use]
    pub fn oracle(mut self, resource_type: ResourceType, oracle: Arc<dyn MembershipOracle>) -> Self {
        self.resolver.register(resource_type, oracle);
        self
    }

    /// Replaces the default [`Authorizer`] with a custom policy.
    ///
    /// Registered oracles are then unused.
    #[must_use]
    pub fn policy(mut self, policy: Arc<dyn AuthorizationPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Validates the configuration and route table, then assembles the gate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a bad redirect or timeout
    /// setting, and [`ConfigError::Routes`] if the configured (or built-in)
    /// route table is invalid.
    pub fn build(self) -> Result<Gate, ConfigError> {
        self.config.validate()?;
        let table = load_table(&self.config)?;
        let provider = self
            .provider
            .unwrap_or_else(|| Arc::new(crate::auth::StaticSessions::new()));
        let sessions = SessionResolver::new(
            provider,
            self.config.timeouts.session(),
            self.config.unknown_role,
        );
        let policy = self
            .policy
            .unwrap_or_else(|| Arc::new(Authorizer::new(self.resolver)));
        let decision_limit = self.config.timeouts.oracle() * 2;

        Ok(Gate::new(
            SharedRouteTable::new(table),
            sessions,
            policy,
            RedirectTargets::from_config(&self.config),
            decision_limit,
        ))
    }
}
