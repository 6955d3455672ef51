//! Session resolution at the gate.
//!
//! Wraps the host's [`SessionProvider`] with the deadline, panic
//! containment, and role normalization. Whatever goes wrong, the
//! caller sees "no principal".

use super::bounded::{run_bounded, Interrupted};
use roost_auth::{
    Credentials, LookupError, Principal, ResolutionFailure, SessionProvider, UnknownRolePolicy,
};
use roost_types::ErrorCode;
use std::sync::Arc;
use std::time::Duration;

/// Resolves credentials into a normalized [`Principal`].
#[derive(Clone)]
pub struct SessionResolver {
    provider: Arc<dyn SessionProvider>,
    timeout: Duration,
    unknown_role: UnknownRolePolicy,
}

impl std::fmt::Debug for SessionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionResolver")
            .field("timeout", &self.timeout)
            .field("unknown_role", &self.unknown_role)
            .finish_non_exhaustive()
    }
}

impl SessionResolver {
    /// Creates a resolver over `provider`.
    #[must_use]
    pub fn new(
        provider: Arc<dyn SessionProvider>,
        timeout: Duration,
        unknown_role: UnknownRolePolicy,
    ) -> Self {
        Self {
            provider,
            timeout,
            unknown_role,
        }
    }

    /// The configured unknown-role policy.
    #[must_use]
    pub fn unknown_role(&self) -> UnknownRolePolicy {
        self.unknown_role
    }

    /// Resolves `credentials` to a principal, or `None`.
    ///
    /// Anonymous credentials never reach the provider. Failures are
    /// logged and become `None`.
    pub async fn resolve(&self, credentials: &Credentials) -> Option<Principal> {
        match self.try_resolve(credentials).await {
            Ok(principal) => principal,
            Err(failure) => {
                tracing::warn!(
                    code = failure.code(),
                    error = %failure,
                    "session resolution failed, treating as anonymous"
                );
                None
            }
        }
    }

    /// Like [`resolve`](Self::resolve), but reports why resolution failed.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionFailure`] if the provider fails, panics, exceeds
    /// the timeout, or returns a malformed principal id.
    pub async fn try_resolve(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<Principal>, ResolutionFailure> {
        if credentials.is_anonymous() {
            return Ok(None);
        }

        let provider = Arc::clone(&self.provider);
        let creds = credentials.clone();
        let call = async move { provider.resolve_session(&creds).await };

        let claims = match run_bounded(self.timeout, call).await {
            Ok(Ok(claims)) => claims,
            Ok(Err(e)) => return Err(ResolutionFailure::Session(e)),
            Err(Interrupted::TimedOut) => {
                return Err(ResolutionFailure::SessionTimeout(self.timeout))
            }
            Err(other) => {
                return Err(ResolutionFailure::Session(LookupError::Unavailable(format!(
                    "session provider {}",
                    other.reason()
                ))))
            }
        };

        let Some(claims) = claims else {
            return Ok(None);
        };
        let raw_role = claims.role_claim.clone();
        let principal = claims
            .into_principal(self.unknown_role)
            .map_err(ResolutionFailure::Session)?;

        match &principal {
            Some(p) if raw_role.as_deref() != Some(p.role().claim_name())
                && raw_role.as_deref() != Some(p.role().as_str()) =>
            {
                tracing::debug!(
                    principal = %p.id(),
                    role = %p.role(),
                    claim = ?raw_role,
                    "role claim normalized"
                );
            }
            None => {
                tracing::warn!(
                    claim = ?raw_role,
                    "unrecognized role claim rejected by policy"
                );
            }
            _ => {}
        }

        Ok(principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticSessions;
    use async_trait::async_trait;
    use roost_auth::{Role, SessionClaims};

    struct Broken;

    #[async_trait]
    impl SessionProvider for Broken {
        async fn resolve_session(
            &self,
            credentials: &Credentials,
        ) -> Result<Option<SessionClaims>, LookupError> {
            match credentials.token() {
                Some("panic") => panic!("provider bug"),
                Some("slow") => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(None)
                }
                Some("bad-id") => Ok(Some(SessionClaims::new("a/b", Some("resident")))),
                _ => Err(LookupError::Unavailable("identity service down".into())),
            }
        }
    }

    fn resolver(provider: impl SessionProvider + 'static, policy: UnknownRolePolicy) -> SessionResolver {
        SessionResolver::new(Arc::new(provider), Duration::from_millis(100), policy)
    }

    fn sessions() -> StaticSessions {
        StaticSessions::new()
            .with_session("admin", SessionClaims::new("a1", Some("admin")))
            .with_session("odd", SessionClaims::new("o1", Some("janitor")))
            .with_session("none", SessionClaims::new("n1", None))
    }

    #[tokio::test]
    async fn resolves_and_normalizes() {
        let r = resolver(sessions(), UnknownRolePolicy::LowestPrivilege);

        let admin = r.resolve(&Credentials::with_token("admin")).await.unwrap();
        assert_eq!(admin.role(), Role::Manager);
        assert_eq!(admin.id().as_str(), "a1");

        let odd = r.resolve(&Credentials::with_token("odd")).await.unwrap();
        assert_eq!(odd.role(), Role::Base);

        let none = r.resolve(&Credentials::with_token("none")).await.unwrap();
        assert_eq!(none.role(), Role::Base);
    }

    #[tokio::test]
    async fn deny_policy_drops_unknown_roles() {
        let r = resolver(sessions(), UnknownRolePolicy::Deny);
        assert!(r.resolve(&Credentials::with_token("odd")).await.is_none());
        assert!(r.resolve(&Credentials::with_token("none")).await.is_none());
        assert!(r.resolve(&Credentials::with_token("admin")).await.is_some());
    }

    #[tokio::test]
    async fn anonymous_and_unknown_tokens_are_none() {
        let r = resolver(sessions(), UnknownRolePolicy::LowestPrivilege);
        assert!(r.resolve(&Credentials::anonymous()).await.is_none());
        assert!(r.resolve(&Credentials::with_token("expired")).await.is_none());
    }

    #[tokio::test]
    async fn provider_error_is_none() {
        let r = resolver(Broken, UnknownRolePolicy::LowestPrivilege);
        let creds = Credentials::with_token("whatever");
        assert!(r.resolve(&creds).await.is_none());
        assert_eq!(
            r.try_resolve(&creds).await.unwrap_err().code(),
            "RESOLVE_SESSION_FAILED"
        );
    }

    #[tokio::test]
    async fn provider_panic_is_none() {
        let r = resolver(Broken, UnknownRolePolicy::LowestPrivilege);
        assert!(r.resolve(&Credentials::with_token("panic")).await.is_none());
    }

    #[tokio::test]
    async fn malformed_principal_id_is_none() {
        let r = resolver(Broken, UnknownRolePolicy::LowestPrivilege);
        let err = r
            .try_resolve(&Credentials::with_token("bad-id"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolutionFailure::Session(LookupError::Malformed(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn provider_timeout_is_none() {
        let r = resolver(Broken, UnknownRolePolicy::LowestPrivilege);
        let creds = Credentials::with_token("slow");
        assert!(r.resolve(&creds).await.is_none());
        assert!(matches!(
            r.try_resolve(&creds).await,
            Err(ResolutionFailure::SessionTimeout(d)) if d == Duration::from_millis(100)
        ));
    }
}
