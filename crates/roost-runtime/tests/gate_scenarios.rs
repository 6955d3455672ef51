//! Integration tests for the request gate.
//!
//! Tests the complete flow: credentials → session → route → decision → redirect

use async_trait::async_trait;
use roost_auth::{
    Credentials, LookupError, MembershipOracle, Permission, Resource, ResourceType, Role,
    RouteRule, SessionClaims,
};
use roost_runtime::auth::{InMemoryMemberships, StaticSessions};
use roost_runtime::config::GateConfig;
use roost_runtime::enforcement::{Gate, GateOutcome, Guard, GuardView};
use roost_runtime::Authorizer;
use roost_types::PrincipalId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Residency records keyed by (principal, house), the way a host backend
/// would hold them.
#[derive(Debug, Default)]
struct Residencies {
    status: HashMap<(String, String), &'static str>,
}

impl Residencies {
    fn with(mut self, principal: &str, house: &str, status: &'static str) -> Self {
        self.status
            .insert((principal.to_string(), house.to_string()), status);
        self
    }
}

#[async_trait]
impl MembershipOracle for Residencies {
    async fn has_active_membership(
        &self,
        principal: &PrincipalId,
        _role: Role,
        resource: &Resource,
    ) -> Result<bool, LookupError> {
        let key = (principal.as_str().to_string(), resource.id().as_str().to_string());
        Ok(self.status.get(&key) == Some(&"active"))
    }
}

/// An oracle that misbehaves on request.
#[derive(Debug)]
struct Misbehaving;

#[async_trait]
impl MembershipOracle for Misbehaving {
    async fn has_active_membership(
        &self,
        _principal: &PrincipalId,
        _role: Role,
        resource: &Resource,
    ) -> Result<bool, LookupError> {
        match resource.id().as_str() {
            "ERR" => Err(LookupError::Backend("connection reset".into())),
            "PANIC" => panic!("oracle bug"),
            "SLOW" => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(true)
            }
            _ => Ok(true),
        }
    }
}

fn sessions() -> Arc<StaticSessions> {
    Arc::new(
        StaticSessions::new()
            .with_session("resident", SessionClaims::new("u1", Some("resident")))
            .with_session("former", SessionClaims::new("u2", Some("resident")))
            .with_session("admin", SessionClaims::new("a1", Some("admin")))
            .with_session("root", SessionClaims::new("s1", Some("super_admin"))),
    )
}

fn residencies() -> Arc<Residencies> {
    Arc::new(
        Residencies::default()
            .with("u1", "H1", "active")
            .with("u2", "H1", "former")
            .with("a1", "H1", "active"),
    )
}

fn house_gate() -> Gate {
    Gate::builder(GateConfig::default())
        .session_provider(sessions())
        .oracle(ResourceType::House, residencies())
        .build()
        .expect("built-in routes should validate")
}

fn token(t: &str) -> Credentials {
    Credentials::with_token(t)
}

fn h1() -> Resource {
    Resource::new(ResourceType::House, "H1").expect("valid id")
}

/// Active resident viewing their house
#[tokio::test]
async fn active_resident_views_house() {
    let gate = house_gate();
    assert_eq!(gate.evaluate("/house/H1", &token("resident")).await, GateOutcome::Allow);
    assert_eq!(
        gate.evaluate("/house/H1/events/E7", &token("resident")).await,
        GateOutcome::Allow
    );
}

/// Former resident keeps the permission but loses the membership
#[tokio::test]
async fn former_resident_is_sent_to_fallback() {
    let gate = house_gate();
    assert_eq!(
        gate.evaluate("/house/H1", &token("former")).await,
        GateOutcome::Redirect("/dashboard".into())
    );
}

/// Anonymous visitor to an admin page
#[tokio::test]
async fn anonymous_admin_page_goes_to_login() {
    let gate = house_gate();
    assert_eq!(
        gate.evaluate("/admin/H1/residents", &Credentials::anonymous()).await,
        GateOutcome::Redirect("/login?redirectTo=/admin/H1/residents".into())
    );
}

/// Public listing without any session
#[tokio::test]
async fn public_listing_without_session() {
    let gate = house_gate();
    let decision = gate.decide("/houses", &Credentials::anonymous()).await;
    assert_eq!(decision.outcome, GateOutcome::Allow);
    assert!(decision.principal.is_none());
}

#[tokio::test]
async fn decision_reports_principal_and_rule() {
    let gate = house_gate();
    let decision = gate.decide("/admin/H1/residents", &token("admin")).await;
    assert_eq!(decision.outcome, GateOutcome::Allow);
    assert_eq!(decision.matched.as_deref(), Some("/admin/:houseId/residents"));
    let principal = decision.principal.expect("admin is signed in");
    assert_eq!(principal.role(), Role::Manager);
}

#[tokio::test]
async fn admin_catch_all_and_exact_routes() {
    let gate = house_gate();
    assert!(gate.evaluate("/admin/H1/settings/billing", &token("admin")).await.is_allowed());
    assert_eq!(
        gate.evaluate("/admin/H1/settings", &token("resident")).await,
        GateOutcome::Redirect("/dashboard".into())
    );
    // Exact public rule wins over the dynamic one.
    assert!(gate.evaluate("/houses", &Credentials::anonymous()).await.is_allowed());
}

#[tokio::test]
async fn super_admin_bypasses_membership() {
    let gate = house_gate();
    for path in ["/admin/H9/finance", "/house/H9/residents", "/super-admin/admins"] {
        assert!(gate.evaluate(path, &token("root")).await.is_allowed(), "{path}");
    }
    assert_eq!(
        gate.evaluate("/super-admin/admins", &token("admin")).await,
        GateOutcome::Redirect("/dashboard".into())
    );
}

#[tokio::test]
async fn redirect_target_is_encoded() {
    let gate = house_gate();
    assert_eq!(
        gate.evaluate("/house/H1/events?tab=past&x=1", &Credentials::anonymous())
            .await
            .location(),
        Some("/login?redirectTo=/house/H1/events%3Ftab%3Dpast%26x%3D1")
    );
}

fn misbehaving_gate() -> Gate {
    let mut config = GateConfig::default();
    config.timeouts.oracle_ms = 50;
    Gate::builder(config)
        .session_provider(sessions())
        .oracle(ResourceType::House, Arc::new(Misbehaving))
        .build()
        .expect("built-in routes should validate")
}

#[tokio::test]
async fn oracle_error_denies() {
    let gate = misbehaving_gate();
    assert!(gate.evaluate("/house/OK", &token("resident")).await.is_allowed());
    assert_eq!(
        gate.evaluate("/house/ERR", &token("resident")).await,
        GateOutcome::Redirect("/dashboard".into())
    );
}

#[tokio::test]
async fn oracle_panic_denies() {
    let gate = misbehaving_gate();
    assert_eq!(
        gate.evaluate("/house/PANIC", &token("resident")).await,
        GateOutcome::Redirect("/dashboard".into())
    );
    // The gate keeps serving afterwards.
    assert!(gate.evaluate("/house/OK", &token("resident")).await.is_allowed());
}

#[tokio::test(start_paused = true)]
async fn oracle_timeout_denies() {
    let gate = misbehaving_gate();
    assert_eq!(
        gate.evaluate("/house/SLOW", &token("resident")).await,
        GateOutcome::Redirect("/dashboard".into())
    );
}

#[tokio::test]
async fn missing_oracle_denies_resource_checks() {
    let gate = Gate::builder(GateConfig::default())
        .session_provider(sessions())
        .build()
        .expect("built-in routes should validate");
    assert_eq!(
        gate.evaluate("/house/H1", &token("resident")).await,
        GateOutcome::Redirect("/dashboard".into())
    );
    assert!(gate.evaluate("/dashboard", &token("resident")).await.is_allowed());
}

#[tokio::test]
async fn hot_reload_applies_to_next_request() {
    let gate = house_gate();
    assert!(gate.evaluate("/reports", &token("resident")).await.is_allowed());

    let mut rules = roost_runtime::house_routes();
    rules.push(
        RouteRule::protected("/reports")
            .requires(Permission::ViewAnalytics)
            .fallback("/profile"),
    );
    gate.routes().reload(rules).expect("valid rules");

    assert_eq!(
        gate.evaluate("/reports", &token("resident")).await,
        GateOutcome::Redirect("/profile".into())
    );
    assert!(gate.evaluate("/reports", &token("admin")).await.is_allowed());

    // A broken reload leaves the table alone.
    assert!(gate
        .routes()
        .reload(vec![RouteRule::public("/reports").requires(Permission::ViewAnalytics)])
        .is_err());
    assert_eq!(
        gate.evaluate("/reports", &token("resident")).await,
        GateOutcome::Redirect("/profile".into())
    );
}

#[tokio::test]
async fn guard_hides_and_redirects_once() {
    let houses = Arc::new(InMemoryMemberships::new());
    houses.grant("u1", h1());
    let authorizer = Authorizer::new(
        roost_runtime::ResourceAccessResolver::new(Duration::from_millis(100))
            .with_oracle(ResourceType::House, houses.clone()),
    );
    let resident = roost_runtime::SessionResolver::new(
        sessions(),
        Duration::from_millis(100),
        roost_auth::UnknownRolePolicy::LowestPrivilege,
    )
    .resolve(&token("resident"))
    .await;

    let mut guard = Guard::new(Permission::ViewResidents, Some(h1()), "/dashboard");
    assert_eq!(guard.view(), GuardView::Loading);

    let scoped = authorizer.scoped(resident.clone());
    assert_eq!(guard.evaluate(&scoped).await, None);
    assert_eq!(guard.view(), GuardView::Content);

    // Membership revoked; a new request gets a new scope.
    houses.revoke("u1", &h1());
    let scoped = authorizer.scoped(resident);
    assert_eq!(guard.evaluate(&scoped).await.as_deref(), Some("/dashboard"));
    assert_eq!(guard.evaluate(&scoped).await, None);
    assert_eq!(guard.view(), GuardView::Empty);
}
