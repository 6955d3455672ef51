//! Authorization primitives for roost.
//!
//! This crate holds everything a route-based authorization decision is
//! made of, without any runtime: the permission catalog, roles, the
//! principal and resource model, the route table, and the collaborator
//! traits the host application implements.
//!
//! # Decision Model
//!
//! ```text
//! Allowed = Principal(WHO) ∩ Catalog(role → permissions) ∩ Membership(WHERE)
//! ```
//!
//! | Layer | Type | Controls |
//! |-------|------|----------|
//! | [`Role`] + [`catalog`] | Enum + const bitflags | What a role may do at all |
//! | [`RouteTable`] | Ordered rules | Which permission a path needs |
//! | [`MembershipOracle`] | Trait | Whether the principal belongs to the resource |
//! | [`AuthorizationPolicy`] | Trait | The composed yes/no decision |
//!
//! # Crate Architecture
//!
//! ```text
//! roost-types  (PrincipalId, ResourceId, ErrorCode, TryNew)
//!      ↑
//! roost-auth   ◄── THIS CRATE
//! (Role, Permission, RouteTable, SessionProvider, MembershipOracle)
//!      ↑
//! roost-runtime (Authorizer, Gate, Guard, config)
//!      ↑
//! roost-cli
//! ```
//!
//! # Design Principles
//!
//! - **Trait definitions here, implementations in consumers**: roost-runtime
//!   provides the concrete `Authorizer`; hosts provide session providers
//!   and oracles
//! - **Fail closed**: a missing principal, permission, or membership is a
//!   denial, and so is every collaborator failure
//! - **Validate at load**: a bad route table never reaches request time

pub mod catalog;
pub mod error;
pub mod permission;
pub mod policy;
pub mod principal;
pub mod resource;
pub mod role;
pub mod route;

pub use catalog::{all_permissions, has_permission, permissions_by_category, permissions_for};
pub use error::{LookupError, ResolutionFailure, RouteConfigError};
pub use permission::{Permission, PermissionCategory, PermissionSet, UnknownPermission};
pub use policy::AuthorizationPolicy;
pub use principal::{Credentials, Principal, SessionClaims, SessionProvider};
pub use resource::{MembershipOracle, Resource, ResourceType};
pub use role::{normalize_role_claim, Role, UnknownRolePolicy};
pub use route::{extract_params, RouteMatch, RouteParams, RoutePattern, RouteRule, RouteTable};

// Re-export identifiers from roost_types for convenience
pub use roost_types::{PrincipalId, ResourceId};
