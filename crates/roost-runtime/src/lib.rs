//! Roost Runtime - enforcement and collaborators.
//!
//! This crate wires the decision model from `roost-auth` into something
//! a host can put in front of its pages. Hosts supply the two things
//! only they know (who is signed in, and who belongs where) and get back
//! allow/redirect answers.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Model Layer                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  roost-types : PrincipalId, ResourceId, ErrorCode           │
//! │  roost-auth  : Role, Permission, catalog, RouteTable,       │
//! │                AuthorizationPolicy + collaborator traits    │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Runtime Layer (THIS CRATE)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  auth/        : Authorizer, resolvers, in-memory backends   │
//! │  routes/      : built-in house routes, hot-swappable table  │
//! │  enforcement/ : Gate, Guard, redirect targets               │
//! │  config/      : GateConfig, layered ConfigLoader            │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Frontend Layer                             │
//! │  (roost-cli)                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! ## [`auth`] - Decisions
//!
//! - [`Authorizer`](auth::Authorizer): catalog check plus membership check
//! - [`ResourceAccessResolver`](auth::ResourceAccessResolver): oracle registry
//! - [`SessionResolver`](auth::SessionResolver): credentials to principal
//! - [`ScopedAuthorizer`](auth::ScopedAuthorizer): per-request memo
//!
//! ## [`routes`] - Route Table
//!
//! - [`house_routes`](routes::house_routes): the built-in table
//! - [`SharedRouteTable`](routes::SharedRouteTable): atomic reload
//!
//! ## [`enforcement`] - Enforcement Points
//!
//! - [`Gate`](enforcement::Gate): per-request allow/redirect
//! - [`Guard`](enforcement::Guard): in-view show/hide
//!
//! ## [`config`] - Configuration
//!
//! Configuration priority: Environment > Explicit file > Project > Global > Default

pub mod auth;
pub mod config;
pub mod enforcement;
pub mod routes;

pub use auth::{
    Authorizer, InMemoryMemberships, ResourceAccessResolver, ScopedAuthorizer, SessionResolver,
    StaticSessions,
};
pub use config::{default_config_dir, default_config_path, ConfigError, ConfigLoader, GateConfig};
pub use enforcement::{Gate, GateBuilder, GateDecision, GateOutcome, Guard, GuardState, GuardView};
pub use routes::{house_routes, SharedRouteTable};
