//! Authorization runtime for roost.
//!
//! Core types ([`Principal`], [`Permission`], [`Resource`]) and the
//! collaborator traits are defined in `roost-auth`. This module provides
//! the runtime implementations:
//!
//! - [`ResourceAccessResolver`]: oracle registry with super bypass and bounded calls
//! - [`Authorizer`]: concrete [`AuthorizationPolicy`] with audit logging
//! - [`ScopedAuthorizer`]: per-request memo over any policy
//! - [`SessionResolver`]: bounded session lookup plus role normalization
//! - [`InMemoryMemberships`], [`StaticSessions`]: fixed-data collaborators
//!
//! # Architecture
//!
//! ```text
//! roost-auth (traits + data types)
//!     AuthorizationPolicy, MembershipOracle, SessionProvider, Principal
//!         ↓
//! roost-runtime/auth (implementations)
//!     Authorizer ─► ResourceAccessResolver ─► {ResourceType → oracle}
//!     SessionResolver ─► SessionProvider
//! ```

mod authorizer;
mod bounded;
mod memory;
mod resolver;
mod scoped;
mod session;

pub use authorizer::Authorizer;
pub use memory::{InMemoryMemberships, StaticSessions};
pub use resolver::ResourceAccessResolver;
pub use scoped::{ScopedAuthorizer, DEFAULT_DECISION_LIMIT};
pub use session::SessionResolver;

pub(crate) use bounded::run_bounded;

// Re-export from roost-auth for convenience
pub use roost_auth::{AuthorizationPolicy, MembershipOracle, Permission, Principal, Resource, SessionProvider};
