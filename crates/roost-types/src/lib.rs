//! Core types for roost.
//!
//! Foundational, dependency-light types shared by every roost crate.
//!
//! # Crate Architecture
//!
//! ```text
//! roost-types    : PrincipalId, ResourceId, ErrorCode, TryNew  ◄── HERE
//!     ↑
//! roost-auth     : Role, Permission catalog, Principal, Resource, RouteTable
//!     ↑
//! roost-runtime  : resolver, decision engine, session, config, Gate, Guard
//!     ↑
//! roost-cli      : `roost` binary
//! ```
//!
//! # Example
//!
//! ```
//! use roost_types::{PrincipalId, ResourceId, TryNew};
//!
//! let who = PrincipalId::try_new("7f1c".to_string()).unwrap();
//! let house = ResourceId::try_new("H1".to_string()).unwrap();
//! assert_eq!(who.as_str(), "7f1c");
//! assert_eq!(house.as_str(), "H1");
//! ```

mod construct;
mod error;
mod id;

pub use construct::TryNew;
pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{IdError, PrincipalId, ResourceId};
