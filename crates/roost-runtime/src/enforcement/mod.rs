//! Enforcement points.
//!
//! Two places consult the decision engine:
//!
//! | Point | When | On denial |
//! |-------|------|-----------|
//! | [`Gate`] | before a request is served | redirect (login or fallback) |
//! | [`Guard`] | inside a rendered view | hide content, redirect once |
//!
//! Both fail closed: a decision that errors, panics, or runs out of time
//! is a denial.

mod gate;
mod guard;
mod redirect;

pub use gate::{Gate, GateBuilder, GateDecision, GateOutcome};
pub use guard::{Guard, GuardState, GuardView};
pub use redirect::RedirectTargets;
