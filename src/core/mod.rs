//! Core lifecycle types and logic.
//!
//! This module contains the pure functional core of the engine:
//! - States and actions via the `State`, `Action` and `ActionKind` traits
//! - Rules describing allowed edges
//! - Guard predicates and their evaluator
//! - Transition outcomes
//!
//! All logic in this module is pure (no side effects), following
//! the "pure core, imperative shell" philosophy.

mod action;
mod guard;
mod outcome;
pub(crate) mod rule;
mod state;

pub use action::{Action, ActionKind};
pub use guard::{BoxError, Guard, GuardEvaluator, GuardExecutionError, GuardFault, GuardResult};
pub use outcome::{TransitionOutcome, ILLEGAL_TRANSITION};
pub use rule::Rule;
pub use state::{Finite, State};
