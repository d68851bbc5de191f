//! Verdict: a type-safe state-transition engine
//!
//! Verdict validates actions against an entity's current lifecycle state.
//! Every legal edge is declared once in a [`TransitionTable`], the table is
//! checked for completeness before an engine is built, and each
//! [`TransitionEngine::apply`] call returns either the new state or a
//! reason code. Illegal actions are ordinary rejected outcomes, never
//! panics.
//!
//! Following Stillwater's "pure core, imperative shell" philosophy, the
//! engine is a pure function of (state, action, snapshot). Persisting the
//! new state belongs to the caller, and audit writes live in
//! [`effects`] behind a Stillwater `Effect`.
//!
//! # Core Concepts
//!
//! - **State / Action**: closed enumerations, declared with [`state_enum!`]
//!   and [`action_enum!`]
//! - **Table**: the `(state, kind)` mapping, complete or rejected
//! - **Guards**: pure predicates evaluated in order, first failure wins
//! - **Outcome**: `Applied { state, message }` or `Rejected { code, message }`
//!
//! # Example
//!
//! ```rust
//! use verdict::builder::{allow, TableBuilder};
//! use verdict::{action_enum, state_enum, ILLEGAL_TRANSITION};
//!
//! state_enum! {
//!     pub enum Order {
//!         Placed,
//!         Shipped,
//!         Cancelled,
//!     }
//!     final: [Cancelled]
//! }
//!
//! action_enum! {
//!     pub enum OrderAction => OrderKind {
//!         Ship { carrier: String },
//!         Cancel,
//!     }
//! }
//!
//! let engine = TableBuilder::<Order, OrderAction, ()>::new()
//!     .allow(
//!         allow(Order::Placed, OrderKind::Ship, Order::Shipped)
//!             .when("NO_CARRIER", "A carrier is required", |_, action: &OrderAction, _| {
//!                 matches!(action, OrderAction::Ship { carrier } if !carrier.is_empty())
//!             })
//!             .message("Order shipped"),
//!     )
//!     .and_then(|b| b.allow(allow(Order::Placed, OrderKind::Cancel, Order::Cancelled)))
//!     .and_then(|b| b.forbid_all(Order::Shipped, [OrderKind::Ship, OrderKind::Cancel]))
//!     .and_then(|b| b.terminal(Order::Cancelled))
//!     .and_then(|b| b.build_universe())
//!     .unwrap();
//!
//! let ship = OrderAction::Ship { carrier: "DHL".to_string() };
//! let outcome = engine.apply(&Order::Placed, &ship, &()).unwrap();
//! assert_eq!(outcome.state(), Some(&Order::Shipped));
//!
//! let outcome = engine.apply(&Order::Cancelled, &OrderAction::Cancel, &()).unwrap();
//! assert_eq!(outcome.code(), Some(ILLEGAL_TRANSITION));
//! assert_eq!(outcome.message(), "Cancelled cannot accept Cancel");
//! ```

pub mod audit;
pub mod builder;
pub mod core;
pub mod effects;
pub mod engine;
pub mod manifest;
pub mod table;

// Re-export commonly used types
pub use builder::{BuildError, RuleBuilder, TableBuilder};
pub use core::{Action, ActionKind, Guard, State, TransitionOutcome, ILLEGAL_TRANSITION};
pub use engine::{EngineConfig, TransitionEngine};
pub use table::{ConfigError, TransitionTable};
