//! Builder API for ergonomic table construction.
//!
//! This module provides fluent builders and macros for declaring closed
//! lifecycles with minimal boilerplate while keeping every pair explicit.

pub mod error;
pub mod macros;
pub mod rule;
pub mod table;

pub use error::BuildError;
pub use rule::RuleBuilder;
pub use table::TableBuilder;

use crate::core::{Action, State};

/// Start a rule for `from --kind--> to`.
///
/// # Example
///
/// ```
/// use verdict::builder::{allow, TableBuilder};
/// use verdict::{action_enum, state_enum};
///
/// state_enum! {
///     enum Door {
///         Open,
///         Shut,
///     }
/// }
///
/// action_enum! {
///     enum DoorAction => DoorKind {
///         Close,
///     }
/// }
///
/// let engine = TableBuilder::<Door, DoorAction, ()>::new()
///     .allow(allow(Door::Open, DoorKind::Close, Door::Shut))
///     .and_then(|b| b.forbid(Door::Shut, DoorKind::Close))
///     .and_then(|b| b.build_universe())
///     .unwrap();
///
/// assert!(engine.check(&Door::Open, DoorKind::Close));
/// ```
pub fn allow<S, A, Snap>(from: S, kind: A::Kind, to: S) -> RuleBuilder<S, A, Snap>
where
    S: State,
    A: Action,
{
    RuleBuilder::new().from(from).on(kind).to(to)
}

/// Start a rule guarded by a single predicate.
///
/// # Example
///
/// ```
/// use verdict::builder::guarded;
/// use verdict::{action_enum, state_enum};
///
/// state_enum! {
///     enum Account {
///         Active,
///         Suspended,
///     }
/// }
///
/// action_enum! {
///     enum AccountAction => AccountKind {
///         Suspend { reason: String },
///     }
/// }
///
/// let rule = guarded::<_, _, (), _>(
///     Account::Active,
///     AccountKind::Suspend,
///     Account::Suspended,
///     ("MISSING_REASON", "A suspension requires a reason"),
///     |_, action: &AccountAction, _| match action {
///         AccountAction::Suspend { reason } => !reason.is_empty(),
///     },
/// )
/// .build()
/// .unwrap();
///
/// assert_eq!(rule.guard_codes(), vec!["MISSING_REASON"]);
/// ```
pub fn guarded<S, A, Snap, F>(
    from: S,
    kind: A::Kind,
    to: S,
    (code, message): (&str, &str),
    predicate: F,
) -> RuleBuilder<S, A, Snap>
where
    S: State,
    A: Action,
    F: Fn(&S, &A, &Snap) -> bool + Send + Sync + 'static,
{
    allow(from, kind, to).when(code, message, predicate)
}
