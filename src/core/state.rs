//! Core State trait for lifecycle states.
//!
//! All lifecycle states must implement this trait, which provides
//! pure methods for inspecting state properties without side effects.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for lifecycle states.
///
/// All methods are pure - no side effects. A state is a member of a
/// closed enumeration; an entity snapshot always carries exactly one.
///
/// # Required Traits
///
/// - `Clone`: States are copied into outcomes and audit records
/// - `Eq` + `Hash`: States key the transition table
/// - `Debug`: States must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: States travel to audit sinks and manifests
///
/// # Example
///
/// ```rust
/// use verdict::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum PaymentState {
///     Pending,
///     Settled,
///     Refunded,
/// }
///
/// impl State for PaymentState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Pending => "Pending",
///             Self::Settled => "Settled",
///             Self::Refunded => "Refunded",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Refunded)
///     }
/// }
///
/// assert_eq!(PaymentState::Settled.name(), "Settled");
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// The completeness check refuses a table with an allowed rule out of
    /// a final state, so a final state can only carry forbidden entries.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}

/// A closed enumeration whose members can be listed.
///
/// Implemented by `state_enum!` and `action_enum!`. The completeness
/// check walks `variants()` of both the state and the action kind type.
pub trait Finite: Sized + 'static {
    /// Every member, in declaration order.
    fn variants() -> &'static [Self];
}
