//! Actions and their kind discriminators.
//!
//! An action is a tagged variant carrying only the payload relevant to
//! its kind. The table is keyed by the fieldless kind, never by the
//! payload, so a guard can inspect the payload without the payload
//! ever influencing which rule is selected.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Fieldless discriminator of an [`Action`].
pub trait ActionKind:
    Copy + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the kind's name for display/logging.
    fn name(&self) -> &str;
}

/// A typed request to move an entity between states.
///
/// Implementations should map variants to kinds with an exhaustive
/// `match` so that adding a variant without a kind fails to compile.
///
/// # Example
///
/// ```rust
/// use verdict::core::{Action, ActionKind};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum RefundKind {
///     Request,
///     Cancel,
/// }
///
/// impl ActionKind for RefundKind {
///     fn name(&self) -> &str {
///         match self {
///             Self::Request => "Request",
///             Self::Cancel => "Cancel",
///         }
///     }
/// }
///
/// #[derive(Debug)]
/// enum Refund {
///     Request { amount_cents: u64 },
///     Cancel,
/// }
///
/// impl Action for Refund {
///     type Kind = RefundKind;
///
///     fn kind(&self) -> RefundKind {
///         match self {
///             Self::Request { .. } => RefundKind::Request,
///             Self::Cancel => RefundKind::Cancel,
///         }
///     }
/// }
///
/// assert_eq!(Refund::Request { amount_cents: 500 }.kind(), RefundKind::Request);
/// ```
pub trait Action: Debug + Send + Sync {
    /// The discriminator type for this action family.
    type Kind: ActionKind;

    /// The discriminator of this action.
    fn kind(&self) -> Self::Kind;
}
