//! Macros for declaring closed state and action enumerations.

/// Generate a state enum with `State` and `Finite` implementations.
///
/// # Example
///
/// ```
/// use verdict::state_enum;
/// use verdict::core::{Finite, State};
///
/// state_enum! {
///     pub enum PaymentState {
///         Pending,
///         Authorized,
///         Settled,
///         Declined,
///     }
///     final: [Settled, Declined]
/// }
///
/// assert_eq!(PaymentState::variants().len(), 4);
/// assert!(PaymentState::Declined.is_final());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }
        }

        impl $crate::core::Finite for $name {
            fn variants() -> &'static [Self] {
                &[$(Self::$variant),*]
            }
        }
    };
}

/// Generate an action enum together with its fieldless kind enum.
///
/// Each variant may carry named payload fields. The generated
/// `Action::kind` is an exhaustive `match`, and the kind enum implements
/// `ActionKind` and `Finite`.
///
/// # Example
///
/// ```
/// use verdict::action_enum;
/// use verdict::core::{Action, ActionKind, Finite};
///
/// action_enum! {
///     pub enum PaymentAction => PaymentKind {
///         Authorize { amount_cents: u64 },
///         Settle,
///         Decline { reason: String },
///     }
/// }
///
/// let action = PaymentAction::Decline { reason: "card expired".to_string() };
/// assert_eq!(action.kind(), PaymentKind::Decline);
/// assert_eq!(action.kind().name(), "Decline");
/// assert_eq!(PaymentKind::variants().len(), 3);
/// ```
#[macro_export]
macro_rules! action_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident => $kind:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $({ $($field:ident : $field_ty:ty),* $(,)? })?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant $({ $($field: $field_ty),* })?
            ),*
        }

        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $kind {
            $($variant),*
        }

        impl $crate::core::ActionKind for $kind {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }

        impl $crate::core::Finite for $kind {
            fn variants() -> &'static [Self] {
                &[$(Self::$variant),*]
            }
        }

        impl $crate::core::Action for $name {
            type Kind = $kind;

            fn kind(&self) -> $kind {
                match self {
                    $(Self::$variant { .. } => $kind::$variant),*
                }
            }
        }
    };
}
