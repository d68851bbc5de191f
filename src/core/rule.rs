//! Transition rules: one allowed edge of the lifecycle graph.

use super::action::{Action, ActionKind};
use super::guard::Guard;
use super::state::State;
use std::sync::Arc;

pub(crate) type DescribeFn<A, Snap> = Arc<dyn Fn(&A, &Snap) -> String + Send + Sync>;

pub(crate) enum EffectMessage<A, Snap> {
    Default,
    Fixed(String),
    Computed(DescribeFn<A, Snap>),
}

impl<A, Snap> Clone for EffectMessage<A, Snap> {
    fn clone(&self) -> Self {
        match self {
            Self::Default => Self::Default,
            Self::Fixed(message) => Self::Fixed(message.clone()),
            Self::Computed(f) => Self::Computed(Arc::clone(f)),
        }
    }
}

/// An allowed transition: `(source, kind) -> target`.
///
/// The target is fixed at registration. Guards attached to the rule can
/// only veto it.
pub struct Rule<S, A: Action, Snap> {
    source: S,
    kind: A::Kind,
    target: S,
    guards: Vec<Guard<S, A, Snap>>,
    effect: EffectMessage<A, Snap>,
}

impl<S: State, A: Action, Snap> Rule<S, A, Snap> {
    /// Create an unguarded rule with the default effect message.
    pub fn new(source: S, kind: A::Kind, target: S) -> Self {
        Self {
            source,
            kind,
            target,
            guards: Vec::new(),
            effect: EffectMessage::Default,
        }
    }

    /// Append a guard. Guards run in the order they were added.
    pub fn with_guard(mut self, guard: Guard<S, A, Snap>) -> Self {
        self.guards.push(guard);
        self
    }

    /// Append several guards, preserving their order.
    pub fn with_guards(mut self, guards: impl IntoIterator<Item = Guard<S, A, Snap>>) -> Self {
        self.guards.extend(guards);
        self
    }

    /// Use a fixed effect message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.effect = EffectMessage::Fixed(message.into());
        self
    }

    /// Build the effect message from the action payload and snapshot.
    pub fn with_description<F>(mut self, describe: F) -> Self
    where
        F: Fn(&A, &Snap) -> String + Send + Sync + 'static,
    {
        self.effect = EffectMessage::Computed(Arc::new(describe));
        self
    }

    pub(crate) fn with_effect(mut self, effect: EffectMessage<A, Snap>) -> Self {
        self.effect = effect;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn kind(&self) -> A::Kind {
        self.kind
    }

    pub fn target(&self) -> &S {
        &self.target
    }

    pub fn guards(&self) -> &[Guard<S, A, Snap>] {
        &self.guards
    }

    /// Codes of the attached guards, in evaluation order.
    pub fn guard_codes(&self) -> Vec<String> {
        self.guards.iter().map(|g| g.code().to_string()).collect()
    }

    /// Human-readable description of applying this rule.
    pub fn effect_message(&self, action: &A, snapshot: &Snap) -> String {
        match &self.effect {
            EffectMessage::Default => format!(
                "{} -> {} via {}",
                self.source.name(),
                self.target.name(),
                self.kind.name()
            ),
            EffectMessage::Fixed(message) => message.clone(),
            EffectMessage::Computed(describe) => describe(action, snapshot),
        }
    }
}

impl<S: Clone, A: Action, Snap> Clone for Rule<S, A, Snap> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            kind: self.kind,
            target: self.target.clone(),
            guards: self.guards.clone(),
            effect: self.effect.clone(),
        }
    }
}

impl<S: std::fmt::Debug, A: Action, Snap> std::fmt::Debug for Rule<S, A, Snap> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("source", &self.source)
            .field("kind", &self.kind)
            .field("target", &self.target)
            .field("guards", &self.guards)
            .finish()
    }
}
