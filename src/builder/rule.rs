//! Builder for constructing transition rules.

use crate::builder::error::BuildError;
use crate::core::rule::EffectMessage;
use crate::core::{Action, Guard, Rule, State};
use std::sync::Arc;

/// Builder for constructing rules with a fluent API.
pub struct RuleBuilder<S, A: Action, Snap> {
    from: Option<S>,
    kind: Option<A::Kind>,
    to: Option<S>,
    guards: Vec<Guard<S, A, Snap>>,
    effect: EffectMessage<A, Snap>,
}

impl<S: State, A: Action, Snap> RuleBuilder<S, A, Snap> {
    /// Create a new rule builder.
    pub fn new() -> Self {
        Self {
            from: None,
            kind: None,
            to: None,
            guards: Vec::new(),
            effect: EffectMessage::Default,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: S) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the action kind (required).
    pub fn on(mut self, kind: A::Kind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Add a guard (optional, repeatable; evaluated in call order).
    pub fn guard(mut self, guard: Guard<S, A, Snap>) -> Self {
        self.guards.push(guard);
        self
    }

    /// Add a guard from a closure.
    pub fn when<F>(self, code: impl Into<String>, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&S, &A, &Snap) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(code, message, predicate))
    }

    /// Set a fixed effect message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.effect = EffectMessage::Fixed(message.into());
        self
    }

    /// Compute the effect message from the action payload and snapshot.
    pub fn describe<F>(mut self, describe: F) -> Self
    where
        F: Fn(&A, &Snap) -> String + Send + Sync + 'static,
    {
        self.effect = EffectMessage::Computed(Arc::new(describe));
        self
    }

    /// Build the rule.
    pub fn build(self) -> Result<Rule<S, A, Snap>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let kind = self.kind.ok_or(BuildError::MissingKind)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        Ok(Rule::new(from, kind, to)
            .with_guards(self.guards)
            .with_effect(self.effect))
    }
}

impl<S: State, A: Action, Snap> Default for RuleBuilder<S, A, Snap> {
    fn default() -> Self {
        Self::new()
    }
}
