//! Builder for constructing a complete table and its engine.

use crate::builder::error::BuildError;
use crate::builder::rule::RuleBuilder;
use crate::core::{Action, Finite, Rule, State};
use crate::engine::{EngineConfig, TransitionEngine};
use crate::table::TransitionTable;

/// Fluent construction of a [`TransitionTable`], finished by a
/// completeness check that yields a [`TransitionEngine`].
pub struct TableBuilder<S, A: Action, Snap> {
    table: TransitionTable<S, A, Snap>,
    config: EngineConfig,
}

impl<S: State, A: Action, Snap> TableBuilder<S, A, Snap> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            table: TransitionTable::new(),
            config: EngineConfig::default(),
        }
    }

    /// Add a rule using a builder.
    /// Returns an error if the builder fails validation or the pair is taken.
    pub fn allow(mut self, rule: RuleBuilder<S, A, Snap>) -> Result<Self, BuildError> {
        self.table.insert(rule.build()?)?;
        Ok(self)
    }

    /// Add a pre-built rule.
    pub fn rule(mut self, rule: Rule<S, A, Snap>) -> Result<Self, BuildError> {
        self.table.insert(rule)?;
        Ok(self)
    }

    /// Explicitly forbid `kind` from `state`.
    pub fn forbid(mut self, state: S, kind: A::Kind) -> Result<Self, BuildError> {
        self.table.forbid(state, kind)?;
        Ok(self)
    }

    /// Forbid each of `kinds` from `state`.
    pub fn forbid_all(
        mut self,
        state: S,
        kinds: impl IntoIterator<Item = A::Kind>,
    ) -> Result<Self, BuildError> {
        self.table.forbid_all(&state, kinds)?;
        Ok(self)
    }

    /// Forbid every declared kind from `state`, modelling a terminal state.
    pub fn terminal(self, state: S) -> Result<Self, BuildError>
    where
        A::Kind: Finite,
    {
        let kinds = <A::Kind as Finite>::variants().iter().copied();
        self.forbid_all(state, kinds)
    }

    /// Set the engine configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// The table without a completeness check.
    pub fn into_table(self) -> TransitionTable<S, A, Snap> {
        self.table
    }

    /// Check completeness over `states × kinds` and build the engine.
    pub fn build(
        self,
        states: &[S],
        kinds: &[A::Kind],
    ) -> Result<TransitionEngine<S, A, Snap>, BuildError> {
        let engine = TransitionEngine::new(self.table, states, kinds)?;
        Ok(engine.with_config(self.config))
    }

    /// Check completeness over every declared state and kind and build the engine.
    pub fn build_universe(self) -> Result<TransitionEngine<S, A, Snap>, BuildError>
    where
        S: Finite,
        A::Kind: Finite,
    {
        self.build(S::variants(), <A::Kind as Finite>::variants())
    }
}

impl<S: State, A: Action, Snap> Default for TableBuilder<S, A, Snap> {
    fn default() -> Self {
        Self::new()
    }
}
