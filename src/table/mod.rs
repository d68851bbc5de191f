//! The authoritative `(state, action kind)` mapping.
//!
//! Every pair is either an allowed [`Rule`] with a fixed target or an
//! explicit not-allowed marker. A pair with neither is a gap, and
//! [`TransitionTable::assert_complete`] refuses tables with gaps so
//! that terminal states are modelled, not merely omitted.

pub mod error;

pub use error::{ConfigError, MissingPair};

use crate::core::{Action, ActionKind, Finite, Guard, Rule, State};
use crate::manifest::TableManifest;
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

enum Entry<S, A: Action, Snap> {
    Allowed(Rule<S, A, Snap>),
    Forbidden,
}

/// Answer to "what happens if this kind arrives in this state".
pub enum Lookup<'a, S, A: Action, Snap> {
    /// The rule that decides the transition.
    Allowed(&'a Rule<S, A, Snap>),
    /// No transition is allowed from this state for this kind.
    NotAllowed,
}

impl<'a, S, A: Action, Snap> Lookup<'a, S, A, Snap> {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }

    pub fn rule(&self) -> Option<&'a Rule<S, A, Snap>> {
        match self {
            Self::Allowed(rule) => Some(*rule),
            Self::NotAllowed => None,
        }
    }
}

impl<S: std::fmt::Debug, A: Action, Snap> std::fmt::Debug for Lookup<'_, S, A, Snap> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allowed(rule) => f.debug_tuple("Allowed").field(rule).finish(),
            Self::NotAllowed => f.write_str("NotAllowed"),
        }
    }
}

/// Borrowed view of one table entry, yielded in registration order.
pub enum EntryView<'a, S, A: Action, Snap> {
    Allowed(&'a Rule<S, A, Snap>),
    Forbidden { state: &'a S, kind: A::Kind },
}

/// Mapping from `(state, action kind)` to an allowed rule or an explicit
/// not-allowed marker.
///
/// Tables are filled once, checked with [`assert_complete`], and then
/// only read.
///
/// [`assert_complete`]: TransitionTable::assert_complete
pub struct TransitionTable<S, A: Action, Snap> {
    entries: HashMap<(S, A::Kind), Entry<S, A, Snap>>,
    order: Vec<(S, A::Kind)>,
}

impl<S: State, A: Action, Snap> Default for TransitionTable<S, A, Snap> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, A: Action, Snap> TransitionTable<S, A, Snap> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register `source --kind--> target` guarded by `guards` (in order).
    pub fn register(
        &mut self,
        source: S,
        kind: A::Kind,
        target: S,
        guards: Vec<Guard<S, A, Snap>>,
    ) -> Result<(), ConfigError> {
        self.insert(Rule::new(source, kind, target).with_guards(guards))
    }

    /// Register a fully configured rule.
    pub fn insert(&mut self, rule: Rule<S, A, Snap>) -> Result<(), ConfigError> {
        let key = (rule.source().clone(), rule.kind());
        self.put(key, Entry::Allowed(rule))
    }

    /// Mark `kind` as explicitly not allowed from `source`.
    pub fn forbid(&mut self, source: S, kind: A::Kind) -> Result<(), ConfigError> {
        self.put((source, kind), Entry::Forbidden)
    }

    /// Forbid every kind in `kinds` from `source`, typically for a terminal state.
    pub fn forbid_all(
        &mut self,
        source: &S,
        kinds: impl IntoIterator<Item = A::Kind>,
    ) -> Result<(), ConfigError> {
        for kind in kinds {
            self.forbid(source.clone(), kind)?;
        }
        Ok(())
    }

    fn put(&mut self, key: (S, A::Kind), entry: Entry<S, A, Snap>) -> Result<(), ConfigError> {
        if self.entries.contains_key(&key) {
            return Err(ConfigError::DuplicateRule {
                state: key.0.name().to_string(),
                kind: key.1.name().to_string(),
            });
        }
        self.order.push(key.clone());
        self.entries.insert(key, entry);
        Ok(())
    }

    /// Find the rule for `(source, kind)`.
    ///
    /// Both an explicit marker and a gap answer [`Lookup::NotAllowed`];
    /// gaps are caught earlier by the completeness check.
    pub fn lookup(&self, source: &S, kind: A::Kind) -> Lookup<'_, S, A, Snap> {
        match self.entries.get(&(source.clone(), kind)) {
            Some(Entry::Allowed(rule)) => Lookup::Allowed(rule),
            Some(Entry::Forbidden) | None => Lookup::NotAllowed,
        }
    }

    /// Whether `(source, kind)` has an explicit entry of either sort.
    pub fn is_declared(&self, source: &S, kind: A::Kind) -> bool {
        self.entries.contains_key(&(source.clone(), kind))
    }

    /// Verify that every pair of `states × kinds` has an entry and that
    /// no final state allows a transition.
    ///
    /// All gaps are collected, states outer and kinds inner, so one
    /// failed start-up reports everything that needs fixing. An allowed
    /// rule out of a final state is reported first, in registration order.
    pub fn assert_complete(&self, states: &[S], kinds: &[A::Kind]) -> Result<(), ConfigError> {
        self.assert_final_states_closed()?;

        let checks: Vec<Validation<(), NonEmptyVec<MissingPair>>> = states
            .iter()
            .flat_map(|state| {
                kinds.iter().map(move |kind| {
                    if self.is_declared(state, *kind) {
                        Validation::success(())
                    } else {
                        Validation::fail(MissingPair::new(state.name(), kind.name()))
                    }
                })
            })
            .collect();

        match Validation::all_vec(checks) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(missing) => Err(ConfigError::IncompleteTable {
                missing: missing.iter().cloned().collect(),
            }),
        }
    }

    fn assert_final_states_closed(&self) -> Result<(), ConfigError> {
        let escape = self.entries().find_map(|entry| match entry {
            EntryView::Allowed(rule) if rule.source().is_final() => Some(rule),
            _ => None,
        });

        match escape {
            Some(rule) => Err(ConfigError::RuleFromFinalState {
                state: rule.source().name().to_string(),
                kind: rule.kind().name().to_string(),
                target: rule.target().name().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// [`assert_complete`](Self::assert_complete) over every declared variant.
    pub fn assert_complete_universe(&self) -> Result<(), ConfigError>
    where
        S: Finite,
        A::Kind: Finite,
    {
        self.assert_complete(S::variants(), <A::Kind as Finite>::variants())
    }

    /// Kinds with an allowed rule from `source`, in registration order.
    pub fn allowed_kinds(&self, source: &S) -> Vec<A::Kind> {
        self.order
            .iter()
            .filter(|(state, _)| state == source)
            .filter(|key| matches!(self.entries.get(*key), Some(Entry::Allowed(_))))
            .map(|(_, kind)| *kind)
            .collect()
    }

    /// Every entry in registration order.
    pub fn entries(&self) -> impl Iterator<Item = EntryView<'_, S, A, Snap>> + '_ {
        self.order.iter().filter_map(move |key| {
            self.entries.get(key).map(|entry| match entry {
                Entry::Allowed(rule) => EntryView::Allowed(rule),
                Entry::Forbidden => EntryView::Forbidden {
                    state: &key.0,
                    kind: key.1,
                },
            })
        })
    }

    /// Export every entry for review or drift checks.
    pub fn manifest(&self) -> TableManifest<S, A::Kind> {
        TableManifest::from_table(self)
    }

    /// Number of entries, allowed and forbidden.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
