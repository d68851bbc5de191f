//! Property-based tests for the transition engine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

mod common;

use common::*;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use verdict::builder::allow;
use verdict::core::{Action, ActionKind, Finite, Guard, State};
use verdict::table::Lookup;
use verdict::ILLEGAL_TRANSITION;

fn arbitrary_state() -> impl Strategy<Value = AccountState> {
    prop::sample::select(AccountState::variants())
}

fn arbitrary_kind() -> impl Strategy<Value = AccountKind> {
    prop::sample::select(AccountKind::variants())
}

prop_compose! {
    fn arbitrary_action()(variant in 0..5u8, reason in "[a-z ]{0,8}") -> AccountAction {
        match variant {
            0 => AccountAction::Approve,
            1 => AccountAction::Suspend { reason },
            2 => AccountAction::Reactivate,
            3 => AccountAction::Deactivate,
            _ => AccountAction::Close { reason },
        }
    }
}

prop_compose! {
    fn arbitrary_snapshot()(balance_cents in -500i64..500, n in 0..100u32) -> AccountSnapshot {
        AccountSnapshot {
            account_id: format!("acc-{n}"),
            balance_cents,
        }
    }
}

proptest! {
    #[test]
    fn every_pair_is_decided(state in arbitrary_state(), kind in arbitrary_kind()) {
        let engine = engine();
        prop_assert!(engine.table().is_declared(&state, kind));
    }

    #[test]
    fn apply_is_total(
        state in arbitrary_state(),
        action in arbitrary_action(),
        snapshot in arbitrary_snapshot(),
    ) {
        let outcome = engine().apply(&state, &action, &snapshot);
        prop_assert!(outcome.is_ok());
        let outcome = outcome.unwrap();
        prop_assert!(outcome.is_applied() != outcome.is_rejected());
    }

    #[test]
    fn apply_is_deterministic(
        state in arbitrary_state(),
        action in arbitrary_action(),
        snapshot in arbitrary_snapshot(),
    ) {
        let engine = engine();
        let first = engine.apply(&state, &action, &snapshot).unwrap();
        let second = engine.apply(&state, &action, &snapshot).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn applied_targets_are_registered(
        state in arbitrary_state(),
        action in arbitrary_action(),
        snapshot in arbitrary_snapshot(),
    ) {
        let outcome = engine().apply(&state, &action, &snapshot).unwrap();
        if let Some(target) = outcome.state() {
            prop_assert_eq!(Some(*target), registered_target(state, action.kind()));
        }
    }

    #[test]
    fn unregistered_pairs_are_illegal(
        state in arbitrary_state(),
        action in arbitrary_action(),
        snapshot in arbitrary_snapshot(),
    ) {
        prop_assume!(registered_target(state, action.kind()).is_none());

        let outcome = engine().apply(&state, &action, &snapshot).unwrap();
        let expected = format!("{} cannot accept {}", state.name(), action.kind().name());
        prop_assert_eq!(outcome.code(), Some(ILLEGAL_TRANSITION));
        prop_assert_eq!(outcome.message(), expected.as_str());
    }

    #[test]
    fn first_failing_guard_short_circuits(
        action in arbitrary_action(),
        snapshot in arbitrary_snapshot(),
    ) {
        let calls = Arc::new(AtomicUsize::new(0));
        let spy_calls = Arc::clone(&calls);
        let kind = action.kind();

        let engine = AccountBuilder::new()
            .allow(
                allow(AccountState::Pending, kind, AccountState::Active)
                    .guard(Guard::new("FIRST", "first refused", |_, _, _| false))
                    .guard(Guard::new("SECOND", "second refused", move |_, _, _| {
                        spy_calls.fetch_add(1, Ordering::SeqCst);
                        false
                    })),
            )
            .unwrap()
            .build(&[AccountState::Pending], &[kind])
            .unwrap();

        let outcome = engine.apply(&AccountState::Pending, &action, &snapshot).unwrap();

        prop_assert_eq!(outcome.code(), Some("FIRST"));
        prop_assert_eq!(outcome.message(), "first refused");
        prop_assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn rejection_leaves_no_trace(
        state in arbitrary_state(),
        rejected in arbitrary_action(),
        follow_up in arbitrary_action(),
        snapshot in arbitrary_snapshot(),
    ) {
        let engine = engine();
        let before = engine.table().manifest();

        let outcome = engine.apply(&state, &rejected, &snapshot).unwrap();
        prop_assume!(outcome.is_rejected());

        prop_assert!(before.verify(engine.table()).is_ok());

        let after_rejection = engine.apply(&state, &follow_up, &snapshot).unwrap();
        let fresh = self::engine().apply(&state, &follow_up, &snapshot).unwrap();
        prop_assert_eq!(after_rejection, fresh);
    }

    #[test]
    fn lookup_agrees_with_available_actions(state in arbitrary_state(), kind in arbitrary_kind()) {
        let engine = engine();
        let listed = engine.available_actions(&state).contains(&kind);
        let allowed = matches!(engine.table().lookup(&state, kind), Lookup::Allowed(_));
        prop_assert_eq!(listed, allowed);
        prop_assert_eq!(allowed, registered_target(state, kind).is_some());
    }

    #[test]
    fn state_roundtrip_serialization(state in arbitrary_state()) {
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: AccountState = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(state, deserialized);
    }
}
