//! Account lifecycle shared by the integration tests.

#![allow(dead_code)]

use verdict::builder::{allow, RuleBuilder, TableBuilder};
use verdict::core::{Finite, Guard};
use verdict::engine::TransitionEngine;
use verdict::{action_enum, state_enum};

state_enum! {
    pub enum AccountState {
        Pending,
        Active,
        Suspended,
        Deactivated,
        Closed,
    }
    final: [Closed]
}

action_enum! {
    pub enum AccountAction => AccountKind {
        Approve,
        Suspend { reason: String },
        Reactivate,
        Deactivate,
        Close { reason: String },
    }
}

/// What the guards may inspect about an account.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccountSnapshot {
    pub account_id: String,
    pub balance_cents: i64,
}

impl AccountSnapshot {
    pub fn settled(account_id: &str) -> Self {
        Self {
            account_id: account_id.to_string(),
            balance_cents: 0,
        }
    }
}

pub type AccountBuilder = TableBuilder<AccountState, AccountAction, AccountSnapshot>;
pub type AccountEngine = TransitionEngine<AccountState, AccountAction, AccountSnapshot>;
type AccountRule = RuleBuilder<AccountState, AccountAction, AccountSnapshot>;

pub fn suspend(reason: &str) -> AccountAction {
    AccountAction::Suspend {
        reason: reason.to_string(),
    }
}

pub fn close(reason: &str) -> AccountAction {
    AccountAction::Close {
        reason: reason.to_string(),
    }
}

fn reason_of(action: &AccountAction) -> &str {
    match action {
        AccountAction::Suspend { reason } | AccountAction::Close { reason } => reason,
        AccountAction::Approve | AccountAction::Reactivate | AccountAction::Deactivate => "",
    }
}

pub fn requires_reason() -> Guard<AccountState, AccountAction, AccountSnapshot> {
    Guard::new("MISSING_REASON", "A reason is required", |_, action: &AccountAction, _| {
        !reason_of(action).trim().is_empty()
    })
}

pub fn settled_balance() -> Guard<AccountState, AccountAction, AccountSnapshot> {
    Guard::new(
        "BALANCE_OUTSTANDING",
        "Account balance must be zero",
        |_, _, snapshot: &AccountSnapshot| snapshot.balance_cents == 0,
    )
    .message_with(|_, _, snapshot: &AccountSnapshot| {
        format!(
            "Account {} still holds {} cents",
            snapshot.account_id, snapshot.balance_cents
        )
    })
}

fn closing(from: AccountState) -> AccountRule {
    allow(from, AccountKind::Close, AccountState::Closed)
        .guard(requires_reason())
        .guard(settled_balance())
        .describe(|action, _| format!("Account closed. Reason: {}", reason_of(action)))
}

/// Every allowed edge of the lifecycle.
pub fn rules() -> Vec<AccountRule> {
    vec![
        allow(AccountState::Pending, AccountKind::Approve, AccountState::Active)
            .message("Account has been approved and activated"),
        closing(AccountState::Pending),
        allow(AccountState::Active, AccountKind::Suspend, AccountState::Suspended)
            .guard(requires_reason())
            .describe(|action, _| format!("Account suspended. Reason: {}", reason_of(action))),
        allow(AccountState::Active, AccountKind::Deactivate, AccountState::Deactivated)
            .message("Account has been deactivated"),
        closing(AccountState::Active),
        allow(AccountState::Suspended, AccountKind::Reactivate, AccountState::Active)
            .message("Account has been reactivated"),
        closing(AccountState::Suspended),
        allow(AccountState::Deactivated, AccountKind::Reactivate, AccountState::Active)
            .message("Account has been reactivated"),
        closing(AccountState::Deactivated),
    ]
}

/// Every explicitly refused pair, including all of `Closed`.
pub fn forbidden() -> Vec<(AccountState, AccountKind)> {
    use AccountKind::*;
    use AccountState::*;

    let mut pairs = vec![
        (Pending, Suspend),
        (Pending, Reactivate),
        (Pending, Deactivate),
        (Active, Approve),
        (Active, Reactivate),
        (Suspended, Approve),
        (Suspended, Suspend),
        (Suspended, Deactivate),
        (Deactivated, Approve),
        (Deactivated, Suspend),
        (Deactivated, Deactivate),
    ];
    pairs.extend(AccountKind::variants().iter().map(|kind| (Closed, *kind)));
    pairs
}

/// The lifecycle table, leaving out `skip` if given.
pub fn builder_without(skip: Option<(AccountState, AccountKind)>) -> AccountBuilder {
    let mut builder = AccountBuilder::new();
    for rule in rules() {
        let rule = rule.build().unwrap();
        if skip == Some((*rule.source(), rule.kind())) {
            continue;
        }
        builder = builder.rule(rule).unwrap();
    }
    for (state, kind) in forbidden() {
        if skip == Some((state, kind)) {
            continue;
        }
        builder = builder.forbid(state, kind).unwrap();
    }
    builder
}

pub fn engine() -> AccountEngine {
    builder_without(None).build_universe().unwrap()
}

/// Target registered for `(state, kind)`, written out independently of the table.
pub fn registered_target(state: AccountState, kind: AccountKind) -> Option<AccountState> {
    use AccountKind::*;
    use AccountState::*;

    match (state, kind) {
        (Pending, Approve) => Some(Active),
        (Active, Suspend) => Some(Suspended),
        (Active, Deactivate) => Some(Deactivated),
        (Suspended, Reactivate) | (Deactivated, Reactivate) => Some(Active),
        (Closed, _) => None,
        (_, Close) => Some(Closed),
        _ => None,
    }
}
