//! Account Lifecycle
//!
//! This example walks an account through its lifecycle with a complete
//! transition table, guards and an audit log.
//!
//! Key concepts:
//! - Account states (Pending -> Active <-> Suspended, Deactivated -> Closed)
//! - Every (state, action) pair declared, terminal state included
//! - Guards that read the action payload and an entity snapshot
//! - Caller-owned persistence, engine-owned decisions
//!
//! Run with: RUST_LOG=verdict=debug cargo run --example account_lifecycle

use std::collections::HashMap;
use stillwater::effect::Effect;
use tracing_subscriber::EnvFilter;
use verdict::audit::InMemoryAuditLog;
use verdict::builder::{allow, BuildError, TableBuilder};
use verdict::core::{Action, ActionKind, Guard, State, TransitionOutcome};
use verdict::effects::apply_audited;
use verdict::engine::{EngineConfig, RejectionLogLevel, TransitionEngine};
use verdict::{action_enum, state_enum};

state_enum! {
    enum AccountState {
        Pending,
        Active,
        Suspended,
        Deactivated,
        Closed,
    }
    final: [Closed]
}

action_enum! {
    enum AccountAction => AccountKind {
        Approve,
        Suspend { reason: String },
        Reactivate,
        Deactivate,
        Close { reason: String },
    }
}

// What guards are allowed to see
struct Snapshot {
    balance_cents: i64,
}

type Engine = TransitionEngine<AccountState, AccountAction, Snapshot>;

fn reason(action: &AccountAction) -> &str {
    match action {
        AccountAction::Suspend { reason } | AccountAction::Close { reason } => reason,
        _ => "",
    }
}

fn needs_reason() -> Guard<AccountState, AccountAction, Snapshot> {
    Guard::new("MISSING_REASON", "A reason is required", |_, action: &AccountAction, _| {
        !reason(action).trim().is_empty()
    })
}

fn zero_balance() -> Guard<AccountState, AccountAction, Snapshot> {
    Guard::new(
        "BALANCE_OUTSTANDING",
        "Account balance must be zero",
        |_, _, snapshot: &Snapshot| snapshot.balance_cents == 0,
    )
}

fn build_engine() -> Result<Engine, BuildError> {
    use AccountKind::*;
    use AccountState::*;

    let mut builder = TableBuilder::<AccountState, AccountAction, Snapshot>::new()
        .config(EngineConfig::default().with_rejection_log_level(RejectionLogLevel::Info))
        .allow(allow(Pending, Approve, Active).message("Account has been approved and activated"))?
        .allow(
            allow(Active, Suspend, Suspended)
                .guard(needs_reason())
                .describe(|action, _| format!("Account suspended. Reason: {}", reason(action))),
        )?
        .allow(allow(Active, Deactivate, Deactivated).message("Account has been deactivated"))?
        .allow(allow(Suspended, Reactivate, Active).message("Account has been reactivated"))?
        .allow(allow(Deactivated, Reactivate, Active).message("Account has been reactivated"))?
        .forbid_all(Pending, [Suspend, Reactivate, Deactivate])?
        .forbid_all(Active, [Approve, Reactivate])?
        .forbid_all(Suspended, [Approve, Suspend, Deactivate])?
        .forbid_all(Deactivated, [Approve, Suspend, Deactivate])?
        .terminal(Closed)?;

    for from in [Pending, Active, Suspended, Deactivated] {
        builder = builder.allow(
            allow(from, Close, Closed)
                .guard(needs_reason())
                .guard(zero_balance())
                .describe(|action, _| format!("Account closed. Reason: {}", reason(action))),
        )?;
    }

    builder.build_universe()
}

fn print_outcome(outcome: &TransitionOutcome<AccountState>) {
    match outcome {
        TransitionOutcome::Applied { state, message } => {
            println!("  ✓ {} -> {message}", state.name())
        }
        TransitionOutcome::Rejected { code, message } => println!("  ✗ [{code}] {message}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    println!("=== Account Lifecycle Example ===\n");

    // An incomplete table never becomes an engine
    let gap = TableBuilder::<AccountState, AccountAction, Snapshot>::new()
        .allow(allow(
            AccountState::Pending,
            AccountKind::Approve,
            AccountState::Active,
        ))?
        .build_universe();
    if let Err(err) = gap {
        println!("Rejected partial table:\n  {err}\n");
    }

    let engine = build_engine()?;
    println!("Engine ready with {} table entries\n", engine.table().len());

    // Caller-owned storage; the engine never touches it
    let mut accounts: HashMap<&str, AccountState> = HashMap::new();
    accounts.insert("acc-1001", AccountState::Pending);
    let log = InMemoryAuditLog::new();

    let script = [
        ("Approve", AccountAction::Approve, 0),
        ("Suspend without reason", AccountAction::Suspend { reason: String::new() }, 0),
        ("Suspend for fraud", AccountAction::Suspend { reason: "fraud".to_string() }, 0),
        ("Approve while suspended", AccountAction::Approve, 0),
        ("Reactivate", AccountAction::Reactivate, 0),
        ("Close with balance", AccountAction::Close { reason: "moving".to_string() }, 2550),
        ("Close settled", AccountAction::Close { reason: "moving".to_string() }, 0),
        ("Close again", AccountAction::Close { reason: "dup".to_string() }, 0),
    ];

    for (label, action, balance_cents) in &script {
        let current = accounts.get("acc-1001").copied().unwrap_or(AccountState::Pending);
        println!("{label} ({} + {})", current.name(), action.kind().name());

        let snapshot = Snapshot {
            balance_cents: *balance_cents,
        };
        let outcome = apply_audited(&engine, "acc-1001", &current, action, &snapshot)
            .run(&log)
            .await?;
        print_outcome(&outcome);

        if let Some(next) = outcome.state() {
            accounts.insert("acc-1001", *next);
        }
    }

    let trail = log.trail("acc-1001");
    let path: Vec<&str> = trail.path().into_iter().map(|s| s.name()).collect();
    println!("\nDecisions recorded: {}", log.len());
    println!("Applied path: {}", path.join(" -> "));

    println!("\nTable manifest:\n{}", engine.table().manifest().to_json()?);

    println!("\nKey Takeaways:");
    println!("- Illegal actions are outcomes, not errors");
    println!("- The first failing guard names the rejection");
    println!("- Terminal states are declared, not implied");

    println!("\n=== Example Complete ===");
    Ok(())
}
