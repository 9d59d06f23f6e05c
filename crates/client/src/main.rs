//! Terminal client entry point.
//!
//! Runs the battle screen against the in-memory scripted ledger, which stands
//! in for the on-chain program during offline play. Point the builder at a
//! real [`client_blockchain_core::LedgerClient`] implementation to play on a
//! network.

use std::sync::Arc;

use anyhow::Result;

use client_blockchain_core::mock::{MockLedger, MockWorld, demo_world, entries};
use client_bootstrap::{ClientConfig, SessionBuilder};
use client_frontend_cli::{CliApp, TuiStage};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // The terminal UI owns stdout; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    let ledger = MockLedger::new(scripted_world(config.battle_level));

    let stage = Arc::new(TuiStage::new(config.replay_timing().float_lifetime));
    let setup = SessionBuilder::new(config, Arc::new(ledger.clone()), Arc::new(ledger))
        .start_battle(stage.clone())
        .await?;

    CliApp::new(setup, stage).run().await
}

/// The demo world plus a short scripted campaign: two rounds of exchanges,
/// then the killing blow. Outcomes come from the script, never from the
/// client, exactly as they would come from the chain.
fn scripted_world(level: u32) -> MockWorld {
    let mut world = demo_world(level);

    world.script_turn(vec![
        entries::damage(1, 0, 0, false, 30, false),
        entries::damage(1, 1, 1, true, 45, false),
        entries::buff(1, 2, 2, 6, 10, false),
        entries::damage(1, 0, 0, false, 25, true),
        entries::miss(1, 1, 2, true),
    ]);

    world.script_turn(vec![
        entries::damage(1, 0, 0, true, 60, false),
        entries::debuff(1, 2, 1, 8, 10, false),
        entries::heal(1, 1, 0, 20, false),
        entries::damage(1, 2, 1, false, 35, true),
    ]);

    world.script_turn(vec![
        entries::damage(1, 0, 0, false, 55, false),
        entries::damage(1, 1, 1, true, 70, false),
        entries::damage(1, 2, 1, false, 90, false),
        entries::victory(1, "0xcafe"),
    ]);

    world
}
