// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
use clap::Parser;
use log::{error, info};
use std::time::Duration;

use texas_table::{core::Chips, sim};

#[derive(Debug, Parser)]
struct Cli {
    /// Number of tables.
    #[clap(long, short, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..=1000))]
    tables: u16,
    /// Number of players per table.
    #[clap(long, short, default_value_t = 6, value_parser = clap::value_parser!(u8).range(2..=10))]
    players: u8,
    /// Hands to play per table.
    #[clap(long, default_value_t = 100)]
    hands: u64,
    /// Players starting balance.
    #[clap(long, short, default_value_t = 10_000)]
    balance: u32,
    /// The minimum bet.
    #[clap(long, short, default_value_t = 100)]
    min_bet: u32,
    /// Seed for a reproducible run.
    #[clap(long, short)]
    seed: Option<u64>,
    /// Thinking time in seconds.
    #[clap(long, default_value_t = 30)]
    thinking_time: u64,
}

#[tokio::main]
async fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let config = sim::Config {
        tables: cli.tables as usize,
        players: cli.players as usize,
        hands: cli.hands,
        balance: Chips::new(cli.balance),
        min_bet: Chips::new(cli.min_bet),
        seed: cli.seed,
        thinking_time: Duration::from_secs(cli.thinking_time),
    };

    match sim::run(config).await {
        Ok(reports) => {
            let hands = reports.iter().map(|r| r.hands).sum::<u64>();
            info!("Played {hands} hands on {} tables", reports.len());
        }
        Err(e) => error!("{e}"),
    }
}
