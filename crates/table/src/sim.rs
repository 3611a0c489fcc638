// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Runs tables of bots.
use ahash::AHashMap;
use anyhow::{Result, bail};
use log::{error, info, warn};
use parking_lot::Mutex;
use rand::prelude::*;
use std::{fmt, sync::Arc, time::Duration};
use tokio::sync::{broadcast, mpsc};

use texas_core::{
    Action, Chips, ErrorKind, PlayerId, ShuffledDeck, TableConfig, TableEvent, TableId,
};

use crate::{
    bot::{RandomStrategy, Strategy},
    host::TableHandle,
};

/// Simulation configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of tables.
    pub tables: usize,
    /// Players per table.
    pub players: usize,
    /// Hands per table.
    pub hands: u64,
    /// Starting balance.
    pub balance: Chips,
    /// Minimum bet.
    pub min_bet: Chips,
    /// Seed for reproducible runs.
    pub seed: Option<u64>,
    /// Thinking time before a bot is timed out.
    pub thinking_time: Duration,
}

/// The outcome of a table.
#[derive(Debug, Clone)]
pub struct TableReport {
    /// The table id.
    pub table_id: TableId,
    /// Hands played.
    pub hands: u64,
    /// Hands aborted and voided.
    pub aborted: u64,
    /// Players left with chips.
    pub players_left: usize,
    /// Chips on the table at the end.
    pub chips: Chips,
    /// The player with most chips.
    pub leader: Option<(PlayerId, Chips)>,
}

impl fmt::Display for TableReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "table {} hands {} aborted {} players {} chips {}",
            self.table_id, self.hands, self.aborted, self.players_left, self.chips
        )?;

        if let Some((player_id, chips)) = self.leader {
            write!(f, " leader {player_id} with {chips}")?;
        }

        Ok(())
    }
}

/// Runs the simulation, returns a report for each table.
pub async fn run(config: Config) -> Result<Vec<TableReport>> {
    if config.players < 2 {
        bail!("At least 2 players required, got {}", config.players);
    }

    let mut seed_rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let reports = Arc::new(Mutex::new(Vec::with_capacity(config.tables)));
    let (shutdown_broadcast_tx, _) = broadcast::channel(1);
    let (shutdown_complete_tx, mut shutdown_complete_rx) = mpsc::channel(1);

    let mut tasks = Vec::with_capacity(config.tables);
    for idx in 0..config.tables {
        let table_config = TableConfig {
            min_bet: config.min_bet,
            thinking_time: config.thinking_time,
            max_players: config.players.min(TableConfig::MAX_PLAYERS),
        };

        let deck = ShuffledDeck::with_rng(StdRng::seed_from_u64(seed_rng.random()));
        let (handle, events_rx) = TableHandle::new(
            table_config,
            deck,
            Duration::from_secs(1),
            shutdown_broadcast_tx.subscribe(),
            shutdown_complete_tx.clone(),
        )?;

        let config = config.clone();
        let reports = reports.clone();
        let bots_seed = seed_rng.random::<u64>();

        tasks.push(tokio::spawn(async move {
            match play_table(&config, handle, events_rx, bots_seed).await {
                Ok(report) => {
                    info!("{report}");
                    reports.lock().push(report);
                }
                Err(err) => error!("Table {idx} error: {err}"),
            }
        }));
    }

    for task in tasks {
        task.await?;
    }

    // Signal tables to shutdown and wait for tasks to complete.
    drop(shutdown_broadcast_tx);
    drop(shutdown_complete_tx);
    let _ = shutdown_complete_rx.recv().await;

    let mut reports = std::mem::take(&mut *reports.lock());
    if reports.len() != config.tables {
        bail!("{} of {} tables failed", config.tables - reports.len(), config.tables);
    }

    reports.sort_by_key(|r| r.table_id);
    Ok(reports)
}

async fn play_table(
    config: &Config,
    handle: TableHandle,
    mut events_rx: mpsc::UnboundedReceiver<TableEvent>,
    seed: u64,
) -> Result<TableReport> {
    let mut bots = AHashMap::new();
    for idx in 0..config.players.min(TableConfig::MAX_PLAYERS) {
        let player_id = PlayerId::new(idx as u64 + 1);
        handle.join(player_id, config.balance).await?;
        bots.insert(player_id, RandomStrategy::new(seed.wrapping_add(idx as u64)));
    }

    let total = config.balance * bots.len() as u32;
    let mut hands = 0;
    let mut aborted = 0;

    while hands < config.hands {
        let snapshot = handle.snapshot().await?;
        if snapshot.players.len() < 2 {
            break;
        }

        handle.start_hand().await?;
        hands += 1;

        loop {
            let Some(event) = events_rx.recv().await else {
                bail!("Table {} closed", handle.table_id());
            };

            match event {
                TableEvent::PreAction { player_id, .. } => {
                    let Some(bot) = bots.get_mut(&player_id) else {
                        bail!("No bot for player {player_id}");
                    };

                    let snapshot = handle.snapshot().await?;
                    let Some(player) = snapshot.player(player_id) else {
                        bail!("Player {player_id} not seated");
                    };

                    // The right to act may have moved on timeout.
                    let Ok(req) = handle.allowed_actions(player_id).await else {
                        continue;
                    };

                    let action = bot.execute(&req, player, &snapshot.board);
                    if let Err(err) = handle.act(player_id, action).await {
                        warn!("Player {player_id} {action:?} rejected: {err}");
                        let _ = handle.act(player_id, Action::Fold).await;
                    }
                }
                TableEvent::Settled { .. } => break,
                TableEvent::Error { kind, .. } if kind != ErrorKind::IllegalAction => {
                    aborted += 1;
                    break;
                }
                _ => {}
            }
        }

        // Busted players leave the table.
        let snapshot = handle.snapshot().await?;
        for player in snapshot.players.iter().filter(|p| p.balance.is_zero()) {
            handle.leave(player.player_id).await?;
        }

        if snapshot.chips != total {
            bail!(
                "Table {} chips mismatch: {} expected {}",
                handle.table_id(),
                snapshot.chips,
                total
            );
        }
    }

    let snapshot = handle.snapshot().await?;
    Ok(TableReport {
        table_id: handle.table_id(),
        hands,
        aborted,
        players_left: snapshot.players.len(),
        chips: snapshot.chips,
        leader: snapshot
            .players
            .iter()
            .max_by_key(|p| p.balance)
            .map(|p| (p.player_id, p.balance)),
    })
}
