// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Runs a table in its own task.
use anyhow::Result;
use log::{error, info};
use std::time::Duration;
use tokio::{
    sync::{broadcast, mpsc, oneshot},
    time::{self, Instant},
};

use texas_core::{
    Action, AllowedActions, CardSource, Chips, EngineError, Player, PlayerId, Settlement, Stage,
    Table, TableConfig, TableEvent, TableId, TableStatus, poker::Card,
};

type Reply<T> = oneshot::Sender<Result<T, EngineError>>;

/// Handle to a table running in a tokio task.
#[derive(Debug, Clone)]
pub struct TableHandle {
    /// The table id.
    table_id: TableId,
    /// Channel for sending commands.
    commands_tx: mpsc::Sender<TableCommand>,
}

/// Command for the table task.
#[derive(Debug)]
enum TableCommand {
    /// Join the table.
    Join {
        player_id: PlayerId,
        balance: Chips,
        resp_tx: Reply<()>,
    },
    /// Leave the table.
    Leave {
        player_id: PlayerId,
        resp_tx: Reply<Player>,
    },
    /// Place the button.
    SetButton {
        player_id: PlayerId,
        resp_tx: Reply<()>,
    },
    /// Start a hand.
    StartHand { resp_tx: Reply<()> },
    /// Query the legal actions.
    Allowed {
        player_id: PlayerId,
        resp_tx: Reply<AllowedActions>,
    },
    /// A player action.
    Act {
        player_id: PlayerId,
        action: Action,
        resp_tx: Reply<()>,
    },
    /// Pause the hand.
    Pause { resp_tx: Reply<()> },
    /// Resume the hand.
    Resume { resp_tx: Reply<()> },
    /// Take a snapshot of the table.
    Snapshot {
        resp_tx: oneshot::Sender<TableSnapshot>,
    },
}

/// A copy of the table state.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    /// The table id.
    pub table_id: TableId,
    /// The table status.
    pub status: TableStatus,
    /// The current or last stage.
    pub stage: Stage,
    /// The revealed community cards.
    pub board: Vec<Card>,
    /// The seated players in table order.
    pub players: Vec<Player>,
    /// The player holding the right to act.
    pub active: Option<PlayerId>,
    /// The button player.
    pub button: Option<PlayerId>,
    /// Number of hands started.
    pub hands_played: u64,
    /// Chips in the balances and in the ledger.
    pub chips: Chips,
    /// The last hand settlement.
    pub settlement: Option<Settlement>,
}

impl TableSnapshot {
    fn new(table: &Table) -> Self {
        Self {
            table_id: table.table_id(),
            status: table.status(),
            stage: table.stage(),
            board: table.board(),
            players: table.players().cloned().collect(),
            active: table.active_player(),
            button: table.button(),
            hands_played: table.hands_played(),
            chips: table.chips_in_play(),
            settlement: table.settlement().cloned(),
        }
    }

    /// Returns a seated player.
    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.player_id == player_id)
    }
}

impl TableHandle {
    /// Spawns a task running a new table.
    ///
    /// The table events are sent on the returned channel, the task calls
    /// [Table::tick] every `tick` period and stops on shutdown or when all
    /// the handles have been dropped.
    pub fn new<C>(
        config: TableConfig,
        cards: C,
        tick: Duration,
        shutdown_broadcast_rx: broadcast::Receiver<()>,
        shutdown_complete_tx: mpsc::Sender<()>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<TableEvent>)>
    where
        C: CardSource + Send + 'static,
    {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let table = Table::new(config, cards, move |event: TableEvent| {
            // The receiver may have gone away.
            let _ = events_tx.send(event);
        })?;

        let table_id = table.table_id();
        let (commands_tx, commands_rx) = mpsc::channel(128);

        let mut task = TableTask {
            table,
            tick,
            commands_rx,
            shutdown_broadcast_rx,
            _shutdown_complete_tx: shutdown_complete_tx,
        };

        tokio::spawn(async move {
            if let Err(err) = task.run().await {
                error!("Table {table_id} error {err}");
            }

            info!("Table task for table {table_id} stopped");
        });

        Ok((
            Self {
                table_id,
                commands_tx,
            },
            events_rx,
        ))
    }

    /// The table id.
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// A player joins the table.
    pub async fn join(&self, player_id: PlayerId, balance: Chips) -> Result<()> {
        self.request(|resp_tx| TableCommand::Join {
            player_id,
            balance,
            resp_tx,
        })
        .await
    }

    /// A player leaves the table.
    pub async fn leave(&self, player_id: PlayerId) -> Result<Player> {
        self.request(|resp_tx| TableCommand::Leave { player_id, resp_tx })
            .await
    }

    /// Places the button for the next hand.
    pub async fn set_button(&self, player_id: PlayerId) -> Result<()> {
        self.request(|resp_tx| TableCommand::SetButton { player_id, resp_tx })
            .await
    }

    /// Starts a new hand.
    pub async fn start_hand(&self) -> Result<()> {
        self.request(|resp_tx| TableCommand::StartHand { resp_tx })
            .await
    }

    /// The legal actions for the player to act.
    pub async fn allowed_actions(&self, player_id: PlayerId) -> Result<AllowedActions> {
        self.request(|resp_tx| TableCommand::Allowed { player_id, resp_tx })
            .await
    }

    /// A player takes an action.
    pub async fn act(&self, player_id: PlayerId, action: Action) -> Result<()> {
        self.request(|resp_tx| TableCommand::Act {
            player_id,
            action,
            resp_tx,
        })
        .await
    }

    /// Pauses the running hand.
    pub async fn pause(&self) -> Result<()> {
        self.request(|resp_tx| TableCommand::Pause { resp_tx }).await
    }

    /// Resumes the paused hand.
    pub async fn resume(&self) -> Result<()> {
        self.request(|resp_tx| TableCommand::Resume { resp_tx }).await
    }

    /// Takes a snapshot of the table state.
    pub async fn snapshot(&self) -> Result<TableSnapshot> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.commands_tx
            .send(TableCommand::Snapshot { resp_tx })
            .await?;
        Ok(resp_rx.await?)
    }

    async fn request<T, F>(&self, command: F) -> Result<T>
    where
        F: FnOnce(Reply<T>) -> TableCommand,
    {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.commands_tx.send(command(resp_tx)).await?;
        Ok(resp_rx.await??)
    }
}

struct TableTask {
    /// The table state.
    table: Table,
    /// Tick period.
    tick: Duration,
    /// Channel for receiving table commands.
    commands_rx: mpsc::Receiver<TableCommand>,
    /// Channel for listening shutdown notification.
    shutdown_broadcast_rx: broadcast::Receiver<()>,
    /// Sender that drops when this table is done.
    _shutdown_complete_tx: mpsc::Sender<()>,
}

impl TableTask {
    async fn run(&mut self) -> Result<()> {
        let mut ticks = time::interval(self.tick);
        let mut last_tick = Instant::now();

        loop {
            tokio::select! {
                // Host is shutting down exit this handler.
                _ = self.shutdown_broadcast_rx.recv() => break Ok(()),
                now = ticks.tick() => {
                    // Errors have been emitted as events.
                    let _ = self.table.tick(now - last_tick);
                    last_tick = now;
                }
                res = self.commands_rx.recv() => match res {
                    Some(command) => self.handle(command),
                    None => break Ok(()),
                },
            }
        }
    }

    fn handle(&mut self, command: TableCommand) {
        let table = &mut self.table;
        match command {
            TableCommand::Join {
                player_id,
                balance,
                resp_tx,
            } => {
                let _ = resp_tx.send(table.join(player_id, balance));
            }
            TableCommand::Leave { player_id, resp_tx } => {
                let _ = resp_tx.send(table.leave(player_id));
            }
            TableCommand::SetButton { player_id, resp_tx } => {
                let _ = resp_tx.send(table.set_button(player_id));
            }
            TableCommand::StartHand { resp_tx } => {
                let _ = resp_tx.send(table.start_hand());
            }
            TableCommand::Allowed { player_id, resp_tx } => {
                let _ = resp_tx.send(table.allowed_actions(player_id));
            }
            TableCommand::Act {
                player_id,
                action,
                resp_tx,
            } => {
                let _ = resp_tx.send(table.act(player_id, action));
            }
            TableCommand::Pause { resp_tx } => {
                let _ = resp_tx.send(table.pause());
            }
            TableCommand::Resume { resp_tx } => {
                let _ = resp_tx.send(table.resume());
            }
            TableCommand::Snapshot { resp_tx } => {
                let _ = resp_tx.send(TableSnapshot::new(table));
            }
        }
    }
}
