// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! The hand state machine.
//!
//! A [Table] drives a hand from the blinds to the settlement: pre-flop, flop,
//! turn and river betting. After every action the table first checks if the
//! hand has ended, then if the stage betting is complete, otherwise the right
//! to act moves to the next player who can act.
use log::{debug, error, info, warn};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Range, time::Duration};

use crate::{
    action::{Action, ActionKind, ActionLog, AllowedActions, PlayerAction},
    dealer::CardSource,
    error::{EngineError, Result},
    events::{EventSink, TableEvent},
    player::{Player, PlayerStatus},
    poker::{Card, Chips, HandValue, PlayerId, Stage, TableId},
    ring::Ring,
    settlement::{Ledger, Settlement, settle},
    validator::Validator,
};

/// Table configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// The minimum bet, also the big blind.
    pub min_bet: Chips,
    /// The time a player has to act.
    pub thinking_time: Duration,
    /// The number of seats.
    pub max_players: usize,
}

impl TableConfig {
    /// Most players a hand supports.
    pub const MAX_PLAYERS: usize = 10;

    /// Checks the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.min_bet < Chips::new(2) {
            return Err(EngineError::InvalidConfig(format!(
                "min bet {} must be at least 2",
                self.min_bet
            )));
        }

        if self.thinking_time.is_zero() {
            return Err(EngineError::InvalidConfig(
                "thinking time must be positive".to_string(),
            ));
        }

        if !(2..=Self::MAX_PLAYERS).contains(&self.max_players) {
            return Err(EngineError::InvalidConfig(format!(
                "max players {} not in 2..={}",
                self.max_players,
                Self::MAX_PLAYERS
            )));
        }

        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_bet: Chips::new(20),
            thinking_time: Duration::from_secs(30),
            max_players: Self::MAX_PLAYERS,
        }
    }
}

/// The table status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableStatus {
    /// No hand has been played.
    Waiting,
    /// A hand is running.
    Running,
    /// The running hand is paused.
    Paused,
    /// The last hand ended and was settled.
    Ended,
    /// The last hand was aborted and voided.
    Aborted,
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            TableStatus::Waiting => "waiting",
            TableStatus::Running => "running",
            TableStatus::Paused => "paused",
            TableStatus::Ended => "ended",
            TableStatus::Aborted => "aborted",
        };

        f.write_str(status)
    }
}

/// A blind posted at the start of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindBet {
    /// The player who posted.
    pub player_id: PlayerId,
    /// The chips posted.
    pub amount: Chips,
    /// The player balance after posting.
    pub balance: Chips,
}

/// A poker table.
pub struct Table {
    table_id: TableId,
    config: TableConfig,
    ring: Ring,
    status: TableStatus,
    stage: Stage,
    log: ActionLog,
    ledger: Ledger,
    community: Option<[Card; 5]>,
    revealed: usize,
    blinds: Vec<BlindBet>,
    active: Option<PlayerId>,
    button_placed: bool,
    hand_clock: Duration,
    hands_played: u64,
    settlement: Option<Settlement>,
    cards: Box<dyn CardSource + Send>,
    events: Box<dyn EventSink + Send>,
    rng: StdRng,
}

impl Table {
    /// Creates a new table.
    pub fn new<C, E>(config: TableConfig, cards: C, events: E) -> Result<Self>
    where
        C: CardSource + Send + 'static,
        E: EventSink + Send + 'static,
    {
        Self::with_rng(config, cards, events, StdRng::from_os_rng())
    }

    /// Creates a new table with user initialized randomness.
    pub fn with_rng<C, E>(config: TableConfig, cards: C, events: E, rng: StdRng) -> Result<Self>
    where
        C: CardSource + Send + 'static,
        E: EventSink + Send + 'static,
    {
        config.validate()?;

        Ok(Self {
            table_id: TableId::new_id(),
            config,
            ring: Ring::default(),
            status: TableStatus::Waiting,
            stage: Stage::PreFlop,
            log: ActionLog::default(),
            ledger: Ledger::default(),
            community: None,
            revealed: 0,
            blinds: Vec::new(),
            active: None,
            button_placed: false,
            hand_clock: Duration::ZERO,
            hands_played: 0,
            settlement: None,
            cards: Box::new(cards),
            events: Box::new(events),
            rng,
        })
    }

    /// A player joins the table between hands.
    pub fn join(&mut self, player_id: PlayerId, balance: Chips) -> Result<()> {
        let res = self.try_join(player_id, balance);
        self.report(res)
    }

    /// A player leaves the table between hands.
    pub fn leave(&mut self, player_id: PlayerId) -> Result<Player> {
        let res = if self.is_hand_running() {
            Err(EngineError::HandInProgress)
        } else {
            let had_button = self.ring.button() == Some(player_id);
            let res = self.ring.remove(player_id);

            // The button already moved to the next player.
            if res.is_ok() && had_button && !self.ring.is_empty() {
                self.button_placed = true;
            }

            res
        };

        if res.is_ok() {
            info!("Player {player_id} left table {}", self.table_id);
        }

        self.report(res)
    }

    /// Places the button for the next hand.
    pub fn set_button(&mut self, player_id: PlayerId) -> Result<()> {
        let res = if self.is_hand_running() {
            Err(EngineError::HandInProgress)
        } else {
            self.ring.set_button(Some(player_id), &mut self.rng)
        };

        if res.is_ok() {
            self.button_placed = true;
        }

        self.report(res)
    }

    /// Starts a new hand.
    pub fn start_hand(&mut self) -> Result<()> {
        let res = self.try_start_hand();
        self.report(res)
    }

    /// The legal actions for the player holding the right to act.
    pub fn allowed_actions(&self, player_id: PlayerId) -> Result<AllowedActions> {
        self.check_turn(player_id)?;
        self.validator().allowed(player_id)
    }

    /// The player holding the right to act takes an action.
    pub fn act(&mut self, player_id: PlayerId, action: Action) -> Result<()> {
        let res = self.try_act(player_id, action);
        self.report(res)
    }

    /// Advances the hand clock and the active player countdown.
    ///
    /// When the countdown expires the engine checks if legal, else calls if the
    /// call is free, else folds.
    pub fn tick(&mut self, elapsed: Duration) -> Result<()> {
        if self.status != TableStatus::Running {
            return Ok(());
        }

        self.hand_clock += elapsed;

        let Some(player_id) = self.active else {
            return Ok(());
        };

        let expired = self
            .ring
            .get_mut(player_id)
            .is_some_and(|p| p.countdown.tick(elapsed));

        if expired {
            let res = self.auto_act(player_id);
            self.report(res)
        } else {
            Ok(())
        }
    }

    /// Pauses the running hand.
    pub fn pause(&mut self) -> Result<()> {
        let res = match self.status {
            TableStatus::Running => {
                self.status = TableStatus::Paused;
                if let Some(player) = self.active.and_then(|id| self.ring.get_mut(id)) {
                    player.countdown.suspend();
                }

                info!("Table {} paused", self.table_id);
                Ok(())
            }
            TableStatus::Paused => Err(EngineError::TablePaused),
            _ => Err(EngineError::NoHandInProgress),
        };

        self.report(res)
    }

    /// Resumes a paused hand, the active player gets the full thinking time.
    pub fn resume(&mut self) -> Result<()> {
        let res = if self.status == TableStatus::Paused {
            self.status = TableStatus::Running;
            let thinking_time = self.config.thinking_time;
            if let Some(player) = self.active.and_then(|id| self.ring.get_mut(id)) {
                player.countdown.resume(thinking_time);
            }

            info!("Table {} resumed", self.table_id);
            Ok(())
        } else {
            Err(EngineError::NotPaused)
        };

        self.report(res)
    }

    /// The table id.
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// The table configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The table status.
    pub fn status(&self) -> TableStatus {
        self.status
    }

    /// The current or last stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The community cards revealed so far.
    pub fn board(&self) -> Vec<Card> {
        self.board_cards(0..self.revealed)
    }

    /// The seated players in table order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.ring.iter()
    }

    /// Returns a seated player.
    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.ring.get(player_id)
    }

    /// The player holding the right to act.
    pub fn active_player(&self) -> Option<PlayerId> {
        self.active
    }

    /// The player holding the button.
    pub fn button(&self) -> Option<PlayerId> {
        self.ring.button()
    }

    /// The blinds posted in the current or last hand.
    pub fn blinds(&self) -> &[BlindBet] {
        &self.blinds
    }

    /// The running time of the current or last hand.
    pub fn hand_clock(&self) -> Duration {
        self.hand_clock
    }

    /// Number of hands started.
    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }

    /// The current stage action log.
    pub fn action_log(&self) -> &ActionLog {
        &self.log
    }

    /// The contributions of the running hand.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The settlement of the last hand.
    pub fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    /// Chips in the players balances and in the ledger.
    pub fn chips_in_play(&self) -> Chips {
        self.ring.iter().map(|p| p.balance).sum::<Chips>() + self.ledger.total()
    }

    fn is_hand_running(&self) -> bool {
        matches!(self.status, TableStatus::Running | TableStatus::Paused)
    }

    fn validator(&self) -> Validator<'_> {
        Validator::new(&self.ring, &self.log, self.config.min_bet)
    }

    fn check_turn(&self, player_id: PlayerId) -> Result<()> {
        match self.status {
            TableStatus::Running => {}
            TableStatus::Paused => return Err(EngineError::TablePaused),
            _ => return Err(EngineError::NoHandInProgress),
        }

        if self.ring.get(player_id).is_none() {
            return Err(EngineError::UnknownPlayer(player_id));
        }

        if self.active != Some(player_id) {
            return Err(EngineError::NotPlayersTurn(player_id));
        }

        Ok(())
    }

    fn try_join(&mut self, player_id: PlayerId, balance: Chips) -> Result<()> {
        if self.is_hand_running() {
            return Err(EngineError::HandInProgress);
        }

        if self.ring.len() >= self.config.max_players {
            return Err(EngineError::TableFull(self.ring.len()));
        }

        if balance < self.config.min_bet {
            return Err(EngineError::InsufficientBalance {
                player_id,
                balance,
                min_bet: self.config.min_bet,
            });
        }

        // Keeps pot and ledger arithmetic within a chips amount.
        self.ring
            .iter()
            .map(|p| p.balance)
            .try_fold(self.ledger.total(), Chips::checked_add)
            .and_then(|chips| chips.checked_add(balance))
            .ok_or(EngineError::BalanceOverflow { player_id, balance })?;

        self.ring.join(Player::new(player_id, balance))?;
        info!(
            "Player {player_id} joined table {} with {balance}",
            self.table_id
        );

        Ok(())
    }

    fn try_start_hand(&mut self) -> Result<()> {
        if self.is_hand_running() {
            return Err(EngineError::HandInProgress);
        }

        let players = self.ring.len();
        if !(2..=TableConfig::MAX_PLAYERS).contains(&players) {
            return Err(EngineError::UnsupportedPlayerCount(players));
        }

        if let Some(player) = self.ring.find(|p| p.balance.is_zero()) {
            return Err(EngineError::InsufficientBalance {
                player_id: player.player_id,
                balance: player.balance,
                min_bet: self.config.min_bet,
            });
        }

        // Rotate the button unless the host placed it, roles follow the seats.
        let placed = if self.button_placed {
            self.ring.button()
        } else {
            None
        };
        self.button_placed = false;
        self.ring.set_button(placed, &mut self.rng)?;

        self.ring.for_each_mut(Player::start_hand);
        self.log.clear();
        self.ledger.clear();
        self.blinds.clear();
        self.community = None;
        self.revealed = 0;
        self.settlement = None;
        self.active = None;
        self.hand_clock = Duration::ZERO;
        self.stage = Stage::PreFlop;
        self.status = TableStatus::Running;
        self.hands_played += 1;

        info!(
            "Table {} hand {} started with {players} players, button {}",
            self.table_id,
            self.hands_played,
            self.ring
                .button()
                .map(|id| id.to_string())
                .unwrap_or_default()
        );

        let last_blind = self.post_blinds()?;
        self.deal_cards()?;
        self.progress(last_blind)
    }

    /// Posts the blinds, returns the last player who posted.
    fn post_blinds(&mut self) -> Result<PlayerId> {
        let button = self.ring.button().ok_or(EngineError::NoPlayerToAct)?;
        let first = self
            .ring
            .next_of(button)
            .ok_or(EngineError::NoPlayerToAct)?;

        // Heads-up the player after the button posts the full minimum.
        let min_bet = self.config.min_bet;
        if self.ring.len() == 2 {
            self.post_blind(first, min_bet)?;
            return Ok(first);
        }

        self.post_blind(first, min_bet / 2)?;
        let big_blind = self
            .ring
            .next_of(first)
            .ok_or(EngineError::NoPlayerToAct)?;
        self.post_blind(big_blind, min_bet)?;

        Ok(big_blind)
    }

    fn post_blind(&mut self, player_id: PlayerId, amount: Chips) -> Result<()> {
        let player = self
            .ring
            .get_mut(player_id)
            .ok_or(EngineError::UnknownPlayer(player_id))?;

        let amount = amount.min(player.balance);
        let action = PlayerAction::Bet(amount);
        player.pay(action, amount);

        self.blinds.push(BlindBet {
            player_id,
            amount,
            balance: player.balance,
        });
        self.log.push(player_id, action, true);
        self.ledger.record(self.stage, player_id, amount);

        debug!("Player {player_id} posted blind {amount}");
        self.events.emit(TableEvent::Action {
            player_id,
            action,
            forced: true,
        });

        Ok(())
    }

    /// Deals hole cards starting from the player after the button.
    fn deal_cards(&mut self) -> Result<()> {
        let order = self.ring.iter().map(|p| p.player_id).collect::<Vec<_>>();
        let dealt = self.cards.deal_cards(order.len())?;

        for (player_id, hole_cards) in order.into_iter().zip(dealt.hole_cards) {
            if let Some(player) = self.ring.get_mut(player_id) {
                player.hole_cards = Some(hole_cards);
            }
        }

        self.community = Some(dealt.community_cards);
        Ok(())
    }

    fn try_act(&mut self, player_id: PlayerId, action: Action) -> Result<()> {
        self.check_turn(player_id)?;
        let resolved = self.validator().validate(player_id, action)?;
        self.apply(player_id, resolved)?;
        self.progress(player_id)
    }

    fn auto_act(&mut self, player_id: PlayerId) -> Result<()> {
        let allowed = self.validator().allowed(player_id)?;
        let action = if allowed.contains(ActionKind::Check) {
            Action::Check
        } else if allowed.contains(ActionKind::Call) && allowed.call_amount.is_zero() {
            Action::Call
        } else {
            Action::Fold
        };

        info!("Player {player_id} timed out, auto {}", action.kind());

        let resolved = self.validator().validate(player_id, action)?;
        self.apply(player_id, resolved)?;
        if let Some(player) = self.ring.get_mut(player_id) {
            player.countdown.auto_acted();
        }

        self.progress(player_id)
    }

    /// Records a validated action.
    fn apply(&mut self, player_id: PlayerId, action: PlayerAction) -> Result<()> {
        let player = self
            .ring
            .get_mut(player_id)
            .ok_or(EngineError::UnknownPlayer(player_id))?;

        let paid = match action {
            PlayerAction::Fold => {
                player.fold();
                Chips::ZERO
            }
            PlayerAction::Check | PlayerAction::None => {
                player.check();
                Chips::ZERO
            }
            _ => player.pay(action, action.amount()),
        };

        self.active = None;
        self.log.push(player_id, action, false);
        self.ledger.record(self.stage, player_id, paid);

        debug!("Player {player_id} {action}");
        self.events.emit(TableEvent::Action {
            player_id,
            action,
            forced: false,
        });

        Ok(())
    }

    /// Checks the hand end, then the stage end, else moves the right to act.
    fn progress(&mut self, last_actor: PlayerId) -> Result<()> {
        if let Some(showdown) = self.hand_end() {
            return self.end_hand(showdown);
        }

        if self.is_stage_complete() {
            return self.next_stage();
        }

        let next = self
            .ring
            .next_to_act(last_actor)
            .ok_or(EngineError::NoPlayerToAct)?;
        self.give_control(next)
    }

    /// Returns `Some(showdown)` if the hand has ended.
    fn hand_end(&self) -> Option<bool> {
        let in_hand = self.ring.filter(Player::in_hand);
        if in_hand.len() < 2 {
            return Some(false);
        }

        let max_bet = in_hand.iter().map(|p| p.stage_bet).max().unwrap_or_default();
        let actors = in_hand
            .iter()
            .filter(|p| p.can_act())
            .collect::<Vec<_>>();

        match actors.as_slice() {
            [] => Some(true),
            [actor] if actor.stage_bet >= max_bet => Some(true),
            _ => None,
        }
    }

    fn is_stage_complete(&self) -> bool {
        let max_bet = self
            .ring
            .iter()
            .filter(|p| p.in_hand())
            .map(|p| p.stage_bet)
            .max()
            .unwrap_or_default();

        self.ring
            .every(|p| !p.can_act() || (self.log.has_acted(p.player_id) && p.stage_bet == max_bet))
    }

    fn next_stage(&mut self) -> Result<()> {
        let last_stage = self.stage;
        let Some(stage) = last_stage.next() else {
            return self.end_hand(true);
        };

        self.stage = stage;
        self.log.clear();
        self.ring.for_each_mut(Player::start_stage);

        let revealed = self.board_cards(last_stage.board_len()..stage.board_len());
        self.revealed = stage.board_len();

        info!(
            "Table {} {stage} {}",
            self.table_id,
            revealed
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        );

        self.events.emit(TableEvent::NextStage {
            stage,
            last_stage,
            revealed,
        });

        // Everyone may be all-in but one.
        if let Some(showdown) = self.hand_end() {
            return self.end_hand(showdown);
        }

        let first = self
            .ring
            .first_player_to_act()
            .ok_or(EngineError::NoPlayerToAct)?;
        self.give_control(first)
    }

    fn give_control(&mut self, player_id: PlayerId) -> Result<()> {
        let allowed = self.validator().allowed(player_id)?;
        let thinking_time = self.config.thinking_time;

        let player = self
            .ring
            .get_mut(player_id)
            .ok_or(EngineError::UnknownPlayer(player_id))?;
        player.status = PlayerStatus::Active;
        player.countdown.arm(thinking_time);
        self.active = Some(player_id);

        debug!("Player {player_id} to act {:?}", allowed.actions);
        self.events.emit(TableEvent::PreAction {
            player_id,
            allowed: allowed.actions,
            range: allowed.range,
        });

        Ok(())
    }

    fn end_hand(&mut self, showdown: bool) -> Result<()> {
        let final_stage = self.stage;
        let revealed = if showdown {
            let revealed = self.board_cards(self.revealed..5);
            self.revealed = 5;
            revealed
        } else {
            Vec::new()
        };

        self.active = None;
        self.ring.for_each_mut(Player::end_hand);

        info!(
            "Table {} hand {} ended at {final_stage}, showdown {showdown}",
            self.table_id, self.hands_played
        );

        self.events.emit(TableEvent::GameEnd {
            final_stage,
            revealed,
            showdown,
        });

        let board = self.community;
        let contenders = self
            .ring
            .iter()
            .filter(|p| p.in_hand())
            .map(|p| {
                let hand = match (showdown, p.hole_cards, board) {
                    (true, Some(hole_cards), Some(board)) => {
                        Some(HandValue::eval(&[hole_cards.as_slice(), board.as_slice()].concat()))
                    }
                    _ => None,
                };
                (p.player_id, hand)
            })
            .collect::<Vec<_>>();

        let settlement = settle(&self.ledger.totals(), &contenders, &mut self.rng)?;
        for payout in &settlement.payouts {
            if let Some(player) = self.ring.get_mut(payout.player_id) {
                player.balance += payout.chips;
            }

            match &payout.hand {
                Some(hand) => info!("Player {} won {} with {hand}", payout.player_id, payout.chips),
                None => info!("Player {} won {}", payout.player_id, payout.chips),
            }
        }

        self.ledger.clear();
        self.status = TableStatus::Ended;
        self.events.emit(TableEvent::Settled {
            pots: settlement.pots.clone(),
            payouts: settlement.payouts.clone(),
        });
        self.settlement = Some(settlement);

        Ok(())
    }

    /// Voids the running hand refunding all contributions.
    fn abort(&mut self, err: &EngineError) {
        error!("Table {} hand aborted: {err}", self.table_id);

        for (player_id, chips) in self.ledger.totals() {
            if let Some(player) = self.ring.get_mut(player_id) {
                player.balance += chips;
            }
        }

        self.ledger.clear();
        self.active = None;
        self.ring.for_each_mut(Player::end_hand);
        self.status = TableStatus::Aborted;
    }

    /// Emits errors as events, aborting the hand on fatal errors.
    fn report<T>(&mut self, res: Result<T>) -> Result<T> {
        if let Err(err) = &res {
            if err.is_fatal() && self.is_hand_running() {
                self.abort(err);
            } else {
                warn!("Table {} {err}", self.table_id);
            }

            self.events.emit(TableEvent::Error {
                kind: err.kind(),
                message: err.to_string(),
            });
        }

        res
    }

    fn board_cards(&self, range: Range<usize>) -> Vec<Card> {
        self.community
            .map(|cards| cards[range].to_vec())
            .unwrap_or_default()
    }
}
