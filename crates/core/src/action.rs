// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Player actions and the per-stage action log.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::poker::{Chips, PlayerId};

/// An action requested by the player holding the right to act.
///
/// Bet and raise carry the chips the player adds to the stage contribution,
/// call and all-in amounts are computed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Pass without betting.
    Check,
    /// Give up the hand.
    Fold,
    /// Match the outstanding contribution.
    Call,
    /// Open the betting.
    Bet(Chips),
    /// Increase the outstanding contribution.
    Raise(Chips),
    /// Push the whole balance, capped to what the other players can cover.
    AllIn,
}

impl Action {
    /// The action kind.
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Check => ActionKind::Check,
            Action::Fold => ActionKind::Fold,
            Action::Call => ActionKind::Call,
            Action::Bet(_) => ActionKind::Bet,
            Action::Raise(_) => ActionKind::Raise,
            Action::AllIn => ActionKind::AllIn,
        }
    }
}

/// Action kinds used for the legal actions set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Check
    Check,
    /// Fold
    Fold,
    /// Bet
    Bet,
    /// Call
    Call,
    /// Raise
    Raise,
    /// All-in
    AllIn,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ActionKind::Check => "check",
            ActionKind::Fold => "fold",
            ActionKind::Bet => "bet",
            ActionKind::Call => "call",
            ActionKind::Raise => "raise",
            ActionKind::AllIn => "all-in",
        };

        f.write_str(kind)
    }
}

/// The last action taken by a player with the chips it moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// No action this stage.
    #[default]
    None,
    /// Check
    Check,
    /// Fold
    Fold,
    /// Bet
    Bet(Chips),
    /// Call
    Call(Chips),
    /// Raise
    Raise(Chips),
    /// All-in
    AllIn(Chips),
}

impl PlayerAction {
    /// The action kind, `None` if the player has not acted.
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            PlayerAction::None => None,
            PlayerAction::Check => Some(ActionKind::Check),
            PlayerAction::Fold => Some(ActionKind::Fold),
            PlayerAction::Bet(_) => Some(ActionKind::Bet),
            PlayerAction::Call(_) => Some(ActionKind::Call),
            PlayerAction::Raise(_) => Some(ActionKind::Raise),
            PlayerAction::AllIn(_) => Some(ActionKind::AllIn),
        }
    }

    /// The chips moved by this action.
    pub fn amount(&self) -> Chips {
        match self {
            PlayerAction::Bet(c)
            | PlayerAction::Call(c)
            | PlayerAction::Raise(c)
            | PlayerAction::AllIn(c) => *c,
            _ => Chips::ZERO,
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            None => f.write_str("none"),
            Some(kind @ (ActionKind::Check | ActionKind::Fold)) => write!(f, "{kind}"),
            Some(kind) => write!(f, "{kind} {}", self.amount()),
        }
    }
}

/// The legal amount range for a bet or a raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetRange {
    /// Lowest amount.
    pub min: Chips,
    /// Highest amount.
    pub max: Chips,
}

impl BetRange {
    /// Checks if the amount is in range.
    pub fn contains(&self, amount: Chips) -> bool {
        self.min <= amount && amount <= self.max
    }
}

/// The legal actions for the player holding the right to act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedActions {
    /// Legal action kinds.
    pub actions: Vec<ActionKind>,
    /// The amount range for a bet or raise, if one of them is legal.
    pub range: Option<BetRange>,
    /// Chips a call costs.
    pub call_amount: Chips,
}

impl AllowedActions {
    /// Checks if an action kind is legal.
    pub fn contains(&self, kind: ActionKind) -> bool {
        self.actions.contains(&kind)
    }
}

/// An action log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// The acting player.
    pub player_id: PlayerId,
    /// The action with the chips moved.
    pub action: PlayerAction,
    /// Blinds are forced bets.
    pub forced: bool,
}

/// Append-only log of the actions taken in a stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionLog {
    entries: Vec<LogEntry>,
}

impl ActionLog {
    /// Appends an entry.
    pub fn push(&mut self, player_id: PlayerId, action: PlayerAction, forced: bool) {
        self.entries.push(LogEntry {
            player_id,
            action,
            forced,
        });
    }

    /// The stage entries in order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Checks if the player took a voluntary action this stage.
    pub fn has_acted(&self, player_id: PlayerId) -> bool {
        self.entries
            .iter()
            .any(|e| e.player_id == player_id && !e.forced)
    }

    /// Finds the latest entry that is not a fold and that passes the filter.
    pub fn predecessor<F>(&self, mut f: F) -> Option<&LogEntry>
    where
        F: FnMut(&LogEntry) -> bool,
    {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.action != PlayerAction::Fold)
            .find(|e| f(*e))
    }

    /// Checks if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clears the log for a new stage.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predecessor_skips_folds() {
        let (p1, p2, p3) = (PlayerId::new(1), PlayerId::new(2), PlayerId::new(3));
        let mut log = ActionLog::default();
        log.push(p1, PlayerAction::Bet(Chips::new(100)), false);
        log.push(p2, PlayerAction::Raise(Chips::new(300)), false);
        log.push(p3, PlayerAction::Fold, false);

        let entry = log.predecessor(|_| true).unwrap();
        assert_eq!(entry.player_id, p2);

        // Skip entries from players who folded later.
        let entry = log.predecessor(|e| e.player_id != p2).unwrap();
        assert_eq!(entry.player_id, p1);
        assert!(log.predecessor(|e| e.player_id == p3).is_none());
    }

    #[test]
    fn forced_bets_are_not_actions() {
        let (p1, p2) = (PlayerId::new(1), PlayerId::new(2));
        let mut log = ActionLog::default();
        log.push(p1, PlayerAction::Bet(Chips::new(50)), true);
        log.push(p2, PlayerAction::Bet(Chips::new(100)), true);
        assert!(!log.has_acted(p1));

        log.push(p1, PlayerAction::Call(Chips::new(50)), false);
        assert!(log.has_acted(p1));
        assert!(!log.has_acted(p2));
    }

    #[test]
    fn action_display() {
        assert_eq!(PlayerAction::Raise(Chips::new(1_500)).to_string(), "raise 1,500");
        assert_eq!(PlayerAction::Check.to_string(), "check");
        assert_eq!(Action::AllIn.kind().to_string(), "all-in");
    }
}
