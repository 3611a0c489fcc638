// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Engine errors.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::{
    action::ActionKind,
    poker::{Chips, PlayerId},
};

/// Errors returned by the table engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The player is not seated at the table.
    #[error("player {0} is not seated at the table")]
    UnknownPlayer(PlayerId),
    /// The player is already seated.
    #[error("player {0} is already seated")]
    AlreadySeated(PlayerId),
    /// The table has no free seats.
    #[error("table full, {0} seats taken")]
    TableFull(usize),
    /// The player cannot cover the minimum bet.
    #[error("player {player_id} balance {balance} is below the minimum bet {min_bet}")]
    InsufficientBalance {
        /// The player.
        player_id: PlayerId,
        /// The player balance.
        balance: Chips,
        /// The table minimum bet.
        min_bet: Chips,
    },
    /// Another player holds the right to act.
    #[error("not player {0} turn")]
    NotPlayersTurn(PlayerId),
    /// The action is not in the legal set.
    #[error("action {action} not allowed, allowed {allowed:?}")]
    ActionNotAllowed {
        /// The requested action.
        action: ActionKind,
        /// The legal actions.
        allowed: Vec<ActionKind>,
    },
    /// The bet or raise amount is outside the legal range.
    #[error("amount {amount} outside range [{min}, {max}]")]
    AmountOutOfRange {
        /// The requested amount.
        amount: Chips,
        /// Lowest legal amount.
        min: Chips,
        /// Highest legal amount.
        max: Chips,
    },
    /// The operation needs the table between hands.
    #[error("hand in progress")]
    HandInProgress,
    /// The operation needs a running hand.
    #[error("no hand in progress")]
    NoHandInProgress,
    /// The table is paused.
    #[error("table paused")]
    TablePaused,
    /// Resume called on a table that is not paused.
    #[error("table not paused")]
    NotPaused,
    /// The table chips total would not fit in a chips amount.
    #[error("player {player_id} balance {balance} overflows the table chips")]
    BalanceOverflow {
        /// The player.
        player_id: PlayerId,
        /// The player balance.
        balance: Chips,
    },
    /// Invalid table configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// A hand needs 2 to 10 seated players.
    #[error("unsupported players count {0}")]
    UnsupportedPlayerCount(usize),
    /// No player can receive the right to act.
    #[error("no player to act")]
    NoPlayerToAct,
    /// The card source could not deal the hand.
    #[error("card source exhausted")]
    DeckExhausted,
    /// Payouts don't match the ledger total.
    #[error("settlement mismatch, ledger {ledger} paid {paid}")]
    SettlementMismatch {
        /// Ledger total.
        ledger: Chips,
        /// Payouts total.
        paid: Chips,
    },
    /// The contributions total overflows.
    #[error("ledger total overflow")]
    LedgerOverflow,
    /// A pot has no contender with a hand.
    #[error("pot of {0} has no eligible winner")]
    NoEligibleWinner(Chips),
}

/// Error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Rejected action, no side effects.
    IllegalAction,
    /// Broken hand structure, the hand is aborted.
    Structural,
    /// Settlement integrity failure, the hand is voided.
    Settlement,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ErrorKind::IllegalAction => "illegal-action",
            ErrorKind::Structural => "structural",
            ErrorKind::Settlement => "settlement-integrity",
        };

        f.write_str(kind)
    }
}

impl EngineError {
    /// The error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::UnsupportedPlayerCount(_)
            | EngineError::NoPlayerToAct
            | EngineError::DeckExhausted => ErrorKind::Structural,
            EngineError::SettlementMismatch { .. }
            | EngineError::LedgerOverflow
            | EngineError::NoEligibleWinner(_) => ErrorKind::Settlement,
            _ => ErrorKind::IllegalAction,
        }
    }

    /// Checks if this error aborts the running hand.
    pub fn is_fatal(&self) -> bool {
        self.kind() != ErrorKind::IllegalAction
    }
}

/// Engine result type.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds() {
        let err = EngineError::NotPlayersTurn(PlayerId::new(1));
        assert_eq!(err.kind(), ErrorKind::IllegalAction);
        assert!(!err.is_fatal());

        let err = EngineError::UnsupportedPlayerCount(11);
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert!(err.is_fatal());

        let err = EngineError::SettlementMismatch {
            ledger: Chips::new(300),
            paid: Chips::new(299),
        };
        assert_eq!(err.kind(), ErrorKind::Settlement);
        assert_eq!(err.to_string(), "settlement mismatch, ledger 300 paid 299");
    }
}
