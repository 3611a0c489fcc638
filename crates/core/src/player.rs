// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table player types.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    action::PlayerAction,
    countdown::Countdown,
    poker::{Card, Chips, PlayerId},
    ring::Role,
};

/// The player status in a hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    /// In the hand, waiting for the right to act.
    #[default]
    Waiting,
    /// Holds the right to act.
    Active,
    /// No chips left, stays in the hand until showdown.
    AllIn,
    /// Out of the hand.
    Folded,
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            PlayerStatus::Waiting => "waiting",
            PlayerStatus::Active => "active",
            PlayerStatus::AllIn => "all-in",
            PlayerStatus::Folded => "folded",
        };

        f.write_str(status)
    }
}

/// A seated player state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// The player id.
    pub player_id: PlayerId,
    /// This player chips.
    pub balance: Chips,
    /// The status in the current hand.
    pub status: PlayerStatus,
    /// The chips put in during the current stage.
    pub stage_bet: Chips,
    /// The last player action.
    pub action: PlayerAction,
    /// This player private cards.
    pub hole_cards: Option<[Card; 2]>,
    /// The position relative to the button.
    pub role: Option<Role>,
    /// The player action countdown.
    pub countdown: Countdown,
}

impl Player {
    /// Creates a new player.
    pub fn new(player_id: PlayerId, balance: Chips) -> Self {
        Self {
            player_id,
            balance,
            status: PlayerStatus::Waiting,
            stage_bet: Chips::ZERO,
            action: PlayerAction::None,
            hole_cards: None,
            role: None,
            countdown: Countdown::Idle,
        }
    }

    /// Moves chips from the balance into the stage contribution.
    ///
    /// The amount is capped to the balance, returns the chips paid.
    pub fn pay(&mut self, action: PlayerAction, amount: Chips) -> Chips {
        let paid = amount.min(self.balance);
        self.balance -= paid;
        self.stage_bet += paid;
        self.action = action;
        self.countdown.disarm();

        self.status = if self.balance.is_zero() {
            PlayerStatus::AllIn
        } else {
            PlayerStatus::Waiting
        };

        paid
    }

    /// Records a check.
    pub fn check(&mut self) {
        self.action = PlayerAction::Check;
        self.status = PlayerStatus::Waiting;
        self.countdown.disarm();
    }

    /// Sets this player in fold state.
    pub fn fold(&mut self) {
        self.action = PlayerAction::Fold;
        self.status = PlayerStatus::Folded;
        self.countdown.disarm();
    }

    /// Checks if the player is still in the hand.
    pub fn in_hand(&self) -> bool {
        self.status != PlayerStatus::Folded
    }

    /// Checks if the player can still receive the right to act.
    pub fn can_act(&self) -> bool {
        matches!(self.status, PlayerStatus::Waiting | PlayerStatus::Active)
    }

    /// Reset state for a new hand.
    pub(crate) fn start_hand(&mut self) {
        self.status = PlayerStatus::Waiting;
        self.stage_bet = Chips::ZERO;
        self.action = PlayerAction::None;
        self.hole_cards = None;
        self.countdown.disarm();
    }

    /// Reset state for a new stage.
    pub(crate) fn start_stage(&mut self) {
        self.stage_bet = Chips::ZERO;
        if self.status != PlayerStatus::Folded {
            self.action = PlayerAction::None;
        }
    }

    /// Set state on hand end.
    pub(crate) fn end_hand(&mut self) {
        self.stage_bet = Chips::ZERO;
        if self.status == PlayerStatus::Active {
            self.status = PlayerStatus::Waiting;
        }

        if !matches!(self.countdown, Countdown::AutoActed) {
            self.countdown.disarm();
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "player {} status {} balance {}",
            self.player_id, self.status, self.balance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pay_caps_to_balance() {
        let mut p = Player::new(PlayerId::new(1), Chips::new(500));
        p.status = PlayerStatus::Active;

        let paid = p.pay(PlayerAction::Call(Chips::new(200)), Chips::new(200));
        assert_eq!(paid, Chips::new(200));
        assert_eq!(p.balance, Chips::new(300));
        assert_eq!(p.stage_bet, Chips::new(200));
        assert_eq!(p.status, PlayerStatus::Waiting);

        let paid = p.pay(PlayerAction::AllIn(Chips::new(300)), Chips::new(1_000));
        assert_eq!(paid, Chips::new(300));
        assert_eq!(p.balance, Chips::ZERO);
        assert_eq!(p.stage_bet, Chips::new(500));
        assert_eq!(p.status, PlayerStatus::AllIn);
        assert!(!p.can_act());
        assert!(p.in_hand());
    }

    #[test]
    fn fold_and_reset() {
        let mut p = Player::new(PlayerId::new(1), Chips::new(500));
        p.countdown.arm(std::time::Duration::from_secs(5));
        p.fold();
        assert!(!p.in_hand());
        assert!(!p.countdown.is_armed());

        p.start_stage();
        assert_eq!(p.action, PlayerAction::Fold);

        p.start_hand();
        assert!(p.in_hand());
        assert_eq!(p.action, PlayerAction::None);
    }
}
