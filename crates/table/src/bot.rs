// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Automated players.
use rand::prelude::*;

use texas_core::{Action, ActionKind, AllowedActions, Player, poker::Card};

/// A bot strategy.
pub trait Strategy: Send + 'static {
    /// Picks an action for the player holding the right to act.
    fn execute(&mut self, req: &AllowedActions, player: &Player, board: &[Card]) -> Action;
}

/// Checks when it can, otherwise calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallOrCheck;

impl Strategy for CallOrCheck {
    fn execute(&mut self, req: &AllowedActions, _player: &Player, _board: &[Card]) -> Action {
        if req.contains(ActionKind::Check) {
            Action::Check
        } else if req.contains(ActionKind::Call) {
            Action::Call
        } else if req.contains(ActionKind::AllIn) {
            Action::AllIn
        } else {
            Action::Fold
        }
    }
}

/// Mostly calls, sometimes raises or folds.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    /// Creates a strategy with a seeded rng.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Strategy for RandomStrategy {
    fn execute(&mut self, req: &AllowedActions, player: &Player, board: &[Card]) -> Action {
        // Some randomness.
        let p = self.rng.random::<f64>();

        // Raise preflop with a pair.
        if let (Some([c1, c2]), Some(range)) = (player.hole_cards, req.range) {
            if c1.rank() == c2.rank() && board.is_empty() && p > 0.2 {
                if req.contains(ActionKind::Raise) {
                    return Action::Raise(range.min);
                } else if req.contains(ActionKind::Bet) {
                    return Action::Bet(range.min);
                }
            }
        }

        if p < 0.02 && req.contains(ActionKind::AllIn) {
            Action::AllIn
        } else if p < 0.1 && !req.contains(ActionKind::Check) {
            Action::Fold
        } else if req.contains(ActionKind::Call) {
            Action::Call
        } else if req.contains(ActionKind::Check) {
            match req.range {
                Some(range) if p > 0.85 && req.contains(ActionKind::Bet) => Action::Bet(range.min),
                _ => Action::Check,
            }
        } else if p > 0.5 && req.contains(ActionKind::AllIn) {
            Action::AllIn
        } else {
            Action::Fold
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use texas_core::{BetRange, Chips, PlayerId};

    fn allowed(actions: &[ActionKind], range: Option<BetRange>) -> AllowedActions {
        AllowedActions {
            actions: actions.to_vec(),
            range,
            call_amount: Chips::ZERO,
        }
    }

    #[test]
    fn call_or_check() {
        let player = Player::new(PlayerId::new(1), Chips::new(100));
        let mut bot = CallOrCheck;

        use ActionKind::*;
        let req = allowed(&[Bet, AllIn, Fold, Check], None);
        assert_eq!(bot.execute(&req, &player, &[]), Action::Check);

        let req = allowed(&[Call, Raise, AllIn, Fold], None);
        assert_eq!(bot.execute(&req, &player, &[]), Action::Call);

        let req = allowed(&[AllIn, Fold], None);
        assert_eq!(bot.execute(&req, &player, &[]), Action::AllIn);
    }

    #[test]
    fn random_strategy_stays_legal() {
        let mut player = Player::new(PlayerId::new(1), Chips::new(1_000));
        player.hole_cards = Some(["Ah".parse().unwrap(), "Ad".parse().unwrap()]);

        let range = BetRange {
            min: Chips::new(200),
            max: Chips::new(1_000),
        };

        use ActionKind::*;
        let sets = [
            allowed(&[Bet, AllIn, Fold, Check], Some(range)),
            allowed(&[Call, Raise, AllIn, Fold], Some(range)),
            allowed(&[AllIn, Fold], None),
        ];

        let mut bot = RandomStrategy::new(42);
        for _ in 0..1_000 {
            for req in &sets {
                let action = bot.execute(req, &player, &[]);
                assert!(req.contains(action.kind()), "{action:?} not in {req:?}");
                match action {
                    Action::Bet(amount) | Action::Raise(amount) => {
                        assert!(range.contains(amount))
                    }
                    _ => {}
                }
            }
        }
    }
}
