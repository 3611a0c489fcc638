// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Action legality.
//!
//! The legal set depends on the predecessor action: the latest action in the
//! stage log that is not a fold and whose player is still in the hand.
use crate::{
    action::{Action, ActionKind, ActionLog, AllowedActions, BetRange, PlayerAction},
    error::{EngineError, Result},
    player::Player,
    poker::{Chips, PlayerId},
    ring::Ring,
};

/// Validates actions against the stage log and the players balances.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    ring: &'a Ring,
    log: &'a ActionLog,
    min_bet: Chips,
}

impl<'a> Validator<'a> {
    /// Creates a validator for the current stage.
    pub fn new(ring: &'a Ring, log: &'a ActionLog, min_bet: Chips) -> Self {
        Self { ring, log, min_bet }
    }

    /// Computes the legal actions for a player.
    pub fn allowed(&self, player_id: PlayerId) -> Result<AllowedActions> {
        let player = self.player(player_id)?;
        let outstanding = self.outstanding(player_id);
        let predecessor = self
            .log
            .predecessor(|e| self.ring.get(e.player_id).is_some_and(Player::in_hand))
            .map(|e| e.action);

        let can_cover = player.balance + player.stage_bet > outstanding;

        use ActionKind::*;
        let mut actions = match predecessor {
            None | Some(PlayerAction::None) => vec![Bet, AllIn, Fold, Check],
            Some(PlayerAction::Check) => vec![AllIn, Bet, Check, Fold],
            _ if !can_cover => vec![AllIn, Fold],
            Some(PlayerAction::Call(_)) => vec![Call, Raise, Fold, AllIn],
            _ => vec![Call, Raise, AllIn, Fold],
        };

        let bet_range = BetRange {
            min: self.min_bet,
            max: player.balance,
        };
        let raise_range = BetRange {
            min: self.min_bet.max(outstanding - player.stage_bet + Chips::new(1)),
            max: player.balance,
        };

        actions.retain(|kind| match kind {
            Bet => bet_range.min <= bet_range.max,
            Raise => raise_range.min <= raise_range.max,
            _ => true,
        });

        let range = if actions.contains(&Bet) {
            Some(bet_range)
        } else if actions.contains(&Raise) {
            Some(raise_range)
        } else {
            None
        };

        Ok(AllowedActions {
            actions,
            range,
            call_amount: (outstanding - player.stage_bet).min(player.balance),
        })
    }

    /// Validates an action, returns the action with the chips to pay.
    pub fn validate(&self, player_id: PlayerId, action: Action) -> Result<PlayerAction> {
        let allowed = self.allowed(player_id)?;
        if !allowed.contains(action.kind()) {
            return Err(EngineError::ActionNotAllowed {
                action: action.kind(),
                allowed: allowed.actions,
            });
        }

        let check_range = |amount: Chips| match allowed.range {
            Some(range) if range.contains(amount) => Ok(amount),
            Some(range) => Err(EngineError::AmountOutOfRange {
                amount,
                min: range.min,
                max: range.max,
            }),
            None => Err(EngineError::ActionNotAllowed {
                action: action.kind(),
                allowed: allowed.actions.clone(),
            }),
        };

        let player = self.player(player_id)?;
        let resolved = match action {
            Action::Check => PlayerAction::Check,
            Action::Fold => PlayerAction::Fold,
            Action::Call => PlayerAction::Call(allowed.call_amount),
            Action::Bet(amount) => PlayerAction::Bet(check_range(amount)?),
            Action::Raise(amount) => PlayerAction::Raise(check_range(amount)?),
            Action::AllIn => {
                // Cap to what the other players can still match.
                let cap = self
                    .others(player_id)
                    .map(|p| p.balance + p.stage_bet)
                    .max()
                    .unwrap_or_default()
                    - player.stage_bet;
                PlayerAction::AllIn(player.balance.min(cap.max(self.min_bet)))
            }
        };

        Ok(resolved)
    }

    /// The highest stage contribution of the other players in the hand.
    pub fn outstanding(&self, player_id: PlayerId) -> Chips {
        self.others(player_id)
            .map(|p| p.stage_bet)
            .max()
            .unwrap_or_default()
    }

    fn others(&self, player_id: PlayerId) -> impl Iterator<Item = &'a Player> {
        self.ring
            .iter()
            .filter(move |p| p.player_id != player_id && p.in_hand())
    }

    fn player(&self, player_id: PlayerId) -> Result<&'a Player> {
        self.ring
            .get(player_id)
            .ok_or(EngineError::UnknownPlayer(player_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerStatus;
    use rand::prelude::*;

    const MIN_BET: Chips = Chips::new(100);

    fn pid(id: u64) -> PlayerId {
        PlayerId::new(id)
    }

    // Seats players with the given balances, the button on the last one.
    fn new_ring(balances: &[u32]) -> Ring {
        let mut ring = Ring::default();
        for (id, balance) in balances.iter().enumerate() {
            let player = Player::new(pid(id as u64 + 1), Chips::new(*balance));
            ring.join(player).unwrap();
        }

        let button = pid(balances.len() as u64);
        ring.set_button(Some(button), &mut StdRng::seed_from_u64(1))
            .unwrap();
        ring
    }

    // Records an action on the player and in the log.
    fn act(ring: &mut Ring, log: &mut ActionLog, id: u64, action: PlayerAction) {
        let player = ring.get_mut(pid(id)).unwrap();
        match action {
            PlayerAction::Fold => player.fold(),
            PlayerAction::Check => player.check(),
            _ => {
                player.pay(action, action.amount());
            }
        }
        log.push(pid(id), action, false);
    }

    #[test]
    fn first_to_act() {
        let ring = new_ring(&[1_000, 1_000, 1_000]);
        let log = ActionLog::default();
        let v = Validator::new(&ring, &log, MIN_BET);

        let allowed = v.allowed(pid(1)).unwrap();
        use ActionKind::*;
        assert_eq!(allowed.actions, vec![Bet, AllIn, Fold, Check]);
        assert_eq!(
            allowed.range,
            Some(BetRange {
                min: MIN_BET,
                max: Chips::new(1_000)
            })
        );
    }

    #[test]
    fn after_check_and_bet() {
        let mut ring = new_ring(&[1_000, 1_000, 1_000]);
        let mut log = ActionLog::default();

        act(&mut ring, &mut log, 1, PlayerAction::Check);
        let v = Validator::new(&ring, &log, MIN_BET);
        use ActionKind::*;
        assert_eq!(v.allowed(pid(2)).unwrap().actions, vec![AllIn, Bet, Check, Fold]);

        act(&mut ring, &mut log, 2, PlayerAction::Bet(Chips::new(200)));
        let v = Validator::new(&ring, &log, MIN_BET);
        let allowed = v.allowed(pid(3)).unwrap();
        assert_eq!(allowed.actions, vec![Call, Raise, AllIn, Fold]);
        assert_eq!(allowed.call_amount, Chips::new(200));
        assert_eq!(
            allowed.range,
            Some(BetRange {
                min: Chips::new(201),
                max: Chips::new(1_000)
            })
        );

        act(&mut ring, &mut log, 3, PlayerAction::Call(Chips::new(200)));
        let v = Validator::new(&ring, &log, MIN_BET);
        assert_eq!(v.allowed(pid(1)).unwrap().actions, vec![Call, Raise, Fold, AllIn]);
    }

    #[test]
    fn cannot_afford_call() {
        let mut ring = new_ring(&[1_000, 300, 1_000]);
        let mut log = ActionLog::default();

        act(&mut ring, &mut log, 1, PlayerAction::Bet(Chips::new(500)));
        let v = Validator::new(&ring, &log, MIN_BET);
        let allowed = v.allowed(pid(2)).unwrap();
        assert_eq!(allowed.actions, vec![ActionKind::AllIn, ActionKind::Fold]);
        assert_eq!(allowed.range, None);

        let err = v.validate(pid(2), Action::Call).unwrap_err();
        assert!(matches!(err, EngineError::ActionNotAllowed { .. }));

        // All-in for the whole balance.
        let action = v.validate(pid(2), Action::AllIn).unwrap();
        assert_eq!(action, PlayerAction::AllIn(Chips::new(300)));

        // Player 1 faces a call after player 2 folds.
        act(&mut ring, &mut log, 2, PlayerAction::Fold);
        act(&mut ring, &mut log, 3, PlayerAction::Call(Chips::new(500)));
        let v = Validator::new(&ring, &log, MIN_BET);
        assert_eq!(
            v.allowed(pid(1)).unwrap().actions,
            vec![
                ActionKind::Call,
                ActionKind::Raise,
                ActionKind::Fold,
                ActionKind::AllIn
            ]
        );
    }

    #[test]
    fn predecessor_skips_folded_players() {
        let mut ring = new_ring(&[1_000, 1_000, 1_000, 1_000]);
        let mut log = ActionLog::default();

        act(&mut ring, &mut log, 1, PlayerAction::Check);
        act(&mut ring, &mut log, 2, PlayerAction::Bet(Chips::new(100)));
        act(&mut ring, &mut log, 3, PlayerAction::Raise(Chips::new(300)));

        // Player 3 raise no longer counts once the player has folded.
        ring.get_mut(pid(3)).unwrap().status = PlayerStatus::Folded;
        let v = Validator::new(&ring, &log, MIN_BET);
        let allowed = v.allowed(pid(4)).unwrap();
        assert_eq!(allowed.actions[0], ActionKind::Call);
        assert_eq!(allowed.call_amount, Chips::new(100));
    }

    #[test]
    fn amount_ranges() {
        let mut ring = new_ring(&[1_000, 1_000]);
        let mut log = ActionLog::default();
        let v = Validator::new(&ring, &log, MIN_BET);

        let err = v.validate(pid(1), Action::Bet(Chips::new(50))).unwrap_err();
        assert_eq!(
            err,
            EngineError::AmountOutOfRange {
                amount: Chips::new(50),
                min: MIN_BET,
                max: Chips::new(1_000)
            }
        );
        assert!(v.validate(pid(1), Action::Bet(Chips::new(1_001))).is_err());
        assert_eq!(
            v.validate(pid(1), Action::Bet(Chips::new(150))).unwrap(),
            PlayerAction::Bet(Chips::new(150))
        );

        act(&mut ring, &mut log, 1, PlayerAction::Bet(Chips::new(150)));
        let v = Validator::new(&ring, &log, MIN_BET);

        // A raise must top the bet.
        assert!(v.validate(pid(2), Action::Raise(Chips::new(150))).is_err());
        assert_eq!(
            v.validate(pid(2), Action::Raise(Chips::new(151))).unwrap(),
            PlayerAction::Raise(Chips::new(151))
        );
        assert!(v.validate(pid(2), Action::Bet(Chips::new(200))).is_err());
    }

    #[test]
    fn all_in_is_capped() {
        let mut ring = new_ring(&[5_000, 800, 1_200]);
        let log = ActionLog::default();
        let v = Validator::new(&ring, &log, MIN_BET);

        // Others can match at most 1,200.
        let action = v.validate(pid(1), Action::AllIn).unwrap();
        assert_eq!(action, PlayerAction::AllIn(Chips::new(1_200)));

        // Capped all-in never goes below the minimum bet.
        ring.get_mut(pid(2)).unwrap().balance = Chips::new(30);
        ring.get_mut(pid(3)).unwrap().balance = Chips::new(50);
        let v = Validator::new(&ring, &log, MIN_BET);
        let action = v.validate(pid(1), Action::AllIn).unwrap();
        assert_eq!(action, PlayerAction::AllIn(MIN_BET));
    }

    #[test]
    fn short_stack_cannot_bet() {
        let ring = new_ring(&[60, 1_000]);
        let log = ActionLog::default();
        let v = Validator::new(&ring, &log, MIN_BET);

        let allowed = v.allowed(pid(1)).unwrap();
        assert!(!allowed.contains(ActionKind::Bet));
        assert!(allowed.contains(ActionKind::AllIn));
        assert_eq!(allowed.range, None);
    }
}
