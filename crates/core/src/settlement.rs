// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Contribution ledger and pot settlement.
//!
//! The ledger is split into pots by peeling the smallest contribution from
//! every contributor until all contributions are consumed, so that each pot
//! is owned by the players who put the same amount into it. Each pot goes to
//! the best hand among its contributors still in the hand.
use ahash::AHashMap;
use log::{debug, info};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::{EngineError, Result},
    poker::{Chips, HandValue, PlayerId, Stage},
};

/// Chips wagered by each player in each stage of a hand.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    stages: AHashMap<Stage, AHashMap<PlayerId, Chips>>,
}

impl Ledger {
    /// Records chips wagered by a player.
    pub fn record(&mut self, stage: Stage, player_id: PlayerId, chips: Chips) {
        if chips.is_zero() {
            return;
        }

        *self
            .stages
            .entry(stage)
            .or_default()
            .entry(player_id)
            .or_default() += chips;
    }

    /// Chips wagered by a player in a stage.
    pub fn stage_total(&self, stage: Stage, player_id: PlayerId) -> Chips {
        self.stages
            .get(&stage)
            .and_then(|s| s.get(&player_id))
            .copied()
            .unwrap_or_default()
    }

    /// Chips wagered by a player in the hand.
    pub fn player_total(&self, player_id: PlayerId) -> Chips {
        self.stages
            .values()
            .filter_map(|s| s.get(&player_id))
            .sum()
    }

    /// Hand contributions summed over the stages, sorted by player id.
    pub fn totals(&self) -> Vec<(PlayerId, Chips)> {
        let mut totals = AHashMap::<PlayerId, Chips>::new();
        for (player_id, chips) in self.stages.values().flatten() {
            *totals.entry(*player_id).or_default() += *chips;
        }

        let mut totals = totals.into_iter().collect::<Vec<_>>();
        totals.sort_by_key(|(player_id, _)| *player_id);
        totals
    }

    /// All the chips in the ledger.
    pub fn total(&self) -> Chips {
        self.stages.values().flat_map(|s| s.values()).sum()
    }

    /// Checks if no chips have been recorded.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Clears the ledger for a new hand.
    pub fn clear(&mut self) {
        self.stages.clear();
    }
}

/// A pot owned by the players who contributed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    /// The pot chips.
    pub amount: Chips,
    /// The contributors.
    pub players: Vec<PlayerId>,
    /// The players who won the pot.
    pub winners: Vec<PlayerId>,
}

/// Chips paid to a player at the end of a hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payout {
    /// The player.
    pub player_id: PlayerId,
    /// The chips won.
    pub chips: Chips,
    /// The winning hand, `None` when all the other players folded.
    pub hand: Option<HandValue>,
}

/// The result of a hand settlement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settlement {
    /// The pots from the main pot to the last side pot.
    pub pots: Vec<Pot>,
    /// The payouts sorted by player id.
    pub payouts: Vec<Payout>,
}

impl Settlement {
    /// Total chips paid.
    pub fn total(&self) -> Chips {
        self.payouts.iter().map(|p| p.chips).sum()
    }
}

/// Splits the contributions into pots.
///
/// Each round takes the smallest nonzero contribution `m` and forms a pot of
/// `m` times the number of contributors, the main pot comes first.
pub fn split_pots(contributions: &[(PlayerId, Chips)]) -> Vec<Pot> {
    let mut remaining = contributions
        .iter()
        .filter(|(_, chips)| !chips.is_zero())
        .copied()
        .collect::<Vec<_>>();

    let mut pots = Vec::new();
    while let Some(min) = remaining.iter().map(|(_, chips)| *chips).min() {
        let players = remaining.iter().map(|(id, _)| *id).collect::<Vec<_>>();
        pots.push(Pot {
            amount: min * players.len() as u32,
            players,
            winners: Vec::new(),
        });

        for (_, chips) in remaining.iter_mut() {
            *chips -= min;
        }

        remaining.retain(|(_, chips)| !chips.is_zero());
    }

    pots
}

/// Pays the contributions to the winners.
///
/// The contenders are the players still in the hand with their hand value,
/// when one player is left its hand may be `None`. Odd chips of a split pot go
/// one at a time to randomly picked winners.
pub fn settle<R: Rng>(
    contributions: &[(PlayerId, Chips)],
    contenders: &[(PlayerId, Option<HandValue>)],
    rng: &mut R,
) -> Result<Settlement> {
    // Every pot is bounded by the ledger total.
    let ledger = contributions
        .iter()
        .try_fold(Chips::ZERO, |acc, (_, chips)| acc.checked_add(*chips))
        .ok_or(EngineError::LedgerOverflow)?;

    let mut pots = split_pots(contributions);
    let hands = contenders.iter().copied().collect::<AHashMap<_, _>>();

    // A pot with no contenders rolls into the pot below it.
    let mut carry = Chips::ZERO;
    for idx in (0..pots.len()).rev() {
        pots[idx].amount += carry;
        carry = Chips::ZERO;

        let has_contender = pots[idx].players.iter().any(|p| hands.contains_key(p));
        if !has_contender {
            carry = pots[idx].amount;
            pots[idx].amount = Chips::ZERO;
        }
    }

    if !carry.is_zero() {
        return Err(EngineError::NoEligibleWinner(carry));
    }

    pots.retain(|pot| !pot.amount.is_zero());

    let mut paid = AHashMap::<PlayerId, Chips>::new();
    for pot in pots.iter_mut() {
        let eligible = pot
            .players
            .iter()
            .filter_map(|p| hands.get(p).map(|hand| (*p, *hand)))
            .collect::<Vec<_>>();

        let best = eligible
            .iter()
            .map(|(_, hand)| *hand)
            .max()
            .ok_or(EngineError::NoEligibleWinner(pot.amount))?;

        pot.winners = eligible
            .iter()
            .filter(|(_, hand)| *hand == best)
            .map(|(p, _)| *p)
            .collect();

        let share = pot.amount / pot.winners.len() as u32;
        let odd = (pot.amount % pot.winners.len() as u32).amount() as usize;

        for winner in &pot.winners {
            *paid.entry(*winner).or_default() += share;
        }

        for winner in pot.winners.choose_multiple(rng, odd) {
            *paid.entry(*winner).or_default() += Chips::new(1);
        }

        debug!(
            "Pot {} split between {} winners, {} odd chips",
            pot.amount,
            pot.winners.len(),
            odd
        );
    }

    let mut payouts = paid
        .into_iter()
        .map(|(player_id, chips)| Payout {
            player_id,
            chips,
            hand: hands.get(&player_id).copied().flatten(),
        })
        .collect::<Vec<_>>();
    payouts.sort_by_key(|p| p.player_id);

    let settlement = Settlement { pots, payouts };

    let total = settlement.total();
    if total != ledger {
        return Err(EngineError::SettlementMismatch {
            ledger,
            paid: total,
        });
    }

    info!(
        "Settled {} in {} pots to {} players",
        ledger,
        settlement.pots.len(),
        settlement.payouts.len()
    );

    Ok(settlement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poker::Card;

    fn pid(id: u64) -> PlayerId {
        PlayerId::new(id)
    }

    fn contributions(amounts: &[u32]) -> Vec<(PlayerId, Chips)> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, a)| (pid(i as u64 + 1), Chips::new(*a)))
            .collect()
    }

    fn hand(s: &str) -> Option<HandValue> {
        let cards = s
            .split_whitespace()
            .map(|c| c.parse::<Card>().unwrap())
            .collect::<Vec<_>>();
        Some(HandValue::eval(&cards))
    }

    #[test]
    fn peel_pots() {
        let pots = split_pots(&contributions(&[100, 100, 300]));
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].amount, Chips::new(300));
        assert_eq!(pots[0].players, vec![pid(1), pid(2), pid(3)]);
        assert_eq!(pots[1].amount, Chips::new(200));
        assert_eq!(pots[1].players, vec![pid(3)]);

        let pots = split_pots(&contributions(&[50, 0, 200, 120]));
        let amounts = pots.iter().map(|p| p.amount.amount()).collect::<Vec<_>>();
        assert_eq!(amounts, vec![150, 140, 80]);
        assert_eq!(pots[2].players, vec![pid(3)]);

        assert!(split_pots(&[]).is_empty());
    }

    #[test]
    fn ledger_totals() {
        let mut ledger = Ledger::default();
        ledger.record(Stage::PreFlop, pid(1), Chips::new(50));
        ledger.record(Stage::PreFlop, pid(2), Chips::new(100));
        ledger.record(Stage::PreFlop, pid(1), Chips::new(50));
        ledger.record(Stage::Flop, pid(1), Chips::new(200));
        ledger.record(Stage::Flop, pid(2), Chips::ZERO);

        assert_eq!(ledger.stage_total(Stage::PreFlop, pid(1)), Chips::new(100));
        assert_eq!(ledger.stage_total(Stage::Turn, pid(1)), Chips::ZERO);
        assert_eq!(ledger.player_total(pid(1)), Chips::new(300));
        assert_eq!(
            ledger.totals(),
            vec![(pid(1), Chips::new(300)), (pid(2), Chips::new(100))]
        );
        assert_eq!(ledger.total(), Chips::new(400));

        ledger.clear();
        assert!(ledger.is_empty());
    }

    #[test]
    fn side_pot_to_short_stack() {
        let mut rng = StdRng::seed_from_u64(1);
        let board = "2c 7d 9h Jd Ks";

        // Player 1 wins the main pot, player 3 takes back its side pot.
        let contenders = vec![
            (pid(1), hand(&format!("Kh Kc {board}"))),
            (pid(2), hand(&format!("2h 3h {board}"))),
            (pid(3), hand(&format!("Qh 3c {board}"))),
        ];

        let s = settle(&contributions(&[100, 100, 300]), &contenders, &mut rng).unwrap();
        assert_eq!(s.pots[0].winners, vec![pid(1)]);
        assert_eq!(s.pots[1].winners, vec![pid(3)]);
        assert_eq!(s.payouts.len(), 2);
        assert_eq!(s.payouts[0].chips, Chips::new(300));
        assert_eq!(s.payouts[1].chips, Chips::new(200));
        assert_eq!(s.total(), Chips::new(500));
    }

    #[test]
    fn folded_players_feed_pots() {
        let mut rng = StdRng::seed_from_u64(1);

        // Player 2 folded after contributing, player 1 is the only contender.
        let contenders = vec![(pid(1), None)];
        let s = settle(&contributions(&[150, 400]), &contenders, &mut rng).unwrap();
        assert_eq!(s.payouts.len(), 1);
        assert_eq!(s.payouts[0].player_id, pid(1));
        assert_eq!(s.payouts[0].chips, Chips::new(550));
        assert!(s.payouts[0].hand.is_none());
    }

    #[test]
    fn split_odd_chips() {
        let board = "2c 7d 9h Jd Ks";
        let contenders = vec![
            (pid(1), hand(&format!("Ah 3d {board}"))),
            (pid(2), hand(&format!("As 4d {board}"))),
            (pid(3), hand(&format!("Ac 5d {board}"))),
            (pid(4), hand(&format!("Qh 3c {board}"))),
        ];

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let s = settle(&contributions(&[26, 26, 26, 25]), &contenders, &mut rng).unwrap();
            assert_eq!(s.total(), Chips::new(103));

            // The main pot 100 splits 33 each plus one odd chip, the 3 chips
            // side pot splits 1 each.
            let mut chips = s.payouts.iter().map(|p| p.chips.amount()).collect::<Vec<_>>();
            chips.sort();
            assert_eq!(chips, vec![34, 34, 35]);
        }
    }

    #[test]
    fn folded_top_layer_rolls_down() {
        let mut rng = StdRng::seed_from_u64(1);
        let board = "2c 7d 9h Jd Ks";

        // Player 3 raised to 300 then folded, its side layer has no contender.
        let contenders = vec![
            (pid(1), hand(&format!("Kh Kc {board}"))),
            (pid(2), hand(&format!("2h 3h {board}"))),
        ];

        let s = settle(&contributions(&[100, 100, 300]), &contenders, &mut rng).unwrap();
        assert_eq!(s.pots.len(), 1);
        assert_eq!(s.pots[0].amount, Chips::new(500));
        assert_eq!(s.pots[0].winners, vec![pid(1)]);
        assert_eq!(s.payouts.len(), 1);
        assert_eq!(s.payouts[0].player_id, pid(1));
        assert_eq!(s.payouts[0].chips, Chips::new(500));
    }

    #[test]
    fn ledger_overflow() {
        let mut rng = StdRng::seed_from_u64(1);
        let contenders = vec![(pid(1), None)];

        let err = settle(&contributions(&[u32::MAX, 1]), &contenders, &mut rng).unwrap_err();
        assert_eq!(err, EngineError::LedgerOverflow);
        assert_eq!(err.kind(), crate::error::ErrorKind::Settlement);

        let s = settle(&contributions(&[u32::MAX - 1, 1]), &contenders, &mut rng).unwrap();
        assert_eq!(s.total(), Chips::new(u32::MAX));
    }

    #[test]
    fn no_contenders() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = settle(&contributions(&[100, 100]), &[], &mut rng).unwrap_err();
        assert_eq!(err, EngineError::NoEligibleWinner(Chips::new(200)));
    }
}
