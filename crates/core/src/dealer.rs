// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Card sources used to deal a hand.
use rand::prelude::*;
use std::collections::VecDeque;

use crate::{
    error::{EngineError, Result},
    poker::{DealtCards, Deck},
};

/// Deals the hole and community cards of a hand.
pub trait CardSource {
    /// Deals cards for the given number of players.
    fn deal_cards(&mut self, players: usize) -> Result<DealtCards>;
}

/// Deals from a freshly shuffled deck each hand.
#[derive(Debug, Clone)]
pub struct ShuffledDeck {
    rng: StdRng,
}

impl ShuffledDeck {
    /// Creates a source seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Creates a source with user initialized randomness.
    pub fn with_rng(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl Default for ShuffledDeck {
    fn default() -> Self {
        Self::new()
    }
}

impl CardSource for ShuffledDeck {
    fn deal_cards(&mut self, players: usize) -> Result<DealtCards> {
        Deck::new_and_shuffled(&mut self.rng)
            .deal_hand(players)
            .ok_or(EngineError::DeckExhausted)
    }
}

/// Deals prearranged hands in order, for replays and tests.
#[derive(Debug, Clone, Default)]
pub struct PresetCards {
    hands: VecDeque<DealtCards>,
}

impl PresetCards {
    /// Creates a source from a list of hands.
    pub fn new(hands: impl IntoIterator<Item = DealtCards>) -> Self {
        Self {
            hands: hands.into_iter().collect(),
        }
    }

    /// Appends a hand.
    pub fn push(&mut self, hand: DealtCards) {
        self.hands.push_back(hand);
    }
}

impl CardSource for PresetCards {
    fn deal_cards(&mut self, players: usize) -> Result<DealtCards> {
        match self.hands.pop_front() {
            Some(hand) if hand.hole_cards.len() >= players => Ok(hand),
            _ => Err(EngineError::DeckExhausted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffled_deck() {
        let mut source = ShuffledDeck::with_rng(StdRng::seed_from_u64(3));
        let dealt = source.deal_cards(10).unwrap();
        assert_eq!(dealt.hole_cards.len(), 10);
        assert!(source.deal_cards(30).is_err());
    }

    #[test]
    fn preset_cards() {
        let mut deck = Deck::new_and_shuffled(&mut StdRng::seed_from_u64(3));
        let hand = deck.deal_hand(2).unwrap();

        let mut source = PresetCards::new([hand.clone()]);
        assert!(source.deal_cards(3).is_err());

        source.push(hand.clone());
        assert_eq!(source.deal_cards(2).unwrap(), hand);
        assert_eq!(source.deal_cards(2), Err(EngineError::DeckExhausted));
    }
}
