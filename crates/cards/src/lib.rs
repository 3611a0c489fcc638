// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Texas Hold'em cards types.
//!
//! This crate define types to create cards:
//!
//! ```
//! # use texas_cards::{Card, Rank, Suit};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! let td: Card = "td".parse().unwrap();
//! assert!(ah.rank() > td.rank());
//! ```
//!
//! and a [Deck] type for shuffling and dealing a hand, the deal follows the
//! table order: two rounds of hole cards, then a burn card before the flop, the
//! turn and the river:
//!
//! ```
//! # use texas_cards::Deck;
//! let mut deck = Deck::new_and_shuffled(&mut rand::rng());
//! let dealt = deck.deal_hand(3).unwrap();
//! assert_eq!(dealt.hole_cards.len(), 3);
//! assert_eq!(dealt.community_cards.len(), 5);
//! assert_eq!(deck.count(), 52 - 3 * 2 - 8);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod deck;
pub use deck::{Card, DealtCards, Deck, ParseCardError, Rank, Suit};
