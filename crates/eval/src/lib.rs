// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Texas Hold'em hand evaluator.
//!
//! Poker hand evaluator for 5, 6 and 7 cards hands. The evaluator enumerates
//! all the 5 cards subsets of a hand, classifies each subset into one of ten
//! [HandCategory] values and keeps the best one.
//!
//! To use the evaluator create a hand and use [HandValue] to evaluate the hand
//! and compare it with other hands:
//!
//! ```
//! # use texas_eval::*;
//! let cards = |s: &str| {
//!     s.split_whitespace()
//!         .map(|c| c.parse::<Card>().unwrap())
//!         .collect::<Vec<_>>()
//! };
//!
//! let board = cards("Ah Kd 7c 7s 2h");
//! let v1 = HandValue::eval(&[cards("As Qs"), board.clone()].concat());
//! let v2 = HandValue::eval(&[cards("7h 3d"), board].concat());
//! assert_eq!(v1.category(), HandCategory::TwoPair);
//! assert_eq!(v2.category(), HandCategory::ThreeOfAKind);
//! assert!(v2 > v1);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod eval;
pub use eval::{HandCategory, HandValue};

// Reexport cards types.
pub use texas_cards::{Card, Deck, Rank, Suit};
