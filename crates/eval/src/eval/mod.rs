// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker hand evaluator.
//!
//! A hand of 5 to 7 cards is evaluated by enumerating all its 5 cards subsets
//! (21 subsets for a 7 cards hand), every subset gets a category and two
//! tie-break values and the best subset becomes the [HandValue] of the hand.
//!
//! The tie-break values are sums of `2^(rank - 1)` over the ranks that decide
//! a category, a primary group (the quads, the trips of a full house, the two
//! pairs, ...) and a secondary kicker group. As each rank maps to a distinct
//! bit, comparing the sums compares the deciding ranks from the highest down.
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

use texas_cards::Card;

mod category;
pub use category::HandCategory;

/// The value of a poker hand.
///
/// Values are ordered by category, then by the primary and secondary tie-break
/// groups. Two hands with the same ranks compare as equal regardless of suits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HandValue {
    category: HandCategory,
    primary: u32,
    secondary: u32,
    hand: [Card; 5],
}

impl HandValue {
    /// Evaluates a 5, 6, or 7 cards hand.
    ///
    /// At showdown the table passes the two hole cards with the five board
    /// cards.
    ///
    /// # Panics
    ///
    /// Panics if the number of cards is not 5 <= n <= 7.
    pub fn eval(cards: &[Card]) -> Self {
        assert!(
            (5..=7).contains(&cards.len()),
            "5 <= cards={} <= 7",
            cards.len()
        );

        let mut best = Self::eval5([cards[0], cards[1], cards[2], cards[3], cards[4]]);
        for_each_five(cards, |hand| {
            let value = Self::eval5(hand);
            if value > best {
                best = value;
            }
        });

        best
    }

    /// Evaluates exactly five cards.
    pub fn eval5(mut hand: [Card; 5]) -> Self {
        // Sort by rank for display and for the classifier.
        hand.sort_by(|c1, c2| c2.rank().cmp(&c1.rank()));

        let (category, primary, secondary) = category::classify(&hand);
        Self {
            category,
            primary,
            secondary,
            hand,
        }
    }

    /// The hand category.
    pub fn category(&self) -> HandCategory {
        self.category
    }

    /// The primary tie-break value.
    pub fn primary(&self) -> u32 {
        self.primary
    }

    /// The kicker tie-break value.
    pub fn secondary(&self) -> u32 {
        self.secondary
    }

    /// The five cards that make this hand sorted by rank.
    pub fn hand(&self) -> &[Card; 5] {
        &self.hand
    }

    /// Compares the strength of two hands.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then(self.primary.cmp(&other.primary))
            .then(self.secondary.cmp(&other.secondary))
    }
}

impl PartialEq for HandValue {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for HandValue {}

impl PartialOrd for HandValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl fmt::Display for HandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category)?;
        for card in &self.hand {
            write!(f, " {card}")?;
        }

        Ok(())
    }
}

/// Calls the `f` closure for each 5 cards subset of `cards`.
fn for_each_five<F>(cards: &[Card], mut f: F)
where
    F: FnMut([Card; 5]),
{
    let n = cards.len();
    for c1 in 0..n {
        for c2 in (c1 + 1)..n {
            for c3 in (c2 + 1)..n {
                for c4 in (c3 + 1)..n {
                    for c5 in (c4 + 1)..n {
                        f([cards[c1], cards[c2], cards[c3], cards[c4], cards[c5]]);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use texas_cards::Deck;

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace().map(|c| c.parse().unwrap()).collect()
    }

    fn eval(s: &str) -> HandValue {
        HandValue::eval(&cards(s))
    }

    #[test]
    #[should_panic(expected = "5 <= cards=4 <= 7")]
    fn too_few_cards() {
        eval("Ah Kh Qh Jh");
    }

    #[test]
    #[should_panic(expected = "5 <= cards=8 <= 7")]
    fn too_many_cards() {
        eval("Ah Kh Qh Jh Th 9h 8h 7h");
    }

    #[test]
    fn five_cards_subsets() {
        let deck = Deck::default().into_iter().take(7).collect::<Vec<_>>();

        let mut count = 0;
        for_each_five(&deck, |_| count += 1);
        assert_eq!(count, 21);

        let mut count = 0;
        for_each_five(&deck[..6], |_| count += 1);
        assert_eq!(count, 6);

        let mut count = 0;
        for_each_five(&deck[..5], |_| count += 1);
        assert_eq!(count, 1);
    }

    #[test]
    fn categories() {
        use HandCategory::*;

        assert_eq!(eval("2c 3c 4c 5c 7h").category(), HighCard);
        assert_eq!(eval("2c 3c 4c 5c 2h").category(), OnePair);
        assert_eq!(eval("2c 3c 3s 5c 2h").category(), TwoPair);
        assert_eq!(eval("2c 3c 3s 5c 3h").category(), ThreeOfAKind);
        assert_eq!(eval("2c 3c 4s 5c Ah").category(), Straight);
        assert_eq!(eval("2c 3c 4c 5c 7c").category(), Flush);
        assert_eq!(eval("2c 3c 3s 2s 3h").category(), FullHouse);
        assert_eq!(eval("2c 2h 2s 2d 3h").category(), FourOfAKind);
        assert_eq!(eval("2c 3c 4c 5c Ac").category(), StraightFlush);
        assert_eq!(eval("Tc Jc Qc Kc Ac").category(), RoyalFlush);
    }

    #[test]
    fn category_order() {
        let hands = [
            "2c 3c 4c 5c 7h",
            "2c 3c 4c 5c 2h",
            "2c 3c 3s 5c 2h",
            "2c 3c 3s 5c 3h",
            "2c 3c 4s 5c Ah",
            "2c 3c 4c 5c 7c",
            "2c 3c 3s 2s 3h",
            "2c 2h 2s 2d 3h",
            "2c 3c 4c 5c Ac",
            "Tc Jc Qc Kc Ac",
        ]
        .map(eval);

        for (i, lower) in hands.iter().enumerate() {
            for higher in &hands[i + 1..] {
                assert!(higher > lower, "{higher} > {lower}");
                assert!(lower < higher);
            }
        }
    }

    #[test]
    fn same_category_comparisons() {
        // High card, kicker decides.
        assert!(eval("2c 3c 5d Th Ah") > eval("2c 3c 4d Th Ah"));

        // Pair of twos, kicker decides.
        assert!(eval("2c 2h 5d 6d 8c") > eval("2c 2h 5d 6d 7c"));

        // Two pair, same pairs kicker decides.
        assert!(eval("2c 2h 5d 5h 8d") > eval("2c 2h 5d 5h 7d"));

        // Two pair, higher second pair wins.
        assert!(eval("2c 2h 6d 6h 7d") > eval("2c 2h 5d 5h 8d"));

        // Two pair, top pair beats two lower pairs.
        assert!(eval("Kc Kh 2d 2h 3d") > eval("Qc Qh Jd Jh Ad"));

        // The wheel is the lowest straight.
        assert!(eval("3c 4c 5d 6h 7d") > eval("2c 3h 4c 5c Ac"));

        // Same straight with different suits.
        assert_eq!(eval("3c 4c 5d 6h 7d"), eval("4s 3h 5h 6c 7c"));

        // Flush with higher cards.
        assert!(eval("3c 4c 5c 6c Tc") > eval("3c 4c 5c 7c 9c"));

        // Full house, trips decide then the pair.
        assert!(eval("3c 3h 3s 2d 2h") > eval("2c 2h 2s Ad Ah"));
        assert!(eval("3c 3h 5s 5h 5d") > eval("2d 2s 5c 5h 5d"));

        // Four of a kind, kicker decides.
        assert!(eval("5c 5s 5h 5d Kh") > eval("5c 5s 5h 5d Qh"));

        // Straight flushes.
        assert!(eval("3c 4c 5c 6c 7c") > eval("Ac 2c 3c 4c 5c"));
        assert!(eval("Tc Jc Qc Kc Ac") > eval("9c Tc Jc Qc Kc"));
    }

    #[test]
    fn ties_ignore_suits() {
        let v1 = eval("Ac Kd 9h 7s 3c");
        let v2 = eval("Ad Kc 9s 7h 3d");
        assert_eq!(v1.compare(&v2), Ordering::Equal);

        let v3 = eval("Ah Kh 9c 7c 3h");
        assert_eq!(v1, v3);
        assert_eq!(v2, v3);
    }

    #[test]
    fn best_of_seven() {
        // Quads on the board plus an ace kicker from the hole cards.
        let v = eval("2c As 3s 3h 3c 3d 5h");
        assert_eq!(v.category(), HandCategory::FourOfAKind);
        assert!(v.hand().contains(&"As".parse().unwrap()));

        // A flush hidden in seven cards.
        let v = eval("Ah 2h 9c 5h Kh 9s 7h");
        assert_eq!(v.category(), HandCategory::Flush);
        assert!(v.hand().iter().all(|c| c.suit() == texas_cards::Suit::Hearts));

        // Six cards with a straight.
        let v = eval("9c Tc Jh Qs Kd 2c");
        assert_eq!(v.category(), HandCategory::Straight);
    }

    #[test]
    fn board_plays() {
        let board = "Tc Jc Qc Kc Ac";
        let v1 = eval(&format!("2h 3d {board}"));
        let v2 = eval(&format!("9c 8c {board}"));
        assert_eq!(v1, v2);
        assert_eq!(v1.category(), HandCategory::RoyalFlush);
    }

    #[test]
    fn eval_is_order_independent() {
        let mut rng = StdRng::seed_from_u64(101);
        for _ in 0..200 {
            let mut deck = Deck::new_and_shuffled(&mut rng);
            let mut hand = (0..7).filter_map(|_| deck.deal()).collect::<Vec<_>>();
            let v1 = HandValue::eval(&hand);
            hand.shuffle(&mut rng);
            let v2 = HandValue::eval(&hand);
            assert_eq!(v1, v2);
            assert_eq!(v1.hand().len(), 5);
        }
    }

    #[test]
    fn sort_finds_multiway_ties() {
        let board = "2c 7d 9h Jd Ks";
        let mut values = [
            ("p1", eval(&format!("Ah 3d {board}"))),
            ("p2", eval(&format!("As 4d {board}"))),
            ("p3", eval(&format!("Qh 3c {board}"))),
        ];

        values.sort_by(|a, b| b.1.cmp(&a.1));
        let best = values[0].1;
        let winners = values
            .iter()
            .filter(|(_, v)| *v == best)
            .map(|(p, _)| *p)
            .collect::<Vec<_>>();

        // Board plays the kickers, both ace-high hands tie.
        assert_eq!(winners.len(), 2);
        assert!(winners.contains(&"p1") && winners.contains(&"p2"));
    }
}
