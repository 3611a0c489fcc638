// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Five cards hand classification.
use serde::{Deserialize, Serialize};
use std::fmt;

use texas_cards::{Card, Rank};

/// Hand categories from the weakest to the strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandCategory {
    /// No other category.
    HighCard,
    /// Two cards of the same rank.
    OnePair,
    /// Two different pairs.
    TwoPair,
    /// Three cards of the same rank.
    ThreeOfAKind,
    /// Five consecutive ranks, the ace plays high or low.
    Straight,
    /// Five cards of the same suit.
    Flush,
    /// Three of a kind plus a pair.
    FullHouse,
    /// Four cards of the same rank.
    FourOfAKind,
    /// A straight of the same suit.
    StraightFlush,
    /// Ace high straight flush.
    RoyalFlush,
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "One Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
            HandCategory::RoyalFlush => "Royal Flush",
        };

        f.write_str(label)
    }
}

/// Rank weight used for tie-breaks, a deuce is 2 and an ace is 2^13.
fn weight(rank: Rank) -> u32 {
    1 << (rank.value() - 1)
}

/// Classifies five cards sorted by descending rank.
///
/// Returns the category with the primary and secondary tie-break values.
pub(crate) fn classify(hand: &[Card; 5]) -> (HandCategory, u32, u32) {
    let is_flush = hand.iter().all(|c| c.suit() == hand[0].suit());
    let straight_high = straight_high(hand);

    // Group ranks by count, larger groups first then higher ranks first.
    let mut groups: Vec<(usize, Rank)> = Vec::with_capacity(5);
    for card in hand {
        match groups.iter_mut().find(|(_, r)| *r == card.rank()) {
            Some((count, _)) => *count += 1,
            None => groups.push((1, card.rank())),
        }
    }
    groups.sort_by(|(c1, r1), (c2, r2)| c2.cmp(c1).then(r2.cmp(r1)));

    let sum = |groups: &[(usize, Rank)]| groups.iter().map(|(_, r)| weight(*r)).sum::<u32>();
    let counts = groups.iter().map(|(c, _)| *c).collect::<Vec<_>>();

    match (is_flush, straight_high, counts.as_slice()) {
        (true, Some(Rank::Ace), _) => (HandCategory::RoyalFlush, weight(Rank::Ace), 0),
        (true, Some(high), _) => (HandCategory::StraightFlush, weight(high), 0),
        (_, _, [4, 1]) => (
            HandCategory::FourOfAKind,
            weight(groups[0].1),
            weight(groups[1].1),
        ),
        (_, _, [3, 2]) => (
            HandCategory::FullHouse,
            weight(groups[0].1),
            weight(groups[1].1),
        ),
        (true, _, _) => (HandCategory::Flush, sum(&groups), 0),
        (_, Some(high), _) => (HandCategory::Straight, weight(high), 0),
        (_, _, [3, 1, 1]) => (
            HandCategory::ThreeOfAKind,
            weight(groups[0].1),
            sum(&groups[1..]),
        ),
        (_, _, [2, 2, 1]) => (
            HandCategory::TwoPair,
            sum(&groups[..2]),
            weight(groups[2].1),
        ),
        (_, _, [2, 1, 1, 1]) => (
            HandCategory::OnePair,
            weight(groups[0].1),
            sum(&groups[1..]),
        ),
        _ => (HandCategory::HighCard, sum(&groups), 0),
    }
}

/// Returns the high rank if the cards make a straight.
///
/// The wheel A-2-3-4-5 is a five high straight.
fn straight_high(hand: &[Card; 5]) -> Option<Rank> {
    let values = hand.map(|c| c.rank().value());
    let consecutive = values.windows(2).all(|w| w[0] == w[1] + 1);
    if consecutive {
        Some(hand[0].rank())
    } else if values == [14, 5, 4, 3, 2] {
        Some(Rank::Five)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(s: &str) -> [Card; 5] {
        let mut cards = [Card::new(Rank::Ace, texas_cards::Suit::Hearts); 5];
        for (i, c) in s.split_whitespace().enumerate() {
            cards[i] = c.parse().unwrap();
        }
        cards.sort_by(|c1, c2| c2.rank().cmp(&c1.rank()));
        cards
    }

    #[test]
    fn weights() {
        assert_eq!(weight(Rank::Deuce), 2);
        assert_eq!(weight(Rank::Five), 16);
        assert_eq!(weight(Rank::Ace), 8192);
    }

    #[test]
    fn wheel() {
        let (category, primary, _) = classify(&sorted("Ah 2c 3d 4s 5h"));
        assert_eq!(category, HandCategory::Straight);
        assert_eq!(primary, weight(Rank::Five));

        let (category, primary, _) = classify(&sorted("Ah 2h 3h 4h 5h"));
        assert_eq!(category, HandCategory::StraightFlush);
        assert_eq!(primary, weight(Rank::Five));
    }

    #[test]
    fn no_wrap_around() {
        let (category, ..) = classify(&sorted("Qh Kc Ad 2s 3h"));
        assert_eq!(category, HandCategory::HighCard);
    }

    #[test]
    fn tie_break_groups() {
        let (category, primary, secondary) = classify(&sorted("9h 9c 9d Ks Kh"));
        assert_eq!(category, HandCategory::FullHouse);
        assert_eq!(primary, weight(Rank::Nine));
        assert_eq!(secondary, weight(Rank::King));

        let (category, primary, secondary) = classify(&sorted("Jh Jc 4d 4s 7h"));
        assert_eq!(category, HandCategory::TwoPair);
        assert_eq!(primary, weight(Rank::Jack) + weight(Rank::Four));
        assert_eq!(secondary, weight(Rank::Seven));

        let (category, primary, secondary) = classify(&sorted("6h 6c Ad 3s 2h"));
        assert_eq!(category, HandCategory::OnePair);
        assert_eq!(primary, weight(Rank::Six));
        assert_eq!(
            secondary,
            weight(Rank::Ace) + weight(Rank::Trey) + weight(Rank::Deuce)
        );
    }

    #[test]
    fn labels() {
        assert_eq!(HandCategory::ThreeOfAKind.to_string(), "Three of a Kind");
        assert_eq!(HandCategory::RoyalFlush.to_string(), "Royal Flush");
    }
}
