// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
//
// Run with:
//
// ```bash
// $ cargo r --release --example eval_all7 -- 1000000
// ...
// Total hands      1000000
// Elapsed:         0.912s
// Hands/sec:       1096491
//
// High Card:       174076
// One Pair:        438178
// ...
// ```

use rand::prelude::*;
use std::time::Instant;

use texas_eval::*;

fn main() {
    let hands = std::env::args()
        .nth(1)
        .and_then(|n| n.parse::<usize>().ok())
        .unwrap_or(1_000_000);

    let categories = [
        HandCategory::HighCard,
        HandCategory::OnePair,
        HandCategory::TwoPair,
        HandCategory::ThreeOfAKind,
        HandCategory::Straight,
        HandCategory::Flush,
        HandCategory::FullHouse,
        HandCategory::FourOfAKind,
        HandCategory::StraightFlush,
        HandCategory::RoyalFlush,
    ];

    // Evaluate random 7 cards hands.
    let mut rng = StdRng::seed_from_u64(7);
    let now = Instant::now();
    let mut counts = [0usize; 10];

    for _ in 0..hands {
        let mut deck = Deck::new_and_shuffled(&mut rng);
        let hand = (0..7).filter_map(|_| deck.deal()).collect::<Vec<_>>();
        let category = HandValue::eval(&hand).category();
        counts[category as usize] += 1;
    }

    let elapsed = now.elapsed().as_secs_f64();
    let total = counts.iter().sum::<usize>();
    println!("Total hands      {total}");
    println!("Elapsed:         {:.3}s", elapsed);
    println!("Hands/sec:       {:.0}\n", total as f64 / elapsed);

    for category in categories {
        let label = format!("{category}:");
        println!("{label:<17}{}", counts[category as usize]);
    }
}
