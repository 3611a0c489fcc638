// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Events delivered to the table host.
use serde::{Deserialize, Serialize};
use std::sync::mpsc;

use crate::{
    action::{ActionKind, BetRange, PlayerAction},
    error::ErrorKind,
    poker::{Card, PlayerId, Stage},
    settlement::{Payout, Pot},
};

/// A table event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TableEvent {
    /// A player received the right to act.
    PreAction {
        /// The player to act.
        player_id: PlayerId,
        /// The legal actions.
        allowed: Vec<ActionKind>,
        /// The bet or raise range.
        range: Option<BetRange>,
    },
    /// A player acted.
    Action {
        /// The player who acted.
        player_id: PlayerId,
        /// The action with the chips moved.
        action: PlayerAction,
        /// Blinds are forced.
        forced: bool,
    },
    /// The hand moved to a new stage.
    NextStage {
        /// The new stage.
        stage: Stage,
        /// The stage that ended.
        last_stage: Stage,
        /// The community cards revealed.
        revealed: Vec<Card>,
    },
    /// The hand ended.
    GameEnd {
        /// The stage the hand ended in.
        final_stage: Stage,
        /// The remaining community cards revealed for the showdown.
        revealed: Vec<Card>,
        /// Hole cards are shown.
        showdown: bool,
    },
    /// The pots have been paid.
    Settled {
        /// The pots with their winners.
        pots: Vec<Pot>,
        /// The chips paid to each winner.
        payouts: Vec<Payout>,
    },
    /// An operation failed.
    Error {
        /// The error category.
        kind: ErrorKind,
        /// The error message.
        message: String,
    },
}

/// Receives the table events.
pub trait EventSink {
    /// Handles an event.
    fn emit(&mut self, event: TableEvent);
}

impl<F> EventSink for F
where
    F: FnMut(TableEvent),
{
    fn emit(&mut self, event: TableEvent) {
        self(event)
    }
}

/// A sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&mut self, _event: TableEvent) {}
}

/// A sink that forwards events on a channel.
#[derive(Debug, Clone)]
pub struct ChannelSink(mpsc::Sender<TableEvent>);

impl ChannelSink {
    /// Creates a sink and the receiving end.
    pub fn new() -> (Self, mpsc::Receiver<TableEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self(tx), rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&mut self, event: TableEvent) {
        // The host may have gone away.
        let _ = self.0.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poker::Chips;

    #[test]
    fn closure_sink() {
        let mut count = 0;
        {
            let mut sink = |_: TableEvent| count += 1;
            sink.emit(TableEvent::Action {
                player_id: PlayerId::new(1),
                action: PlayerAction::Bet(Chips::new(10)),
                forced: true,
            });
        }

        assert_eq!(count, 1);
    }

    #[test]
    fn channel_sink() {
        let (mut sink, rx) = ChannelSink::new();
        sink.emit(TableEvent::Error {
            kind: ErrorKind::IllegalAction,
            message: "not your turn".to_string(),
        });

        let event = rx.try_recv().unwrap();
        assert!(matches!(event, TableEvent::Error { kind: ErrorKind::IllegalAction, .. }));

        drop(rx);
        NoopSink.emit(event.clone());
        sink.emit(event);
    }
}
