// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Per-player action countdown driven by the host tick.
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The action countdown of a player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Countdown {
    /// Not running.
    #[default]
    Idle,
    /// Running with the remaining thinking time.
    Armed {
        /// Time left to act.
        remaining: Duration,
    },
    /// Stopped while the table is paused.
    Suspended {
        /// Time left when the table was paused.
        remaining: Duration,
    },
    /// The thinking time ran out.
    Expired,
    /// The engine acted on behalf of the player.
    AutoActed,
}

impl Countdown {
    /// Starts the countdown with the given thinking time.
    pub fn arm(&mut self, thinking_time: Duration) {
        *self = Countdown::Armed {
            remaining: thinking_time,
        };
    }

    /// Advances an armed countdown, returns true when it expires.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if let Countdown::Armed { remaining } = *self {
            let remaining = remaining.saturating_sub(elapsed);
            if remaining.is_zero() {
                *self = Countdown::Expired;
                return true;
            }

            *self = Countdown::Armed { remaining };
        }

        false
    }

    /// Suspends an armed countdown.
    pub fn suspend(&mut self) {
        if let Countdown::Armed { remaining } = *self {
            *self = Countdown::Suspended { remaining };
        }
    }

    /// Resumes a suspended countdown with the full thinking time.
    pub fn resume(&mut self, thinking_time: Duration) {
        if matches!(self, Countdown::Suspended { .. }) {
            self.arm(thinking_time);
        }
    }

    /// Stops the countdown.
    pub fn disarm(&mut self) {
        *self = Countdown::Idle;
    }

    /// Records an automatic action after expiry.
    pub fn auto_acted(&mut self) {
        *self = Countdown::AutoActed;
    }

    /// The remaining time if the countdown is armed or suspended.
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            Countdown::Armed { remaining } | Countdown::Suspended { remaining } => Some(*remaining),
            _ => None,
        }
    }

    /// Checks if the countdown is running.
    pub fn is_armed(&self) -> bool {
        matches!(self, Countdown::Armed { .. })
    }
}
