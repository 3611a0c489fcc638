// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Texas Hold'em table rules engine.
//!
//! A [Table] seats players, posts the blinds, validates the actions of the
//! player holding the right to act, advances the betting stages and settles
//! the pots at the end of the hand. The host drives the table by calling its
//! methods and receives [TableEvent]s through an [EventSink].
//!
//! ```
//! use texas_core::{Action, Chips, NoopSink, PlayerId, ShuffledDeck, Table, TableConfig};
//!
//! let mut table = Table::new(TableConfig::default(), ShuffledDeck::new(), NoopSink).unwrap();
//! table.join(PlayerId::new(1), Chips::new(1_000)).unwrap();
//! table.join(PlayerId::new(2), Chips::new(1_000)).unwrap();
//! table.start_hand().unwrap();
//!
//! let player_id = table.active_player().unwrap();
//! table.act(player_id, Action::Fold).unwrap();
//! assert_eq!(table.chips_in_play(), Chips::new(2_000));
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod action;
pub mod countdown;
pub mod dealer;
pub mod error;
pub mod events;
pub mod player;
pub mod poker;
pub mod ring;
pub mod settlement;
pub mod table;
pub mod validator;

pub use action::{Action, ActionKind, ActionLog, AllowedActions, BetRange, PlayerAction};
pub use dealer::{CardSource, PresetCards, ShuffledDeck};
pub use error::{EngineError, ErrorKind, Result};
pub use events::{ChannelSink, EventSink, NoopSink, TableEvent};
pub use player::{Player, PlayerStatus};
pub use poker::{Chips, PlayerId, Stage, TableId};
pub use ring::Role;
pub use settlement::{Payout, Pot, Settlement};
pub use table::{BlindBet, Table, TableConfig, TableStatus};
