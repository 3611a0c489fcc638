// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Async host for Texas Hold'em tables.
//!
//! Each [TableHandle] owns a table running in its own tokio task, commands
//! are sent to the task and answered on oneshot channels while the table
//! events are streamed on an unbounded channel.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod bot;
pub mod host;
pub mod sim;

pub use bot::{CallOrCheck, RandomStrategy, Strategy};
pub use host::{TableHandle, TableSnapshot};
pub use sim::{Config, TableReport};

/// Re-export core.
pub use texas_core as core;
