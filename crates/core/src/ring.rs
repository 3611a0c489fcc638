// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Circular seating order with the button marker.
//!
//! Players are stored in an arena of slots, each node links to its neighbors
//! by slot index. Traversals start from the player after the button, or from
//! the first player who joined when there is no button yet.
use log::debug;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    error::{EngineError, Result},
    player::{Player, PlayerStatus},
    poker::PlayerId,
};

/// Position of a player relative to the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The dealer button.
    Button,
    /// Small blind.
    SmallBlind,
    /// Big blind.
    BigBlind,
    /// Under the gun, with the offset from the first UTG seat.
    UnderTheGun(u8),
    /// Middle position, with the offset from the first MP seat.
    MiddlePosition(u8),
    /// Hijack.
    HiJack,
    /// Cutoff.
    CutOff,
}

impl Role {
    /// Roles from the button onward for the given number of players.
    pub fn table(players: usize) -> Option<&'static [Role]> {
        use Role::*;

        let roles: &'static [Role] = match players {
            2 => &[Button, BigBlind],
            3 => &[Button, SmallBlind, BigBlind],
            4 => &[Button, SmallBlind, BigBlind, UnderTheGun(0)],
            5 => &[Button, SmallBlind, BigBlind, UnderTheGun(0), MiddlePosition(0)],
            6 => &[
                Button,
                SmallBlind,
                BigBlind,
                UnderTheGun(0),
                MiddlePosition(0),
                CutOff,
            ],
            7 => &[
                Button,
                SmallBlind,
                BigBlind,
                UnderTheGun(0),
                MiddlePosition(0),
                HiJack,
                CutOff,
            ],
            8 => &[
                Button,
                SmallBlind,
                BigBlind,
                UnderTheGun(0),
                MiddlePosition(0),
                MiddlePosition(1),
                HiJack,
                CutOff,
            ],
            9 => &[
                Button,
                SmallBlind,
                BigBlind,
                UnderTheGun(0),
                UnderTheGun(1),
                MiddlePosition(0),
                MiddlePosition(1),
                HiJack,
                CutOff,
            ],
            10 => &[
                Button,
                SmallBlind,
                BigBlind,
                UnderTheGun(0),
                UnderTheGun(1),
                UnderTheGun(2),
                MiddlePosition(0),
                MiddlePosition(1),
                HiJack,
                CutOff,
            ],
            _ => return None,
        };

        Some(roles)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Button => f.write_str("BTN"),
            Role::SmallBlind => f.write_str("SB"),
            Role::BigBlind => f.write_str("BB"),
            Role::UnderTheGun(0) => f.write_str("UTG"),
            Role::UnderTheGun(n) => write!(f, "UTG+{n}"),
            Role::MiddlePosition(0) => f.write_str("MP"),
            Role::MiddlePosition(n) => write!(f, "MP+{n}"),
            Role::HiJack => f.write_str("HJ"),
            Role::CutOff => f.write_str("CO"),
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    player: Player,
    next: usize,
    prev: usize,
}

/// The players ring.
#[derive(Debug, Clone, Default)]
pub struct Ring {
    slots: Vec<Option<Node>>,
    head: Option<usize>,
    tail: Option<usize>,
    button: Option<usize>,
    len: usize,
}

impl Ring {
    /// Seats a player after the last seated player.
    pub fn join(&mut self, player: Player) -> Result<()> {
        if self.index_of(player.player_id).is_some() {
            return Err(EngineError::AlreadySeated(player.player_id));
        }

        let idx = match self.slots.iter().position(Option::is_none) {
            Some(idx) => idx,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        };

        let (next, prev) = match (self.head, self.tail) {
            (Some(head), Some(tail)) => (head, tail),
            _ => (idx, idx),
        };

        self.slots[idx] = Some(Node { player, next, prev });
        if next != idx {
            self.node_mut(prev).next = idx;
            self.node_mut(next).prev = idx;
        } else {
            self.head = Some(idx);
        }

        self.tail = Some(idx);
        self.len += 1;
        self.assign_roles();
        Ok(())
    }

    /// Removes a player, a button on the player moves to the next neighbor.
    pub fn remove(&mut self, player_id: PlayerId) -> Result<Player> {
        let idx = self
            .index_of(player_id)
            .ok_or(EngineError::UnknownPlayer(player_id))?;
        let Some(node) = self.slots[idx].take() else {
            return Err(EngineError::UnknownPlayer(player_id));
        };

        self.len -= 1;
        if self.len == 0 {
            self.slots.clear();
            self.head = None;
            self.tail = None;
            self.button = None;
        } else {
            self.node_mut(node.prev).next = node.next;
            self.node_mut(node.next).prev = node.prev;

            if self.head == Some(idx) {
                self.head = Some(node.next);
            }

            if self.tail == Some(idx) {
                self.tail = Some(node.prev);
            }

            if self.button == Some(idx) {
                self.button = Some(node.next);
            }
        }

        let mut player = node.player;
        player.role = None;
        self.assign_roles();
        Ok(player)
    }

    /// Places the button.
    ///
    /// With a player id the button goes to that player, without one a random
    /// player gets the button if it is not set, otherwise the button moves to
    /// the next player.
    pub fn set_button<R: Rng>(&mut self, player_id: Option<PlayerId>, rng: &mut R) -> Result<()> {
        let idx = match player_id {
            Some(player_id) => self
                .index_of(player_id)
                .ok_or(EngineError::UnknownPlayer(player_id))?,
            None => match self.button {
                Some(button) => self.node(button).next,
                None => {
                    let seated = self.indices();
                    *seated
                        .choose(rng)
                        .ok_or(EngineError::UnsupportedPlayerCount(0))?
                }
            },
        };

        self.button = Some(idx);
        self.assign_roles();

        debug!("Button on player {}", self.node(idx).player.player_id);
        Ok(())
    }

    /// The player holding the button.
    pub fn button(&self) -> Option<PlayerId> {
        self.button.map(|idx| self.node(idx).player.player_id)
    }

    /// Number of seated players.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks if there are no seated players.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The first waiting player after the button.
    pub fn first_player_to_act(&self) -> Option<PlayerId> {
        self.find(|p| p.status == PlayerStatus::Waiting)
            .map(|p| p.player_id)
    }

    /// The first waiting player after the given player, excluding the player.
    pub fn next_to_act(&self, player_id: PlayerId) -> Option<PlayerId> {
        let mut idx = self.index_of(player_id)?;
        for _ in 1..self.len {
            idx = self.node(idx).next;
            let player = &self.node(idx).player;
            if player.status == PlayerStatus::Waiting {
                return Some(player.player_id);
            }
        }

        None
    }

    /// The player seated after the given player.
    pub fn next_of(&self, player_id: PlayerId) -> Option<PlayerId> {
        let idx = self.index_of(player_id)?;
        Some(self.node(self.node(idx).next).player.player_id)
    }

    /// Returns a player by id.
    pub fn get(&self, player_id: PlayerId) -> Option<&Player> {
        self.index_of(player_id).map(|idx| &self.node(idx).player)
    }

    /// Returns a mutable player by id.
    pub fn get_mut(&mut self, player_id: PlayerId) -> Option<&mut Player> {
        let idx = self.index_of(player_id)?;
        Some(&mut self.node_mut(idx).player)
    }

    /// Iterates players in table order starting after the button.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.indices()
            .into_iter()
            .map(|idx| &self.node(idx).player)
    }

    /// Finds the first player in table order matching the predicate.
    pub fn find<F>(&self, mut f: F) -> Option<&Player>
    where
        F: FnMut(&Player) -> bool,
    {
        self.iter().find(|p| f(*p))
    }

    /// Returns the players matching the predicate in table order.
    pub fn filter<F>(&self, mut f: F) -> Vec<&Player>
    where
        F: FnMut(&Player) -> bool,
    {
        self.iter().filter(|p| f(*p)).collect()
    }

    /// Checks if all players match the predicate, true on an empty ring.
    pub fn every<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&Player) -> bool,
    {
        self.iter().all(|p| f(p))
    }

    /// Calls the closure on each player in table order.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Player),
    {
        for idx in self.indices() {
            f(&mut self.node_mut(idx).player);
        }
    }

    /// Slot indices in table order.
    fn indices(&self) -> Vec<usize> {
        let start = match (self.button, self.head) {
            (Some(button), _) => self.node(button).next,
            (None, Some(head)) => head,
            (None, None) => return Vec::new(),
        };

        let mut indices = Vec::with_capacity(self.len);
        let mut idx = start;
        for _ in 0..self.len {
            indices.push(idx);
            idx = self.node(idx).next;
        }

        indices
    }

    fn assign_roles(&mut self) {
        let roles = self.button.and_then(|_| Role::table(self.len));

        // Traversal starts after the button, rotate so the button comes first.
        let mut indices = self.indices();
        let len = indices.len();
        indices.rotate_right(1.min(len));

        for (pos, idx) in indices.into_iter().enumerate() {
            self.node_mut(idx).player.role = roles.map(|r| r[pos]);
        }
    }

    fn index_of(&self, player_id: PlayerId) -> Option<usize> {
        self.slots.iter().position(|slot| {
            slot.as_ref()
                .map(|n| n.player.player_id == player_id)
                .unwrap_or(false)
        })
    }

    // Links always point to occupied slots.
    fn node(&self, idx: usize) -> &Node {
        match &self.slots[idx] {
            Some(node) => node,
            None => unreachable!("ring link to empty slot {idx}"),
        }
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node {
        match &mut self.slots[idx] {
            Some(node) => node,
            None => unreachable!("ring link to empty slot {idx}"),
        }
    }
}
