//! Player lookup
//!
//! This module defines the trait used to resolve a Riot ID into a
//! [`PlayerRecord`]. Real implementations talk to the ranked API; this crate
//! only ships an in-memory directory. Any closure with the right signature
//! also works as a directory.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::player::{PlayerRecord, RiotId};

/// Errors that can occur when looking up a player
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No player is registered under the Riot ID
    #[error("player not found")]
    NotFound,
    /// The directory could not answer
    #[error("player directory unavailable: {0}")]
    Unavailable(String),
}

/// Trait for resolving Riot IDs into player records
pub trait PlayerDirectory {
    /// Looks up the player registered under a Riot ID
    ///
    /// # Errors
    ///
    /// * `LookupError::NotFound` - No such player exists
    /// * `LookupError::Unavailable` - The lookup itself failed
    fn lookup(&self, riot_id: &RiotId) -> Result<PlayerRecord, LookupError>;
}

impl<F: Fn(&RiotId) -> Result<PlayerRecord, LookupError>> PlayerDirectory for F {
    fn lookup(&self, riot_id: &RiotId) -> Result<PlayerRecord, LookupError> {
        self(riot_id)
    }
}

/// A directory backed by a map, keyed case-insensitively by Riot ID
#[derive(Debug, Default, Clone)]
pub struct InMemoryDirectory {
    players: HashMap<String, PlayerRecord>,
}

impl InMemoryDirectory {
    /// Registers a player under the Riot ID stored in its record
    ///
    /// # Returns
    ///
    /// The record previously registered under the same Riot ID, if any
    pub fn insert(&mut self, player: PlayerRecord) -> Option<PlayerRecord> {
        self.players.insert(player.riot_id().to_lowercase(), player)
    }

    /// Returns the number of registered players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether no players are registered
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl FromIterator<PlayerRecord> for InMemoryDirectory {
    fn from_iter<I: IntoIterator<Item = PlayerRecord>>(iter: I) -> Self {
        let mut directory = Self::default();
        for player in iter {
            directory.insert(player);
        }
        directory
    }
}

impl PlayerDirectory for InMemoryDirectory {
    fn lookup(&self, riot_id: &RiotId) -> Result<PlayerRecord, LookupError> {
        self.players
            .get(&riot_id.key())
            .cloned()
            .ok_or(LookupError::NotFound)
    }
}
