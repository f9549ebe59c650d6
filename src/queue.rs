//! Match queue management
//!
//! This module holds the players gathered for the next match. The queue
//! keeps at most ten unique players, lets each of them pick their roles,
//! and hands a full queue to the team balancer.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    constants,
    directory::{LookupError, PlayerDirectory},
    player::{PlayerId, PlayerRecord, RiotId, RiotIdError},
    role::{Role, RoleSlot},
    teams::{self, BalanceMode, TeamResult},
};

/// Errors that can occur when managing the match queue
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The queue already holds ten players
    #[error("match queue is full")]
    Full,
    /// The player is already waiting in the queue
    #[error("player {0} is already queued")]
    AlreadyQueued(PlayerId),
    /// The player is not in the queue
    #[error("player {0} is not queued")]
    NotQueued(PlayerId),
    /// A batch asks for more seats than are left
    #[error("not enough room in the queue: {requested} requested, {available} available")]
    InsufficientCapacity {
        /// Seats left in the queue
        available: usize,
        /// Players in the batch
        requested: usize,
    },
    /// Team formation rejected the queue
    #[error(transparent)]
    Balance(#[from] teams::Error),
}

/// Why a single line of a batch was not added
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// The line is not a valid Riot ID
    #[error(transparent)]
    RiotId(#[from] RiotIdError),
    /// The directory could not resolve the Riot ID
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// The queue refused the player
    #[error(transparent)]
    Queue(#[from] Error),
}

/// A batch line that could not be added
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    /// The trimmed input line
    pub input: String,
    /// Why it was rejected
    pub error: EntryError,
}

/// The outcome of adding several players at once
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Players added, in input order
    pub added: Vec<PlayerId>,
    /// Lines that were rejected, in input order
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// Whether every line was added
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Splits free text into one Riot ID candidate per non-blank line
pub fn parse_riot_id_lines(input: &str) -> Vec<&str> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// The players waiting for the next match
#[derive(Debug, Default, Clone, Serialize)]
pub struct MatchQueue {
    players: Vec<PlayerRecord>,
}

impl MatchQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the queued players in the order they joined
    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    /// Returns the number of queued players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether no players are queued
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Whether the queue holds enough players for a match
    pub fn is_full(&self) -> bool {
        self.players.len() >= constants::queue::CAPACITY
    }

    /// Returns the number of seats left
    pub fn remaining_capacity(&self) -> usize {
        constants::queue::CAPACITY.saturating_sub(self.players.len())
    }

    /// Whether a player is queued
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.players.iter().any(|player| player.id == *id)
    }

    /// Gets a queued player
    pub fn get(&self, id: &PlayerId) -> Option<&PlayerRecord> {
        self.players.iter().find(|player| player.id == *id)
    }

    /// Adds a player to the end of the queue
    ///
    /// The player joins without any role preference.
    ///
    /// # Errors
    ///
    /// * `Error::Full` - Ten players are already queued
    /// * `Error::AlreadyQueued` - A player with the same id is queued
    pub fn add(&mut self, mut player: PlayerRecord) -> Result<(), Error> {
        if self.is_full() {
            return Err(Error::Full);
        }
        if self.contains(&player.id) {
            return Err(Error::AlreadyQueued(player.id));
        }
        player.roles.clear();
        debug!(player = %player.id, queued = self.players.len() + 1, "player queued");
        self.players.push(player);
        Ok(())
    }

    /// Removes a player from the queue
    ///
    /// # Errors
    ///
    /// Returns `Error::NotQueued` if the player is not in the queue.
    pub fn remove(&mut self, id: &PlayerId) -> Result<PlayerRecord, Error> {
        let index = self
            .players
            .iter()
            .position(|player| player.id == *id)
            .ok_or_else(|| Error::NotQueued(id.clone()))?;
        debug!(player = %id, "player removed from queue");
        Ok(self.players.remove(index))
    }

    /// Removes every player from the queue
    pub fn clear(&mut self) {
        debug!(cleared = self.players.len(), "queue cleared");
        self.players.clear();
    }

    /// Sets or clears one of a queued player's role slots
    ///
    /// Choosing the role held by the other slot swaps the two slots.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotQueued` if the player is not in the queue.
    pub fn set_role(
        &mut self,
        id: &PlayerId,
        slot: RoleSlot,
        value: Option<Role>,
    ) -> Result<(), Error> {
        let player = self
            .players
            .iter_mut()
            .find(|player| player.id == *id)
            .ok_or_else(|| Error::NotQueued(id.clone()))?;
        player.roles.set(slot, value);
        Ok(())
    }

    /// Splits the queued players into two teams
    ///
    /// # Errors
    ///
    /// Returns `Error::Balance` unless exactly ten unique players are queued.
    pub fn generate(&self, mode: BalanceMode) -> Result<TeamResult, Error> {
        Ok(teams::balance_teams(&self.players, mode)?)
    }

    /// Looks up and adds one player per non-blank line of `input`
    ///
    /// Lines are processed in order. A line that fails to parse, to resolve
    /// or to join the queue is recorded in the report and does not stop the
    /// remaining lines.
    ///
    /// # Errors
    ///
    /// Returns `Error::InsufficientCapacity`, without adding anyone, if the
    /// batch has more lines than there are seats left.
    pub fn add_batch<D: PlayerDirectory + ?Sized>(
        &mut self,
        input: &str,
        directory: &D,
    ) -> Result<BatchReport, Error> {
        let lines = parse_riot_id_lines(input);
        let available = self.remaining_capacity();
        if lines.len() > available {
            return Err(Error::InsufficientCapacity {
                available,
                requested: lines.len(),
            });
        }

        let mut report = BatchReport::default();
        for line in lines {
            match self.lookup_and_add(line, directory) {
                Ok(id) => report.added.push(id),
                Err(error) => {
                    warn!(input = line, %error, "could not add player");
                    report.failures.push(BatchFailure {
                        input: line.to_owned(),
                        error,
                    });
                }
            }
        }
        Ok(report)
    }

    fn lookup_and_add<D: PlayerDirectory + ?Sized>(
        &mut self,
        line: &str,
        directory: &D,
    ) -> Result<PlayerId, EntryError> {
        let riot_id: RiotId = line.parse()?;
        let player = directory.lookup(&riot_id)?;
        let id = player.id.clone();
        self.add(player)?;
        Ok(id)
    }
}
