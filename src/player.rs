//! Player records and tier scoring
//!
//! A [`PlayerRecord`] is the read-only description of a player produced by
//! a [`PlayerDirectory`](crate::directory::PlayerDirectory). Balancing only
//! looks at its identity, its ladder standing and its role preference.

use std::{fmt::Display, str::FromStr};

use garde::Validate;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

use crate::{
    constants::riot_id,
    role::RolePreference,
    tier::{Rank, Tier, TierLabel},
};

/// A stable identifier for a player, unique within a match queue
///
/// The ranked API hands out opaque PUUID strings; this crate never looks
/// inside them.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates an identifier from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Errors that can occur when parsing a Riot ID
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum RiotIdError {
    /// The text has no `#` separating the game name from the tag line
    #[error("invalid riot id format, expected \"gameName#tagLine\"")]
    MissingTag,
    /// The game name or tag line has an invalid length
    #[error("invalid riot id: {0}")]
    Invalid(String),
}

/// A player's public handle, written `gameName#tagLine`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Validate, DeserializeFromStr, SerializeDisplay)]
pub struct RiotId {
    #[garde(length(
        chars,
        min = riot_id::MIN_GAME_NAME_LENGTH,
        max = riot_id::MAX_GAME_NAME_LENGTH
    ))]
    game_name: String,
    #[garde(length(
        chars,
        min = riot_id::MIN_TAG_LINE_LENGTH,
        max = riot_id::MAX_TAG_LINE_LENGTH
    ))]
    tag_line: String,
}

impl RiotId {
    /// Creates and validates a Riot ID from its two halves
    ///
    /// # Errors
    ///
    /// Returns `RiotIdError::Invalid` if either half has an invalid length
    /// after trimming.
    pub fn new(game_name: &str, tag_line: &str) -> Result<Self, RiotIdError> {
        let id = Self {
            game_name: game_name.trim().to_owned(),
            tag_line: tag_line.trim().to_owned(),
        };
        id.validate()
            .map_err(|report| RiotIdError::Invalid(report.to_string()))?;
        Ok(id)
    }

    /// Returns the game name
    pub fn game_name(&self) -> &str {
        &self.game_name
    }

    /// Returns the tag line
    pub fn tag_line(&self) -> &str {
        &self.tag_line
    }

    /// Returns a case-folded key; Riot IDs compare case-insensitively
    pub fn key(&self) -> String {
        self.to_string().to_lowercase()
    }
}

impl Display for RiotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.game_name,
            riot_id::SEPARATOR,
            self.tag_line
        )
    }
}

impl FromStr for RiotId {
    type Err = RiotIdError;

    /// Parses `gameName#tagLine`, splitting on the first `#`
    ///
    /// # Errors
    ///
    /// * `RiotIdError::MissingTag` - There is no `#` in the text
    /// * `RiotIdError::Invalid` - Either half has an invalid length
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (game_name, tag_line) = s
            .trim()
            .split_once(riot_id::SEPARATOR)
            .ok_or(RiotIdError::MissingTag)?;
        Self::new(game_name, tag_line)
    }
}

/// A player as reported by the player directory
#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    /// Identity key, unique within a queue
    #[serde(rename = "puuid")]
    pub id: PlayerId,
    /// Game name half of the Riot ID
    pub game_name: String,
    /// Tag line half of the Riot ID
    pub tag_line: String,
    /// Legacy summoner name, preferred for display when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summoner_name: Option<String>,
    /// Profile icon number
    #[serde(default)]
    pub profile_icon_id: u32,
    /// Rendered profile icon, when the directory supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_icon_url: Option<String>,
    /// Account level
    #[serde(default)]
    pub summoner_level: u32,
    /// Solo queue tier, absent when the directory reported none
    #[serde(default)]
    pub tier: Option<TierLabel>,
    /// Solo queue rank; empty or unknown text reads as absent
    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(default)]
    pub rank: Option<Rank>,
    /// League points within the current rank; null reads as zero
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    pub league_points: u32,
    /// Solo queue wins this season
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    pub wins: u32,
    /// Solo queue losses this season
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    pub losses: u32,
    /// Role preference, set while the player waits in a queue
    #[serde(flatten)]
    pub roles: RolePreference,
}

impl PlayerRecord {
    /// Creates an unranked record with no role preference
    pub fn new(id: impl Into<PlayerId>, riot_id: &RiotId) -> Self {
        Self {
            id: id.into(),
            game_name: riot_id.game_name().to_owned(),
            tag_line: riot_id.tag_line().to_owned(),
            summoner_name: None,
            profile_icon_id: 0,
            profile_icon_url: None,
            summoner_level: 1,
            tier: Some(TierLabel::Unranked),
            rank: None,
            league_points: 0,
            wins: 0,
            losses: 0,
            roles: RolePreference::default(),
        }
    }

    /// Replaces the ladder standing of this record
    #[must_use]
    pub fn with_standing(mut self, tier: Tier, rank: Option<Rank>, league_points: u32) -> Self {
        self.tier = Some(TierLabel::Ranked(tier));
        self.rank = rank;
        self.league_points = league_points;
        self
    }

    /// Replaces the role preference of this record
    #[must_use]
    pub fn with_roles(mut self, roles: RolePreference) -> Self {
        self.roles = roles;
        self
    }

    /// Whether the player has no ranked placement
    pub fn is_unranked(&self) -> bool {
        self.tier.as_ref().is_none_or(TierLabel::is_unranked)
    }

    /// Returns the balancing score of this player
    pub fn score(&self) -> u64 {
        compute_score(self)
    }

    /// Returns the Riot ID text of this player
    pub fn riot_id(&self) -> String {
        format!("{}{}{}", self.game_name, riot_id::SEPARATOR, self.tag_line)
    }

    /// Returns the name shown for this player
    ///
    /// The legacy summoner name wins when it is present and non-empty,
    /// otherwise the Riot ID is used.
    pub fn display_name(&self) -> String {
        match self.summoner_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => self.riot_id(),
        }
    }

    /// Renders the ladder standing, e.g. `GOLD II - 45 LP` or `Unranked`
    pub fn standing(&self) -> String {
        match (&self.tier, self.rank) {
            (None | Some(TierLabel::Unranked), _) => "Unranked".to_owned(),
            (Some(tier), Some(rank)) => format!("{tier} {rank} - {} LP", self.league_points),
            (Some(tier), None) => format!("{tier} - {} LP", self.league_points),
        }
    }
}

/// Maps a player to a single comparable strength value
///
/// Unranked players and players without a tier score zero. Everyone else
/// scores the tier weight plus the rank weight plus their league points.
/// A tier or rank that is not recognized contributes nothing, so the
/// ordering stays total. The sum is widened so that no reported league
/// point count can overflow it.
///
/// # Examples
///
/// ```rust
/// use lineup::player::{PlayerRecord, RiotId, compute_score};
/// use lineup::tier::{Rank, Tier};
///
/// let riot_id: RiotId = "Faker#KR1".parse().unwrap();
/// let player = PlayerRecord::new("puuid-1", &riot_id)
///     .with_standing(Tier::Gold, Some(Rank::Two), 45);
/// assert_eq!(compute_score(&player), 3245);
/// ```
pub fn compute_score(player: &PlayerRecord) -> u64 {
    match &player.tier {
        None | Some(TierLabel::Unranked) => 0,
        Some(label) => {
            u64::from(label.tier().map_or(0, Tier::weight))
                + u64::from(player.rank.map_or(0, Rank::weight))
                + u64::from(player.league_points)
        }
    }
}
