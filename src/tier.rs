//! Ranked ladder enumerations
//!
//! This module defines the ordered tier and rank brackets of the ranked
//! ladder together with the integer weights used to score a player. The
//! weight tables are built once, on first use, and never mutated.

use std::{convert::Infallible, fmt::Display, str::FromStr};

use enum_map::{Enum, EnumMap, enum_map};
use once_cell_serde::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

/// A major bracket of the ranked ladder, from weakest to strongest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Enum, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    /// Iron
    Iron,
    /// Bronze
    Bronze,
    /// Silver
    Silver,
    /// Gold
    Gold,
    /// Platinum
    Platinum,
    /// Emerald
    Emerald,
    /// Diamond
    Diamond,
    /// Master
    Master,
    /// Grandmaster
    Grandmaster,
    /// Challenger
    Challenger,
}

/// A sub-bracket within a tier, from weakest to strongest
///
/// Ranks only carry meaning up to and including [`Tier::Diamond`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Enum, Serialize, Deserialize,
)]
pub enum Rank {
    /// IV
    #[serde(rename = "IV")]
    Four,
    /// III
    #[serde(rename = "III")]
    Three,
    /// II
    #[serde(rename = "II")]
    Two,
    /// I
    #[serde(rename = "I")]
    One,
}

/// Errors that can occur when parsing ladder brackets
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The text does not name a tier
    #[error("unknown tier: {0}")]
    UnknownTier(String),
    /// The text does not name a rank
    #[error("unknown rank: {0}")]
    UnknownRank(String),
}

fn tier_weights() -> &'static EnumMap<Tier, u32> {
    static WEIGHTS: OnceCell<EnumMap<Tier, u32>> = OnceCell::new();
    WEIGHTS.get_or_init(|| {
        enum_map! {
            Tier::Iron => 0,
            Tier::Bronze => 1000,
            Tier::Silver => 2000,
            Tier::Gold => 3000,
            Tier::Platinum => 4000,
            Tier::Emerald => 5000,
            Tier::Diamond => 6000,
            Tier::Master => 7000,
            Tier::Grandmaster => 8000,
            Tier::Challenger => 9000,
        }
    })
}

fn rank_weights() -> &'static EnumMap<Rank, u32> {
    static WEIGHTS: OnceCell<EnumMap<Rank, u32>> = OnceCell::new();
    WEIGHTS.get_or_init(|| {
        enum_map! {
            Rank::Four => 0,
            Rank::Three => 100,
            Rank::Two => 200,
            Rank::One => 300,
        }
    })
}

impl Tier {
    /// Every tier in ascending order
    pub const ALL: [Tier; 10] = [
        Tier::Iron,
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Emerald,
        Tier::Diamond,
        Tier::Master,
        Tier::Grandmaster,
        Tier::Challenger,
    ];

    /// Returns the upper-case name used by the ranked API
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Iron => "IRON",
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
            Tier::Platinum => "PLATINUM",
            Tier::Emerald => "EMERALD",
            Tier::Diamond => "DIAMOND",
            Tier::Master => "MASTER",
            Tier::Grandmaster => "GRANDMASTER",
            Tier::Challenger => "CHALLENGER",
        }
    }

    /// Score contribution of this tier
    pub fn weight(self) -> u32 {
        tier_weights()[self]
    }

    /// Whether this tier is split into ranks
    pub fn has_ranks(self) -> bool {
        self <= Tier::Diamond
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = Error;

    /// Parses a tier name, ignoring ASCII case and surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownTier` if the text names no tier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownTier(s.to_owned()))
    }
}

impl Rank {
    /// Every rank in ascending order
    pub const ALL: [Rank; 4] = [Rank::Four, Rank::Three, Rank::Two, Rank::One];

    /// Returns the roman numeral used by the ranked API
    pub fn as_str(self) -> &'static str {
        match self {
            Rank::Four => "IV",
            Rank::Three => "III",
            Rank::Two => "II",
            Rank::One => "I",
        }
    }

    /// Score contribution of this rank
    pub fn weight(self) -> u32 {
        rank_weights()[self]
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rank {
    type Err = Error;

    /// Parses a roman numeral rank exactly as the ranked API spells it
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownRank` if the text names no rank.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|rank| rank.as_str() == s)
            .ok_or_else(|| Error::UnknownRank(s.to_owned()))
    }
}

/// The tier text reported for a player, parsed leniently
///
/// The ranked API may report a player as unranked, and older or newer
/// clients may report a tier this crate does not know. Neither case is an
/// error: both are kept so that scoring can treat them as weightless.
#[derive(Debug, Clone, PartialEq, Eq, Hash, DeserializeFromStr, SerializeDisplay)]
pub enum TierLabel {
    /// The player has no placement this season
    Unranked,
    /// A recognized tier
    Ranked(Tier),
    /// Tier text that names no known tier
    Unrecognized(String),
}

impl TierLabel {
    /// Returns the recognized tier, if any
    pub fn tier(&self) -> Option<Tier> {
        match self {
            Self::Ranked(tier) => Some(*tier),
            Self::Unranked | Self::Unrecognized(_) => None,
        }
    }

    /// Whether this label marks an unranked player
    pub fn is_unranked(&self) -> bool {
        matches!(self, Self::Unranked)
    }
}

impl From<Tier> for TierLabel {
    fn from(tier: Tier) -> Self {
        Self::Ranked(tier)
    }
}

impl Display for TierLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unranked => f.write_str("UNRANKED"),
            Self::Ranked(tier) => tier.fmt(f),
            Self::Unrecognized(text) => f.write_str(text),
        }
    }
}

impl FromStr for TierLabel {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("UNRANKED") {
            return Ok(Self::Unranked);
        }
        Ok(s.parse::<Tier>()
            .map_or_else(|_| Self::Unrecognized(s.to_owned()), Self::Ranked))
    }
}
