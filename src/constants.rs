//! Configuration constants for the lineup system
//!
//! This module contains the fixed limits used throughout the crate: the
//! size of a match, the size of a team and the shape of a Riot ID.

/// Match queue configuration constants
pub mod queue {
    /// Number of players required to generate a match
    pub const CAPACITY: usize = 10;
}

/// Team configuration constants
pub mod team {
    /// Number of players on each side of a match
    pub const SIZE: usize = 5;
}

/// Riot ID configuration constants
pub mod riot_id {
    /// Separator between the game name and the tag line
    pub const SEPARATOR: char = '#';
    /// Minimum length of a game name in characters
    pub const MIN_GAME_NAME_LENGTH: usize = 3;
    /// Maximum length of a game name in characters
    pub const MAX_GAME_NAME_LENGTH: usize = 16;
    /// Minimum length of a tag line in characters
    pub const MIN_TAG_LINE_LENGTH: usize = 3;
    /// Maximum length of a tag line in characters
    pub const MAX_TAG_LINE_LENGTH: usize = 5;
}
