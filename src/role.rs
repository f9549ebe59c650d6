//! Lane roles and player role preferences
//!
//! A player may name a primary and a secondary role. The two slots are
//! mutually exclusive: they never hold the same role at the same time.

use std::{fmt::Display, str::FromStr};

use enum_map::Enum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A position on a five-player team
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Enum, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Top lane
    Top,
    /// Jungle
    Jungle,
    /// Middle lane
    Mid,
    /// Bottom lane carry
    Adc,
    /// Bottom lane support
    Support,
}

impl Role {
    /// Every role, in the order teams are filled
    pub const ALL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];

    /// Returns the upper-case role name
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Top => "TOP",
            Role::Jungle => "JUNGLE",
            Role::Mid => "MID",
            Role::Adc => "ADC",
            Role::Support => "SUPPORT",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur when parsing a role
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The text does not name a role
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownRole(s.to_owned()))
    }
}

/// One of the two preference slots a player can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleSlot {
    /// The preferred role
    Primary,
    /// The fallback role
    Secondary,
}

impl RoleSlot {
    /// Returns the opposite slot
    pub fn other(self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }
}

/// Serialization helper for RolePreference struct
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RolePreferenceSerde {
    #[serde(default)]
    primary_role: Option<Role>,
    #[serde(default)]
    secondary_role: Option<Role>,
}

/// A player's primary and secondary role
///
/// The slots are private so that the exclusivity invariant can only be
/// changed through [`RolePreference::set`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RolePreferenceSerde")]
pub struct RolePreference {
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secondary_role: Option<Role>,
}

impl From<RolePreferenceSerde> for RolePreference {
    /// Rebuilds a preference, dropping a secondary role that repeats the primary
    fn from(serde: RolePreferenceSerde) -> Self {
        let RolePreferenceSerde {
            primary_role,
            secondary_role,
        } = serde;
        Self {
            primary_role,
            secondary_role: secondary_role.filter(|role| Some(*role) != primary_role),
        }
    }
}

impl RolePreference {
    /// Creates a preference from a primary and secondary role
    ///
    /// If both are the same role, only the primary is kept.
    pub fn new(primary: Option<Role>, secondary: Option<Role>) -> Self {
        RolePreferenceSerde {
            primary_role: primary,
            secondary_role: secondary,
        }
        .into()
    }

    /// Returns the primary role, if set
    pub fn primary(&self) -> Option<Role> {
        self.primary_role
    }

    /// Returns the secondary role, if set
    pub fn secondary(&self) -> Option<Role> {
        self.secondary_role
    }

    /// Returns the role held by a slot
    pub fn get(&self, slot: RoleSlot) -> Option<Role> {
        match slot {
            RoleSlot::Primary => self.primary_role,
            RoleSlot::Secondary => self.secondary_role,
        }
    }

    fn slot_mut(&mut self, slot: RoleSlot) -> &mut Option<Role> {
        match slot {
            RoleSlot::Primary => &mut self.primary_role,
            RoleSlot::Secondary => &mut self.secondary_role,
        }
    }

    /// Sets or clears the role held by a slot
    ///
    /// Choosing the role already held by the other slot exchanges the two
    /// slots instead of duplicating the role.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lineup::role::{Role, RolePreference, RoleSlot};
    ///
    /// let mut preference = RolePreference::new(Some(Role::Mid), Some(Role::Top));
    /// preference.set(RoleSlot::Secondary, Some(Role::Mid));
    /// assert_eq!(preference.primary(), Some(Role::Top));
    /// assert_eq!(preference.secondary(), Some(Role::Mid));
    /// ```
    pub fn set(&mut self, slot: RoleSlot, value: Option<Role>) {
        if value.is_some() && value == self.get(slot.other()) {
            let previous = self.get(slot);
            *self.slot_mut(slot.other()) = previous;
        }
        *self.slot_mut(slot) = value;
    }

    /// Clears both slots
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether neither slot is set
    pub fn is_empty(&self) -> bool {
        self.primary_role.is_none() && self.secondary_role.is_none()
    }
}
