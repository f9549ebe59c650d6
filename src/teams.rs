//! Team formation
//!
//! This module splits a full match queue into two five-player teams. Two
//! strategies are supported: a snake draft over tier scores, and a greedy
//! fill that seats players in their preferred roles. Both are pure and
//! deterministic; the same queue and mode always produce the same teams.

use std::{cmp::Reverse, fmt::Display, str::FromStr};

use enum_map::{Enum, EnumMap};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    constants,
    player::{PlayerId, PlayerRecord, compute_score},
    role::Role,
};

/// The strategy used to split a queue into teams
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceMode {
    /// Snake draft over tier scores
    Tier,
    /// Greedy fill of preferred roles
    #[default]
    Role,
}

impl Display for BalanceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Tier => "tier",
            Self::Role => "role",
        })
    }
}

impl FromStr for BalanceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tier" => Ok(Self::Tier),
            "role" => Ok(Self::Role),
            other => Err(Error::UnknownMode(other.to_owned())),
        }
    }
}

/// One of the two teams of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum Side {
    /// Team 1
    First,
    /// Team 2
    Second,
}

impl Side {
    /// Both sides, team 1 first
    pub const ALL: [Side; 2] = [Side::First, Side::Second];
}

/// Which side each draft position goes to, strongest position first
///
/// Positions alternate in pairs so that the strongest and the weakest
/// players are spread across both sides.
const SNAKE_PATTERN: [Side; constants::queue::CAPACITY] = [
    Side::First,
    Side::Second,
    Side::Second,
    Side::First,
    Side::First,
    Side::Second,
    Side::Second,
    Side::First,
    Side::First,
    Side::Second,
];

/// Errors that can occur when forming teams
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The queue does not hold exactly ten players
    #[error("a match needs exactly ten players, got {0}")]
    InvalidQueueSize(usize),
    /// The same player appears twice in the queue
    #[error("player {0} appears more than once")]
    DuplicatePlayer(PlayerId),
    /// The text does not name a balance mode
    #[error("unknown balance mode: {0}")]
    UnknownMode(String),
}

/// A player seated on a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// The seated player
    #[serde(flatten)]
    pub player: PlayerRecord,
    /// The role the player was seated for; fillers have none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_role: Option<Role>,
}

impl TeamMember {
    fn assigned(player: &PlayerRecord, role: Role) -> Self {
        Self {
            player: player.clone(),
            assigned_role: Some(role),
        }
    }

    fn filler(player: &PlayerRecord) -> Self {
        Self {
            player: player.clone(),
            assigned_role: None,
        }
    }
}

/// The two teams produced for a match
///
/// Every queued player appears on exactly one team, and each team holds
/// exactly five players in the order they were seated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamResult {
    team1: Vec<TeamMember>,
    team2: Vec<TeamMember>,
}

impl From<EnumMap<Side, Vec<TeamMember>>> for TeamResult {
    fn from(mut teams: EnumMap<Side, Vec<TeamMember>>) -> Self {
        Self {
            team1: std::mem::take(&mut teams[Side::First]),
            team2: std::mem::take(&mut teams[Side::Second]),
        }
    }
}

impl TeamResult {
    /// Returns the members of one side
    pub fn team(&self, side: Side) -> &[TeamMember] {
        match side {
            Side::First => &self.team1,
            Side::Second => &self.team2,
        }
    }

    /// Returns the members of team 1
    pub fn team1(&self) -> &[TeamMember] {
        &self.team1
    }

    /// Returns the members of team 2
    pub fn team2(&self) -> &[TeamMember] {
        &self.team2
    }

    /// Iterates over both sides, team 1 first
    pub fn teams(&self) -> impl Iterator<Item = (Side, &[TeamMember])> {
        Side::ALL.into_iter().map(|side| (side, self.team(side)))
    }

    /// Finds the side a player was seated on
    pub fn side_of(&self, id: &PlayerId) -> Option<Side> {
        self.teams()
            .find(|(_, members)| {
                members.iter().any(|member| member.player.id == *id)
            })
            .map(|(side, _)| side)
    }

    /// Sums the tier scores of each side
    pub fn score_totals(&self) -> EnumMap<Side, u64> {
        EnumMap::from_fn(|side| {
            self.team(side)
                .iter()
                .map(|member| compute_score(&member.player))
                .sum()
        })
    }

    /// Converts the result to a JSON string for the UI layer
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Splits exactly ten players into two balanced teams
///
/// Players are first ordered by descending [`compute_score`], keeping queue
/// order between equal scores. In [`BalanceMode::Tier`] the ordered players
/// are dealt out in a snake pattern. In [`BalanceMode::Role`] each role is
/// filled for team 1 then team 2, preferring primary-role holders over
/// secondary-role holders and stronger players over weaker ones; whoever
/// remains fills team 1 and then team 2 without a role.
///
/// # Errors
///
/// * `Error::InvalidQueueSize` - The queue does not hold exactly ten players
/// * `Error::DuplicatePlayer` - Two entries share the same player id
///
/// # Examples
///
/// ```rust
/// use lineup::player::{PlayerRecord, RiotId};
/// use lineup::teams::{BalanceMode, balance_teams};
/// use lineup::tier::{Rank, Tier};
///
/// let queue: Vec<PlayerRecord> = (0..10)
///     .map(|n| {
///         let riot_id: RiotId = format!("Player{n}#KR1").parse().unwrap();
///         PlayerRecord::new(format!("puuid-{n}"), &riot_id)
///             .with_standing(Tier::Gold, Some(Rank::Four), n * 10)
///     })
///     .collect();
///
/// let result = balance_teams(&queue, BalanceMode::Tier).unwrap();
/// assert_eq!(result.team1().len(), 5);
/// assert_eq!(result.team2().len(), 5);
/// ```
pub fn balance_teams(queue: &[PlayerRecord], mode: BalanceMode) -> Result<TeamResult, Error> {
    if queue.len() != constants::queue::CAPACITY {
        return Err(Error::InvalidQueueSize(queue.len()));
    }
    if let Some(id) = queue.iter().map(|player| &player.id).duplicates().next() {
        return Err(Error::DuplicatePlayer(id.clone()));
    }

    let sorted = queue
        .iter()
        .sorted_by_key(|player| Reverse(compute_score(player)))
        .collect_vec();

    debug!(
        %mode,
        scores = ?sorted.iter().map(|player| compute_score(player)).collect_vec(),
        "balancing teams"
    );

    let result = match mode {
        BalanceMode::Tier => snake_draft(&sorted),
        BalanceMode::Role => fill_roles(sorted),
    };

    let totals = result.score_totals();
    debug!(
        team1 = totals[Side::First],
        team2 = totals[Side::Second],
        "teams formed"
    );

    Ok(result)
}

fn snake_draft(sorted: &[&PlayerRecord]) -> TeamResult {
    let mut teams: EnumMap<Side, Vec<TeamMember>> = EnumMap::default();
    for (player, side) in sorted.iter().zip(SNAKE_PATTERN) {
        teams[side].push(TeamMember::filler(player));
    }
    teams.into()
}

fn fill_roles(sorted: Vec<&PlayerRecord>) -> TeamResult {
    let mut pool = Pool::new(sorted);
    let mut teams: EnumMap<Side, Vec<TeamMember>> = EnumMap::default();

    for role in Role::ALL {
        for side in Side::ALL {
            if let Some(player) = pool.claim(role) {
                trace!(%role, ?side, player = %player.id, "seated for role");
                teams[side].push(TeamMember::assigned(player, role));
            }
        }
    }

    for player in pool.into_remaining() {
        let side = if teams[Side::First].len() < constants::team::SIZE {
            Side::First
        } else {
            Side::Second
        };
        trace!(?side, player = %player.id, "seated as filler");
        teams[side].push(TeamMember::filler(player));
    }

    teams.into()
}

/// Players not yet seated, kept in draft order
///
/// Claimed players are marked rather than removed so that scans always walk
/// the original order.
struct Pool<'a> {
    players: Vec<&'a PlayerRecord>,
    taken: Vec<bool>,
}

impl<'a> Pool<'a> {
    fn new(players: Vec<&'a PlayerRecord>) -> Self {
        let taken = vec![false; players.len()];
        Self { players, taken }
    }

    fn available(&self) -> impl Iterator<Item = (usize, &'a PlayerRecord)> {
        let taken = &self.taken;
        self.players
            .iter()
            .copied()
            .enumerate()
            .filter(move |(index, _)| !taken[*index])
    }

    fn position<F: Fn(&PlayerRecord) -> bool>(&self, f: F) -> Option<usize> {
        self.available()
            .find(|(_, player)| f(*player))
            .map(|(index, _)| index)
    }

    /// Takes the first player preferring `role` as primary, else as secondary
    fn claim(&mut self, role: Role) -> Option<&'a PlayerRecord> {
        let index = self
            .position(|player| player.roles.primary() == Some(role))
            .or_else(|| self.position(|player| player.roles.secondary() == Some(role)))?;
        self.taken[index] = true;
        Some(self.players[index])
    }

    fn into_remaining(self) -> impl Iterator<Item = &'a PlayerRecord> {
        self.players
            .into_iter()
            .zip(self.taken)
            .filter(|(_, taken)| !taken)
            .map(|(player, _)| player)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::{
        player::RiotId,
        role::RolePreference,
        tier::{Rank, Tier},
    };

    fn riot_id() -> RiotId {
        "Tester#KR1".parse().unwrap()
    }

    fn player(
        id: &str,
        tier: Tier,
        rank: Rank,
        league_points: u32,
        primary: Option<Role>,
        secondary: Option<Role>,
    ) -> PlayerRecord {
        PlayerRecord::new(id, &riot_id())
            .with_standing(tier, Some(rank), league_points)
            .with_roles(RolePreference::new(primary, secondary))
    }

    fn unranked(id: &str, primary: Option<Role>, secondary: Option<Role>) -> PlayerRecord {
        PlayerRecord::new(id, &riot_id())
            .with_roles(RolePreference::new(primary, secondary))
    }

    /// Ten players with strictly descending scores, `p0` strongest
    fn descending() -> Vec<PlayerRecord> {
        (0..10)
            .map(|n| {
                player(
                    &format!("p{n}"),
                    Tier::ALL[9 - n],
                    Rank::Two,
                    10,
                    None,
                    None,
                )
            })
            .collect()
    }

    fn ids(members: &[TeamMember]) -> Vec<&str> {
        members
            .iter()
            .map(|member| member.player.id.as_str())
            .collect()
    }

    fn roles(members: &[TeamMember]) -> Vec<Option<Role>> {
        members.iter().map(|member| member.assigned_role).collect()
    }

    fn assert_partition(queue: &[PlayerRecord], result: &TeamResult) {
        assert_eq!(result.team1().len(), constants::team::SIZE);
        assert_eq!(result.team2().len(), constants::team::SIZE);

        let seated = result
            .team1()
            .iter()
            .chain(result.team2())
            .map(|member| member.player.id.clone())
            .sorted()
            .collect_vec();
        let queued = queue
            .iter()
            .map(|player| player.id.clone())
            .sorted()
            .collect_vec();
        assert_eq!(seated, queued);
    }

    fn mixed_queue() -> Vec<PlayerRecord> {
        vec![
            player(
                "alpha",
                Tier::Gold,
                Rank::One,
                50,
                Some(Role::Mid),
                Some(Role::Top),
            ),
            player("bravo", Tier::Silver, Rank::Two, 0, Some(Role::Mid), None),
            player(
                "charlie",
                Tier::Diamond,
                Rank::Four,
                10,
                Some(Role::Jungle),
                Some(Role::Mid),
            ),
            unranked("delta", Some(Role::Support), None),
            player(
                "echo",
                Tier::Platinum,
                Rank::Three,
                75,
                None,
                Some(Role::Adc),
            ),
            player(
                "foxtrot",
                Tier::Bronze,
                Rank::One,
                99,
                Some(Role::Top),
                None,
            ),
            player(
                "golf",
                Tier::Emerald,
                Rank::Two,
                20,
                Some(Role::Adc),
                Some(Role::Support),
            ),
            unranked("hotel", None, None),
            player(
                "india",
                Tier::Master,
                Rank::One,
                150,
                Some(Role::Mid),
                Some(Role::Jungle),
            ),
            player("juliet", Tier::Iron, Rank::Four, 5, None, Some(Role::Top)),
        ]
    }

    #[test]
    fn test_rejects_wrong_queue_size() {
        let mut queue = descending();
        queue.pop();
        assert_eq!(
            balance_teams(&queue, BalanceMode::Tier),
            Err(Error::InvalidQueueSize(9))
        );

        queue.push(unranked("extra", None, None));
        queue.push(unranked("another", None, None));
        assert_eq!(
            balance_teams(&queue, BalanceMode::Role),
            Err(Error::InvalidQueueSize(11))
        );

        assert_eq!(
            balance_teams(&[], BalanceMode::Role),
            Err(Error::InvalidQueueSize(0))
        );
    }

    #[test]
    fn test_rejects_duplicate_players() {
        let mut queue = descending();
        queue[9] = queue[2].clone();
        assert_eq!(
            balance_teams(&queue, BalanceMode::Tier),
            Err(Error::DuplicatePlayer(PlayerId::new("p2")))
        );
    }

    #[test]
    fn test_snake_pattern() {
        let mut queue = descending();
        queue.reverse();
        queue.swap(2, 7);

        let result = balance_teams(&queue, BalanceMode::Tier).unwrap();
        assert_eq!(ids(result.team1()), ["p0", "p3", "p4", "p7", "p8"]);
        assert_eq!(ids(result.team2()), ["p1", "p2", "p5", "p6", "p9"]);
        assert_eq!(roles(result.team1()), [None; 5]);
        assert_eq!(roles(result.team2()), [None; 5]);
    }

    #[test]
    fn test_snake_ties_keep_queue_order() {
        let queue = (0..10)
            .map(|n| unranked(&format!("u{n}"), None, None))
            .collect_vec();

        let result = balance_teams(&queue, BalanceMode::Tier).unwrap();
        assert_eq!(ids(result.team1()), ["u0", "u3", "u4", "u7", "u8"]);
        assert_eq!(ids(result.team2()), ["u1", "u2", "u5", "u6", "u9"]);
    }

    #[test]
    fn test_snake_totals_differ_by_at_most_one_gap() {
        let queue = descending();
        let result = balance_teams(&queue, BalanceMode::Tier).unwrap();
        let totals = result.score_totals();

        let max_gap = queue
            .iter()
            .map(compute_score)
            .tuple_windows()
            .map(|(higher, lower)| higher - lower)
            .max()
            .unwrap();
        let difference = totals[Side::First].abs_diff(totals[Side::Second]);
        assert!(difference <= max_gap);
    }

    #[test]
    fn test_totals_with_maximum_points() {
        let queue = (0..10)
            .map(|n| {
                player(
                    &format!("p{n}"),
                    Tier::Challenger,
                    Rank::One,
                    u32::MAX,
                    None,
                    None,
                )
            })
            .collect_vec();

        let result = balance_teams(&queue, BalanceMode::Tier).unwrap();
        let expected = 5 * (u64::from(u32::MAX) + 9300);
        let totals = result.score_totals();
        assert_eq!(totals[Side::First], expected);
        assert_eq!(totals[Side::Second], expected);
        assert_eq!(ids(result.team1()), ["p0", "p3", "p4", "p7", "p8"]);
    }

    #[test]
    fn test_every_mode_partitions_the_queue() {
        for mode in [BalanceMode::Tier, BalanceMode::Role] {
            for queue in [descending(), mixed_queue()] {
                let result = balance_teams(&queue, mode).unwrap();
                assert_partition(&queue, &result);
            }
        }
    }

    #[test]
    fn test_balancing_is_deterministic() {
        let queue = mixed_queue();
        for mode in [BalanceMode::Tier, BalanceMode::Role] {
            let first = balance_teams(&queue, mode).unwrap();
            let second = balance_teams(&queue, mode).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_role_fill_with_full_preferences() {
        let queue = Role::ALL
            .into_iter()
            .enumerate()
            .flat_map(|(index, role)| {
                [
                    player(
                        &format!("weak{index}"),
                        Tier::Silver,
                        Rank::Four,
                        0,
                        Some(role),
                        None,
                    ),
                    player(
                        &format!("strong{index}"),
                        Tier::Gold,
                        Rank::Four,
                        0,
                        Some(role),
                        None,
                    ),
                ]
            })
            .collect_vec();

        let result = balance_teams(&queue, BalanceMode::Role).unwrap();
        let expected = Role::ALL.map(Some);
        assert_eq!(roles(result.team1()), expected);
        assert_eq!(roles(result.team2()), expected);
        assert_eq!(
            ids(result.team1()),
            ["strong0", "strong1", "strong2", "strong3", "strong4"]
        );
        assert_eq!(
            ids(result.team2()),
            ["weak0", "weak1", "weak2", "weak3", "weak4"]
        );
    }

    #[test]
    fn test_primary_beats_stronger_secondary() {
        let mut queue = vec![
            player(
                "star",
                Tier::Challenger,
                Rank::One,
                900,
                None,
                Some(Role::Mid),
            ),
            player("mid", Tier::Iron, Rank::Four, 0, Some(Role::Mid), None),
        ];
        queue.extend((0..8).map(|n| unranked(&format!("u{n}"), None, None)));

        let result = balance_teams(&queue, BalanceMode::Role).unwrap();
        assert_eq!(ids(result.team1()), ["mid", "u0", "u1", "u2", "u3"]);
        assert_eq!(roles(result.team1()), [Some(Role::Mid), None, None, None, None]);
        assert_eq!(ids(result.team2()), ["star", "u4", "u5", "u6", "u7"]);
        assert_eq!(roles(result.team2()), [Some(Role::Mid), None, None, None, None]);
    }

    #[test]
    fn test_secondary_used_when_no_primary() {
        let mut queue = vec![player("flex", Tier::Gold, Rank::Four, 0, None, Some(Role::Mid))];
        queue.extend((0..9).map(|n| unranked(&format!("u{n}"), None, None)));

        let result = balance_teams(&queue, BalanceMode::Role).unwrap();
        assert_eq!(result.side_of(&PlayerId::new("flex")), Some(Side::First));
        assert_eq!(result.team1()[0].player.id, PlayerId::new("flex"));
        assert_eq!(result.team1()[0].assigned_role, Some(Role::Mid));
        assert_eq!(ids(result.team2()), ["u4", "u5", "u6", "u7", "u8"]);
    }

    #[test]
    fn test_lone_mid_is_seated_at_mid() {
        let mut queue = (0..9)
            .map(|n| {
                player(
                    &format!("p{n}"),
                    Tier::Gold,
                    Rank::Two,
                    n * 5,
                    Some(Role::Top),
                    None,
                )
            })
            .collect_vec();
        queue.push(unranked("lonely", Some(Role::Mid), None));

        let result = balance_teams(&queue, BalanceMode::Role).unwrap();
        let lonely = result
            .team1()
            .iter()
            .find(|member| member.player.id == PlayerId::new("lonely"))
            .unwrap();
        assert_eq!(lonely.assigned_role, Some(Role::Mid));
    }

    #[test]
    fn test_claimed_player_is_not_reused() {
        let mut queue = vec![
            player(
                "top",
                Tier::Diamond,
                Rank::One,
                0,
                Some(Role::Top),
                Some(Role::Jungle),
            ),
            player("jungle", Tier::Gold, Rank::One, 0, Some(Role::Jungle), None),
        ];
        queue.extend((0..8).map(|n| unranked(&format!("u{n}"), None, None)));

        let result = balance_teams(&queue, BalanceMode::Role).unwrap();
        assert_eq!(
            roles(result.team1()),
            [Some(Role::Top), Some(Role::Jungle), None, None, None]
        );
        assert_eq!(ids(&result.team1()[..2]), ["top", "jungle"]);
        assert_partition(&queue, &result);
    }

    #[test]
    fn test_role_fill_without_preferences_splits_by_score() {
        let queue = descending();
        let result = balance_teams(&queue, BalanceMode::Role).unwrap();
        assert_eq!(ids(result.team1()), ["p0", "p1", "p2", "p3", "p4"]);
        assert_eq!(ids(result.team2()), ["p5", "p6", "p7", "p8", "p9"]);
    }

    #[test]
    fn test_mixed_queue_role_fill() {
        let queue = mixed_queue();
        let result = balance_teams(&queue, BalanceMode::Role).unwrap();

        // draft order: india, charlie, golf, echo, alpha, bravo, foxtrot, juliet, delta, hotel
        assert_eq!(
            ids(result.team1()),
            ["foxtrot", "charlie", "bravo", "golf", "delta"]
        );
        assert_eq!(roles(result.team1()), Role::ALL.map(Some));
        assert_eq!(
            ids(result.team2()),
            ["alpha", "india", "echo", "juliet", "hotel"]
        );
        assert_eq!(
            roles(result.team2()),
            [Some(Role::Top), Some(Role::Jungle), Some(Role::Adc), None, None]
        );
    }

    #[test]
    fn test_balance_mode_parse() {
        assert_eq!("tier".parse::<BalanceMode>(), Ok(BalanceMode::Tier));
        assert_eq!(" ROLE ".parse::<BalanceMode>(), Ok(BalanceMode::Role));
        assert_eq!(
            "random".parse::<BalanceMode>(),
            Err(Error::UnknownMode("random".to_string()))
        );
        assert_eq!(BalanceMode::default(), BalanceMode::Role);
        assert_eq!(BalanceMode::Tier.to_string(), "tier");
        assert_eq!(
            serde_json::to_string(&BalanceMode::Role).unwrap(),
            "\"role\""
        );
    }

    #[test]
    fn test_result_serialization() {
        let mut queue = vec![unranked("mid", Some(Role::Mid), None)];
        queue.extend((0..9).map(|n| unranked(&format!("u{n}"), None, None)));

        let result = balance_teams(&queue, BalanceMode::Role).unwrap();
        let value: serde_json::Value = serde_json::from_str(&result.to_message()).unwrap();

        assert_eq!(value["team1"][0]["puuid"], "mid");
        assert_eq!(value["team1"][0]["assignedRole"], "MID");
        assert!(value["team1"][1].get("assignedRole").is_none());
        assert_eq!(value["team2"].as_array().unwrap().len(), 5);
    }
}
