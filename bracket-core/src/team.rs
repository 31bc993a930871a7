//! Team tokens and round-1 seeding

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{BracketError, Result};

/// Seed pairings within a region, in bracket order
pub const SEED_PAIRINGS: [[u8; 2]; 8] = [
    [1, 16],
    [8, 9],
    [5, 12],
    [4, 13],
    [6, 11],
    [3, 14],
    [7, 10],
    [2, 15],
];

/// Teams per region
pub const TEAMS_PER_REGION: usize = 16;

/// Round-1 games per region
pub const GAMES_PER_REGION: usize = SEED_PAIRINGS.len();

/// Tournament region
///
/// Declaration order is bracket order: E and W meet in semifinal 0,
/// M and S in semifinal 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    East,
    West,
    Midwest,
    South,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::East, Region::West, Region::Midwest, Region::South];

    /// Single-letter code used in team tokens
    pub fn code(self) -> char {
        match self {
            Region::East => 'E',
            Region::West => 'W',
            Region::Midwest => 'M',
            Region::South => 'S',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Region::ALL.into_iter().find(|r| r.code() == code)
    }

    /// Position of this region in the round-1 layout
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A team, identified by region and seed
///
/// Rendered as the token `<Region><Seed>`, e.g. `E1` or `S16`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Team {
    pub region: Region,
    pub seed: u8,
}

impl Team {
    pub fn new(region: Region, seed: u8) -> Result<Self> {
        if !(1..=TEAMS_PER_REGION as u8).contains(&seed) {
            return Err(BracketError::InvalidTeam(format!("{}{}", region.code(), seed)));
        }
        Ok(Self { region, seed })
    }

    /// Index of this team's round-1 game (0..32)
    pub fn round_one_index(&self) -> usize {
        let slot = SEED_PAIRINGS
            .iter()
            .position(|pair| pair.contains(&self.seed))
            .unwrap_or(0);
        self.region.index() * GAMES_PER_REGION + slot
    }

    /// Every team in the field, region-major, seed order
    pub fn all() -> Vec<Team> {
        Region::ALL
            .into_iter()
            .flat_map(|region| (1..=TEAMS_PER_REGION as u8).map(move |seed| Team { region, seed }))
            .collect()
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.region.code(), self.seed)
    }
}

impl FromStr for Team {
    type Err = BracketError;

    fn from_str(token: &str) -> Result<Self> {
        let invalid = || BracketError::InvalidTeam(token.to_string());
        let mut chars = token.chars();
        let region = chars.next().and_then(Region::from_code).ok_or_else(invalid)?;
        let digits = chars.as_str();
        let seed: u8 = digits.parse().map_err(|_| invalid())?;
        // Canonical form only: no sign, no leading zeros
        if digits != seed.to_string() {
            return Err(invalid());
        }
        Team::new(region, seed).map_err(|_| invalid())
    }
}

impl Serialize for Team {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Team {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(de::Error::custom)
    }
}

/// The two teams meeting in a round-1 game (index 0..32)
pub fn seeding_pair(index_in_round: usize) -> Option<[Team; 2]> {
    let region = *Region::ALL.get(index_in_round / GAMES_PER_REGION)?;
    let [high, low] = SEED_PAIRINGS[index_in_round % GAMES_PER_REGION];
    Some([Team { region, seed: high }, Team { region, seed: low }])
}

/// All 32 round-1 games in region-major order
pub fn round_one_games() -> Vec<[Team; 2]> {
    (0..Region::ALL.len() * GAMES_PER_REGION)
        .filter_map(seeding_pair)
        .collect()
}

/// Parse a single pick; `None` and blank tokens are empty picks
pub fn parse_pick(token: Option<&str>) -> Result<Option<Team>> {
    match token.map(str::trim) {
        None | Some("") => Ok(None),
        Some(t) => t.parse().map(Some),
    }
}

/// Parse a wire-format picks array
pub fn parse_picks(tokens: &[Option<String>]) -> Result<Vec<Option<Team>>> {
    tokens.iter().map(|t| parse_pick(t.as_deref())).collect()
}

/// Serde adapter for picks arrays: empty picks travel as `""`
pub mod pick_tokens {
    use super::*;

    pub fn serialize<S: Serializer>(
        picks: &[Option<Team>],
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(
            picks
                .iter()
                .map(|p| p.map(|t| t.to_string()).unwrap_or_default()),
        )
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Vec<Option<Team>>, D::Error> {
        let tokens: Vec<Option<String>> = Vec::deserialize(deserializer)?;
        parse_picks(&tokens).map_err(de::Error::custom)
    }
}
