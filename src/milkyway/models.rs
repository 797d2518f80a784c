//! Data structures produced by the payload decoders.

use std::fmt;

/// Distribution channel a player's account belongs to.
///
/// The wire format carries this as one byte; every id the server has not
/// assigned maps to `Standalone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Steam,
    WeGame,
    Xgp,
    Standalone,
}

impl From<u8> for Platform {
    fn from(id: u8) -> Self {
        match id {
            1 => Self::Steam,
            2 => Self::WeGame,
            3 => Self::Xgp,
            _ => Self::Standalone,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Steam => "Steam",
            Self::WeGame => "WeGame",
            Self::Xgp => "XGP",
            Self::Standalone => "Standalone",
        };
        f.write_str(name)
    }
}

/// A single player's entry in a leaderboard or user-data payload.
///
/// Created only by the payload decoders and never mutated afterwards.
/// `user_id` is an opaque 64-bit identity; `generation_capacity` is the
/// rendered watt string.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub seed: i64,
    pub stars: i32,
    pub resource_multiplier: String,
    pub combat_difficulty: String,
    pub user_id: i64,
    pub platform: Platform,
    pub account_name: String,
    pub generation_capacity: String,
    pub is_anonymous: bool,
}

/// Aggregated data for one distinct seed in the full-data payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedAggregate {
    pub seed: i64,
    pub stars: i32,
    pub resource_multiplier: String,
    pub combat_difficulty: String,
    pub player_count: i32,
    pub total_generation_capacity: String,
}

/// Galaxy-wide summary statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_players: i32,
    pub total_generation_capacity: String,
    pub total_sails_launched: i64,
    pub total_dyson_spheres: i32,
}

/// One page of a paginated cluster player listing.
///
/// `total_count` is the cross-page total the server reports; a page
/// carries at most 10 records regardless of the declared page size.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterPage {
    pub total_count: i64,
    pub page_index: i32,
    pub players: Vec<PlayerRecord>,
}

/// Everything decoded from one full-data payload.
#[derive(Debug, Clone, PartialEq)]
pub struct FullData {
    pub top_ten: Vec<PlayerRecord>,
    pub summary: Summary,
    pub seeds: Vec<SeedAggregate>,
}
