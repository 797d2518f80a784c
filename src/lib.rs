//! # milkyway-stats
//!
//! Client for the Dyson Sphere Program "Milky Way" statistics server.
//!
//! The server speaks a small reverse-engineered binary protocol: every
//! payload is a sequence of little-endian fields behind one or more
//! reserved version tags, with 7-bit-varint-length-prefixed UTF-8 strings
//! and a composite 64-bit "seed key" that packs a galaxy's seed, star
//! count, resource multiplier and combat difficulty into decimal digit
//! groups. This crate downloads the leaderboard, per-seed aggregate,
//! user-data and cluster-page payloads, decodes them and writes CSV/text
//! reports plus pie-chart aggregation data.
//!
//! The game client's legacy MD5F digest (an MD5 variant with a
//! non-standard IV) is bundled in [`milkyway::md5f`].

pub mod milkyway;

// Re-export the main types for convenience
pub use milkyway::{
    config::Config,
    models::{ClusterPage, FullData, Platform, PlayerRecord, SeedAggregate, Summary},
    MilkywayClient, MilkywayError, Result,
};
