//! Payload decoders for the statistics server's binary wire format.
//!
//! Every payload follows the same outline: one or more reserved 32-bit
//! tags, a record count, then that many fixed-layout records. The four
//! player-carrying payloads share one per-record layout; only the
//! surrounding header/footer bytes differ, so the record routine is
//! factored out and each decoder supplies just its framing.
//!
//! A short read anywhere aborts the whole decode — partial record lists
//! are never returned.

use log::{debug, info};

use super::capacity::format_generation_capacity;
use super::error::Result;
use super::keycodec::decode_seed_key;
use super::models::{ClusterPage, FullData, PlayerRecord, Platform, SeedAggregate, Summary};
use super::reader::ByteReader;

/// Fixed page size of the cluster player listing.
///
/// The server ignores larger requested sizes, so a page never carries more
/// than this many records and a shorter page marks the end of the listing.
pub const CLUSTER_PAGE_SIZE: usize = 10;

/// Ticks are reported per minute; multiplying by 60 yields watts.
const TICKS_TO_WATTS: i64 = 60;

/// Read one player record.
///
/// Layout:
/// - 8 bytes: seed key
/// - 8 bytes: user id (opaque)
/// - 1 byte:  platform id
/// - string:  account name (varint32 length + UTF-8 bytes)
/// - 8 bytes: generation capacity in ticks
/// - 1 byte:  anonymity flag (any non-zero value is anonymous)
fn read_player_record(r: &mut ByteReader<'_>) -> Result<PlayerRecord> {
    let seed_key = r.read_i64()?;
    let user_id = r.read_i64()?;
    let platform = Platform::from(r.read_u8()?);
    let account_name = r.read_string()?;
    let generation_ticks = r.read_i64()?;
    let is_anonymous = r.read_u8()? > 0;

    let key = decode_seed_key(seed_key);

    Ok(PlayerRecord {
        seed: key.seed,
        stars: key.stars,
        resource_multiplier: key.resource_multiplier,
        combat_difficulty: key.combat_difficulty,
        user_id,
        platform,
        account_name,
        generation_capacity: format_generation_capacity(generation_ticks * TICKS_TO_WATTS),
        is_anonymous,
    })
}

/// Read the four summary fields shared by the statistics payload and the
/// full-data summary block.
fn read_summary_fields(r: &mut ByteReader<'_>) -> Result<Summary> {
    let total_gen_ticks = r.read_i64()?;
    let total_sails_launched = r.read_i64()?;
    let total_players = r.read_i32()?;
    let total_dyson_spheres = r.read_i32()?;

    Ok(Summary {
        total_players,
        total_generation_capacity: format_generation_capacity(total_gen_ticks * TICKS_TO_WATTS),
        total_sails_launched,
        total_dyson_spheres,
    })
}

/// Decode the top-ten leaderboard block.
///
/// Layout:
/// - 4 bytes: reserved tag
/// - 4 bytes: record count
/// - N player records
pub fn decode_top_ten(r: &mut ByteReader<'_>) -> Result<Vec<PlayerRecord>> {
    r.skip_reserved_field()?;
    let count = r.read_i32()?;
    debug!("Top ten block: {count} records");

    let mut players = Vec::with_capacity(count.max(0) as usize);
    for _ in 0..count {
        players.push(read_player_record(r)?);
    }
    Ok(players)
}

/// Decode the per-seed aggregate block.
///
/// Layout:
/// - 4 bytes: reserved tag
/// - 4 bytes: record count
/// - per record:
///   - 8 bytes: seed key
///   - 4 bytes: total generation capacity in ticks (f32)
///   - 4 bytes: player count
///   - 4 bytes: reserved trailing field (consumed, unused — skipping it
///     would desync every following record)
pub fn decode_seed_aggregates(r: &mut ByteReader<'_>) -> Result<Vec<SeedAggregate>> {
    r.skip_reserved_field()?;
    let count = r.read_i32()?;
    debug!("Per-seed block: {count} records");

    let mut seeds = Vec::with_capacity(count.max(0) as usize);
    for _ in 0..count {
        let seed_key = r.read_i64()?;
        let gen_ticks = r.read_f32()?;
        let player_count = r.read_i32()?;
        r.skip_reserved_field()?;

        let key = decode_seed_key(seed_key);
        seeds.push(SeedAggregate {
            seed: key.seed,
            stars: key.stars,
            resource_multiplier: key.resource_multiplier,
            combat_difficulty: key.combat_difficulty,
            player_count,
            total_generation_capacity: format_generation_capacity(
                (f64::from(gen_ticks) * TICKS_TO_WATTS as f64) as i64,
            ),
        });
    }
    Ok(seeds)
}

/// Decode a full-data payload: top-ten leaderboard, galaxy summary and
/// per-seed aggregates.
///
/// Layout:
/// - 4 bytes: reserved file tag
/// - top-ten block
/// - summary block (4-byte reserved tag + summary fields)
/// - per-seed aggregate block
pub fn decode_full_data(data: &[u8]) -> Result<FullData> {
    let mut r = ByteReader::new(data);
    r.skip_reserved_field()?;

    let top_ten = decode_top_ten(&mut r)?;

    r.skip_reserved_field()?;
    let summary = read_summary_fields(&mut r)?;

    let seeds = decode_seed_aggregates(&mut r)?;

    info!(
        "Full data decoded: {} top-ten records, {} seeds, {} players total",
        top_ten.len(),
        seeds.len(),
        summary.total_players
    );
    Ok(FullData { top_ten, summary, seeds })
}

/// Decode the standalone statistics payload.
///
/// Layout:
/// - 4 bytes: reserved header
/// - 8 bytes: total generation capacity in ticks
/// - 8 bytes: total solar sails launched
/// - 4 bytes: total players
/// - 4 bytes: total dyson spheres
pub fn decode_statistics(data: &[u8]) -> Result<Summary> {
    let mut r = ByteReader::new(data);
    r.skip_reserved_field()?;
    let summary = read_summary_fields(&mut r)?;

    info!(
        "Statistics decoded: {} players, {} dyson spheres, {} sails",
        summary.total_players, summary.total_dyson_spheres, summary.total_sails_launched
    );
    Ok(summary)
}

/// Decode the flat all-user-data payload.
///
/// Layout:
/// - 4 bytes: reserved header
/// - 4 bytes: record count
/// - N player records
pub fn decode_user_data(data: &[u8]) -> Result<Vec<PlayerRecord>> {
    let mut r = ByteReader::new(data);
    r.skip_reserved_field()?;
    let count = r.read_i32()?;
    debug!("User data payload: {count} records");

    let mut players = Vec::with_capacity(count.max(0) as usize);
    for _ in 0..count {
        players.push(read_player_record(&mut r)?);
    }

    info!("User data decoded: {} records", players.len());
    Ok(players)
}

/// Decode one page of the cluster player listing.
///
/// Layout:
/// - 4 bytes: reserved header
/// - 8 bytes: total player count across all pages
/// - 4 bytes: page index
/// - 4 bytes: record count in this page
/// - min(count, 10) player records
pub fn decode_cluster_page(data: &[u8]) -> Result<ClusterPage> {
    let mut r = ByteReader::new(data);
    r.skip_reserved_field()?;
    let total_count = r.read_i64()?;
    let page_index = r.read_i32()?;
    let page_record_count = r.read_i32()?;
    debug!("Cluster page {page_index}: {page_record_count} records (total {total_count})");

    let count = (page_record_count.max(0) as usize).min(CLUSTER_PAGE_SIZE);
    let mut players = Vec::with_capacity(count);
    for _ in 0..count {
        players.push(read_player_record(&mut r)?);
    }

    Ok(ClusterPage { total_count, page_index, players })
}
