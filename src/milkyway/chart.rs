//! Per-user aggregation for the generation capacity pie chart.
//!
//! The chart itself is rendered elsewhere; this module produces its
//! inputs: (label, watts) slices for the top producers plus a folded
//! "everyone else" slice, and a ranked stats CSV of the full listing.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use super::capacity::parse_power_to_watts;
use super::error::Result;
use super::models::{Platform, PlayerRecord, SeedAggregate};
use super::report::csv_field;

const WATTS_PER_PW: f64 = 1e15;

/// Display names are truncated past this many characters.
const MAX_LABEL_CHARS: usize = 50;

/// Accumulated capacity for one user id.
///
/// A user appears under several names across seeds (renames, per-save
/// names); all of them are kept.
#[derive(Debug, Default, Clone)]
pub struct UserAggregate {
    pub names: BTreeSet<String>,
    pub total_watts: i64,
}

/// One pie slice: a label and its watt share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSlice {
    pub label: String,
    pub watts: i64,
}

/// Select the seeds whose total capacity reaches `min_watts`.
///
/// The threshold is applied to the parsed display capacity, the same
/// figure the reports show.
pub fn high_capacity_seeds(seeds: &[SeedAggregate], min_watts: i64) -> Vec<&SeedAggregate> {
    let selected: Vec<&SeedAggregate> = seeds
        .iter()
        .filter(|s| parse_power_to_watts(&s.total_generation_capacity) >= min_watts)
        .collect();

    info!(
        "Found {} of {} seeds above {:.0} TW",
        selected.len(),
        seeds.len(),
        min_watts as f64 / 1e12
    );
    selected
}

/// Aggregate Steam players by user id, merging names and summing watts.
///
/// Non-Steam records are skipped: the other platforms do not expose a
/// stable cross-seed identity.
pub fn aggregate_by_user(players: &[PlayerRecord]) -> HashMap<i64, UserAggregate> {
    let mut aggregated: HashMap<i64, UserAggregate> = HashMap::new();

    for player in players {
        if player.platform != Platform::Steam {
            continue;
        }
        let entry = aggregated.entry(player.user_id).or_default();
        entry.names.insert(player.account_name.clone());
        entry.total_watts += parse_power_to_watts(&player.generation_capacity);
    }

    info!("Aggregated {} records into {} unique users", players.len(), aggregated.len());
    aggregated
}

/// Sort an aggregation by capacity, descending.
pub fn rank_users(aggregated: &HashMap<i64, UserAggregate>) -> Vec<(i64, &UserAggregate)> {
    let mut ranked: Vec<(i64, &UserAggregate)> = aggregated.iter().map(|(&id, agg)| (id, agg)).collect();
    ranked.sort_by(|a, b| b.1.total_watts.cmp(&a.1.total_watts).then(a.0.cmp(&b.0)));
    ranked
}

fn display_name(agg: &UserAggregate) -> String {
    let joined: Vec<&str> = agg.names.iter().map(String::as_str).collect();
    let name = joined.join(" / ");
    if name.chars().count() > MAX_LABEL_CHARS {
        let truncated: String = name.chars().take(MAX_LABEL_CHARS - 3).collect();
        format!("{truncated}...")
    } else {
        name
    }
}

/// Build the pie slices: the top `top_n` users individually, everyone
/// else folded into one remainder slice.
pub fn chart_slices(aggregated: &HashMap<i64, UserAggregate>, top_n: usize) -> Vec<ChartSlice> {
    let ranked = rank_users(aggregated);

    let mut slices: Vec<ChartSlice> = ranked
        .iter()
        .take(top_n)
        .map(|&(_, agg)| ChartSlice {
            label: display_name(agg),
            watts: agg.total_watts,
        })
        .collect();

    if ranked.len() > top_n {
        let rest = &ranked[top_n..];
        let others_total: i64 = rest.iter().map(|(_, agg)| agg.total_watts).sum();
        slices.push(ChartSlice {
            label: format!(
                "杂鱼们 (共{} 杂鱼)\n({:.1} PW)",
                rest.len(),
                others_total as f64 / WATTS_PER_PW
            ),
            watts: others_total,
        });
    }

    slices
}

/// Write the full ranked listing as CSV.
pub fn write_chart_stats_csv(path: &Path, aggregated: &HashMap<i64, UserAggregate>) -> Result<()> {
    let ranked = rank_users(aggregated);

    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "Rank,Steam ID,Names,Generation Capacity (PW)")?;
    for (rank, (user_id, agg)) in ranked.iter().enumerate() {
        let joined: Vec<&str> = agg.names.iter().map(String::as_str).collect();
        let quoted = csv_field(&joined.join(" / "));
        writeln!(
            out,
            "{},{},{},{:.2}",
            rank + 1,
            user_id,
            quoted,
            agg.total_watts as f64 / WATTS_PER_PW
        )?;
    }
    out.flush()?;

    info!("Wrote {} ranked users to {}", ranked.len(), path.display());
    Ok(())
}
