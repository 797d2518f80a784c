//! CSV and text report writers.
//!
//! Column order and the Chinese headers are a fixed contract with the
//! spreadsheets downstream; do not reorder.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use super::error::Result;
use super::models::{PlayerRecord, SeedAggregate, Summary};

/// Header row for player CSVs (top ten, user data, cluster players).
const PLAYER_HEADER: &[&str] = &[
    "种子", "星数", "资源倍率", "战斗难度", "用户ID", "平台", "账号", "发电量", "匿名",
];

/// Header row for the per-seed aggregate CSV.
const SEED_HEADER: &[&str] = &["种子", "星数", "资源倍率", "战斗难度", "用户数", "总发电量"];

/// Quote a CSV field if it needs it.
///
/// Fields containing a comma, quote or line break are wrapped in quotes
/// with embedded quotes doubled; everything else passes through verbatim.
/// Account names are the only fields that ever trigger this.
pub(crate) fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn write_row<W: Write>(out: &mut W, fields: &[String]) -> Result<()> {
    let row: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    writeln!(out, "{}", row.join(","))?;
    Ok(())
}

fn write_header<W: Write>(out: &mut W, header: &[&str]) -> Result<()> {
    writeln!(out, "{}", header.join(","))?;
    Ok(())
}

/// Write player records as CSV.
pub fn write_player_csv(path: &Path, players: &[PlayerRecord]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_header(&mut out, PLAYER_HEADER)?;

    for player in players {
        write_row(
            &mut out,
            &[
                player.seed.to_string(),
                player.stars.to_string(),
                player.resource_multiplier.clone(),
                player.combat_difficulty.clone(),
                player.user_id.to_string(),
                player.platform.to_string(),
                player.account_name.clone(),
                player.generation_capacity.clone(),
                player.is_anonymous.to_string(),
            ],
        )?;
    }

    out.flush()?;
    info!("Wrote {} player rows to {}", players.len(), path.display());
    Ok(())
}

/// Write per-seed aggregates as CSV.
pub fn write_seed_csv(path: &Path, seeds: &[SeedAggregate]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_header(&mut out, SEED_HEADER)?;

    for seed in seeds {
        write_row(
            &mut out,
            &[
                seed.seed.to_string(),
                seed.stars.to_string(),
                seed.resource_multiplier.clone(),
                seed.combat_difficulty.clone(),
                seed.player_count.to_string(),
                seed.total_generation_capacity.clone(),
            ],
        )?;
    }

    out.flush()?;
    info!("Wrote {} seed rows to {}", seeds.len(), path.display());
    Ok(())
}

/// Write the four-line summary text file.
pub fn write_summary_txt(path: &Path, summary: &Summary) -> Result<()> {
    let mut out = File::create(path)?;
    write!(
        out,
        "总玩家数: {}\n总发电量: {}\n总太阳帆数: {}\n总戴森球数: {}\n",
        summary.total_players,
        summary.total_generation_capacity,
        summary.total_sails_launched,
        summary.total_dyson_spheres,
    )?;

    info!("Wrote summary to {}", path.display());
    Ok(())
}
