//! Core Milky Way statistics client.

pub mod capacity;
pub mod chart;
pub mod config;
pub mod error;
pub mod fetch;
pub mod keycodec;
pub mod md5f;
pub mod models;
pub mod reader;
pub mod records;
pub mod report;

use std::fs;
use std::thread;
use std::time::Duration;

use log::{info, warn};

use self::chart::ChartSlice;
use self::config::Config;
use self::models::{FullData, PlayerRecord, SeedAggregate, Summary};
pub use self::error::{MilkywayError, Result};

/// High-level client for the Milky Way statistics server.
///
/// One instance fabricates one synthetic user id at construction and uses
/// it for every request. Each download method fetches one endpoint,
/// decodes its payload and writes the matching report file(s) under the
/// configured output directory.
#[derive(Debug)]
pub struct MilkywayClient {
    config: Config,
    user_id: i64,
    platform: u8,
}

impl MilkywayClient {
    /// Create a client for the given platform id (1 = Steam, 2 = WeGame,
    /// 3 = XGP, 0 = Standalone).
    pub fn new(config: Config, platform: u8) -> Self {
        let user_id = fetch::random_platform_user_id();
        info!("Client ready with user id {user_id}, platform {platform}");
        Self { config, user_id, platform }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Fetch and decode the statistics endpoint, then write
    /// `statistics.txt`.
    pub fn download_statistics(&self) -> Result<Summary> {
        let url = self.config.statistic_url(self.user_id, self.platform);
        info!("Fetching statistics from {url}");

        let data = fetch::http_get(&url)?;
        let summary = records::decode_statistics(&data)?;

        self.config.ensure_output_dir()?;
        report::write_summary_txt(&self.config.statistics_txt(), &summary)?;
        Ok(summary)
    }

    /// Log in, download and decode the full-data payload, then write
    /// `top_ten.csv`, `summary.txt` and `all.csv`.
    ///
    /// The decompressed payload is also kept on disk under the name the
    /// server assigned it.
    pub fn download_full_data(&self) -> Result<FullData> {
        let session = fetch::login(&self.config, self.user_id)?;
        let data = fetch::fetch_full_data(&self.config, &session.full_data_url)?;

        self.config.ensure_output_dir()?;
        let payload_path = self.config.full_data_path(&session.full_data_url);
        fs::write(&payload_path, &data)?;
        info!("Full data payload saved to {}", payload_path.display());

        let full = records::decode_full_data(&data)?;

        report::write_player_csv(&self.config.top_ten_csv(), &full.top_ten)?;
        report::write_summary_txt(&self.config.summary_txt(), &full.summary)?;
        report::write_seed_csv(&self.config.all_csv(), &full.seeds)?;
        Ok(full)
    }

    /// Fetch and decode the all-user-data endpoint, then write
    /// `user_data.csv`.
    pub fn download_user_data(&self) -> Result<Vec<PlayerRecord>> {
        let url = self.config.all_user_data_url(self.user_id, self.platform);
        info!("Fetching user data from {url}");

        let data = fetch::http_get(&url)?;
        let players = records::decode_user_data(&data)?;

        self.config.ensure_output_dir()?;
        report::write_player_csv(&self.config.user_data_csv(), &players)?;
        Ok(players)
    }

    /// Download every page of one seed's cluster player listing, then
    /// write `cluster_players.csv`.
    pub fn download_cluster_players(
        &self,
        seed: i64,
        stars: i32,
        mult_raw: i32,
        diff_raw: i32,
        max_pages: u32,
    ) -> Result<Vec<PlayerRecord>> {
        let players = fetch::fetch_cluster_players(
            &self.config,
            self.user_id,
            self.platform,
            seed,
            stars,
            mult_raw,
            diff_raw,
            max_pages,
        )?;

        self.config.ensure_output_dir()?;
        report::write_player_csv(&self.config.cluster_players_csv(), &players)?;
        Ok(players)
    }

    /// Run the chart pipeline over a decoded per-seed listing.
    ///
    /// Selects seeds at or above `min_watts`, downloads up to `max_pages`
    /// cluster pages for each, aggregates the Steam players by user id,
    /// writes the ranked stats CSV and returns the pie slices (top `top_n`
    /// plus the folded remainder).
    ///
    /// A seed whose display strings cannot be mapped back to raw key
    /// digits is skipped with a warning, as is a seed whose download
    /// fails; the sweep continues with the remaining seeds.
    pub fn chart_pipeline(
        &self,
        seeds: &[SeedAggregate],
        min_watts: i64,
        top_n: usize,
        max_pages: u32,
    ) -> Result<Vec<ChartSlice>> {
        let selected = chart::high_capacity_seeds(seeds, min_watts);

        let mut players: Vec<PlayerRecord> = Vec::new();
        for (index, seed) in selected.iter().enumerate() {
            if index > 0 {
                thread::sleep(Duration::from_millis(500));
            }
            info!(
                "Processing seed {}/{}: seed={}, capacity={}",
                index + 1,
                selected.len(),
                seed.seed,
                seed.total_generation_capacity
            );

            let (Some(mult_raw), Some(diff_raw)) = (
                keycodec::resource_multiplier_to_raw(&seed.resource_multiplier),
                keycodec::combat_difficulty_to_raw(&seed.combat_difficulty),
            ) else {
                warn!(
                    "Skipping seed {}: cannot reconstruct raw key from '{}' / '{}'",
                    seed.seed, seed.resource_multiplier, seed.combat_difficulty
                );
                continue;
            };

            match fetch::fetch_cluster_players(
                &self.config,
                self.user_id,
                self.platform,
                seed.seed,
                seed.stars,
                mult_raw,
                diff_raw,
                max_pages,
            ) {
                Ok(page_players) => players.extend(page_players),
                Err(e) => warn!("Skipping seed {}: {e}", seed.seed),
            }
        }

        let aggregated = chart::aggregate_by_user(&players);

        self.config.ensure_output_dir()?;
        chart::write_chart_stats_csv(&self.config.chart_stats_csv(), &aggregated)?;

        Ok(chart::chart_slices(&aggregated, top_n))
    }
}
