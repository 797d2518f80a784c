//! Server endpoints, output locations and URL construction.

use std::fs;
use std::path::PathBuf;

use super::error::Result;

/// Application configuration.
///
/// Defaults point at the production statistics server and an `output`
/// directory next to the working directory. All URL building lives here so
/// the fetch layer only ever sees finished URLs.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub login_header_api: String,
    pub download_full_data_api: String,
    pub get_statistic_api: String,
    pub get_all_user_data_api: String,
    pub get_cluster_user_data_api: String,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "http://8.140.162.132/".to_string(),
            login_header_api: "login/header".to_string(),
            download_full_data_api: "download".to_string(),
            get_statistic_api: "query/statisticdata".to_string(),
            get_all_user_data_api: "query/alluserdata".to_string(),
            get_cluster_user_data_api: "query/clusteruserdata".to_string(),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Config {
    /// Path for the top-ten leaderboard CSV.
    pub fn top_ten_csv(&self) -> PathBuf {
        self.output_dir.join("top_ten.csv")
    }

    /// Path for the full-data summary text file.
    pub fn summary_txt(&self) -> PathBuf {
        self.output_dir.join("summary.txt")
    }

    /// Path for the per-seed aggregate CSV.
    pub fn all_csv(&self) -> PathBuf {
        self.output_dir.join("all.csv")
    }

    /// Path for the statistics-endpoint text file.
    pub fn statistics_txt(&self) -> PathBuf {
        self.output_dir.join("statistics.txt")
    }

    /// Path for the all-user-data CSV.
    pub fn user_data_csv(&self) -> PathBuf {
        self.output_dir.join("user_data.csv")
    }

    /// Path for the cluster player CSV.
    pub fn cluster_players_csv(&self) -> PathBuf {
        self.output_dir.join("cluster_players.csv")
    }

    /// Path for the chart pipeline's ranked stats CSV.
    pub fn chart_stats_csv(&self) -> PathBuf {
        self.output_dir.join("generation_capacity_stats.csv")
    }

    /// Path a downloaded full-data payload is saved under, keeping the
    /// final segment of the server-provided URL path.
    pub fn full_data_path(&self, full_data_url: &str) -> PathBuf {
        let filename = full_data_url.rsplit('/').next().unwrap_or(full_data_url);
        self.output_dir.join(filename)
    }

    /// Login URL for the given user id.
    pub fn login_url(&self, user_id: i64) -> String {
        format!("{}{}?user_id={}", self.server_address, self.login_header_api, user_id)
    }

    /// Download URL for the full-data path returned by login.
    pub fn download_url(&self, full_data_url: &str) -> String {
        format!("{}{}/{}", self.server_address, self.download_full_data_api, full_data_url)
    }

    /// Statistics URL for the given user id and platform.
    pub fn statistic_url(&self, user_id: i64, platform: u8) -> String {
        format!(
            "{}{}?user_id={}&platform={}",
            self.server_address, self.get_statistic_api, user_id, platform
        )
    }

    /// All-user-data URL for the given user id and platform.
    pub fn all_user_data_url(&self, user_id: i64, platform: u8) -> String {
        format!(
            "{}{}?user_id={}&platform={}",
            self.server_address, self.get_all_user_data_api, user_id, platform
        )
    }

    /// Cluster page URL for one page of one seed key's player listing.
    pub fn cluster_user_page_url(
        &self,
        seed_key: i64,
        page: i32,
        size: usize,
        user_id: i64,
        platform: u8,
    ) -> String {
        format!(
            "{}{}?seed_key={}&page={}&size={}&user_id={}&platform={}",
            self.server_address, self.get_cluster_user_data_api, seed_key, page, size, user_id, platform
        )
    }

    /// Create the output directory if it does not exist.
    pub fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }
}
