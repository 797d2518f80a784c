//! HTTP transport, login handshake and paginated downloads.
//!
//! Everything here is blocking: pagination depends on the previous page's
//! record count, so there is nothing to parallelize within one listing.

use std::io::Read;
use std::thread;
use std::time::Duration;

use flate2::read::GzDecoder;
use log::{debug, info};
use rand::Rng;

use super::config::Config;
use super::error::{MilkywayError, Result};
use super::keycodec::encode_seed_key;
use super::models::{ClusterPage, PlayerRecord};
use super::records::{self, CLUSTER_PAGE_SIZE};

/// Delay between successive cluster page requests.
const PAGE_FETCH_DELAY: Duration = Duration::from_millis(500);

/// Credentials returned by the login handshake.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub login_key: String,
    pub full_data_url: String,
}

/// Perform a blocking HTTP GET and return the response body.
///
/// Any non-success status is an error.
pub fn http_get(url: &str) -> Result<Vec<u8>> {
    debug!("GET {url}");
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let body = response.bytes()?;
    debug!("Received {} bytes", body.len());
    Ok(body.to_vec())
}

/// Generate a synthetic platform user id.
///
/// The server only checks the shape of the id, so one is fabricated with
/// the fixed bits a real Steam id carries (bits 0, 32, 52 and 56) plus 31
/// random bits shifted up by one. Decoders must still treat any received
/// id as opaque.
pub fn random_platform_user_id() -> i64 {
    let random_bits = rand::thread_rng().gen_range(0..(1i64 << 31));
    1 | (1 << 32) | (1 << 52) | (1 << 56) | (random_bits << 1)
}

/// Log in with the given user id.
///
/// The response body is `<login_key>,<full_data_url>`; any other field
/// count is a [`MilkywayError::MalformedResponse`].
pub fn login(config: &Config, user_id: i64) -> Result<LoginSession> {
    let body = http_get(&config.login_url(user_id))?;
    let text = String::from_utf8_lossy(&body);

    let fields: Vec<&str> = text.split(',').collect();
    if fields.len() != 2 {
        return Err(MilkywayError::MalformedResponse { found: fields.len() });
    }

    info!("Logged in with user id {user_id}");
    Ok(LoginSession {
        login_key: fields[0].to_string(),
        full_data_url: fields[1].to_string(),
    })
}

/// Fetch and decompress the full-data payload.
///
/// The body arrives gzip-wrapped; the decompressed bytes are returned.
pub fn fetch_full_data(config: &Config, full_data_url: &str) -> Result<Vec<u8>> {
    let body = http_get(&config.download_url(full_data_url))?;

    let mut decoder = GzDecoder::new(body.as_slice());
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;

    info!(
        "Full data downloaded: {} bytes compressed, {} bytes decompressed",
        body.len(),
        decompressed.len()
    );
    Ok(decompressed)
}

/// Download every page of one seed's cluster player listing.
///
/// Pages are fetched in order with a fixed delay between requests; the
/// loop stops at `max_pages` or as soon as a page comes back with fewer
/// than [`CLUSTER_PAGE_SIZE`] records.
pub fn fetch_cluster_players(
    config: &Config,
    user_id: i64,
    platform: u8,
    seed: i64,
    stars: i32,
    mult_raw: i32,
    diff_raw: i32,
    max_pages: u32,
) -> Result<Vec<PlayerRecord>> {
    let seed_key = encode_seed_key(seed, stars, mult_raw, diff_raw);
    info!("Fetching cluster players for seed key {seed_key} (seed={seed}, stars={stars})");

    let mut all_players = Vec::new();
    for page_index in 0..max_pages {
        if page_index > 0 {
            thread::sleep(PAGE_FETCH_DELAY);
        }

        let url = config.cluster_user_page_url(
            seed_key,
            page_index as i32,
            CLUSTER_PAGE_SIZE,
            user_id,
            platform,
        );
        let data = http_get(&url)?;
        let page: ClusterPage = records::decode_cluster_page(&data)?;

        info!(
            "Page {}: {} players of {} total",
            page.page_index,
            page.players.len(),
            page.total_count
        );

        let page_len = page.players.len();
        all_players.extend(page.players);

        if page_len < CLUSTER_PAGE_SIZE {
            debug!("Short page at index {page_index}, listing exhausted");
            break;
        }
    }

    info!("Downloaded {} cluster player records", all_players.len());
    Ok(all_players)
}
