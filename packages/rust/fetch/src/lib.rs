//! Page fetching with a persistent on-disk cache.
//!
//! Each article URL maps to a cache file (see [`paths`]); an existing cache
//! file short-circuits the network entirely unless a forced refresh is
//! requested. Downloads retry a fixed number of times, deleting partial
//! files between attempts, and a URL that exhausts its attempts is reported
//! to the caller without aborting the batch.

pub mod paths;
pub mod sitemap;

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use skillpress_shared::{FetchConfig, Result, SkillPressError};

/// Maximum number of redirects to follow per request.
const MAX_REDIRECTS: usize = 5;

/// Downloads article pages into the cache tree.
pub struct Fetcher {
    client: Client,
    cache_root: PathBuf,
    retries: u32,
}

impl Fetcher {
    /// Build a fetcher from config: browser user-agent, Accept headers,
    /// per-request timeout.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SkillPressError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            cache_root: PathBuf::from(&config.cache_dir),
            retries: config.retries,
        })
    }

    /// The underlying HTTP client (shared with the sitemap reader).
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Root of the cache tree.
    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Download `url` into the cache, returning the cache path.
    ///
    /// Returns the existing cache file without any network access unless
    /// `force` is set. Returns `None` once all attempts are exhausted; the
    /// caller records the URL as failed and moves on.
    pub async fn fetch(&self, url: &str, force: bool) -> Option<PathBuf> {
        let cache_path = paths::cache_path(url, &self.cache_root);

        if !force && cache_path.exists() {
            debug!(url, "cache hit");
            return Some(cache_path);
        }

        if let Some(parent) = cache_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(url, error = %e, "failed to create cache directory");
                return None;
            }
        }

        for attempt in 1..=self.retries {
            if self.try_download(url, &cache_path).await {
                debug!(url, attempt, "download succeeded");
                return Some(cache_path);
            }

            // Clean up the partial file before the next attempt
            if cache_path.exists() {
                let _ = std::fs::remove_file(&cache_path);
            }
            debug!(url, attempt, "download attempt failed");
        }

        warn!(url, retries = self.retries, "exhausted download attempts");
        None
    }

    /// One download attempt. Succeeds only if the HTTP status is success
    /// AND the written file exists AND is non-empty.
    async fn try_download(&self, url: &str, cache_path: &Path) -> bool {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(url, error = %e, "request failed");
                return false;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(url, %status, "non-success status");
            return false;
        }

        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                debug!(url, error = %e, "failed to read response body");
                return false;
            }
        };

        if let Err(e) = std::fs::write(cache_path, &body) {
            warn!(url, error = %e, "failed to write cache file");
            return false;
        }

        match std::fs::metadata(cache_path) {
            Ok(meta) => meta.len() > 0,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn temp_cache() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sp-fetch-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn make_config(cache_dir: &Path) -> FetchConfig {
        FetchConfig {
            cache_dir: cache_dir.to_string_lossy().to_string(),
            ..FetchConfig::default()
        }
    }

    #[tokio::test]
    async fn fetch_writes_cache_file() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/hc/articles/1-intro"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>intro</html>"))
            .mount(&server)
            .await;

        let cache = temp_cache();
        let fetcher = Fetcher::new(&make_config(&cache)).unwrap();

        let url = format!("{}/hc/articles/1-intro", server.uri());
        let cache_path = fetcher.fetch(&url, false).await.expect("fetch should succeed");

        assert!(cache_path.exists());
        assert_eq!(
            std::fs::read_to_string(&cache_path).unwrap(),
            "<html>intro</html>"
        );
        assert!(cache_path.ends_with("hc/articles/1-intro.html"));

        let _ = std::fs::remove_dir_all(&cache);
    }

    #[tokio::test]
    async fn cache_hit_issues_no_request() {
        let server = MockServer::start().await;

        // Expect zero hits: the pre-seeded cache file must short-circuit
        Mock::given(method("GET"))
            .and(path("/hc/articles/2-cached"))
            .respond_with(ResponseTemplate::new(200).set_body_string("fresh"))
            .expect(0)
            .mount(&server)
            .await;

        let cache = temp_cache();
        let url = format!("{}/hc/articles/2-cached", server.uri());
        let seeded = paths::cache_path(&url, &cache);
        std::fs::create_dir_all(seeded.parent().unwrap()).unwrap();
        std::fs::write(&seeded, "stale").unwrap();

        let fetcher = Fetcher::new(&make_config(&cache)).unwrap();
        let cache_path = fetcher.fetch(&url, false).await.expect("cache hit");

        assert_eq!(cache_path, seeded);
        assert_eq!(std::fs::read_to_string(&cache_path).unwrap(), "stale");

        let _ = std::fs::remove_dir_all(&cache);
    }

    #[tokio::test]
    async fn force_overwrites_cached_file() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/hc/articles/3-force"))
            .respond_with(ResponseTemplate::new(200).set_body_string("fresh"))
            .expect(1)
            .mount(&server)
            .await;

        let cache = temp_cache();
        let url = format!("{}/hc/articles/3-force", server.uri());
        let seeded = paths::cache_path(&url, &cache);
        std::fs::create_dir_all(seeded.parent().unwrap()).unwrap();
        std::fs::write(&seeded, "stale").unwrap();

        let fetcher = Fetcher::new(&make_config(&cache)).unwrap();
        let cache_path = fetcher.fetch(&url, true).await.expect("forced fetch");

        assert_eq!(std::fs::read_to_string(&cache_path).unwrap(), "fresh");

        let _ = std::fs::remove_dir_all(&cache);
    }

    #[tokio::test]
    async fn zero_byte_response_retries_then_fails() {
        let server = MockServer::start().await;

        // Empty body on every attempt: all three tries must fail
        Mock::given(method("GET"))
            .and(path("/hc/articles/4-empty"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .expect(3)
            .mount(&server)
            .await;

        let cache = temp_cache();
        let fetcher = Fetcher::new(&make_config(&cache)).unwrap();

        let url = format!("{}/hc/articles/4-empty", server.uri());
        let result = fetcher.fetch(&url, false).await;

        assert!(result.is_none());
        // No partial file may remain
        assert!(!paths::cache_path(&url, &cache).exists());

        let _ = std::fs::remove_dir_all(&cache);
    }

    #[tokio::test]
    async fn transient_error_recovers_within_retry_limit() {
        let server = MockServer::start().await;

        // First two attempts fail, third succeeds
        Mock::given(method("GET"))
            .and(path("/hc/articles/5-flaky"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/hc/articles/5-flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("finally"))
            .mount(&server)
            .await;

        let cache = temp_cache();
        let fetcher = Fetcher::new(&make_config(&cache)).unwrap();

        let url = format!("{}/hc/articles/5-flaky", server.uri());
        let cache_path = fetcher.fetch(&url, false).await.expect("third attempt succeeds");

        assert_eq!(std::fs::read_to_string(&cache_path).unwrap(), "finally");

        let _ = std::fs::remove_dir_all(&cache);
    }
}
