//! Cached HTTP fetching of reference data
//!
//! Downloads happen on a background thread. Callers poll `request` until the
//! status leaves `Downloading`; `fetch_blocking` wraps that loop with a bounded
//! number of polls.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tarmac_core::{Result, TarmacError};

const MAX_RETRIES: usize = 3;
const RETRY_BASE_DELAY_MS: u64 = 500;
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Available,
    Downloading,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: FetchStatus,
    pub local_path: Option<PathBuf>,
    pub error: Option<String>,
}

impl FetchResponse {
    pub fn available(path: PathBuf) -> Self {
        Self {
            status: FetchStatus::Available,
            local_path: Some(path),
            error: None,
        }
    }

    pub fn downloading() -> Self {
        Self {
            status: FetchStatus::Downloading,
            local_path: None,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: FetchStatus::Error,
            local_path: None,
            error: Some(message.into()),
        }
    }
}

/// Source of reference data files, addressed by URL and cached per domain
pub trait CifpFetcher {
    fn request(&self, url: &str, cache_domain: &str) -> FetchResponse;
}

/// Poll `fetcher` until the file is available or failed, sleeping
/// `interval` between polls. Still downloading after `max_polls` polls is
/// reported as an error.
pub fn fetch_blocking(
    fetcher: &dyn CifpFetcher,
    url: &str,
    cache_domain: &str,
    max_polls: u32,
    interval: Duration,
) -> FetchResponse {
    for poll in 0..max_polls {
        let response = fetcher.request(url, cache_domain);
        if response.status != FetchStatus::Downloading {
            return response;
        }
        if poll + 1 < max_polls {
            std::thread::sleep(interval);
        }
    }
    FetchResponse::error(format!(
        "download of {} did not finish after {} polls",
        url, max_polls
    ))
}

/// File name a URL is cached under
pub fn cache_key(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[derive(Debug, Clone)]
enum CacheEntry {
    Downloading,
    Ready(PathBuf),
    Failed(String),
}

/// On-disk HTTP cache with background downloads
pub struct HttpCache {
    root: PathBuf,
    state: Arc<Mutex<HashMap<String, CacheEntry>>>,
}

impl HttpCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            state: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Cache rooted at the user's cache directory
    pub fn in_user_cache() -> Result<Self> {
        let base = dirs::cache_dir().ok_or_else(|| {
            TarmacError::ConfigError("no user cache directory on this platform".to_string())
        })?;
        Ok(Self::new(base.join("tarmac")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cached_path(&self, url: &str, cache_domain: &str) -> PathBuf {
        self.root.join(cache_domain).join(cache_key(url))
    }

    fn start_download(&self, url: &str, dest: PathBuf) {
        log::info!("Downloading {}", url);
        let state = Arc::clone(&self.state);
        let url = url.to_string();
        std::thread::spawn(move || {
            let entry = match download_with_retry(&url, &dest) {
                Ok(()) => CacheEntry::Ready(dest),
                Err(e) => {
                    log::warn!("Download of {} failed: {}", url, e);
                    CacheEntry::Failed(e.to_string())
                }
            };
            if let Ok(mut map) = state.lock() {
                map.insert(url, entry);
            }
        });
    }
}

impl CifpFetcher for HttpCache {
    fn request(&self, url: &str, cache_domain: &str) -> FetchResponse {
        let dest = self.cached_path(url, cache_domain);
        let mut map = match self.state.lock() {
            Ok(map) => map,
            Err(_) => return FetchResponse::error("download state is unavailable"),
        };

        match map.get(url) {
            Some(CacheEntry::Ready(path)) => FetchResponse::available(path.clone()),
            Some(CacheEntry::Downloading) => FetchResponse::downloading(),
            Some(CacheEntry::Failed(e)) => FetchResponse::error(e.clone()),
            None if dest.is_file() => {
                map.insert(url.to_string(), CacheEntry::Ready(dest.clone()));
                FetchResponse::available(dest)
            }
            None => {
                map.insert(url.to_string(), CacheEntry::Downloading);
                drop(map);
                self.start_download(url, dest);
                FetchResponse::downloading()
            }
        }
    }
}

fn download_with_retry(url: &str, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    for attempt in 0..MAX_RETRIES {
        let agent = build_agent();
        match agent.get(url).call() {
            Ok(ok) => {
                let mut reader = ok.into_body().into_reader();
                let mut bytes = Vec::new();
                std::io::Read::read_to_end(&mut reader, &mut bytes).map_err(|e| {
                    TarmacError::FetchError(format!("Failed to read {}: {}", url, e))
                })?;
                // Write then rename so a half-written file is never picked up
                let partial = dest.with_extension("part");
                fs::write(&partial, &bytes)?;
                fs::rename(&partial, dest)?;
                return Ok(());
            }
            Err(e) => {
                if attempt + 1 < MAX_RETRIES && is_retryable_error(&e) {
                    sleep_backoff(attempt);
                    continue;
                }
                return Err(TarmacError::FetchError(format!(
                    "Request for {} failed: {}",
                    url, e
                )));
            }
        }
    }

    Err(TarmacError::FetchError(format!(
        "Request for {} failed after retries",
        url
    )))
}

fn build_agent() -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .build();
    config.into()
}

fn is_retryable_error(e: &ureq::Error) -> bool {
    match e {
        ureq::Error::Timeout(_)
        | ureq::Error::Io(_)
        | ureq::Error::ConnectionFailed
        | ureq::Error::HostNotFound => true,
        ureq::Error::StatusCode(code) => matches!(code, 429 | 500 | 502 | 503 | 504),
        _ => false,
    }
}

fn sleep_backoff(attempt: usize) {
    let delay_ms = RETRY_BASE_DELAY_MS.saturating_mul(1u64 << attempt);
    std::thread::sleep(Duration::from_millis(delay_ms));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Reports `Downloading` a fixed number of times, then a result
    struct ScriptedFetcher {
        pending: Cell<u32>,
        calls: Cell<u32>,
        result: FetchResponse,
    }

    impl CifpFetcher for ScriptedFetcher {
        fn request(&self, _url: &str, _cache_domain: &str) -> FetchResponse {
            self.calls.set(self.calls.get() + 1);
            if self.pending.get() > 0 {
                self.pending.set(self.pending.get() - 1);
                return FetchResponse::downloading();
            }
            self.result.clone()
        }
    }

    #[test]
    fn test_cache_key_is_stable_hex() {
        let a = cache_key("https://example.com/cifp/KSEA.dat");
        assert_eq!(a.len(), 64);
        assert_eq!(a, cache_key("https://example.com/cifp/KSEA.dat"));
        assert_ne!(a, cache_key("https://example.com/cifp/KBFI.dat"));
    }

    #[test]
    fn test_fetch_blocking_waits_for_download() {
        let fetcher = ScriptedFetcher {
            pending: Cell::new(2),
            calls: Cell::new(0),
            result: FetchResponse::available(PathBuf::from("/tmp/x")),
        };
        let r = fetch_blocking(&fetcher, "u", "cifp", 10, Duration::from_millis(1));
        assert_eq!(r.status, FetchStatus::Available);
        assert_eq!(fetcher.calls.get(), 3);
    }

    #[test]
    fn test_fetch_blocking_gives_up() {
        let fetcher = ScriptedFetcher {
            pending: Cell::new(100),
            calls: Cell::new(0),
            result: FetchResponse::available(PathBuf::from("/tmp/x")),
        };
        let r = fetch_blocking(&fetcher, "u", "cifp", 4, Duration::from_millis(1));
        assert_eq!(r.status, FetchStatus::Error);
        assert_eq!(fetcher.calls.get(), 4);
        assert!(r.error.unwrap().contains("4 polls"));
    }

    #[test]
    fn test_http_cache_serves_existing_file() {
        let root = std::env::temp_dir().join(format!("tarmac_cache_{}", uuid::Uuid::new_v4()));
        let cache = HttpCache::new(&root);
        let url = "https://example.com/cifp/KXYZ.dat";
        let path = cache.cached_path(url, "cifp");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "RWY:RW09,;N00000000,E000000000,0000;\n").unwrap();

        let r = cache.request(url, "cifp");
        assert_eq!(r.status, FetchStatus::Available);
        assert_eq!(r.local_path, Some(path));

        let _ = fs::remove_dir_all(&root);
    }
}
