use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use reqwest::redirect::Policy;
use reqwest::Client as ReqwestClient;

use crate::config::Config;
use crate::models::PageRecord;

type PageCache = HashMap<String, (PageRecord, Instant)>;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Never follows redirects itself; the page-info handler re-checks every
    /// hop against the private-address guard.
    pub http_client: ReqwestClient,
    pub page_cache: Arc<Mutex<PageCache>>,
    pub cache_ttl: Duration,
    pub cache_max_entries: usize,
    pub max_page_bytes: usize,
}

impl AppState {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(config.fetch_timeout)
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()?;

        Ok(AppState {
            http_client,
            page_cache: Arc::new(Mutex::new(HashMap::new())),
            cache_ttl: config.cache_ttl,
            cache_max_entries: config.cache_max_entries,
            max_page_bytes: config.max_page_bytes,
        })
    }

    /// Record cached for `url`, if it has not expired.
    pub fn cached_page(&self, url: &str) -> Option<PageRecord> {
        let cache = self.page_cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache
            .get(url)
            .filter(|(_, cached_at)| cached_at.elapsed() < self.cache_ttl)
            .map(|(record, _)| record.clone())
    }

    /// Store `record`, dropping expired entries and, when the cache is full,
    /// the oldest one.
    pub fn cache_page(&self, url: String, record: PageRecord) {
        let mut cache = self.page_cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.retain(|_, (_, cached_at)| cached_at.elapsed() < self.cache_ttl);

        while cache.len() >= self.cache_max_entries.max(1) && !cache.contains_key(&url) {
            let oldest = cache
                .iter()
                .min_by_key(|(_, (_, cached_at))| *cached_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => cache.remove(&key),
                None => break,
            };
        }

        cache.insert(url, (record, Instant::now()));
    }

    pub fn cached_page_count(&self) -> usize {
        self.page_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(ttl: Duration) -> AppState {
        let config = Config {
            cache_ttl: ttl,
            ..Config::default()
        };
        AppState::new(&config).unwrap()
    }

    fn record(title: &str) -> PageRecord {
        PageRecord {
            title: title.into(),
            ..PageRecord::default()
        }
    }

    #[test]
    fn cached_page_round_trips_within_ttl() {
        let state = state(Duration::from_secs(60));
        state.cache_page("https://x.test/".into(), record("T"));
        assert_eq!(state.cached_page("https://x.test/"), Some(record("T")));
        assert_eq!(state.cached_page("https://y.test/"), None);
    }

    #[test]
    fn expired_entries_are_not_returned() {
        let state = state(Duration::ZERO);
        state.cache_page("https://x.test/".into(), record("T"));
        assert_eq!(state.cached_page("https://x.test/"), None);
    }

    #[test]
    fn clones_share_the_cache() {
        let state = state(Duration::from_secs(60));
        let other = state.clone();
        other.cache_page("https://x.test/".into(), record("T"));
        assert!(state.cached_page("https://x.test/").is_some());
    }

    #[test]
    fn full_cache_evicts_oldest_entry() {
        let state = AppState::new(&Config {
            cache_max_entries: 2,
            ..Config::default()
        })
        .unwrap();

        for url in ["https://a.test/", "https://b.test/", "https://c.test/"] {
            state.cache_page(url.into(), record(url));
            std::thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(state.cached_page_count(), 2);
        assert_eq!(state.cached_page("https://a.test/"), None);
        assert!(state.cached_page("https://b.test/").is_some());
        assert!(state.cached_page("https://c.test/").is_some());
    }

    #[test]
    fn refreshing_a_cached_url_does_not_evict() {
        let state = AppState::new(&Config {
            cache_max_entries: 2,
            ..Config::default()
        })
        .unwrap();

        state.cache_page("https://a.test/".into(), record("a"));
        state.cache_page("https://b.test/".into(), record("b"));
        state.cache_page("https://a.test/".into(), record("a2"));

        assert_eq!(state.cached_page_count(), 2);
        assert_eq!(state.cached_page("https://a.test/"), Some(record("a2")));
        assert!(state.cached_page("https://b.test/").is_some());
    }
}
