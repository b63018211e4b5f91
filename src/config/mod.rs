use std::env;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; ShareCaneBot/1.0; +https://github.com/sharecane/sharecane)";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// `APP_ENV` is anything other than `production`.
    pub is_dev: bool,
    pub fetch_timeout: Duration,
    pub cache_ttl: Duration,
    /// Upper bound on cached pages; the oldest entry is evicted when full.
    pub cache_max_entries: usize,
    /// Upper bound on a fetched page body, in bytes.
    pub max_page_bytes: usize,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            is_dev: true,
            fetch_timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(86_400),
            cache_max_entries: 1024,
            max_page_bytes: 5 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset or unparsable values
    /// fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        let secs = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };
        let count = |key: &str, default: usize| {
            lookup(key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        };

        Config {
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            is_dev: lookup("APP_ENV").as_deref() != Some("production"),
            fetch_timeout: secs("FETCH_TIMEOUT_SECS", defaults.fetch_timeout),
            cache_ttl: secs("CACHE_TTL_SECS", defaults.cache_ttl),
            cache_max_entries: count("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            max_page_bytes: count("MAX_PAGE_BYTES", defaults.max_page_bytes),
            user_agent: lookup("USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
