/// Application configuration module
use anyhow::Context;
use std::env;
use std::time::Duration;

/// Upstream endpoints and server settings, read once at startup and handed
/// to each client explicitly.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub nasa_api_url: String,
    pub nasa_api_key: String,
    pub nasa_images_url: String,
    pub iss_api_url: String,
    pub spacex_api_url: String,
    pub space_news_url: String,
    /// Allowed CORS origin; any origin when unset
    pub frontend_url: Option<String>,
    pub upstream_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let string_or = |key: &str, default: &str| set(key).unwrap_or_else(|| default.to_string());

        let port = match set("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got {raw:?}"))?,
            None => 5000,
        };

        let timeout_secs = match set("UPSTREAM_TIMEOUT_SECONDS") {
            Some(raw) => raw.trim().parse::<u64>().with_context(|| {
                format!("UPSTREAM_TIMEOUT_SECONDS must be a whole number of seconds, got {raw:?}")
            })?,
            None => 10,
        };
        if timeout_secs == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_SECONDS must be at least 1");
        }

        Ok(Self {
            port,
            nasa_api_url: string_or("NASA_API_URL", "https://api.nasa.gov"),
            nasa_api_key: string_or("NASA_API_KEY", "DEMO_KEY"),
            nasa_images_url: string_or("NASA_IMAGES_URL", "https://images-api.nasa.gov"),
            iss_api_url: string_or("ISS_API_URL", "http://api.open-notify.org"),
            spacex_api_url: string_or("SPACEX_API_URL", "https://api.spacexdata.com/v4"),
            space_news_url: string_or("SPACE_NEWS_URL", "https://api.spaceflightnewsapi.net/v4"),
            frontend_url: set("FRONTEND_URL"),
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = from_pairs(&[]).unwrap();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.nasa_api_key, "DEMO_KEY");
        assert_eq!(cfg.nasa_images_url, "https://images-api.nasa.gov");
        assert_eq!(cfg.upstream_timeout, Duration::from_secs(10));
        assert!(cfg.frontend_url.is_none());
        assert_eq!(cfg.bind_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = from_pairs(&[
            ("PORT", "8080"),
            ("NASA_API_KEY", "secret"),
            ("FRONTEND_URL", "http://localhost:3000"),
            ("UPSTREAM_TIMEOUT_SECONDS", "3"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.nasa_api_key, "secret");
        assert_eq!(cfg.frontend_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(cfg.upstream_timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = from_pairs(&[("NASA_API_KEY", "  "), ("FRONTEND_URL", "")]).unwrap();
        assert_eq!(cfg.nasa_api_key, "DEMO_KEY");
        assert!(cfg.frontend_url.is_none());
    }

    #[test]
    fn malformed_port_is_an_error() {
        let err = from_pairs(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn zero_timeout_is_an_error() {
        let err = from_pairs(&[("UPSTREAM_TIMEOUT_SECONDS", "0")]).unwrap_err();
        assert!(err.to_string().contains("UPSTREAM_TIMEOUT_SECONDS"));
    }
}
