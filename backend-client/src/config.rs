use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Environment variable that selects the backend host.
pub const API_URL_ENV_VAR: &str = "MULTISEEK_API_URL";

/// Backend used when nothing is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// How image queries reach the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSearchRoute {
    /// Multipart body on the shared `/api/v1/search` route.
    #[default]
    Unified,
    /// `/api/v1/search/image?top_k=<n>` with only the file attached.
    Dedicated,
}

/// Where feed batches come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedSource {
    /// `GET {base}/{path}?page=<n>` returning `{items, has_more?}`.
    Remote {
        #[serde(default = "default_feed_path")]
        path: String,
    },
    /// Generated locally; never runs out.
    Synthetic {
        #[serde(default = "default_feed_batch_size")]
        batch_size: usize,
    },
}

impl Default for FeedSource {
    fn default() -> Self {
        FeedSource::Synthetic {
            batch_size: default_feed_batch_size(),
        }
    }
}

/// Configuration for [`crate::HttpGateway`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Backend base URL, e.g. `http://localhost:8000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Unset means requests may hang until the caller
    /// drops them.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub image_search_route: ImageSearchRoute,

    #[serde(default)]
    pub feed: FeedSource,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_feed_path() -> String {
    "api/random".to_string()
}

fn default_feed_batch_size() -> usize {
    12
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
            image_search_route: ImageSearchRoute::default(),
            feed: FeedSource::default(),
        }
    }
}

impl GatewayConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Reads the base URL from [`API_URL_ENV_VAR`], falling back to
    /// [`DEFAULT_API_URL`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(API_URL_ENV_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(default_base_url);
        Self::with_base_url(base_url)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Parses `base_url` into a directory-style URL so relative endpoint
    /// paths join beneath it instead of replacing its last segment.
    pub fn parsed_base_url(&self) -> Result<Url, String> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| format!("invalid base_url {:?}: {e}", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "base_url must use http or https, got {:?}",
                url.scheme()
            ));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.parsed_base_url()?;

        if self.request_timeout_secs == Some(0) {
            return Err("request_timeout_secs must be > 0".to_string());
        }

        match &self.feed {
            FeedSource::Remote { path } if path.trim().is_empty() => {
                Err("feed path must not be empty".to_string())
            }
            FeedSource::Synthetic { batch_size: 0 } => {
                Err("feed batch_size must be > 0".to_string())
            }
            _ => Ok(()),
        }
    }
}
