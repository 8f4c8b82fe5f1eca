use crate::id::deserialize_id;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_with::skip_serializing_none;
use std::time::Duration;

pub const DEFAULT_TOP_K: u32 = 20;

/// Retrieval strategy requested from the backend.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    #[default]
    Vector,
    Hybrid,
}

impl SearchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vector => "vector",
            Self::Hybrid => "hybrid",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Text,
    Image,
}

impl Modality {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

/// Per-search knobs chosen by the user.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchOptions {
    pub top_k: u32,
    pub mode: SearchMode,
    pub score_threshold: Option<f32>,
    pub filters: Option<Map<String, Value>>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            mode: SearchMode::default(),
            score_threshold: None,
            filters: None,
        }
    }
}

impl SearchOptions {
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }
}

/// JSON body of a text search.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub modality: Modality,
    pub top_k: u32,
    pub search_type: SearchMode,
    pub score_threshold: Option<f32>,
    pub filters: Option<Map<String, Value>>,
}

impl SearchRequest {
    pub fn text(query: impl Into<String>, options: &SearchOptions) -> Self {
        Self {
            query: query.into(),
            modality: Modality::Text,
            top_k: options.top_k,
            search_type: options.mode,
            score_threshold: options.score_threshold,
            filters: options.filters.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Similarity in `[0, 1]`, higher is better.
    pub score: f32,
    #[serde(default, alias = "payload")]
    pub metadata: Map<String, Value>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub query: String,
    #[serde(default, alias = "total")]
    pub count: Option<u64>,
    #[serde(default, alias = "latency_ms")]
    pub search_time_ms: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl SearchResponse {
    /// Reported hit count, falling back to the number of results carried.
    pub fn total(&self) -> u64 {
        self.count.unwrap_or(self.results.len() as u64)
    }
}

/// Summary of one completed search. Never merged across searches.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchStats {
    pub count: u64,
    pub elapsed_ms: f64,
    pub timestamp: Option<String>,
}

impl SearchStats {
    /// Prefers the backend's own timing; `round_trip` covers backends that
    /// do not report one.
    pub fn from_response(response: &SearchResponse, round_trip: Duration) -> Self {
        let elapsed_ms = response
            .search_time_ms
            .filter(|ms| ms.is_finite() && *ms >= 0.0)
            .unwrap_or_else(|| round_trip.as_secs_f64() * 1000.0);
        Self {
            count: response.total(),
            elapsed_ms,
            timestamp: response.timestamp.clone(),
        }
    }
}
