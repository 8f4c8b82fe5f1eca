//! Wire and data model shared by the multiseek client crates.
//!
//! Everything here mirrors the JSON contract of the search backend. The
//! backend has shipped several shapes for the same payloads over time, so
//! the deserializers accept the known aliases (`payload` for `metadata`,
//! `total` for `count`, `latency_ms` for `search_time_ms`, `img` for
//! `image_url`) and normalize them into one representation.

mod feed;
mod id;
mod query;
mod search;
mod stats;
mod upload;

pub use feed::FeedBatch;
pub use feed::FeedItem;
pub use feed::FeedPage;
pub use query::MediaBlob;
pub use query::MediaKind;
pub use query::Query;
pub use search::Modality;
pub use search::SearchMode;
pub use search::SearchOptions;
pub use search::SearchRequest;
pub use search::SearchResponse;
pub use search::SearchResult;
pub use search::SearchStats;
pub use stats::BackendStats;
pub use stats::HealthStatus;
pub use upload::TaskStatus;
pub use upload::UploadAck;
pub use upload::UploadMetadata;
