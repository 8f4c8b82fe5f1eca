//! Client-side orchestration for multimodal search.
//!
//! Each component owns its state behind a short-lived lock and talks to the
//! backend through an injected [`SearchBackend`]:
//!
//! - [`SearchSession`] runs searches and keeps only the latest one visible.
//! - [`FeedPager`] pages the discovery feed for infinite scroll.
//! - [`UploadCoordinator`] stages a local file and commits it as an upload
//!   or an image query.
//!
//! Validation happens before any request is made; see [`QueryValidator`].

mod config;
mod error;
mod feed;
mod session;
mod upload;
mod validation;

#[cfg(test)]
mod test_support;

pub use config::AUTO_CLEAR_DELAY;
pub use config::UploadLimits;
pub use error::Result;
pub use error::ValidationError;
pub use feed::FeedPager;
pub use feed::LoadOutcome;
pub use multiseek_backend_client::SearchBackend;
pub use session::SearchSession;
pub use session::SearchState;
pub use session::SessionSnapshot;
pub use session::SubmitOutcome;
pub use upload::CommitOutcome;
pub use upload::StageOutcome;
pub use upload::UploadCoordinator;
pub use upload::UploadOutcome;
pub use upload::UploadStaging;
pub use upload::UploadStatus;
pub use validation::MAX_QUERY_CHARS;
pub use validation::MAX_TOP_K;
pub use validation::MIN_TOP_K;
pub use validation::QueryValidator;
pub use validation::validate;
