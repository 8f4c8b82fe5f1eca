//! Staging and committing a single local file, either for ingestion or as
//! an image query.
//!
//! A successful commit stays visible for [`AUTO_CLEAR_DELAY`] and then
//! reverts to idle. Expiry is checked lazily: every accessor prunes first,
//! and [`UploadCoordinator::next_expiry`] tells the caller when to look
//! again.

use crate::config::AUTO_CLEAR_DELAY;
use crate::config::UploadLimits;
use crate::error::ValidationError;
use crate::validation::QueryValidator;
use multiseek_backend_client::SearchBackend;
use multiseek_protocol::MediaBlob;
use multiseek_protocol::MediaKind;
use multiseek_protocol::Query;
use multiseek_protocol::SearchOptions;
use multiseek_protocol::SearchResult;
use multiseek_protocol::SearchStats;
use multiseek_protocol::UploadAck;
use multiseek_protocol::UploadMetadata;
use multiseek_utils_image::render_preview_async;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use tracing::info;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadStatus {
    #[default]
    Idle,
    Staged,
    Uploading,
    Succeeded,
    Failed,
}

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Ingested(UploadAck),
    Matches {
        results: Vec<SearchResult>,
        stats: SearchStats,
    },
}

/// Snapshot of the staging area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadStaging {
    pub file: Option<MediaBlob>,
    /// PNG `data:` URL; absent for video and undecodable images.
    pub preview_data_url: Option<String>,
    pub status: UploadStatus,
    pub error_message: Option<String>,
    pub outcome: Option<UploadOutcome>,
    pub drag_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Staged,
    Rejected(ValidationError),
    /// An upload is in flight; the file was not staged.
    Busy,
    /// Cleared or replaced before the preview finished.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Succeeded,
    Failed(String),
    Busy,
    NothingStaged,
    Rejected(ValidationError),
    /// Cleared while the request was in flight.
    Discarded,
}

#[derive(Default)]
struct UploadInner {
    staging: UploadStaging,
    expires_at: Option<Instant>,
    epoch: u64,
}

impl UploadInner {
    fn prune_expired(&mut self) {
        if let Some(expires_at) = self.expires_at
            && expires_at <= Instant::now()
        {
            debug!("auto-clearing finished upload");
            self.reset();
        }
    }

    fn reset(&mut self) {
        let drag_active = self.staging.drag_active;
        self.staging = UploadStaging {
            drag_active,
            ..UploadStaging::default()
        };
        self.expires_at = None;
        self.epoch += 1;
    }
}

pub struct UploadCoordinator {
    backend: Arc<dyn SearchBackend>,
    validator: QueryValidator,
    clear_delay: Duration,
    inner: Mutex<UploadInner>,
}

impl UploadCoordinator {
    pub fn new(backend: Arc<dyn SearchBackend>, limits: UploadLimits) -> Self {
        Self {
            backend,
            validator: QueryValidator::new(limits),
            clear_delay: AUTO_CLEAR_DELAY,
            inner: Mutex::new(UploadInner::default()),
        }
    }

    pub fn with_clear_delay(mut self, delay: Duration) -> Self {
        self.clear_delay = delay;
        self
    }

    /// Validates and stages `file`, then renders its preview.
    pub async fn stage(&self, file: MediaBlob) -> StageOutcome {
        let epoch = {
            let mut inner = self.lock_pruned();
            if inner.staging.status == UploadStatus::Uploading {
                return StageOutcome::Busy;
            }
            if let Err(err) = self.validator.validate_file(&file) {
                info!(name = %file.name, mime = %file.mime, error = %err, "file rejected");
                // A pending file stays staged for retry; a finished one is dropped.
                if inner.staging.status == UploadStatus::Succeeded {
                    inner.reset();
                }
                inner.staging.status = UploadStatus::Failed;
                inner.staging.error_message = Some(err.to_string());
                return StageOutcome::Rejected(err);
            }
            inner.reset();
            inner.staging.status = UploadStatus::Staged;
            inner.staging.file = Some(file.clone());
            inner.epoch
        };
        debug!(name = %file.name, size = file.len(), "file staged");

        if file.kind() != Some(MediaKind::Image) {
            return StageOutcome::Staged;
        }
        let preview = match render_preview_async(file.bytes.clone(), file.mime.clone()).await {
            Ok(preview) => Some(preview.data_url),
            Err(err) => {
                warn!(name = %file.name, error = %err, "no preview for staged file");
                None
            }
        };

        let mut inner = self.lock();
        if inner.epoch != epoch {
            return StageOutcome::Discarded;
        }
        inner.staging.preview_data_url = preview;
        StageOutcome::Staged
    }

    pub fn drag_enter(&self) {
        self.lock().staging.drag_active = true;
    }

    pub fn drag_leave(&self) {
        self.lock().staging.drag_active = false;
    }

    /// Stages the first dropped file. Returns `None` for an empty drop.
    pub async fn drop_files(
        &self,
        files: impl IntoIterator<Item = MediaBlob>,
    ) -> Option<StageOutcome> {
        self.drag_leave();
        let file = files.into_iter().next()?;
        Some(self.stage(file).await)
    }

    /// Back to idle from any state. Work still in flight is discarded.
    pub fn clear(&self) {
        self.lock().reset();
    }

    /// Sends the staged file to the ingestion endpoint. Without explicit
    /// metadata, the file's name, size and type are sent.
    pub async fn commit_upload(&self, metadata: Option<UploadMetadata>) -> CommitOutcome {
        let (file, epoch) = match self.begin_commit() {
            Ok(begun) => begun,
            Err(outcome) => return outcome,
        };
        let metadata = metadata.unwrap_or_else(|| UploadMetadata::for_blob(&file));

        let result = self.backend.upload(&file, &metadata).await;
        self.finish_commit(epoch, result.map(UploadOutcome::Ingested))
    }

    /// Uses the staged file as an image query.
    pub async fn commit_search_by_image(&self, options: SearchOptions) -> CommitOutcome {
        if let Err(err) = self.validator.validate_options(&options) {
            return CommitOutcome::Rejected(err);
        }
        let (file, epoch) = match self.begin_commit() {
            Ok(begun) => begun,
            Err(outcome) => return outcome,
        };

        let started = Instant::now();
        let result = self.backend.search(&Query::image(file), &options).await;
        let round_trip = started.elapsed();
        let result = result.map(|response| UploadOutcome::Matches {
            stats: SearchStats::from_response(&response, round_trip),
            results: response.results,
        });
        self.finish_commit(epoch, result)
    }

    /// Time left before a finished commit is auto-cleared.
    pub fn next_expiry(&self) -> Option<Duration> {
        self.lock_pruned()
            .expires_at
            .and_then(|expires_at| expires_at.checked_duration_since(Instant::now()))
    }

    pub fn staging(&self) -> UploadStaging {
        self.lock_pruned().staging.clone()
    }

    pub fn status(&self) -> UploadStatus {
        self.lock_pruned().staging.status
    }

    pub fn file(&self) -> Option<MediaBlob> {
        self.lock_pruned().staging.file.clone()
    }

    pub fn preview_data_url(&self) -> Option<String> {
        self.lock_pruned().staging.preview_data_url.clone()
    }

    pub fn error_message(&self) -> Option<String> {
        self.lock_pruned().staging.error_message.clone()
    }

    pub fn outcome(&self) -> Option<UploadOutcome> {
        self.lock_pruned().staging.outcome.clone()
    }

    pub fn is_drag_active(&self) -> bool {
        self.lock().staging.drag_active
    }

    fn begin_commit(&self) -> Result<(MediaBlob, u64), CommitOutcome> {
        let mut inner = self.lock_pruned();
        let file = match (inner.staging.status, &inner.staging.file) {
            (UploadStatus::Uploading, _) => return Err(CommitOutcome::Busy),
            (UploadStatus::Staged | UploadStatus::Failed, Some(file)) => file.clone(),
            _ => return Err(CommitOutcome::NothingStaged),
        };
        inner.staging.status = UploadStatus::Uploading;
        inner.staging.error_message = None;
        inner.staging.outcome = None;
        debug!(name = %file.name, "commit started");
        Ok((file, inner.epoch))
    }

    fn finish_commit(
        &self,
        epoch: u64,
        result: multiseek_backend_client::Result<UploadOutcome>,
    ) -> CommitOutcome {
        let mut inner = self.lock();
        if inner.epoch != epoch {
            debug!("discarding commit result after clear");
            return CommitOutcome::Discarded;
        }
        match result {
            Ok(outcome) => {
                info!("commit succeeded");
                inner.staging.status = UploadStatus::Succeeded;
                inner.staging.outcome = Some(outcome);
                // A delay past the clock's range never expires.
                inner.expires_at = Instant::now().checked_add(self.clear_delay);
                CommitOutcome::Succeeded
            }
            Err(err) => {
                warn!(error = %err, "commit failed");
                let message = err.to_string();
                inner.staging.status = UploadStatus::Failed;
                inner.staging.error_message = Some(message.clone());
                CommitOutcome::Failed(message)
            }
        }
    }

    fn lock_pruned(&self) -> MutexGuard<'_, UploadInner> {
        let mut inner = self.lock();
        inner.prune_expired();
        inner
    }

    fn lock(&self) -> MutexGuard<'_, UploadInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
