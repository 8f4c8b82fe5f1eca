//! Infinite-scroll paging over the discovery feed.

use multiseek_backend_client::SearchBackend;
use multiseek_protocol::FeedItem;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use tracing::debug;
use tracing::info;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded {
        page_number: u32,
        added: usize,
    },
    /// Another load is in flight.
    Busy,
    /// The backend already reported the end of data.
    Exhausted,
    Failed(String),
    /// The pager was reset while this load was in flight.
    Discarded,
}

#[derive(Default)]
struct FeedInner {
    items: Vec<FeedItem>,
    current_page: u32,
    loading: bool,
    exhausted: bool,
    last_error: Option<String>,
    epoch: u64,
}

/// Accumulates feed pages in order. At most one load runs at a time.
pub struct FeedPager {
    backend: Arc<dyn SearchBackend>,
    inner: Mutex<FeedInner>,
}

impl FeedPager {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            inner: Mutex::new(FeedInner::default()),
        }
    }

    pub async fn load_next(&self) -> LoadOutcome {
        let (page_number, epoch) = {
            let mut inner = self.lock();
            if inner.loading {
                return LoadOutcome::Busy;
            }
            if inner.exhausted {
                return LoadOutcome::Exhausted;
            }
            inner.loading = true;
            (inner.current_page + 1, inner.epoch)
        };

        debug!(page_number, "loading feed page");
        let fetched = self.backend.fetch_page(page_number).await;

        let mut inner = self.lock();
        if inner.epoch != epoch {
            debug!(page_number, "discarding feed page fetched before reset");
            return LoadOutcome::Discarded;
        }
        inner.loading = false;

        match fetched {
            Ok(page) => {
                let added = page.items.len();
                inner.items.extend(page.items);
                inner.current_page = page_number;
                inner.last_error = None;
                if !page.has_more {
                    inner.exhausted = true;
                    info!(page_number, "feed exhausted");
                }
                debug!(
                    page_number,
                    added,
                    total = inner.items.len(),
                    "feed page loaded"
                );
                LoadOutcome::Loaded { page_number, added }
            }
            Err(err) => {
                warn!(page_number, error = %err, "feed page failed");
                let message = err.to_string();
                inner.last_error = Some(message.clone());
                LoadOutcome::Failed(message)
            }
        }
    }

    /// Initial load. Returns `None` if items are already present.
    pub async fn start(&self) -> Option<LoadOutcome> {
        if !self.lock().items.is_empty() {
            return None;
        }
        Some(self.load_next().await)
    }

    /// The viewport sentinel came into range.
    pub async fn on_proximity(&self) -> LoadOutcome {
        self.load_next().await
    }

    pub fn reset(&self) {
        let mut inner = self.lock();
        let epoch = inner.epoch + 1;
        *inner = FeedInner::default();
        inner.epoch = epoch;
    }

    pub fn items(&self) -> Vec<FeedItem> {
        self.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn current_page(&self) -> u32 {
        self.lock().current_page
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.lock().exhausted
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FeedInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
