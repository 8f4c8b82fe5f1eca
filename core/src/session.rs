//! Lifecycle of one logical search.
//!
//! Every submission bumps a generation counter. A response is applied only
//! if its generation is still the latest when it arrives, so whatever the
//! network does, the visible result set always belongs to the most recent
//! query.

use crate::error::ValidationError;
use crate::validation::QueryValidator;
use multiseek_backend_client::SearchBackend;
use multiseek_protocol::Query;
use multiseek_protocol::SearchOptions;
use multiseek_protocol::SearchResult;
use multiseek_protocol::SearchStats;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use tokio::time::Instant;
use tracing::debug;
use tracing::info;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchState {
    #[default]
    Idle,
    Searching,
    Succeeded,
    Failed,
}

/// What happened to one `submit` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Succeeded,
    Failed,
    /// A newer submission (or a reset) happened first; the response was
    /// dropped without touching state.
    Superseded,
    /// The same query with the same options is already being fetched.
    AlreadyInFlight,
}

/// Point-in-time copy of the session for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub state: SearchState,
    pub generation: u64,
    pub query: Option<Query>,
    pub results: Vec<SearchResult>,
    pub stats: Option<SearchStats>,
    pub error: Option<String>,
}

#[derive(Default)]
struct SessionInner {
    view: SessionSnapshot,
    in_flight_options: Option<SearchOptions>,
}

pub struct SearchSession {
    backend: Arc<dyn SearchBackend>,
    validator: QueryValidator,
    inner: Mutex<SessionInner>,
}

impl SearchSession {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self::with_validator(backend, QueryValidator::default())
    }

    pub fn with_validator(backend: Arc<dyn SearchBackend>, validator: QueryValidator) -> Self {
        Self {
            backend,
            validator,
            inner: Mutex::new(SessionInner::default()),
        }
    }

    /// Runs a search and applies its outcome unless superseded.
    ///
    /// Validation failures are returned without touching state or the
    /// network. Backend failures become the `Failed` state; they are not
    /// returned as errors.
    pub async fn submit(
        &self,
        query: Query,
        options: SearchOptions,
    ) -> Result<SubmitOutcome, ValidationError> {
        let query = self.validator.validate(query)?;
        self.validator.validate_options(&options)?;

        let generation = {
            let mut inner = self.lock();
            if inner.view.state == SearchState::Searching
                && inner.view.query.as_ref() == Some(&query)
                && inner.in_flight_options.as_ref() == Some(&options)
            {
                debug!(
                    generation = inner.view.generation,
                    "identical search already in flight"
                );
                return Ok(SubmitOutcome::AlreadyInFlight);
            }
            inner.view.generation += 1;
            inner.view.state = SearchState::Searching;
            inner.view.query = Some(query.clone());
            inner.view.results.clear();
            inner.view.stats = None;
            inner.view.error = None;
            inner.in_flight_options = Some(options.clone());
            inner.view.generation
        };

        debug!(generation, top_k = options.top_k, "search submitted");
        let started = Instant::now();
        let outcome = self.backend.search(&query, &options).await;
        let round_trip = started.elapsed();

        let mut inner = self.lock();
        if inner.view.generation != generation {
            debug!(
                generation,
                latest = inner.view.generation,
                "discarding stale search response"
            );
            return Ok(SubmitOutcome::Superseded);
        }
        inner.in_flight_options = None;

        match outcome {
            Ok(response) => {
                let stats = SearchStats::from_response(&response, round_trip);
                info!(
                    generation,
                    count = stats.count,
                    elapsed_ms = stats.elapsed_ms,
                    "search succeeded"
                );
                inner.view.state = SearchState::Succeeded;
                inner.view.results = response.results;
                inner.view.stats = Some(stats);
                Ok(SubmitOutcome::Succeeded)
            }
            Err(err) => {
                warn!(generation, error = %err, "search failed");
                inner.view.state = SearchState::Failed;
                inner.view.results.clear();
                inner.view.stats = None;
                inner.view.error = Some(err.to_string());
                Ok(SubmitOutcome::Failed)
            }
        }
    }

    /// Back to `Idle`. Any search still in flight will be discarded.
    pub fn reset(&self) {
        let mut inner = self.lock();
        let generation = inner.view.generation + 1;
        *inner = SessionInner::default();
        inner.view.generation = generation;
    }

    pub fn state(&self) -> SearchState {
        self.lock().view.state
    }

    pub fn is_loading(&self) -> bool {
        self.state() == SearchState::Searching
    }

    pub fn generation(&self) -> u64 {
        self.lock().view.generation
    }

    pub fn query(&self) -> Option<Query> {
        self.lock().view.query.clone()
    }

    pub fn results(&self) -> Vec<SearchResult> {
        self.lock().view.results.clone()
    }

    pub fn stats(&self) -> Option<SearchStats> {
        self.lock().view.stats.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().view.error.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().view.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
