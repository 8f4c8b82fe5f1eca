//! Scriptable in-memory backend for orchestrator tests.

use async_trait::async_trait;
use multiseek_backend_client::GatewayError;
use multiseek_backend_client::Result;
use multiseek_backend_client::SearchBackend;
use multiseek_protocol::FeedItem;
use multiseek_protocol::FeedPage;
use multiseek_protocol::MediaBlob;
use multiseek_protocol::Query;
use multiseek_protocol::SearchOptions;
use multiseek_protocol::SearchResponse;
use multiseek_protocol::SearchResult;
use multiseek_protocol::UploadAck;
use multiseek_protocol::UploadMetadata;
use serde_json::Map;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use tokio::sync::oneshot;

enum Reply<T> {
    Ready(Result<T>),
    Deferred(oneshot::Receiver<Result<T>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> Result<T> {
        match self {
            Reply::Ready(result) => result,
            Reply::Deferred(rx) => rx
                .await
                .unwrap_or_else(|_| Err(GatewayError::Transport("reply dropped".to_string()))),
        }
    }
}

/// Replies handed out in call order. A call with nothing scripted fails
/// with a transport error.
pub(crate) struct Script<T> {
    replies: Mutex<VecDeque<Reply<T>>>,
    calls: AtomicUsize,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl<T> Script<T> {
    pub(crate) fn push(&self, result: Result<T>) {
        self.replies.lock().unwrap().push_back(Reply::Ready(result));
    }

    /// Queues a reply that is released through the returned sender.
    pub(crate) fn defer(&self) -> oneshot::Sender<Result<T>> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Reply::Deferred(rx));
        tx
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self) -> Reply<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| {
            let err = GatewayError::Transport("nothing scripted".to_string());
            Reply::Ready(Err(err))
        })
    }
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    pub(crate) search: Script<SearchResponse>,
    pub(crate) upload: Script<UploadAck>,
    pub(crate) pages: Script<FeedPage>,
    searches: Mutex<Vec<(Query, SearchOptions)>>,
    uploads: Mutex<Vec<(MediaBlob, UploadMetadata)>>,
    page_requests: Mutex<Vec<u32>>,
}

impl FakeBackend {
    pub(crate) fn searches(&self) -> Vec<(Query, SearchOptions)> {
        self.searches.lock().unwrap().clone()
    }

    pub(crate) fn uploads(&self) -> Vec<(MediaBlob, UploadMetadata)> {
        self.uploads.lock().unwrap().clone()
    }

    pub(crate) fn page_requests(&self) -> Vec<u32> {
        self.page_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for FakeBackend {
    async fn search(&self, query: &Query, options: &SearchOptions) -> Result<SearchResponse> {
        self.searches
            .lock()
            .unwrap()
            .push((query.clone(), options.clone()));
        let reply = self.search.next();
        reply.resolve().await
    }

    async fn upload(&self, file: &MediaBlob, metadata: &UploadMetadata) -> Result<UploadAck> {
        self.uploads
            .lock()
            .unwrap()
            .push((file.clone(), metadata.clone()));
        let reply = self.upload.next();
        reply.resolve().await
    }

    async fn fetch_page(&self, page_number: u32) -> Result<FeedPage> {
        self.page_requests.lock().unwrap().push(page_number);
        let reply = self.pages.next();
        reply.resolve().await
    }
}

pub(crate) fn hit(id: &str, score: f32) -> SearchResult {
    SearchResult {
        id: id.to_string(),
        score,
        metadata: Map::new(),
    }
}

pub(crate) fn response(query: &str, ids: &[&str]) -> SearchResponse {
    SearchResponse {
        results: ids
            .iter()
            .enumerate()
            .map(|(rank, id)| hit(id, 1.0 - rank as f32 * 0.1))
            .collect(),
        query: query.to_string(),
        count: Some(ids.len() as u64),
        search_time_ms: Some(5.0),
        timestamp: None,
    }
}

pub(crate) fn page(page_number: u32, ids: &[&str]) -> FeedPage {
    FeedPage {
        items: ids
            .iter()
            .map(|id| FeedItem {
                id: (*id).to_string(),
                image_url: format!("https://picsum.photos/seed/{id}/600/800"),
                width: 600,
                height: 800,
            })
            .collect(),
        page_number,
        has_more: true,
    }
}
