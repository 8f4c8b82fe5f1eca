use crate::backend::SearchBackend;
use crate::config::FeedSource;
use crate::config::GatewayConfig;
use crate::config::ImageSearchRoute;
use crate::error::GatewayError;
use crate::error::Result;
use crate::feed::synthetic_page;
use crate::multipart;
use async_trait::async_trait;
use multiseek_protocol::BackendStats;
use multiseek_protocol::FeedBatch;
use multiseek_protocol::FeedItem;
use multiseek_protocol::FeedPage;
use multiseek_protocol::HealthStatus;
use multiseek_protocol::MediaBlob;
use multiseek_protocol::Query;
use multiseek_protocol::SearchOptions;
use multiseek_protocol::SearchRequest;
use multiseek_protocol::SearchResponse;
use multiseek_protocol::TaskStatus;
use multiseek_protocol::UploadAck;
use multiseek_protocol::UploadMetadata;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use tracing::warn;
use url::Url;

const SEARCH_PATH: &str = "api/v1/search";
const IMAGE_SEARCH_PATH: &str = "api/v1/search/image";
const UPLOAD_PATH: &str = "api/v1/upload";
const UPLOAD_STATUS_PATH: &str = "api/v1/upload/status/";
const STATS_PATH: &str = "api/v1/stats";
const HEALTH_PATH: &str = "health";
const MAX_DETAIL_CHARS: usize = 300;

/// `reqwest`-backed gateway to the search service.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: Url,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate().map_err(GatewayError::InvalidConfig)?;
        let base_url = config
            .parsed_base_url()
            .map_err(GatewayError::InvalidConfig)?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    /// Gateway for the backend named by `MULTISEEK_API_URL`.
    pub fn from_env() -> Result<Self> {
        Self::new(GatewayConfig::from_env())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Aggregate backend statistics. Informational only.
    pub async fn stats(&self) -> Result<BackendStats> {
        let resp = self.http.get(self.endpoint(STATS_PATH)?).send().await?;
        read_json(resp, "stats", |status, detail| {
            GatewayError::RequestFailed {
                endpoint: "stats",
                status,
                detail,
            }
        })
        .await
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let resp = self.http.get(self.endpoint(HEALTH_PATH)?).send().await?;
        read_json(resp, "health", |status, detail| {
            GatewayError::RequestFailed {
                endpoint: "health",
                status,
                detail,
            }
        })
        .await
    }

    /// Progress of the ingestion task started by an upload.
    pub async fn upload_status(&self, task_id: &str) -> Result<TaskStatus> {
        let mut url = self.endpoint(UPLOAD_STATUS_PATH)?;
        url.path_segments_mut()
            .map_err(|()| GatewayError::InvalidConfig("base_url cannot carry a path".to_string()))?
            .pop_if_empty()
            .push(task_id);
        let resp = self.http.get(url).send().await?;
        read_json(resp, "upload status", |status, detail| {
            GatewayError::RequestFailed {
                endpoint: "upload status",
                status,
                detail,
            }
        })
        .await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn search_text(&self, text: &str, options: &SearchOptions) -> Result<SearchResponse> {
        debug!(
            top_k = options.top_k,
            mode = options.mode.as_str(),
            "sending text search"
        );
        let request = SearchRequest::text(text, options);
        let resp = self
            .http
            .post(self.endpoint(SEARCH_PATH)?)
            .json(&request)
            .send()
            .await?;
        read_json(resp, "search", search_failed).await
    }

    async fn search_image(
        &self,
        file: &MediaBlob,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        debug!(
            file = %file.name,
            bytes = file.len(),
            top_k = options.top_k,
            route = ?self.config.image_search_route,
            "sending image search"
        );
        let request = match self.config.image_search_route {
            ImageSearchRoute::Unified => self
                .http
                .post(self.endpoint(SEARCH_PATH)?)
                .multipart(multipart::image_search_form(file, options)?),
            ImageSearchRoute::Dedicated => self
                .http
                .post(self.endpoint(IMAGE_SEARCH_PATH)?)
                .query(&[("top_k", options.top_k)])
                .multipart(multipart::image_similarity_form(file)?),
        };
        let resp = request.send().await?;
        read_json(resp, "search", search_failed).await
    }

    async fn fetch_remote_page(&self, path: &str, page_number: u32) -> Result<FeedPage> {
        let resp = self
            .http
            .get(self.endpoint(path)?)
            .query(&[("page", page_number)])
            .send()
            .await?;
        let mut batch: FeedBatch = read_json(resp, "feed", |status, detail| {
            GatewayError::FeedFailed { status, detail }
        })
        .await?;

        let before = batch.items.len();
        batch.items.retain(FeedItem::has_valid_dimensions);
        let dropped = before - batch.items.len();
        if dropped > 0 {
            warn!(
                page_number,
                dropped,
                "dropping feed items without dimensions"
            );
        }
        Ok(FeedPage::from_batch(batch, page_number))
    }
}

#[async_trait]
impl SearchBackend for HttpGateway {
    async fn search(&self, query: &Query, options: &SearchOptions) -> Result<SearchResponse> {
        match query {
            Query::Text { text } => self.search_text(text, options).await,
            Query::Image { file } => self.search_image(file, options).await,
        }
    }

    async fn upload(&self, file: &MediaBlob, metadata: &UploadMetadata) -> Result<UploadAck> {
        debug!(file = %file.name, bytes = file.len(), "uploading media");
        let resp = self
            .http
            .post(self.endpoint(UPLOAD_PATH)?)
            .multipart(multipart::upload_form(file, metadata)?)
            .send()
            .await?;
        read_json(resp, "upload", |status, detail| {
            GatewayError::UploadFailed { status, detail }
        })
        .await
    }

    async fn fetch_page(&self, page_number: u32) -> Result<FeedPage> {
        match &self.config.feed {
            FeedSource::Remote { path } => self.fetch_remote_page(path, page_number).await,
            FeedSource::Synthetic { batch_size } => Ok(synthetic_page(page_number, *batch_size)),
        }
    }
}

fn search_failed(status: u16, detail: Option<String>) -> GatewayError {
    GatewayError::SearchFailed { status, detail }
}

async fn read_json<T, F>(resp: reqwest::Response, what: &str, on_status: F) -> Result<T>
where
    T: DeserializeOwned,
    F: FnOnce(u16, Option<String>) -> GatewayError,
{
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        debug!(%status, what, "backend rejected request");
        return Err(on_status(status.as_u16(), error_detail(&body)));
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| GatewayError::Transport(format!("invalid {what} response: {e}")))
}

/// Pulls a readable message out of an error body. FastAPI reports
/// `{"detail": ...}`; anything else is passed through, truncated.
fn error_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        for key in ["detail", "error", "message"] {
            match value.get(key) {
                Some(Value::String(text)) => return Some(text.clone()),
                Some(other) if !other.is_null() => return Some(other.to_string()),
                _ => {}
            }
        }
    }
    let mut detail: String = trimmed.chars().take(MAX_DETAIL_CHARS).collect();
    if trimmed.chars().count() > MAX_DETAIL_CHARS {
        detail.push('…');
    }
    Some(detail)
}
