use crate::error::Result;
use async_trait::async_trait;
use multiseek_protocol::FeedPage;
use multiseek_protocol::MediaBlob;
use multiseek_protocol::Query;
use multiseek_protocol::SearchOptions;
use multiseek_protocol::SearchResponse;
use multiseek_protocol::UploadAck;
use multiseek_protocol::UploadMetadata;

/// The three backend operations the orchestrators depend on.
///
/// Every call is a single attempt: implementations must not retry. Dropping
/// the returned future abandons the request.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &Query, options: &SearchOptions) -> Result<SearchResponse>;

    async fn upload(&self, file: &MediaBlob, metadata: &UploadMetadata) -> Result<UploadAck>;

    /// `page_number` is 1-based.
    async fn fetch_page(&self, page_number: u32) -> Result<FeedPage>;
}
