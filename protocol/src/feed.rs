use crate::id::deserialize_optional_id;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// One tile of the infinite-scroll feed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "WireFeedItem")]
pub struct FeedItem {
    pub id: String,
    pub image_url: String,
    pub width: u32,
    pub height: u32,
}

impl FeedItem {
    pub fn has_valid_dimensions(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[derive(Deserialize)]
struct WireFeedItem {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    id: Option<String>,
    #[serde(alias = "img")]
    image_url: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
}

impl From<WireFeedItem> for FeedItem {
    fn from(wire: WireFeedItem) -> Self {
        Self {
            id: wire
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            image_url: wire.image_url,
            width: wire.width,
            height: wire.height,
        }
    }
}

/// Body returned by the feed route.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedBatch {
    #[serde(default)]
    pub items: Vec<FeedItem>,
    #[serde(default = "default_has_more")]
    pub has_more: bool,
}

fn default_has_more() -> bool {
    true
}

/// A batch bound to the page number it was requested for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedPage {
    pub items: Vec<FeedItem>,
    /// 1-based.
    pub page_number: u32,
    /// `false` once the source has nothing further to give.
    pub has_more: bool,
}

impl FeedPage {
    pub fn from_batch(batch: FeedBatch, page_number: u32) -> Self {
        Self {
            items: batch.items,
            page_number,
            has_more: batch.has_more,
        }
    }
}
