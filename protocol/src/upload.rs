use crate::query::MediaBlob;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_with::skip_serializing_none;

/// JSON sent in the `metadata` form field of an upload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UploadMetadata {
    pub filename: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime: String,
    /// Caller-supplied extras, flattened next to the standard keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UploadMetadata {
    pub fn for_blob(blob: &MediaBlob) -> Self {
        Self {
            filename: blob.name.clone(),
            size: blob.len(),
            mime: blob.mime.clone(),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Acknowledgement of an accepted upload. Ingestion continues on the
/// backend; `task_id` can be polled for completion.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UploadAck {
    pub media_id: Option<String>,
    pub task_id: Option<String>,
    pub status: Option<String>,
    pub message: Option<String>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TaskStatus {
    pub task_id: String,
    pub status: String,
    #[serde(default)]
    pub result: Option<Value>,
}
