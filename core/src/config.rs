use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;

/// How long a successful upload or image search stays visible before the
/// coordinator reverts to idle.
pub const AUTO_CLEAR_DELAY: Duration = Duration::from_millis(3000);

/// Limits applied to locally selected files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadLimits {
    /// Largest file accepted for staging, in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
}

fn default_max_bytes() -> u64 {
    50 * 1024 * 1024
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
        }
    }
}
