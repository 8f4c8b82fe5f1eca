use bytes::Bytes;
use mime_guess::Mime;
use mime_guess::mime::IMAGE;
use mime_guess::mime::VIDEO;
use std::fmt;
use std::path::Path;

/// Broad media family derived from a declared MIME type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classifies a MIME type by its top-level type. Anything that does not
    /// parse, or is not `image/*` or `video/*`, is `None`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let parsed: Mime = mime.trim().parse().ok()?;
        let top = parsed.type_();
        if top == IMAGE {
            Some(Self::Image)
        } else if top == VIDEO {
            Some(Self::Video)
        } else {
            None
        }
    }

    /// Value of the backend's `media_type` upload field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// A locally selected file held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaBlob {
    pub name: String,
    pub mime: String,
    pub bytes: Bytes,
}

impl MediaBlob {
    /// The declared type is trimmed, and lowercased when it parses.
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime: normalize_mime(&mime.into()),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, guessing its type from the extension.
    /// Unknown extensions are declared as `application/octet-stream`.
    pub async fn load(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self::new(name, mime, bytes))
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::from_mime(&self.mime)
    }
}

fn normalize_mime(mime: &str) -> String {
    let trimmed = mime.trim();
    match trimmed.parse::<Mime>() {
        Ok(parsed) => parsed.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

impl fmt::Debug for MediaBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaBlob")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// What the user asked for: free text or an example file.
#[derive(Clone, Debug, PartialEq)]
pub enum Query {
    Text { text: String },
    Image { file: MediaBlob },
}

impl Query {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image(file: MediaBlob) -> Self {
        Self::Image { file }
    }

    /// Short human label, used as the query echo when the backend omits one.
    pub fn label(&self) -> &str {
        match self {
            Self::Text { text } => text,
            Self::Image { file } => &file.name,
        }
    }
}
