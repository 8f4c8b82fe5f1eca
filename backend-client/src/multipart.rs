use crate::error::GatewayError;
use crate::error::Result;
use multiseek_protocol::MediaBlob;
use multiseek_protocol::MediaKind;
use multiseek_protocol::Modality;
use multiseek_protocol::SearchOptions;
use multiseek_protocol::UploadMetadata;
use reqwest::multipart::Form;
use reqwest::multipart::Part;

fn file_part(file: &MediaBlob) -> Result<Part> {
    let name = if file.name.is_empty() {
        "upload".to_string()
    } else {
        file.name.clone()
    };
    Part::bytes(file.bytes.to_vec())
        .file_name(name)
        .mime_str(file.mime.trim())
        .map_err(|e| GatewayError::Transport(format!("invalid media type {:?}: {e}", file.mime)))
}

/// Image query on the unified search route.
pub(crate) fn image_search_form(file: &MediaBlob, options: &SearchOptions) -> Result<Form> {
    let mut form = Form::new()
        .part("file", file_part(file)?)
        .text("modality", Modality::Image.as_str())
        .text("top_k", options.top_k.to_string())
        .text("search_type", options.mode.as_str());
    if let Some(threshold) = options.score_threshold {
        form = form.text("score_threshold", threshold.to_string());
    }
    if let Some(filters) = &options.filters {
        let encoded = serde_json::to_string(filters)
            .map_err(|e| GatewayError::Transport(format!("failed to encode filters: {e}")))?;
        form = form.text("filters", encoded);
    }
    Ok(form)
}

/// Image query on the dedicated similarity route; `top_k` travels in the
/// query string.
pub(crate) fn image_similarity_form(file: &MediaBlob) -> Result<Form> {
    Ok(Form::new().part("file", file_part(file)?))
}

pub(crate) fn upload_form(file: &MediaBlob, metadata: &UploadMetadata) -> Result<Form> {
    let media_type = file
        .kind()
        .map(MediaKind::as_str)
        .ok_or_else(|| GatewayError::Transport(format!("cannot upload {:?}", file.mime)))?;
    let encoded = serde_json::to_string(metadata)
        .map_err(|e| GatewayError::Transport(format!("failed to encode metadata: {e}")))?;
    Ok(Form::new()
        .part("file", file_part(file)?)
        .text("media_type", media_type)
        .text("metadata", encoded))
}
