//! Document loading for the `docs` command.
//!
//! A document argument is `PATH`, `ID=PATH` or `ID=URI`. Without an
//! explicit id the file name is used. Text formats are read as UTF-8, other
//! files are sent inline as base64, and `gs://`, `http://` or `https://`
//! locations become file references.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use genai_domain::Document;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentLoadError {
    #[error("Empty document argument")]
    Empty,

    #[error("Cannot derive a document id from '{0}'")]
    NoId(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not valid UTF-8 text")]
    NotUtf8(PathBuf),

    #[error("Duplicate document id '{id}' ('{first}' and '{second}'); use ID=PATH to disambiguate")]
    DuplicateId {
        id: String,
        first: String,
        second: String,
    },
}

const URI_SCHEMES: [&str; 3] = ["gs://", "http://", "https://"];

/// MIME type for a file name, by extension.
pub fn mime_type_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "txt" | "md" | "rst" | "log" => "text/plain",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}

fn is_text(mime_type: &str) -> bool {
    mime_type.starts_with("text/") || mime_type == "application/json"
}

/// Split `ID=LOCATION` into its parts; a bare location has no id.
fn split_arg(arg: &str) -> (Option<&str>, &str) {
    match arg.split_once('=') {
        Some((id, location))
            if !id.is_empty() && !URI_SCHEMES.iter().any(|s| id.starts_with(s)) =>
        {
            (Some(id), location)
        }
        _ => (None, arg),
    }
}

fn default_id(location: &str) -> Option<String> {
    location
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Load one document argument.
pub async fn load_document(arg: &str) -> Result<Document, DocumentLoadError> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(DocumentLoadError::Empty);
    }
    let (id, location) = split_arg(arg);
    let id = match id {
        Some(id) => id.to_string(),
        None => default_id(location).ok_or_else(|| DocumentLoadError::NoId(arg.to_string()))?,
    };
    let mime_type = mime_type_for(location);

    if URI_SCHEMES.iter().any(|s| location.starts_with(s)) {
        return Ok(Document::file_uri(id, mime_type, location));
    }

    let path = PathBuf::from(location);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| DocumentLoadError::Io {
            path: path.clone(),
            source,
        })?;

    if is_text(mime_type) {
        let text = String::from_utf8(bytes).map_err(|_| DocumentLoadError::NotUtf8(path))?;
        let mut document = Document::text(id, text);
        document.mime_type = mime_type.to_string();
        Ok(document)
    } else {
        Ok(Document::inline(id, mime_type, BASE64.encode(bytes)))
    }
}

/// Load every argument, stopping at the first failure.
///
/// Ids must be unique: the cache key is the id set, so two documents
/// sharing an id would be primed under a key that names only one.
pub async fn load_documents<S: AsRef<str>>(args: &[S]) -> Result<Vec<Document>, DocumentLoadError> {
    let mut documents = Vec::with_capacity(args.len());
    let mut seen: HashMap<String, &str> = HashMap::new();
    for arg in args {
        let arg = arg.as_ref();
        let document = load_document(arg).await?;
        if let Some(first) = seen.insert(document.id.clone(), arg) {
            return Err(DocumentLoadError::DuplicateId {
                id: document.id,
                first: first.to_string(),
                second: arg.to_string(),
            });
        }
        documents.push(document);
    }
    Ok(documents)
}
