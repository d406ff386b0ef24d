//! Document payloads used to prime a cached context

use serde::{Deserialize, Serialize};

/// Content of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentContent {
    /// Plain text
    Text { text: String },
    /// Base64-encoded bytes sent inline
    InlineData { data_base64: String },
    /// Remote object reference (e.g. `gs://bucket/paper.pdf`)
    FileUri { uri: String },
}

/// A document identified by `id` (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub mime_type: String,
    pub content: DocumentContent,
}

impl Document {
    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mime_type: "text/plain".to_string(),
            content: DocumentContent::Text { text: text.into() },
        }
    }

    pub fn inline(
        id: impl Into<String>,
        mime_type: impl Into<String>,
        data_base64: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            mime_type: mime_type.into(),
            content: DocumentContent::InlineData {
                data_base64: data_base64.into(),
            },
        }
    }

    pub fn file_uri(id: impl Into<String>, mime_type: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mime_type: mime_type.into(),
            content: DocumentContent::FileUri { uri: uri.into() },
        }
    }
}
