//! Gemini REST wire types and conversions to domain types
//!
//! Request/response shapes for `models/{model}:generateContent` and
//! `cachedContents`, plus the mapping between Gemini `Content` parts and the
//! domain [`LlmResponse`].

use genai_application::ports::llm_gateway::ToolResultMessage;
use genai_domain::{ContentBlock, Document, DocumentContent, LlmResponse, Model, StopReason};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::GeminiError;

/// Role of a content entry in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One part of a content entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    FileData {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: FunctionCall,
    },
    FunctionResponse {
        #[serde(rename = "functionResponse")]
        function_response: FunctionResponse,
    },
    /// Parts this adapter does not interpret (executable code, thoughts, ...)
    Other(serde_json::Value),
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    /// Base64 encoded bytes
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub mime_type: String,
    pub file_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Must be a JSON object
    pub response: serde_json::Value,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self {
            role: Some(role),
            parts,
        }
    }

    /// A system instruction carries no role.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub function_declarations: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Body of `models/{model}:generateContent`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    /// `cachedContents/{id}` of a primed context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_content: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    pub model_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Body of `POST cachedContents`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateCachedContentRequest {
    /// `models/{model}`
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    /// Duration in seconds with an `s` suffix, e.g. `"3600s"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
}

/// Cached content resource returned by the API
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CachedContent {
    /// `cachedContents/{id}`
    pub name: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub expire_time: Option<String>,
}

// ─── Domain → Gemini ─────────────────────────────────────────────

/// Resource path of a model (`models/gemini-1.5-pro`).
pub fn model_path(model: &Model) -> String {
    format!("models/{}", model.as_str())
}

/// TTL in the API's duration format.
pub fn ttl_string(ttl: std::time::Duration) -> String {
    format!("{}s", ttl.as_secs())
}

/// Wrap tool declarations produced by the schema converter.
pub fn tools_from_declarations(declarations: &[serde_json::Value]) -> Vec<Tool> {
    if declarations.is_empty() {
        Vec::new()
    } else {
        vec![Tool {
            function_declarations: declarations.to_vec(),
        }]
    }
}

/// Convert a document payload to a content part.
pub fn document_part(document: &Document) -> Part {
    match &document.content {
        DocumentContent::Text { text } => Part::text(text.clone()),
        DocumentContent::InlineData { data_base64 } => Part::InlineData {
            inline_data: Blob {
                mime_type: document.mime_type.clone(),
                data: data_base64.clone(),
            },
        },
        DocumentContent::FileUri { uri } => Part::FileData {
            file_data: FileData {
                mime_type: document.mime_type.clone(),
                file_uri: uri.clone(),
            },
        },
    }
}

/// Convert a tool result to a `functionResponse` part.
///
/// The output is opaque text, so it is wrapped as `{"content": output}`.
pub fn tool_result_part(result: &ToolResultMessage) -> Part {
    Part::FunctionResponse {
        function_response: FunctionResponse {
            id: result.tool_use_id.clone(),
            name: result.tool_name.clone(),
            response: serde_json::json!({ "content": result.output }),
        },
    }
}

// ─── Gemini → Domain ─────────────────────────────────────────────

/// Convert a Gemini finish reason to the domain StopReason.
pub fn convert_finish_reason(reason: &str) -> StopReason {
    match reason {
        "STOP" => StopReason::EndTurn,
        "MAX_TOKENS" => StopReason::MaxTokens,
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
            StopReason::Safety
        }
        other => StopReason::Other(other.to_string()),
    }
}

/// Convert a single part to a content block.
///
/// Returns `None` for parts that carry nothing the domain models.
pub fn convert_part(part: &Part) -> Option<ContentBlock> {
    match part {
        Part::Text { text } => Some(ContentBlock::Text(text.clone())),
        Part::FunctionCall { function_call } => {
            let input = match &function_call.args {
                serde_json::Value::Object(map) => map
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect::<HashMap<String, serde_json::Value>>(),
                _ => HashMap::new(),
            };
            Some(ContentBlock::ToolUse {
                id: function_call.id.clone().unwrap_or_default(),
                name: function_call.name.clone(),
                input,
            })
        }
        _ => None,
    }
}

/// Convert a generate response to the domain response plus the model content
/// to append to the session history.
pub fn convert_response(
    response: GenerateContentResponse,
) -> Result<(LlmResponse, Content), GeminiError> {
    let model_version = response.model_version;
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(GeminiError::NoCandidates {
            reason: response.prompt_feedback.and_then(|f| f.block_reason),
        });
    };

    let content: Vec<ContentBlock> = candidate.content.parts.iter().filter_map(convert_part).collect();
    let stop_reason = if content
        .iter()
        .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    {
        Some(StopReason::ToolUse)
    } else {
        candidate.finish_reason.as_deref().map(convert_finish_reason)
    };

    let mut history = candidate.content;
    history.role = Some(Role::Model);

    Ok((
        LlmResponse {
            content,
            stop_reason,
            model: model_version,
        },
        history,
    ))
}
