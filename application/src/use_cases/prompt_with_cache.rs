//! Prompt With Cache use case.
//!
//! Answers prompts against a model context primed with a set of documents.
//! Priming is expensive, so it happens at most once per distinct document
//! set: the set is reduced to an order-independent [`CacheKey`], and every
//! key gets one single-flight cell. Concurrent callers on the same key await
//! the one in-flight priming instead of starting their own.

use crate::config::CacheSettings;
use crate::ports::cache_store::{CacheStore, CacheStoreError};
use crate::ports::content_cache::{ContentCachePort, PrimingRequest};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::tool_helpers::preview;
use genai_domain::{CacheEntry, CacheKey, CachedContentHandle, Document, validate_prompt};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

/// Errors that can occur while prompting against cached documents.
#[derive(Error, Debug)]
pub enum PromptWithCacheError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No document contents supplied to prime {0}")]
    MissingContents(CacheKey),

    #[error("Priming failed for {key}: {source}")]
    PrimingFailed {
        key: CacheKey,
        #[source]
        source: GatewayError,
    },

    #[error("Cache store error: {0}")]
    Store(#[from] CacheStoreError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Input for [`PromptWithCacheUseCase::execute`].
#[derive(Debug, Clone)]
pub struct PromptWithCacheInput {
    /// Prompt issued once the documents are primed.
    pub prompt: String,
    /// Identifiers of the documents; order and duplicates are irrelevant.
    pub doc_ids: Vec<String>,
    /// Document payloads, only read on a cache miss.
    pub contents: Vec<Document>,
}

impl PromptWithCacheInput {
    pub fn new<I, S>(prompt: impl Into<String>, doc_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prompt: prompt.into(),
            doc_ids: doc_ids.into_iter().map(Into::into).collect(),
            contents: Vec::new(),
        }
    }

    pub fn with_contents(mut self, contents: Vec<Document>) -> Self {
        self.contents = contents;
        self
    }
}

/// Answer produced against a primed context.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedAnswer {
    pub answer: String,
    pub key: CacheKey,
    pub handle: CachedContentHandle,
    /// `false` when this call performed the priming.
    pub cache_hit: bool,
}

type InFlight = Mutex<HashMap<CacheKey, Arc<OnceCell<CachedContentHandle>>>>;

/// Use case for prompting a model against cached document sets.
pub struct PromptWithCacheUseCase {
    gateway: Arc<dyn LlmGateway>,
    content_cache: Arc<dyn ContentCachePort>,
    store: Arc<dyn CacheStore>,
    settings: CacheSettings,
    in_flight: InFlight,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl PromptWithCacheUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        content_cache: Arc<dyn ContentCachePort>,
        store: Arc<dyn CacheStore>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            gateway,
            content_cache,
            store,
            settings,
            in_flight: Mutex::new(HashMap::new()),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Number of document sets currently held by the store.
    pub async fn cached_sets(&self) -> Result<usize, PromptWithCacheError> {
        Ok(self.store.len().await?)
    }

    /// Issue `prompt` against the context primed with `doc_ids`, priming it
    /// from `contents` first if this document set has not been seen.
    pub async fn prompt_with_cache<S: AsRef<str>>(
        &self,
        prompt: &str,
        doc_ids: &[S],
        contents: &[Document],
    ) -> Result<String, PromptWithCacheError> {
        let key = Self::key_for(doc_ids.iter().map(|s| s.as_ref()))?;
        let answer = self.ask(prompt, key, contents, &NoProgress).await?;
        Ok(answer.answer)
    }

    /// Execute with progress callbacks, returning the full [`CachedAnswer`].
    pub async fn execute(
        &self,
        input: PromptWithCacheInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<CachedAnswer, PromptWithCacheError> {
        let key = Self::key_for(input.doc_ids.iter().map(String::as_str))?;
        self.ask(&input.prompt, key, &input.contents, progress).await
    }

    fn key_for<'a>(ids: impl Iterator<Item = &'a str>) -> Result<CacheKey, PromptWithCacheError> {
        CacheKey::from_ids(ids).map_err(|e| PromptWithCacheError::InvalidInput(e.to_string()))
    }

    async fn ask(
        &self,
        prompt: &str,
        key: CacheKey,
        contents: &[Document],
        progress: &dyn ProgressNotifier,
    ) -> Result<CachedAnswer, PromptWithCacheError> {
        let prompt = validate_prompt(prompt)
            .map_err(|e| PromptWithCacheError::InvalidInput(e.to_string()))?;

        let (handle, primed) = self.resolve(&key, contents, progress).await?;
        progress.on_cache_lookup(&key, !primed);

        info!(
            key = %key,
            handle = %handle,
            cache_hit = !primed,
            "Prompting cached context: {}",
            preview(prompt, 100)
        );
        let session = self
            .gateway
            .create_cached_session(&self.settings.model, &handle)
            .await?;
        let answer = session.send(prompt).await?;

        self.conversation_logger.log(ConversationEvent::new(
            "cached_answer",
            serde_json::json!({
                "key": key,
                "handle": handle,
                "cache_hit": !primed,
                "prompt": prompt,
                "bytes": answer.len(),
                "text": answer,
            }),
        ));

        Ok(CachedAnswer {
            answer,
            key,
            handle,
            cache_hit: !primed,
        })
    }

    /// Resolve `key` to a handle; the flag is `true` if this call primed it.
    async fn resolve(
        &self,
        key: &CacheKey,
        contents: &[Document],
        progress: &dyn ProgressNotifier,
    ) -> Result<(CachedContentHandle, bool), PromptWithCacheError> {
        let cell = {
            let mut in_flight = self.in_flight.lock().await;
            in_flight.entry(key.clone()).or_default().clone()
        };

        let primed = AtomicBool::new(false);
        let result = cell
            .get_or_try_init(|| async {
                if let Some(entry) = self.store.get(key).await? {
                    debug!(key = %key, handle = %entry.handle, "Cache store hit");
                    return Ok(entry.handle);
                }
                if contents.is_empty() {
                    return Err(PromptWithCacheError::MissingContents(key.clone()));
                }

                primed.store(true, Ordering::SeqCst);
                progress.on_priming_start(key, contents.len());
                let handle = self.prime(key, contents).await?;
                self.store
                    .put(key.clone(), CacheEntry::new(handle.clone(), self.settings.ttl))
                    .await?;
                Ok::<_, PromptWithCacheError>(handle)
            })
            .await
            .cloned();

        match result {
            Ok(handle) => Ok((handle, primed.load(Ordering::SeqCst))),
            Err(e) => {
                self.release_failed(key, &cell).await;
                Err(e)
            }
        }
    }

    /// Drop the empty cell of a failed key once no other caller waits on it.
    async fn release_failed(&self, key: &CacheKey, cell: &Arc<OnceCell<CachedContentHandle>>) {
        let mut in_flight = self.in_flight.lock().await;
        // Clones are only taken under this lock, so the count is stable here.
        let unused = in_flight
            .get(key)
            .is_some_and(|held| Arc::ptr_eq(held, cell) && Arc::strong_count(cell) == 2);
        if unused && !cell.initialized() {
            in_flight.remove(key);
        }
    }

    async fn prime(
        &self,
        key: &CacheKey,
        contents: &[Document],
    ) -> Result<CachedContentHandle, PromptWithCacheError> {
        info!(
            key = %key,
            documents = contents.len(),
            model = %self.settings.model,
            "Priming document set"
        );
        let request = PrimingRequest {
            model: &self.settings.model,
            system_instruction: self.settings.system_instruction.as_deref(),
            documents: contents,
            ttl: self.settings.ttl,
            display_name: Some(key.to_string()),
        };
        match self.content_cache.create_cached_content(request).await {
            Ok(handle) => {
                self.conversation_logger.log(ConversationEvent::new(
                    "cache_primed",
                    serde_json::json!({
                        "key": key,
                        "handle": handle,
                        "documents": contents.len(),
                        "ttl_secs": self.settings.ttl.map(|t| t.as_secs()),
                    }),
                ));
                Ok(handle)
            }
            Err(source) => {
                warn!(key = %key, "Priming failed: {}", source);
                Err(PromptWithCacheError::PrimingFailed {
                    key: key.clone(),
                    source,
                })
            }
        }
    }
}
