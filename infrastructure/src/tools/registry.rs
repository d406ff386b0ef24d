//! Tool Registry
//!
//! The [`ToolRegistry`] holds a fixed set of tool definitions together with
//! their handlers and implements [`ToolDispatcherPort`]. Every call is
//! checked against the registered definition before the handler runs:
//!
//! 1. unknown name → [`ToolError::NotFound`]
//! 2. missing, unknown or mistyped argument → [`ToolError::InvalidArguments`]
//! 3. otherwise the handler's own result is returned unchanged
//!
//! # Usage
//!
//! ```ignore
//! use genai_infrastructure::tools::ToolRegistry;
//!
//! let registry = ToolRegistry::with_builtins()?;
//! assert!(registry.has_tool("calculate"));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use genai_application::ports::tool_dispatcher::ToolDispatcherPort;
use genai_domain::tool::{
    entities::{ToolArguments, ToolCall, ToolDefinition, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolSpecError},
};
use tracing::debug;

use super::builtin;

/// Executable unit behind a registered tool name.
///
/// Plain functions and closures of the shape
/// `Fn(&ToolArguments) -> Result<String, ToolError>` implement it.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, args: &ToolArguments) -> Result<String, ToolError>;
}

#[async_trait]
impl<F> ToolHandler for F
where
    F: Fn(&ToolArguments) -> Result<String, ToolError> + Send + Sync,
{
    async fn call(&self, args: &ToolArguments) -> Result<String, ToolError> {
        self(args)
    }
}

/// Fixed registry of tools with validated dispatch.
#[derive(Default)]
pub struct ToolRegistry {
    spec: ToolSpec,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
    validator: DefaultToolValidator,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with `get_current_time` and `calculate`.
    pub fn with_builtins() -> Result<Self, ToolSpecError> {
        Self::new()
            .register(
                builtin::get_current_time_definition(),
                builtin::execute_get_current_time,
            )?
            .register(builtin::calculate_definition(), builtin::execute_calculate)
    }

    /// Register a tool with its handler (builder pattern).
    ///
    /// Fails on an empty or duplicate name instead of overwriting.
    pub fn register<H: ToolHandler + 'static>(
        self,
        definition: ToolDefinition,
        handler: H,
    ) -> Result<Self, ToolSpecError> {
        self.register_arc(definition, Arc::new(handler))
    }

    pub fn register_arc(
        mut self,
        definition: ToolDefinition,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<Self, ToolSpecError> {
        let name = definition.name.clone();
        self.spec.try_register(definition)?;
        self.handlers.insert(name, handler);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.spec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spec.is_empty()
    }
}

#[async_trait]
impl ToolDispatcherPort for ToolRegistry {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn call_function(&self, name: &str, args: &ToolArguments) -> Result<String, ToolError> {
        let (Some(definition), Some(handler)) = (self.spec.get(name), self.handlers.get(name))
        else {
            debug!(tool = name, "Rejected call to unregistered tool");
            return Err(ToolError::not_found(name));
        };

        let call = ToolCall {
            tool_name: name.to_string(),
            arguments: args.clone(),
            native_id: None,
        };
        self.validator.validate(&call, definition)?;

        debug!(tool = name, "Dispatching tool");
        handler.call(args).await
    }
}
