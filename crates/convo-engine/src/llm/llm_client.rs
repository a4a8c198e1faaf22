//! The model-agnostic trait the Conversation Manager calls through.
//! Reconstructed from the two concrete implementations in this module
//! (`anthropic_client.rs`, `openai_client.rs`), which both depend on
//! exactly this shape.

use anyhow::Result;
use async_trait::async_trait;

/// A structured-output tool definition passed to a model that supports
/// function/tool calling.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// The model's chosen tool invocation, returned by `chat_with_tool`.
#[derive(Debug, Clone)]
pub struct ToolCallResult {
    pub tool_name: String,
    pub arguments: serde_json::Value,
}

/// One model collaborator, opaque beyond this trait. The Conversation
/// Manager never branches on which implementation it holds.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Plain chat completion; the returned text is handed to the
    /// parser as `rawResponse`.
    async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Chat completion with a best-effort instruction (or native mode,
    /// where the backend supports it) to return JSON only.
    async fn chat_json(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Structured-output chat via the backend's native tool/function
    /// calling, when a single tool is offered with no choice.
    async fn chat_with_tool(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        tool: &ToolDefinition,
    ) -> Result<ToolCallResult>;

    fn model_name(&self) -> &str;

    fn provider_name(&self) -> &str;
}
