//! Builds the configured `LlmClient` from environment variables.

use std::sync::Arc;

use anyhow::Result;

use super::anthropic_client::AnthropicClient;
use super::backend::AgentBackend;
use super::llm_client::LlmClient;
use super::openai_client::OpenAiClient;

/// Reads `AGENT_BACKEND` (falling back to [`AgentBackend::default`])
/// and constructs the matching client from its own environment
/// variables (`ANTHROPIC_API_KEY` / `OPENAI_API_KEY`).
pub fn create_llm_client() -> Result<Arc<dyn LlmClient>> {
    let backend = std::env::var("AGENT_BACKEND")
        .ok()
        .map(|s| s.parse::<AgentBackend>())
        .transpose()
        .map_err(anyhow::Error::msg)?
        .unwrap_or_default();

    match backend {
        AgentBackend::Anthropic => Ok(Arc::new(AnthropicClient::from_env()?)),
        AgentBackend::OpenAi => Ok(Arc::new(OpenAiClient::from_env()?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_backend_name_surfaces_as_an_error() {
        let parsed = "mistral".parse::<AgentBackend>();
        assert!(parsed.is_err());
    }
}
