//! The LLM client abstraction: the planner's external collaborator
//! interface, plus two concrete backends and a factory selecting
//! between them.

pub mod anthropic_client;
pub mod backend;
pub mod client_factory;
pub mod llm_client;
pub mod openai_client;

pub use anthropic_client::AnthropicClient;
pub use backend::AgentBackend;
pub use client_factory::create_llm_client;
pub use llm_client::{LlmClient, ToolCallResult, ToolDefinition};
pub use openai_client::OpenAiClient;
