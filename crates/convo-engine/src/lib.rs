//! Orchestration layer for the conversation-driven action planner: the
//! action catalog, resolver, conversation manager, blob serializer,
//! retry prompt builder, plan executor, instrumentation emitter,
//! working-context registry, and LLM client abstraction.

pub mod blob;
pub mod catalog;
pub mod config;
pub mod context_registry;
pub mod conversation;
pub mod executor;
pub mod instrumentation;
pub mod llm;
pub mod planner;
pub mod resolver;
pub mod retry;

pub use blob::{BlobError, Migration, MigrationRegistry};
pub use catalog::Catalog;
pub use config::PlannerConfig;
pub use context_registry::{Augmenter, ContextRegistry};
pub use conversation::{ConversationManager, ConverseError, Handle, StateStore, TurnResult};
pub use executor::{execute, ExecutionResult, ExecutorHooks, StepOutcome};
pub use instrumentation::{Event, EventKind, EventType, InstrumentationEmitter};
pub use planner::{LlmPlanner, Planner};
pub use resolver::{resolve, resolve_ready, TypeFactory, TypeFactoryRegistry};
pub use retry::build_retry_addendum;
