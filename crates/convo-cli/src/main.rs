//! Interactive REPL exercising one conversation session end to end
//! against an in-memory catalog, for manual smoke-testing.
//!
//! Each line typed is sent through the Conversation Manager as a turn;
//! a READY plan is resolved and executed immediately against the demo
//! catalog. `:inspect` prints the current session state via
//! `toReadableJson`; `:quit` exits.

mod demo_catalog;
mod memory_store;

use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use convo_engine::llm::create_llm_client;
use convo_engine::{
    blob, execute, ConversationManager, ContextRegistry, ExecutorHooks, Handle,
    InstrumentationEmitter, LlmPlanner, PlannerConfig,
};
use convo_types::{Context, PlanStatus};

const SYSTEM_PROMPT: &str = "You are a planning assistant. Respond with a single JSON object \
matching {\"message\": string, \"steps\": [{\"actionId\": string, \"parameters\": object}]}. \
Only use actionIds present in the catalog you are given.";

#[derive(Parser)]
#[command(name = "convo_cli")]
#[command(version = "0.1.0")]
#[command(about = "Interactive REPL for one conversation session")]
struct Cli {
    /// Suppress the startup banner.
    #[arg(long, short)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let catalog = Arc::new(demo_catalog::build());
    let llm = create_llm_client()?;

    if !cli.quiet {
        println!("convo_cli — backend {} ({})", llm.provider_name(), llm.model_name());
        println!("Type a request, ':inspect' to view state, ':quit' to exit.");
        println!();
    }

    let planner = Arc::new(LlmPlanner::new(llm, catalog.clone(), SYSTEM_PROMPT));
    let context_registry = Arc::new(ContextRegistry::new());
    let config = PlannerConfig::from_env();
    let migrations = convo_engine::MigrationRegistry::new(config.schema_version);
    let manager = ConversationManager::blob_backed(planner, config, context_registry, Some(migrations));
    let emitter = InstrumentationEmitter::new();
    let factories = convo_engine::TypeFactoryRegistry::new();

    let mut session_blob: Vec<u8> = Vec::new();
    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == ":quit" || line == ":exit" {
            break;
        }
        if line == ":inspect" {
            let readable = blob::to_readable_json(&session_blob);
            println!("{}", serde_json::to_string_pretty(&readable)?);
            continue;
        }

        let turn = manager.converse(line, Handle::Blob(session_blob.clone())).await?;
        session_blob = turn.blob.unwrap_or_default();

        println!("{}", turn.plan.assistant_message);

        match turn.plan.status() {
            PlanStatus::Pending => {
                for pending in &turn.pending_params {
                    println!("  pending: {} — {}", pending.name, pending.message);
                }
            }
            PlanStatus::Error => {
                if let Some(reason) = turn.plan.first_error_reason() {
                    println!("  error: {reason}");
                }
            }
            PlanStatus::Ready => match convo_engine::resolve_ready(turn.plan, catalog.as_ref(), &factories) {
                Ok(resolved) => {
                    let result = execute(&resolved, Context::new(), &emitter, ExecutorHooks::default());
                    for outcome in &result.step_outcomes {
                        print_outcome(outcome);
                    }
                }
                Err(err) => println!("  error: {err}"),
            },
        }
    }

    Ok(())
}

fn print_outcome(outcome: &convo_engine::StepOutcome) {
    use convo_engine::StepOutcome::*;
    match outcome {
        Succeeded { action_id, result } => println!("  ok: {action_id} -> {result}"),
        Failed { action_id, reason } => println!("  failed: {action_id} ({reason})"),
        NotExecuted { action_id, reason } => println!("  skipped: {action_id} ({reason})"),
    }
}
