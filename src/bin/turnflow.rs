use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures::StreamExt;

use turnflow::logging::LoggingConfig;
use turnflow::{
    build_quiz_workflow, quiz_agents, DialogueConfig, DialogueSummary, DynLlmClient,
    LocalEchoClient, WorkflowEvent,
};

#[derive(Parser)]
#[command(name = "turnflow", version, about = "Turn-taking agent workflows", author)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the teacher / student quiz dialogue
    Quiz {
        #[arg(long)]
        config: Option<PathBuf>,
        /// Use the local echo client instead of a remote model
        #[arg(long)]
        offline: bool,
        #[arg(long)]
        max_turns: Option<u32>,
        #[arg(long)]
        sentinel: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        think_delay_ms: Option<u64>,
    },
    /// Print the quiz workflow topology as JSON
    Graph {
        #[arg(long)]
        config: Option<PathBuf>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Quiz {
            config,
            offline,
            max_turns,
            sentinel,
            start,
            think_delay_ms,
        } => {
            let mut config = load_config(config)?;
            if let Some(max_turns) = max_turns {
                config.max_turns = max_turns;
            }
            if sentinel.is_some() {
                config.sentinel = sentinel;
            }
            if let Some(start) = start {
                config.start_message = start;
            }
            if let Some(delay) = think_delay_ms {
                config.think_delay_ms = delay;
            }
            config.validate()?;
            handle_quiz(config, offline).await?
        }
        Command::Graph { config, compact } => handle_graph(load_config(config)?, compact)?,
    }
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<DialogueConfig> {
    let config = match path {
        Some(path) => DialogueConfig::from_path(&path)
            .with_context(|| format!("loading `{}`", path.display()))?,
        None => DialogueConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn build_client(config: &DialogueConfig, offline: bool) -> anyhow::Result<DynLlmClient> {
    if offline {
        return Ok(Arc::new(LocalEchoClient));
    }
    remote_client(config)
}

#[cfg(feature = "openai-client")]
fn remote_client(config: &DialogueConfig) -> anyhow::Result<DynLlmClient> {
    let api_key = config.llm.resolve_api_key()?;
    let client = turnflow::OpenAiChatClient::with_base_url(
        config.llm.base_url.clone(),
        api_key,
        config.llm.model.clone(),
    )?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "openai-client"))]
fn remote_client(_config: &DialogueConfig) -> anyhow::Result<DynLlmClient> {
    anyhow::bail!("built without the `openai-client` feature, rerun with --offline")
}

async fn handle_quiz(config: DialogueConfig, offline: bool) -> anyhow::Result<()> {
    let client = build_client(&config, offline)?;
    let (teacher, student) = quiz_agents(&config, client);
    let workflow = build_quiz_workflow(&config, teacher, student)?;

    let mut events = workflow.run_stream(config.start_message.clone());
    let mut answers = 0u32;
    while let Some(event) = events.next().await {
        match event? {
            WorkflowEvent::AgentResponse {
                executor_id,
                message,
            } => {
                if executor_id == config.student.id {
                    answers += 1;
                }
                let author = message.author_name().unwrap_or(executor_id.as_str());
                println!("{}: {}", author, message.content());
            }
            WorkflowEvent::Undeliverable { source, kind, .. } => {
                eprintln!("warning: `{}` emitted a {} message nobody accepts", source, kind);
            }
            WorkflowEvent::Output { data, .. } => {
                let summary: DialogueSummary = serde_json::from_value(data)?;
                println!(
                    "\nConversation ended on sentinel `{}` after {} turns.",
                    summary.sentinel, summary.turns
                );
            }
            WorkflowEvent::Completed => {
                println!("\nStudent-teacher conversation completed after {} turns!", answers);
            }
            _ => {}
        }
    }
    Ok(())
}

fn handle_graph(config: DialogueConfig, compact: bool) -> anyhow::Result<()> {
    let (teacher, student) = quiz_agents(&config, Arc::new(LocalEchoClient));
    let workflow = build_quiz_workflow(&config, teacher, student)?;
    let topology = workflow.topology();

    let content = if compact {
        serde_json::to_string(&topology)?
    } else {
        serde_json::to_string_pretty(&topology)?
    };
    println!("{content}");
    Ok(())
}
