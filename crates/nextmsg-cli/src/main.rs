//! NextMsg CLI - Rewrite a draft for the people you're sending it to
//!
//! Picks relationships, fans out one rewrite per relationship against a
//! NextMsg server, and prints three tone variants for each.

mod api;
mod config;
mod render;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, MultiSelect};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use api::NextMsgClient;
use config::Config;
use nextmsg::{FanOut, FanOutRequest, FanOutSession, Mode, Relationship, SubmitOutcome};

#[derive(Parser)]
#[command(name = "nextmsg")]
#[command(about = "NextMsg CLI - Relationship-aware message rewriting", long_about = None)]
#[command(version)]
struct Cli {
    /// Server URL (overrides config)
    #[arg(long, global = true, env = "NEXTMSG_SERVER")]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Targets {
    /// Relationship label or slug, e.g. "上司" or "boss" (repeatable)
    #[arg(short = 'r', long = "relationship", value_name = "REL")]
    relationships: Vec<String>,
    /// Rewrite for every relationship
    #[arg(long, conflicts_with = "relationships")]
    all: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a new message
    New {
        /// Rough draft (will prompt if not provided)
        draft: Option<String>,
        #[command(flatten)]
        targets: Targets,
    },

    /// Reply to a message you received
    Reply {
        /// Rough draft of your reply (will prompt if not provided)
        draft: Option<String>,
        /// The message you're replying to (will prompt if not provided)
        #[arg(long)]
        received: Option<String>,
        #[command(flatten)]
        targets: Targets,
    },

    /// List known relationships
    Relationships,

    /// Show or update configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set the NextMsg server URL
    SetServer {
        /// e.g. https://nextmsg.shuttle.app
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::New { draft, targets } => {
            cmd_rewrite(Mode::New, draft, None, targets, cli.server).await
        }
        Commands::Reply {
            draft,
            received,
            targets,
        } => cmd_rewrite(Mode::Reply, draft, received, targets, cli.server).await,
        Commands::Relationships => {
            cmd_relationships();
            Ok(())
        }
        Commands::Config { action } => cmd_config(action, cli.server).await,
    }
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_rewrite(
    mode: Mode,
    draft: Option<String>,
    received: Option<String>,
    targets: Targets,
    server: Option<String>,
) -> Result<()> {
    let config = Config::load()?;
    let base_url = config.resolve_server(server.as_deref());

    let received = match mode {
        Mode::Reply => Some(prompt_if_missing(received, "Their message")?),
        Mode::New => None,
    };
    let draft = prompt_if_missing(draft, "Your draft")?;
    let relationships = select_relationships(targets)?;

    let mut request = FanOutRequest::new(mode, draft, relationships);
    if let Some(received) = received {
        request = request.with_received_message(received);
    }

    if !request.is_ready() {
        bail!("Nothing to rewrite: a draft, at least one relationship, and in reply mode the received message are required");
    }

    let client = NextMsgClient::new(&base_url);
    tracing::info!("Using NextMsg server at {}", client.base_url());

    let mut session = FanOutSession::new(FanOut::new(Arc::new(client)));
    eprintln!(
        "{}",
        format!(
            "Rewriting for {} relationship(s)...",
            request.distinct_relationships().len()
        )
        .dimmed()
    );

    let outcome = session.submit(&request).await;
    print!("{}", outcome_output(outcome, &session)?);
    Ok(())
}

/// Rendered results, or the session's error for the process to exit with
fn outcome_output(outcome: SubmitOutcome, session: &FanOutSession) -> Result<String> {
    match outcome {
        SubmitOutcome::Completed => Ok(render::render_aggregate(session.results())),
        SubmitOutcome::Failed => Err(anyhow!(
            "{}",
            session.error().unwrap_or("Rewrite failed")
        )),
        SubmitOutcome::Declined => bail!("Nothing to rewrite"),
    }
}

fn cmd_relationships() {
    println!("{}", "Relationships:".bold());
    for relationship in Relationship::ALL {
        println!(
            "  {:<16} {}",
            relationship.slug().cyan(),
            relationship.label()
        );
    }
}

async fn cmd_config(action: Option<ConfigAction>, server: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    match action {
        Some(ConfigAction::SetServer { url }) => {
            config.set_server(&url)?;
            config.save()?;
            println!(
                "{} Server set to {} ({:?})",
                "✓".green(),
                config.server_url,
                Config::config_path()?
            );
        }
        None => {
            let base_url = config.resolve_server(server.as_deref());
            println!("{}", "NextMsg CLI Configuration".bold());
            println!("  Config file: {:?}", Config::config_path()?);
            println!("  Server: {}", base_url);

            let reachable = NextMsgClient::new(&base_url)
                .health()
                .await
                .unwrap_or(false);
            if reachable {
                println!("  Status: {}", "reachable".green());
            } else {
                println!("  Status: {}", "unreachable".red());
            }
        }
    }

    Ok(())
}

// ============================================
// Prompts
// ============================================

fn prompt_if_missing(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}

fn select_relationships(targets: Targets) -> Result<Vec<Relationship>> {
    if targets.all {
        return Ok(Relationship::ALL.to_vec());
    }

    if !targets.relationships.is_empty() {
        return targets
            .relationships
            .iter()
            .map(|r| r.parse::<Relationship>().map_err(anyhow::Error::msg))
            .collect();
    }

    let labels: Vec<&str> = Relationship::ALL.iter().map(|r| r.label()).collect();
    let picked = MultiSelect::new()
        .with_prompt("Who is it for? (space to select, enter to confirm)")
        .items(&labels)
        .interact()
        .context("Failed to read relationship selection")?;

    Ok(picked.into_iter().map(|i| Relationship::ALL[i]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nextmsg::{RewriteError, RewriteGenerator, RewriteRequest, RewriteResult, Tone};

    /// Succeeds for everyone except strangers
    struct WaryGenerator;

    #[async_trait]
    impl RewriteGenerator for WaryGenerator {
        async fn generate(
            &self,
            request: &RewriteRequest,
        ) -> Result<Vec<RewriteResult>, RewriteError> {
            if request.relationship == Relationship::Stranger {
                return Err(RewriteError::EmptyResponse);
            }
            Ok(vec![
                RewriteResult::new(Tone::Soft, "承知しました"),
                RewriteResult::new(Tone::Standard, "了解です"),
                RewriteResult::new(Tone::Short, "了解"),
            ])
        }

        fn provider_name(&self) -> &str {
            "wary"
        }

        fn model_id(&self) -> &str {
            "wary-1"
        }
    }

    fn session() -> FanOutSession {
        colored::control::set_override(false);
        FanOutSession::new(FanOut::new(Arc::new(WaryGenerator)))
    }

    #[tokio::test]
    async fn test_completed_submit_renders_groups() {
        let mut session = session();
        let request = FanOutRequest::new(Mode::New, "了解", vec![Relationship::Boss]);

        let outcome = session.submit(&request).await;
        let output = outcome_output(outcome, &session).unwrap();

        assert!(output.starts_with("To: 上司\n  [Soft] 承知しました"));
    }

    #[tokio::test]
    async fn test_failed_submit_becomes_an_error() {
        let mut session = session();
        let request = FanOutRequest::new(
            Mode::New,
            "了解",
            vec![Relationship::Boss, Relationship::Stranger],
        );

        let outcome = session.submit(&request).await;
        assert_eq!(outcome, SubmitOutcome::Failed);

        let err = outcome_output(outcome, &session).unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate message for 初対面");
    }
}
