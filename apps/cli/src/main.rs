//! TeamTrack command-line client.

#![forbid(unsafe_code)]

mod client_config;
mod commands;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use teamtrack_application::{DeleteConfirmation, ResourceContexts, SessionStore};
use teamtrack_core::{AppError, CurrentUser, RecordId};
use teamtrack_infrastructure::{
    FixedDeleteConfirmation, HttpResourceTransport, PromptDeleteConfirmation,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::client_config::ClientConfig;

#[derive(Debug, Parser)]
#[command(name = "teamtrack", version, about = "Inspect and edit TeamTrack workspaces")]
struct Cli {
    /// Act as this user instead of TEAMTRACK_USER_ID
    #[arg(long, global = true)]
    user_id: Option<RecordId>,

    /// Confirm deletes without prompting
    #[arg(long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the backlogs of a project
    Backlogs {
        #[arg(long)]
        project: RecordId,
    },
    /// List the tasks of a backlog
    Tasks {
        #[arg(long)]
        backlog: RecordId,
    },
    /// Show one task with its tracked time
    Task { task_id: RecordId },
    /// Count the tasks of a backlog by status
    Stats {
        #[arg(long)]
        backlog: RecordId,
    },
    /// Resolve your rights on an organisation, project or backlog
    Access {
        #[arg(long)]
        organisation: RecordId,
        /// Team whose seat supplies your permissions
        #[arg(long)]
        team: RecordId,
        #[arg(long, conflicts_with = "backlog")]
        project: Option<RecordId>,
        #[arg(long)]
        backlog: Option<RecordId>,
    },
    /// Delete a task from a backlog
    DeleteTask {
        task_id: RecordId,
        #[arg(long)]
        backlog: RecordId,
    },
    /// Approve a pending team seat
    ApproveSeat {
        seat_id: RecordId,
        #[arg(long)]
        team: RecordId,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = ClientConfig::load(cli.user_id)?;
    let transport = HttpResourceTransport::new(
        config.api_url.clone(),
        config.api_token.clone(),
        config.http_timeout,
    )?;
    let confirmation: Arc<dyn DeleteConfirmation> = if cli.yes {
        Arc::new(FixedDeleteConfirmation::always())
    } else {
        Arc::new(PromptDeleteConfirmation::new())
    };
    let contexts = ResourceContexts::new(Arc::new(transport), confirmation);

    let store = SessionStore::new();
    store
        .sign_in(
            CurrentUser::new(config.user_id, format!("user {}", config.user_id), None),
            config.api_token.clone(),
        )
        .await;

    info!(
        api_url = %config.api_url,
        user_id = %config.user_id,
        "teamtrack client started"
    );

    commands::run(cli.command, &contexts, &store).await
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
