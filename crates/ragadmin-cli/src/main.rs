use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod context;
mod logging;

#[derive(Parser)]
#[command(name = "ragadmin")]
#[command(about = "RAGAdmin CLI - chat with your documents", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config and RAGADMIN_BACKEND_URL)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Directory holding chat_sessions.json and logs
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Configuration file (defaults to ~/.config/ragadmin/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List chat sessions in sidebar order
    Sessions {
        /// Chat to mark as active
        #[arg(long)]
        chat: Option<String>,
    },
    /// Start a new chat
    New,
    /// Show the transcript of a chat
    Show {
        #[arg(long)]
        chat: Option<String>,
    },
    /// Send a message and stream the reply
    Send {
        #[arg(long)]
        chat: Option<String>,
        /// Model to use instead of the first one the backend offers
        #[arg(long)]
        model: Option<String>,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// List the models offered by the backend
    Models,
    /// Upload documents (PDF, TXT, MD) to the knowledge base
    Upload {
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },
}

impl Commands {
    /// Chat id the command routes to, if given.
    fn chat(&self) -> Option<String> {
        match self {
            Commands::Sessions { chat } | Commands::Show { chat } | Commands::Send { chat, .. } => {
                chat.clone()
            }
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = context::Overrides {
        backend_url: cli.backend_url.clone(),
        data_dir: cli.data_dir.clone(),
        config: cli.config.clone(),
    };
    let config = context::load_config(&overrides)?;
    let _guard = logging::init_logging(&config)?;

    let app = context::AppContext::build(&config, cli.command.chat()).await?;

    match cli.command {
        Commands::Sessions { .. } => commands::sessions::list(&app).await?,
        Commands::New => commands::sessions::create(&app).await?,
        Commands::Show { .. } => commands::chat::show(&app).await?,
        Commands::Send { model, text, .. } => {
            commands::chat::send(&app, model, &text.join(" ")).await?
        }
        Commands::Models => commands::models::list(&app).await?,
        Commands::Upload { files } => commands::upload::run(&app, &files).await?,
    }

    Ok(())
}
