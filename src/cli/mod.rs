pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "agencyctl")]
#[command(about = "agencyctl - operate the agency collaboration API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply database migrations (uses DATABASE_URL)")]
    Migrate,

    #[command(about = "Mint a bearer token signed with AUTH_JWT_SECRET")]
    Token(commands::token::TokenArgs),

    #[command(about = "Check server health via GET /health")]
    Health(commands::health::HealthArgs),

    #[command(about = "List collaborations visible to a token")]
    Collaborations(commands::collaborations::CollaborationsArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::Token(args) => commands::token::handle(args, output_format),
        Commands::Health(args) => commands::health::handle(args, output_format).await,
        Commands::Collaborations(args) => commands::collaborations::handle(args, output_format).await,
    }
}
