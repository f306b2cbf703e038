pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "portfolio")]
#[command(about = "Portfolio site and admin panel server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on, overrides PORTFOLIO_PORT")]
        port: Option<u16>,

        #[arg(long, help = "Use an in-memory store seeded with admin/admin instead of PostgreSQL")]
        memory: bool,
    },

    #[command(about = "Create or update the database tables")]
    Migrate,

    #[command(about = "Create an admin account, or reset its password")]
    CreateAdmin {
        #[arg(help = "Admin username")]
        username: String,
        #[arg(help = "Admin password")]
        password: String,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None, memory: false }) {
        Commands::Serve { port, memory } => commands::serve::handle(port, memory).await,
        Commands::Migrate => commands::migrate::handle().await,
        Commands::CreateAdmin { username, password } => {
            commands::admin::handle(&username, &password).await
        }
    }
}
