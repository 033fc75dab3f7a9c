//! Credit Cards CLI - Database migrations and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! cc-cli migrate
//!
//! # Register people and issue each of them two cards
//! cc-cli seed -e a@x.com -e b@y.com --cards 2
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Register people and issue cards

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cc-cli")]
#[command(author, version, about = "Credit Cards CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Register people and issue cards to them
    Seed {
        /// Email address to register (repeatable)
        #[arg(short, long = "email", required = true)]
        emails: Vec<String>,

        /// Cards to issue per person
        #[arg(short, long, default_value_t = 1)]
        cards: u32,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { emails, cards } => commands::seed::run(&emails, cards).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_seed_arguments() {
        let cli = Cli::try_parse_from(["cc-cli", "seed", "-e", "a@x.com", "-e", "b@y.com", "--cards", "3"])
            .unwrap_or_else(|e| panic!("{e}"));

        match cli.command {
            Commands::Seed { emails, cards } => {
                assert_eq!(emails, vec!["a@x.com", "b@y.com"]);
                assert_eq!(cards, 3);
            }
            Commands::Migrate => panic!("expected seed"),
        }
    }

    #[test]
    fn test_seed_requires_email() {
        assert!(Cli::try_parse_from(["cc-cli", "seed"]).is_err());
    }
}
