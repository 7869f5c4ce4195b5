pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "shopassist",
    about = "Shop Assist operator CLI",
    long_about = "Run single turns against the product catalog, inspect config, and check readiness.",
    after_help = "Examples:\n  shopassist ask \"do you have phones?\"\n  shopassist ask \"more\" --action action_get_last_product_details --last-product p1\n  shopassist doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run one conversational turn against the configured catalog")]
    Ask {
        utterance: String,
        #[arg(long, help = "Product id remembered from an earlier turn")]
        last_product: Option<String>,
        #[arg(long, default_value = commands::ask::DEFAULT_ACTION, help = "Action to dispatch")]
        action: String,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Report catalog artifact health and item count")]
    Catalog {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config and catalog readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Ask { utterance, last_product, action, json } => {
            commands::ask::run(&commands::ask::AskRequest { utterance, last_product, action, json })
        }
        Command::Catalog { json } => commands::catalog::run(json),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
