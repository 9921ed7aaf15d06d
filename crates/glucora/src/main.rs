// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Glucora - a tiered conversational diabetes assistant.
//!
//! This is the binary entry point for the Glucora gateway.

use clap::{Parser, Subcommand};

mod serve;

/// Glucora - a tiered conversational diabetes assistant.
#[derive(Parser, Debug)]
#[command(name = "glucora", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Glucora answer gateway.
    Serve,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match glucora_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            glucora_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            print_config(config);
        }
        None => {
            println!("glucora: use --help for available commands");
        }
    }
}

/// Prints the resolved configuration as TOML with secrets redacted.
fn print_config(mut config: glucora_config::GlucoraConfig) {
    if config.generation.api_key.is_some() {
        config.generation.api_key = Some("[redacted]".to_string());
    }
    if config.search.web_api_key.is_some() {
        config.search.web_api_key = Some("[redacted]".to_string());
    }
    if config.server.bearer_token.is_some() {
        config.server.bearer_token = Some("[redacted]".to_string());
    }
    match toml::to_string_pretty(&config) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => {
            eprintln!("error: failed to render config: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        let config = glucora_config::load_and_validate().expect("default config should be valid");
        assert_eq!(config.agent.name, "glucora");
        assert_eq!(config.server.port, 8787);
    }
}
