//! Kairos - Natural-Language Calendar Command Interpretation
//!
//! Command-line entry point: parses one utterance (or a stream of them on
//! stdin) and prints the resulting command as JSON.

use clap::Parser;
use kairos_core::{cache, CommandParser, NlpConfig, ParsedCommand};
use std::io::BufRead;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kairos", version, about = "Natural-language calendar command parser")]
struct Cli {
    /// Utterance to parse; reads lines from stdin when omitted
    text: Option<String>,

    /// Skip the remote model and parse locally
    #[arg(long)]
    local_only: bool,

    /// Pretty-print the resulting JSON
    #[arg(long)]
    pretty: bool,
}

fn print_command(command: &ParsedCommand, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(command)?
    } else {
        serde_json::to_string(command)?
    };
    println!("{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = NlpConfig::from_env();
    if cli.local_only {
        config.api_key = None;
    }
    let parser = CommandParser::new(config)?;

    match cli.text {
        Some(text) => {
            let command = parser.parse_command(&text).await?;
            print_command(&command, cli.pretty)?;
        }
        None => {
            info!("reading utterances from stdin, one per line");
            let _sweeper = cache::spawn_sweeper(
                parser.cache().clone(),
                std::time::Duration::from_secs(600),
            );
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                match parser.parse_command(&line).await {
                    Ok(command) => print_command(&command, cli.pretty)?,
                    Err(err) => warn!("parse failed: {err}"),
                }
            }
        }
    }

    Ok(())
}
