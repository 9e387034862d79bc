//! Interactive command-line assistant
//!
//! Builds the index from the docs directory on first start, then answers
//! questions until `q`.

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use sil_rag::{
    config::RagConfig,
    pipeline::RagPipeline,
    repl::{ReplCommand, ReplSession},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "sil-copilot", version, about = "Ask questions about your documents")]
struct Args {
    /// Config file (defaults to ./sil-rag.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Re-index the docs directory even if the collection already has vectors
    #[arg(long)]
    rebuild: bool,
}

fn spinner(message: &str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sil_rag=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = RagConfig::load(args.config.as_deref())?;
    let name = config.assistant.name.clone();
    let pipeline = RagPipeline::from_config(config)?;

    if args.rebuild || pipeline.indexed_vectors().await? == 0 {
        let pb = spinner("Building vector DB (one-time)...")?;
        let indexed = pipeline.build_index().await;
        pb.finish_and_clear();
        println!("Indexed {} chunks.", indexed?);
    }

    println!(
        "\n{} ready. Ask about your docs. Type 'q' to quit.",
        style(&name).bold().green()
    );
    println!(
        "{}\n",
        style("Tip: type '/sources on' or '/sources off' to toggle citations.").dim()
    );

    let mut session = ReplSession::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{} ", style("Q:").cyan().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = ReplCommand::parse(&line);
        match &command {
            ReplCommand::Quit => break,
            ReplCommand::Empty => continue,
            ReplCommand::SourcesOn | ReplCommand::SourcesOff => {
                if let Some(message) = session.apply(&command) {
                    println!("{}\n", message);
                }
            }
            ReplCommand::Ask(query) => {
                let pb = spinner("Thinking...")?;
                let result = pipeline.answer(query).await;
                pb.finish_and_clear();

                match result {
                    Ok(answer) => {
                        println!("\n{}\n", style("--- Answer ---").bold());
                        println!("{}\n", session.render(&answer));
                    }
                    Err(e) => eprintln!("{} {}\n", style("Error:").red().bold(), e),
                }
            }
        }
    }

    Ok(())
}
