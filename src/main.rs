use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use life_sim::config::settings_io::{load_settings, save_settings};
use life_sim::engine::game_loop::GameLoop;
use life_sim::engine::llm_client::ChatCompletionsClient;
use life_sim::ui::console::ConsolePresenter;

#[derive(Debug, Parser)]
#[command(name = "life-sim", version)]
#[command(about = "Live a generated life, one situation at a time")]
struct Args {
    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for turn draws and personality rolls
    #[arg(long)]
    seed: Option<u64>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    endpoint: Option<String>,

    /// Model name sent with each request
    #[arg(long)]
    model: Option<String>,

    /// Check that the endpoint answers, then exit
    #[arg(long)]
    check: bool,

    /// Save the effective settings, then exit
    #[arg(long)]
    write_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref());
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    if let Some(endpoint) = args.endpoint {
        settings.endpoint = endpoint;
    }
    if let Some(model) = args.model {
        settings.model = model;
    }
    let settings = settings.normalized();

    if args.write_config {
        let path = save_settings(&settings, args.config.as_deref())?;
        println!("Settings written to {}", path.display());
        return Ok(());
    }

    let client = ChatCompletionsClient::new(&settings)
        .context("failed to build content generator client")?;

    if args.check {
        let status = client
            .test_connection()
            .with_context(|| format!("no answer from {}", settings.endpoint))?;
        println!("{}", status);
        return Ok(());
    }

    let (presenter, age_signals) = ConsolePresenter::spawn();
    let mut game = GameLoop::new(client, presenter, age_signals, settings.loop_options());

    if let Some(character) = game.run() {
        log::info!(
            "session ended: {} reached age {} with {} achievements",
            character.name(),
            character.age(),
            character.achievements().len()
        );
    }

    Ok(())
}
