//! genimg - text-to-image CLI for DALL-E 3 and Stable Diffusion.

mod adapters;
mod cassette;
mod cli;
mod config;
mod context;
mod dispatch;
mod error;
mod model;
mod output;
mod params;
mod ports;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cassette::config::CASSETTE_ROOT;
use crate::cli::Cli;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::dispatch::dispatch;
use crate::output::ensure_output_dir;
use crate::ports::GenerationRequest;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "genimg=debug" } else { "genimg=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .init();
}

async fn run(cli: Cli) -> Result<(), error::ImageError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!("Ignoring .env file: {e}");
        }
    }

    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(error::ImageError::Config)?;
    debug!("Config: {}", config_path.display());

    let prompt = cli.resolve_prompt().map_err(error::ImageError::Io)?;
    for flag in cli.ignored_flags() {
        debug!("{flag} is not used by {}", cli.engine.label());
    }

    let request = GenerationRequest {
        engine: cli.engine,
        prompt,
        count: cli.count,
        aspect_ratio: cli.aspect.clone(),
        negative_prompt: cli.negative_prompt.clone(),
        seed: cli.seed,
    };

    let output_dir =
        cli.output_dir.as_ref().map_or_else(|| config.defaults.output_dir.clone(), PathBuf::from);
    ensure_output_dir(&output_dir)?;

    let replay_path = std::env::var("GENIMG_REPLAY").ok();
    let is_recording = std::env::var("GENIMG_REC").is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        debug!("Replaying from: {cassette_path}");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else {
        let credentials = config.credentials();
        config::warn_if_missing(&credentials, cli.engine);
        if is_recording {
            debug!("Recording mode enabled");
            let (ctx, session) = ServiceContext::recording(
                cli.engine,
                &config,
                &credentials,
                Path::new(CASSETTE_ROOT),
            );
            (ctx, Some(session))
        } else {
            (ServiceContext::live(cli.engine, &config, &credentials), None)
        }
    };

    let result = dispatch(ctx.generator.as_ref(), &request, &output_dir).await;
    drop(ctx);

    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => info!("Cassette saved: {}", path.display()),
            Err(e) => warn!("Failed to save cassette: {e}"),
        }
    }

    let report = result?;
    let skipped = report.skipped().count();
    if skipped > 0 {
        warn!("{skipped} of {} image(s) skipped", request.count);
    }
    info!("Saved {} image(s) to {}", report.saved_paths().len(), output_dir.display());

    Ok(())
}
