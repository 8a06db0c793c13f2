//! kiln - A static asset pipeline with a live reload dev server.

mod actor;
mod cli;
mod config;
mod core;
mod embed;
mod logger;
mod pipeline;
mod reload;
mod serve;
mod transform;
mod utils;

use std::sync::Arc;

use anyhow::{Result, bail};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::KilnConfig;
use crate::core::Category;
use pipeline::{Pipeline, build, clean};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Arc::new(KilnConfig::load(&cli)?);
    debug!("config"; "root {}", config.root.display());

    match &cli.command {
        Commands::Clean => {
            clean(&config)?;
            log!("clean"; "removed {}", config.root_relative(config.build_dir()).display());
            Ok(())
        }
        Commands::Build => build_once(&Pipeline::new(config)),
        Commands::Watch { .. } => watch(Pipeline::new(config)),
        step => match step.category() {
            Some(category) => run_step(&Pipeline::new(config), category),
            None => Ok(()),
        },
    }
}

// =============================================================================
// One-shot Commands
// =============================================================================

/// Run a single step. Bad source content is reported but not fatal.
fn run_step(pipeline: &Pipeline, category: Category) -> Result<()> {
    match pipeline.run_step(category) {
        Ok(outputs) => {
            log!(category.name(); "{} written", utils::plural_count(outputs.written.len(), "file"));
            Ok(())
        }
        Err(e) if e.is_transform() => {
            log!("error"; "{} failed: {}", category, e.detail());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Clean and run every step; only filesystem failures exit non-zero.
fn build_once(pipeline: &Pipeline) -> Result<()> {
    let report = build(pipeline, false)?;
    report.log();
    if report.has_io_failure() {
        bail!("build failed");
    }
    Ok(())
}

// =============================================================================
// Watch Command
// =============================================================================

/// Build, then watch and serve until Ctrl+C.
fn watch(pipeline: Pipeline) -> Result<()> {
    let shutdown_rx = crate::core::setup_shutdown_handler()?;

    // Step failures never end watch mode
    match build(&pipeline, false) {
        Ok(report) => report.log(),
        Err(e) => log!("error"; "initial build failed: {}", e.detail()),
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    runtime.block_on(
        actor::Coordinator::new(Arc::new(pipeline))
            .with_shutdown_signal(shutdown_rx)
            .run(),
    )
}
