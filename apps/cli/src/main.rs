mod args;
mod handlers;
mod views;

use crate::args::{Cli, Commands};
use anyhow::{Context, Result};
use clap::Parser;
use fvgen::domain::config::{GeneratorConfig, LoggingConfig};
use fvgen::kernel::config::load_config;
use fvgen::kernel::graph::load_graph;
use fvgen_logger::{LevelFilter, Logger, level_for_verbosity};
use std::io::{BufWriter, Write};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config: GeneratorConfig =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    let _logger = init_logger(cli.verbose, &config.logging)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match cli.command {
        Commands::Expand { source, features } => {
            let graph = graph(&source.graph)?;
            handlers::expand::run(&graph, &features, &mut out)?;
        },
        Commands::Generate { source, features, ignored, no_reachable, permutations } => {
            let graph = graph(&source.graph)?;
            let generation = &mut config.generation;
            generation.ignored_features.extend(ignored);
            if no_reachable {
                generation.include_reachable = false;
            }
            handlers::generate::run(&graph, &features, &config.generation, permutations, &mut out)?;
        },
        Commands::Filter { filter, clauses } => handlers::filter::run(&filter, clauses, &mut out)?,
        Commands::Triggers { source, strict } => {
            let graph = graph(&source.graph)?;
            let result = handlers::triggers::run(&graph, strict, &mut out);
            out.flush().context("Failed to write output")?;
            result?;
        },
    }

    out.flush().context("Failed to write output")?;
    Ok(())
}

fn graph(path: &Path) -> Result<fvgen::FeatureGraph> {
    load_graph(path).with_context(|| format!("Cannot load graph from {}", path.display()))
}

/// `-v` flags win over the configured level.
fn init_logger(verbosity: u8, logging: &LoggingConfig) -> Result<Logger> {
    let level = if verbosity > 0 {
        level_for_verbosity(verbosity)
    } else {
        logging
            .level
            .parse::<LevelFilter>()
            .with_context(|| format!("Invalid log level '{}'", logging.level))?
    };

    let builder = Logger::builder().name(env!("CARGO_BIN_NAME")).console(true).level(level);
    let logger = match &logging.directory {
        Some(directory) => builder.path(directory).json(logging.json).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}
