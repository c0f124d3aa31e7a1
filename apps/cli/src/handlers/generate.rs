use crate::handlers::emit;
use crate::views::generation;
use anyhow::{Context, Result};
use fvgen::domain::config::GenerationConfig;
use fvgen::{FeatureGraph, generate};
use std::io::Write;
use tracing::warn;

/// Runs the generator and prints the configuration set.
///
/// # Errors
/// Returns an error for unknown names, inconsistent graphs and packing invariant violations.
pub(crate) fn run(
    graph: &FeatureGraph,
    features: &[String],
    config: &GenerationConfig,
    with_permutations: bool,
    out: &mut impl Write,
) -> Result<()> {
    let outcome = generate(graph, features, config).context("Generation failed")?;
    if !outcome.unsolved.is_empty() {
        warn!(unsolved = outcome.unsolved.len(), "Some candidates fit no configuration");
    }
    emit(out, &generation(graph, &outcome, with_permutations))
}
