use crate::handlers::emit;
use anyhow::{Result, bail};
use fvgen::features::singleton::PermutationSets;
use fvgen::{FeatureGraph, validate_triggers};
use std::io::Write;

/// Prints one report per auto feature.
///
/// # Errors
/// With `strict`, fails after printing when any report is not clean.
pub(crate) fn run(graph: &FeatureGraph, strict: bool, out: &mut impl Write) -> Result<()> {
    let reports = validate_triggers(graph, &PermutationSets::new());
    emit(out, &reports)?;

    let failing = reports.iter().filter(|r| !r.is_clean()).count();
    if strict && failing > 0 {
        bail!("{failing} of {} auto features have trigger problems", reports.len());
    }
    Ok(())
}
