use crate::handlers::emit;
use crate::views::{VariantView, variant};
use anyhow::{Context, Result};
use fvgen::{FeatureGraph, expand};
use std::collections::BTreeMap;
use std::io::Write;

/// Prints the variant set of every requested feature, keyed by full name.
///
/// # Errors
/// Returns an error for unknown names and inconsistent graphs.
pub(crate) fn run(graph: &FeatureGraph, features: &[String], out: &mut impl Write) -> Result<()> {
    let mut sets = BTreeMap::new();
    for name in features {
        let id = graph.require(name).with_context(|| format!("Cannot expand '{name}'"))?;
        sets.insert(graph.name(id), expand(graph, id)?);
    }

    let view: BTreeMap<&str, Vec<VariantView<'_>>> = sets
        .iter()
        .map(|(name, set)| (*name, set.iter().map(|v| variant(graph, v)).collect()))
        .collect();
    emit(out, &view)
}
