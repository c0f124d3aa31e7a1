use crate::choice::{Bindings, agree, union};
use crate::expand::expand;
use crate::generator::PermutationSets;
use crate::variant::ResolvedVariant;
use fvgen_filter::required_features;
use fvgen_graph::{FeatureGraph, FeatureId};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Outcome of checking one auto feature's trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerReport {
    pub feature: String,
    /// Feature names each alternative of the trigger requires.
    pub clause_sets: Vec<BTreeSet<String>>,
    /// Names the trigger mentions that the graph does not know.
    pub unknown: BTreeSet<String>,
    /// Index into `clause_sets` of the first alternative that can be installed together.
    pub satisfied_by: Option<usize>,
    pub errors: Vec<String>,
}

impl TriggerReport {
    #[must_use]
    pub const fn is_satisfiable(&self) -> bool {
        self.satisfied_by.is_some()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.unknown.is_empty() && self.is_satisfiable()
    }
}

/// Checks every auto feature of `graph` against the graph and `permutations`.
///
/// Features missing from `permutations` are expanded on demand.
pub fn validate_triggers(
    graph: &FeatureGraph,
    permutations: &PermutationSets,
) -> Vec<TriggerReport> {
    let reports: Vec<TriggerReport> = graph
        .iter()
        .filter(|(_, feature)| feature.auto_feature)
        .map(|(id, _)| validate_trigger(graph, id, permutations))
        .collect();

    let failing = reports.iter().filter(|r| !r.is_clean()).count();
    if failing > 0 {
        warn!(auto_features = reports.len(), failing, "Trigger validation found problems");
    } else {
        debug!(auto_features = reports.len(), "Triggers validated");
    }
    reports
}

/// Checks the trigger of a single auto feature.
pub fn validate_trigger(
    graph: &FeatureGraph,
    feature: FeatureId,
    permutations: &PermutationSets,
) -> TriggerReport {
    let name = graph.name(feature).to_owned();
    let mut report = TriggerReport {
        feature: name,
        clause_sets: Vec::new(),
        unknown: BTreeSet::new(),
        satisfied_by: None,
        errors: Vec::new(),
    };

    let Some(filter) = graph.feature(feature).triggers.as_deref() else {
        report.errors.push("auto feature has no trigger filter".to_owned());
        return report;
    };

    match required_features(filter) {
        Ok(sets) => report.clause_sets = sets,
        Err(errors) => {
            report.errors.extend(errors.iter().map(ToString::to_string));
            return report;
        },
    }

    for (index, names) in report.clause_sets.iter().enumerate() {
        let ids: Vec<FeatureId> = names.iter().filter_map(|n| graph.id(n)).collect();
        if ids.len() != names.len() {
            report.unknown.extend(names.iter().filter(|n| graph.id(n).is_none()).cloned());
            continue;
        }
        if report.satisfied_by.is_some() {
            continue;
        }

        let mut sets: Vec<Cow<'_, BTreeSet<ResolvedVariant>>> = Vec::with_capacity(ids.len());
        for id in ids {
            match permutations.get(&id) {
                Some(set) => sets.push(Cow::Borrowed(set)),
                None => match expand(graph, id) {
                    Ok(set) => sets.push(Cow::Owned(set)),
                    Err(err) => {
                        report.errors.push(err.to_string());
                        sets.clear();
                        break;
                    },
                },
            }
        }
        if sets.len() == names.len() && compatible_selection(&sets, &Bindings::new()) {
            report.satisfied_by = Some(index);
        }
    }
    report
}

/// Whether one variant can be taken from each set so that all of them agree.
fn compatible_selection(sets: &[Cow<'_, BTreeSet<ResolvedVariant>>], held: &Bindings) -> bool {
    let Some((first, rest)) = sets.split_first() else {
        return true;
    };
    first
        .iter()
        .filter(|variant| agree(held, &variant.bindings))
        .any(|variant| compatible_selection(rest, &union(held, &variant.bindings)))
}
