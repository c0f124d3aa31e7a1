use crate::configuration::Configuration;
use crate::error::PackError;
use crate::variant::ResolvedVariant;
use fvgen_graph::FeatureGraph;
use serde::Serialize;
use tracing::{debug, info, trace, warn};

/// Result of packing a permutation list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackOutcome {
    pub configurations: Vec<Configuration>,
    /// Candidates no configuration could be built around.
    pub unsolved: Vec<ResolvedVariant>,
}

/// Packs `candidates` into as few mutually consistent configurations as it can.
///
/// Every candidate rooted at a non-private, non-auto, non-test feature ends up as a
/// member of some configuration or in [`PackOutcome::unsolved`]; the rest are skipped.
/// `pool` supplies the helpers for repair and backfill, private roots excluded. Helpers
/// join a configuration only to make its bindings preferred.
///
/// # Errors
/// Returns [`PackError::Invariant`] when backfill cannot make a configuration fully
/// preferred.
pub fn pack(
    graph: &FeatureGraph,
    candidates: &[ResolvedVariant],
    pool: &[ResolvedVariant],
) -> Result<PackOutcome, PackError> {
    let packer = Packer { graph, pool };

    let mut pending: Vec<ResolvedVariant> =
        candidates.iter().filter(|v| packer.is_candidate(v)).cloned().collect();
    pending.sort_by(|a, b| a.bindings.len().cmp(&b.bindings.len()).then_with(|| a.cmp(b)));
    pending.dedup();
    debug!(candidates = pending.len(), pool = pool.len(), "Packing started");

    let (configurations, leftovers) = packer.place(pending);
    debug!(configurations = configurations.len(), leftovers = leftovers.len(), "Placement done");

    let (configurations, unsolved) = packer.repair(configurations, leftovers);
    let mut configurations = merge_buckets(configurations);
    debug!(configurations = configurations.len(), "Buckets merged");

    for (index, configuration) in configurations.iter_mut().enumerate() {
        packer.backfill(index, configuration)?;
    }

    info!(
        configurations = configurations.len(),
        unsolved = unsolved.len(),
        "Packing finished"
    );
    Ok(PackOutcome { configurations, unsolved })
}

/// Pops the first configuration and absorbs every compatible one after it, until none remain.
fn merge_buckets(mut pending: Vec<Configuration>) -> Vec<Configuration> {
    let mut merged = Vec::with_capacity(pending.len());
    while !pending.is_empty() {
        let mut target = pending.remove(0);
        pending.retain(|other| !target.add_configuration(other));
        trace!(members = target.members().len(), "Bucket closed");
        merged.push(target);
    }
    merged
}

struct Packer<'a> {
    graph: &'a FeatureGraph,
    pool: &'a [ResolvedVariant],
}

impl Packer<'_> {
    fn is_candidate(&self, variant: &ResolvedVariant) -> bool {
        let feature = self.graph.feature(variant.feature);
        !feature.visibility.is_private() && !feature.auto_feature && !feature.test_feature
    }

    fn is_member(&self, variant: &ResolvedVariant) -> bool {
        !self.graph.visibility(variant.feature).is_private()
    }

    fn helpers(&self) -> impl Iterator<Item = &ResolvedVariant> + '_ {
        self.pool.iter().filter(|v| self.is_member(v))
    }

    /// Greedy first-fit, repeated until a pass places nothing.
    fn place(
        &self,
        mut pending: Vec<ResolvedVariant>,
    ) -> (Vec<Configuration>, Vec<ResolvedVariant>) {
        let mut configurations: Vec<Configuration> = Vec::new();

        loop {
            let mut placed_any = false;
            let mut remaining = Vec::new();

            for candidate in pending {
                if self.graph.is_singleton(candidate.feature) {
                    let mut placed = false;
                    for configuration in &mut configurations {
                        placed |= configuration.add(candidate.clone());
                    }
                    if placed {
                        trace!(feature = self.graph.name(candidate.feature), "Singleton placed");
                        placed_any = true;
                    } else {
                        remaining.push(candidate);
                    }
                } else if let Some(configuration) =
                    configurations.iter_mut().find(|c| c.accepts(&candidate))
                {
                    trace!(feature = self.graph.name(candidate.feature), "Candidate placed");
                    configuration.add(candidate);
                    placed_any = true;
                } else {
                    trace!(feature = self.graph.name(candidate.feature), "Configuration opened");
                    configurations.push(Configuration::from(candidate));
                    placed_any = true;
                }
            }

            if remaining.is_empty() || !placed_any {
                return (configurations, remaining);
            }
            pending = remaining;
        }
    }

    /// Builds a configuration around each leftover by pulling in helpers that turn its
    /// tolerated bindings preferred.
    fn repair(
        &self,
        mut configurations: Vec<Configuration>,
        leftovers: Vec<ResolvedVariant>,
    ) -> (Vec<Configuration>, Vec<ResolvedVariant>) {
        let mut unsolved = Vec::new();

        for target in leftovers {
            let mut aggregate = Configuration::from(target.clone());
            loop {
                if aggregate.is_fully_preferred() {
                    configurations.push(aggregate);
                    break;
                }
                let helper = self.helpers().find(|helper| {
                    helper.overlaps(&target)
                        && aggregate.accepts(helper)
                        && aggregate.upgraded_by(helper)
                });
                match helper {
                    Some(helper) => {
                        trace!(
                            target = self.graph.name(target.feature),
                            helper = self.graph.name(helper.feature),
                            "Repair helper added"
                        );
                        aggregate.add(helper.clone());
                    },
                    None => {
                        warn!(feature = self.graph.name(target.feature), "Candidate left unsolved");
                        unsolved.push(target);
                        break;
                    },
                }
            }
        }
        (configurations, unsolved)
    }

    fn backfill(&self, index: usize, configuration: &mut Configuration) -> Result<(), PackError> {
        loop {
            let next = configuration.tolerated().next().cloned();
            let Some(open) = next else { break };

            let provider = self.helpers().find(|helper| {
                helper.binding(&open.group).is_some_and(|c| c.preferred && c.selects_same(&open))
                    && configuration.accepts(helper)
            });

            let Some(provider) = provider else {
                let privacy = if open.group.is_private { "private " } else { "" };
                return Err(PackError::Invariant {
                    message: format!(
                        "no preferred provider for {privacy}{} in configuration {index}",
                        self.graph.name(open.feature)
                    )
                    .into(),
                    context: Some("Backfilling".into()),
                });
            };
            trace!(
                configuration = index,
                provider = self.graph.name(provider.feature),
                "Backfill added"
            );
            configuration.add(provider.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::expand;
    use fvgen_domain::features::{Feature, Visibility};

    fn graph() -> FeatureGraph {
        FeatureGraph::new([
            Feature::new("a-1.0").requires("b-1.0", ["2.0"]),
            Feature::new("b-1.0").singleton().with_visibility(Visibility::Private),
            Feature::new("b-2.0").singleton().with_visibility(Visibility::Private),
            Feature::new("d-1.0").requires("b-2.0", Vec::<String>::new()),
        ])
        .unwrap()
    }

    fn permutations(graph: &FeatureGraph, names: &[&str]) -> Vec<ResolvedVariant> {
        names.iter().flat_map(|name| expand(graph, graph.require(name).unwrap()).unwrap()).collect()
    }

    fn names<'g>(graph: &'g FeatureGraph, configuration: &Configuration) -> Vec<&'g str> {
        configuration.members().iter().map(|m| graph.name(m.feature)).collect()
    }

    #[test]
    fn backfill_pulls_preferred_provider_from_pool() {
        let graph = graph();
        let candidates = permutations(&graph, &["a-1.0"]);
        let pool = permutations(&graph, &["a-1.0", "d-1.0"]);

        let outcome = pack(&graph, &candidates, &pool).unwrap();
        assert_eq!(outcome.configurations.len(), 2);
        assert!(outcome.configurations.iter().all(Configuration::is_fully_preferred));

        let b2 = graph.require("b-2.0").unwrap();
        let backfilled = outcome
            .configurations
            .iter()
            .find(|c| c.bindings().values().any(|choice| choice.feature == b2))
            .unwrap();
        assert_eq!(names(&graph, backfilled), vec!["a-1.0", "d-1.0"]);
    }

    #[test]
    fn pool_features_are_not_candidates() {
        let graph = graph();
        let candidates = permutations(&graph, &["d-1.0"]);
        let pool = permutations(&graph, &["a-1.0", "d-1.0"]);

        let outcome = pack(&graph, &candidates, &pool).unwrap();
        assert_eq!(outcome.configurations.len(), 1);
        assert_eq!(names(&graph, &outcome.configurations[0]), vec!["d-1.0"]);
    }

    #[test]
    fn backfill_without_provider_reports_group() {
        let graph = graph();
        let candidates = permutations(&graph, &["a-1.0"]);

        let err = pack(&graph, &candidates, &candidates).unwrap_err();
        assert!(err.to_string().contains("no preferred provider for private b-2.0"), "{err}");
    }
}
