use crate::configuration::Configuration;
use crate::error::{SingletonError, SingletonErrorExt};
use crate::expand::expand;
use crate::pack::pack;
use crate::variant::ResolvedVariant;
use fvgen_domain::config::GenerationConfig;
use fvgen_domain::constants::PROTECTED_PREFIX;
use fvgen_graph::{FeatureGraph, FeatureId};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Expansion results keyed by the feature they were computed for.
pub type PermutationSets = BTreeMap<FeatureId, BTreeSet<ResolvedVariant>>;

#[derive(Debug, Clone, Default)]
pub struct GenerationOutcome {
    /// Roots that survived trimming, in request order.
    pub roots: Vec<FeatureId>,
    pub configurations: Vec<Configuration>,
    pub unsolved: Vec<ResolvedVariant>,
    pub permutations: PermutationSets,
}

/// Generates the configuration set for `requested` (every feature when empty).
///
/// Requested names are resolved by full or short name. Ignored features, `protected*` names
/// and the kinds in [`GenerationConfig::exclude`] are dropped as roots. The roots and, when
/// [`GenerationConfig::include_reachable`] is set, everything they reach are expanded. Only
/// the roots' permutations are packed as candidates; the full set is the helper pool.
///
/// # Errors
/// Fails for unknown requested names, graph inconsistencies found while expanding, and
/// packing invariant violations.
pub fn generate<S: AsRef<str>>(
    graph: &FeatureGraph,
    requested: &[S],
    config: &GenerationConfig,
) -> Result<GenerationOutcome, SingletonError> {
    let roots = select_roots(graph, requested, config)?;

    let mut expanded: BTreeSet<FeatureId> = if config.include_reachable {
        graph.reachable(roots.iter().copied())
    } else {
        roots.iter().copied().collect()
    };
    expanded.retain(|id| !config.ignored_features.contains(graph.name(*id)));

    let mut permutations = PermutationSets::new();
    for id in expanded {
        permutations.insert(id, expand(graph, id)?);
    }

    let candidates: Vec<ResolvedVariant> = roots
        .iter()
        .filter_map(|id| permutations.get(id))
        .flatten()
        .cloned()
        .collect();
    let pool: Vec<ResolvedVariant> = permutations.values().flatten().cloned().collect();
    let outcome = pack(graph, &candidates, &pool).context("Generating configurations")?;

    info!(
        roots = roots.len(),
        expanded = permutations.len(),
        candidates = candidates.len(),
        pool = pool.len(),
        configurations = outcome.configurations.len(),
        unsolved = outcome.unsolved.len(),
        "Generation finished"
    );

    Ok(GenerationOutcome {
        roots,
        configurations: outcome.configurations,
        unsolved: outcome.unsolved,
        permutations,
    })
}

fn select_roots<S: AsRef<str>>(
    graph: &FeatureGraph,
    requested: &[S],
    config: &GenerationConfig,
) -> Result<Vec<FeatureId>, SingletonError> {
    let starting: Vec<FeatureId> = if requested.is_empty() {
        graph.ids().collect()
    } else {
        requested
            .iter()
            .map(|name| graph.require(name.as_ref()).context("Resolving requested features"))
            .collect::<Result<_, _>>()?
    };

    let mut seen = BTreeSet::new();
    let mut roots = Vec::with_capacity(starting.len());
    for id in starting {
        let feature = graph.feature(id);
        if !config.admits(&feature.name, feature.kind()) {
            debug!(
                feature = %feature.name,
                ignored = config.ignored_features.contains(&feature.name),
                protected = feature.name.starts_with(PROTECTED_PREFIX),
                test = feature.test_feature,
                auto = feature.auto_feature,
                "Ignoring feature during generation"
            );
            continue;
        }
        if seen.insert(id) {
            roots.push(id);
        }
    }
    Ok(roots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fvgen_domain::features::Feature;

    fn graph() -> FeatureGraph {
        FeatureGraph::new([
            Feature::new("app-1.0").short_name("app").requires("s-1.0", Vec::<String>::new()),
            Feature::new("legacy-1.0"),
            Feature::new("fat-1.0").test(),
            Feature::new("protectedApp-1.0").requires("s-1.0", Vec::<String>::new()),
            Feature::new("s-1.0").singleton(),
        ])
        .unwrap()
    }

    #[test]
    fn roots_skip_ignored_and_test_features() {
        let graph = graph();
        let mut config = GenerationConfig::default();
        config.ignored_features.insert("legacy-1.0".to_owned());

        let roots = select_roots(&graph, &[] as &[&str], &config).unwrap();
        let names: Vec<&str> = roots.iter().map(|id| graph.name(*id)).collect();
        assert_eq!(names, vec!["app-1.0", "s-1.0"]);
    }

    #[test]
    fn protected_names_are_never_roots() {
        let graph = graph();
        let roots =
            select_roots(&graph, &["protectedApp-1.0", "app"], &GenerationConfig::default())
                .unwrap();
        assert_eq!(roots, vec![graph.require("app-1.0").unwrap()]);
    }

    #[test]
    fn short_names_resolve_and_repeat_once() {
        let graph = graph();
        let roots =
            select_roots(&graph, &["app", "app-1.0"], &GenerationConfig::default()).unwrap();
        assert_eq!(roots, vec![graph.require("app-1.0").unwrap()]);
    }

    #[test]
    fn unknown_request_is_fatal() {
        let graph = graph();
        let err = generate(&graph, &["nope"], &GenerationConfig::default()).unwrap_err();
        assert!(matches!(err, SingletonError::Graph { .. }));
        assert!(err.to_string().contains("Resolving requested features"));
    }

    #[test]
    fn reachable_features_join_the_pool() {
        let graph = graph();
        let outcome = generate(&graph, &["app"], &GenerationConfig::default()).unwrap();
        assert_eq!(outcome.permutations.len(), 2);
        assert_eq!(outcome.configurations.len(), 1);

        let members: Vec<&str> =
            outcome.configurations[0].members().iter().map(|m| graph.name(m.feature)).collect();
        assert_eq!(members, vec!["app-1.0"]);

        let config = GenerationConfig { include_reachable: false, ..GenerationConfig::default() };
        let outcome = generate(&graph, &["app"], &config).unwrap();
        assert_eq!(outcome.permutations.len(), 1);
    }
}
