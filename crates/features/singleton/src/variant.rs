use crate::choice::{Bindings, Choice, ChoiceGroupId, agree};
use fvgen_graph::{FeatureGraph, FeatureId, GraphError};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// The open choices a feature sees on its direct singleton edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedVariant {
    pub feature: FeatureId,
    pub domain: BTreeMap<ChoiceGroupId, BTreeSet<Choice>>,
}

impl UnresolvedVariant {
    /// Collects `{preferred} ∪ {present tolerated alternatives}` for every singleton edge
    /// of `feature`. Edges into the same group share one domain.
    ///
    /// # Errors
    /// Returns [`GraphError::MissingFeature`] for an edge naming an unknown feature.
    pub fn of(graph: &FeatureGraph, feature: FeatureId) -> Result<Self, GraphError> {
        let mut variant = Self { feature, domain: BTreeMap::new() };
        for edge in graph.edges(feature) {
            let target = graph.target(&edge)?;
            if !graph.is_singleton(target) {
                continue;
            }
            variant.offer(Choice::preferred(graph, target));
            for alternative in graph.alternatives(&edge) {
                variant.offer(Choice::tolerated(graph, alternative));
            }
        }
        Ok(variant)
    }

    /// Adds `choice` to its group's domain, upgrading an existing selection of the same feature.
    pub fn offer(&mut self, choice: Choice) {
        let options = self.domain.entry(choice.group.clone()).or_default();
        if let Some(held) = options.iter().find(|c| c.selects_same(&choice)).cloned() {
            if choice.preferred && !held.preferred {
                options.remove(&held);
                options.insert(choice);
            }
        } else {
            options.insert(choice);
        }
    }

    /// Groups this feature makes decisions about.
    pub fn groups(&self) -> impl Iterator<Item = &ChoiceGroupId> + '_ {
        self.domain.keys()
    }

    /// Every assignment of one choice per group, one group at a time.
    #[must_use]
    pub fn permutations(&self) -> Vec<Bindings> {
        let groups: Vec<&BTreeSet<Choice>> = self.domain.values().collect();
        let mut out = Vec::new();
        enumerate(&groups, Bindings::new(), &mut out);
        out
    }
}

fn enumerate(groups: &[&BTreeSet<Choice>], fixed: Bindings, out: &mut Vec<Bindings>) {
    let Some((first, rest)) = groups.split_first() else {
        out.push(fixed);
        return;
    };
    if first.len() == 1 {
        let mut fixed = fixed;
        if let Some(only) = first.first() {
            fixed.insert(only.group.clone(), only.clone());
        }
        enumerate(rest, fixed, out);
        return;
    }
    for choice in *first {
        let mut branch = fixed.clone();
        branch.insert(choice.group.clone(), choice.clone());
        enumerate(rest, branch, out);
    }
}

/// A feature with every choice in its subtree decided.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ResolvedVariant {
    pub feature: FeatureId,
    pub bindings: Bindings,
}

impl ResolvedVariant {
    pub const fn new(feature: FeatureId, bindings: Bindings) -> Self {
        Self { feature, bindings }
    }

    /// Whether `candidate`, produced below `self`, may be folded into it.
    ///
    /// A group `self` binds must be selected the same way; any other group must be
    /// preferred in the candidate unless it is private.
    #[must_use]
    pub fn accepts_descendant(&self, candidate: &Self) -> bool {
        candidate.bindings.iter().all(|(group, choice)| match self.bindings.get(group) {
            Some(held) => held.selects_same(choice),
            None => choice.preferred || group.is_private,
        })
    }

    /// Whether two siblings agree on every group they both bind.
    #[must_use]
    pub fn agrees_with(&self, other: &Self) -> bool {
        agree(&self.bindings, &other.bindings)
    }

    #[must_use]
    pub fn rebased(&self, feature: FeatureId) -> Self {
        Self { feature, bindings: self.bindings.clone() }
    }

    /// `true` when any binding shares a group with `other`.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.bindings.keys().any(|group| other.bindings.contains_key(group))
    }

    pub fn binding(&self, group: &ChoiceGroupId) -> Option<&Choice> {
        self.bindings.get(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fvgen_domain::features::{Feature, Visibility};

    fn graph() -> FeatureGraph {
        FeatureGraph::new([
            Feature::new("app-1.0")
                .requires("db-1.0", ["2.0"])
                .requires("db-2.0", Vec::<String>::new())
                .requires("log-1.0", ["2.0", "9.9"])
                .requires("util-1.0", ["2.0"]),
            Feature::new("db-1.0").singleton(),
            Feature::new("db-2.0").singleton(),
            Feature::new("log-1.0").singleton().with_visibility(Visibility::Private),
            Feature::new("log-2.0").singleton().with_visibility(Visibility::Private),
            Feature::new("util-1.0"),
            Feature::new("util-2.0"),
        ])
        .unwrap()
    }

    #[test]
    fn domain_merges_edges_of_one_group() {
        let graph = graph();
        let app = graph.require("app-1.0").unwrap();
        let variant = UnresolvedVariant::of(&graph, app).unwrap();

        assert_eq!(variant.groups().count(), 2);
        let db = &variant.domain[&graph.group(graph.require("db-1.0").unwrap())];
        assert_eq!(db.len(), 2);
        assert!(db.iter().all(|c| c.preferred));

        let log = &variant.domain[&graph.group(graph.require("log-1.0").unwrap())];
        assert_eq!(log.iter().filter(|c| !c.preferred).count(), 1);
    }

    #[test]
    fn permutations_cover_the_product() {
        let graph = graph();
        let app = graph.require("app-1.0").unwrap();
        let permutations = UnresolvedVariant::of(&graph, app).unwrap().permutations();
        assert_eq!(permutations.len(), 4);
        assert!(permutations.iter().all(|p| p.len() == 2));
    }

    #[test]
    fn descendant_rules() {
        let graph = graph();
        let app = graph.require("app-1.0").unwrap();
        let db1 = Choice::preferred(&graph, graph.require("db-1.0").unwrap());
        let db2 = Choice::tolerated(&graph, graph.require("db-2.0").unwrap());
        let log2 = Choice::tolerated(&graph, graph.require("log-2.0").unwrap());

        let ancestor = ResolvedVariant::new(app, Bindings::new());
        let public_tolerated =
            ResolvedVariant::new(app, Bindings::from([(db2.group.clone(), db2)]));
        let private_tolerated =
            ResolvedVariant::new(app, Bindings::from([(log2.group.clone(), log2)]));
        let preferred =
            ResolvedVariant::new(app, Bindings::from([(db1.group.clone(), db1.clone())]));

        assert!(!ancestor.accepts_descendant(&public_tolerated));
        assert!(ancestor.accepts_descendant(&private_tolerated));
        assert!(ancestor.accepts_descendant(&preferred));

        let fixed = ResolvedVariant::new(app, Bindings::from([(db1.group.clone(), db1)]));
        assert!(!fixed.accepts_descendant(&public_tolerated));
        assert!(!fixed.agrees_with(&public_tolerated));
    }
}
