use crate::choice::{Bindings, Choice, agree, bind};
use crate::variant::ResolvedVariant;
use serde::Serialize;
use std::collections::BTreeSet;

/// A bucket of variants that can share one test server.
///
/// Members agree on every group they share; `bindings` is their aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Configuration {
    members: BTreeSet<ResolvedVariant>,
    bindings: Bindings,
}

impl Configuration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members(&self) -> &BTreeSet<ResolvedVariant> {
        &self.members
    }

    pub const fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Whether `variant` selects the same feature for every group already bound here.
    #[must_use]
    pub fn accepts(&self, variant: &ResolvedVariant) -> bool {
        agree(&self.bindings, &variant.bindings)
    }

    /// Adds `variant` if it is accepted. New groups are bound, shared groups upgraded.
    pub fn add(&mut self, variant: ResolvedVariant) -> bool {
        if !self.accepts(&variant) {
            return false;
        }
        for choice in variant.bindings.values() {
            bind(&mut self.bindings, choice);
        }
        self.members.insert(variant);
        true
    }

    /// Absorbs every member of `other` if the two aggregates agree.
    pub fn add_configuration(&mut self, other: &Self) -> bool {
        if !agree(&self.bindings, &other.bindings) {
            return false;
        }
        for choice in other.bindings.values() {
            bind(&mut self.bindings, choice);
        }
        self.members.extend(other.members.iter().cloned());
        true
    }

    /// Aggregate bindings still waiting for a preferred provider.
    pub fn tolerated(&self) -> impl Iterator<Item = &Choice> + '_ {
        self.bindings.values().filter(|c| !c.preferred)
    }

    #[must_use]
    pub fn is_fully_preferred(&self) -> bool {
        self.tolerated().next().is_none()
    }

    /// Whether `variant` would turn some tolerated binding here into a preferred one.
    #[must_use]
    pub fn upgraded_by(&self, variant: &ResolvedVariant) -> bool {
        self.tolerated().any(|held| {
            variant.binding(&held.group).is_some_and(|c| c.preferred && c.selects_same(held))
        })
    }
}

impl From<ResolvedVariant> for Configuration {
    fn from(variant: ResolvedVariant) -> Self {
        let mut configuration = Self::new();
        configuration.bindings = variant.bindings.clone();
        configuration.members.insert(variant);
        configuration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fvgen_domain::features::Feature;
    use fvgen_graph::FeatureGraph;

    fn graph() -> FeatureGraph {
        FeatureGraph::new([
            Feature::new("app-1.0"),
            Feature::new("web-1.0"),
            Feature::new("s-1.0").singleton(),
            Feature::new("s-2.0").singleton(),
        ])
        .unwrap()
    }

    fn variant(graph: &FeatureGraph, root: &str, choice: (&str, bool)) -> ResolvedVariant {
        let id = graph.require(choice.0).unwrap();
        let choice =
            if choice.1 { Choice::preferred(graph, id) } else { Choice::tolerated(graph, id) };
        ResolvedVariant::new(
            graph.require(root).unwrap(),
            Bindings::from([(choice.group.clone(), choice)]),
        )
    }

    #[test]
    fn add_upgrades_shared_groups() {
        let graph = graph();
        let mut configuration = Configuration::from(variant(&graph, "app-1.0", ("s-2.0", false)));
        assert!(!configuration.is_fully_preferred());

        let helper = variant(&graph, "web-1.0", ("s-2.0", true));
        assert!(configuration.upgraded_by(&helper));
        assert!(configuration.add(helper));
        assert!(configuration.is_fully_preferred());
        assert_eq!(configuration.members().len(), 2);
    }

    #[test]
    fn add_rejects_other_selection() {
        let graph = graph();
        let mut configuration = Configuration::from(variant(&graph, "app-1.0", ("s-1.0", true)));
        assert!(!configuration.add(variant(&graph, "web-1.0", ("s-2.0", true))));
        assert_eq!(configuration.members().len(), 1);
    }

    #[test]
    fn configurations_merge_when_compatible() {
        let graph = graph();
        let mut left = Configuration::from(variant(&graph, "app-1.0", ("s-1.0", false)));
        let right = Configuration::from(variant(&graph, "web-1.0", ("s-1.0", true)));
        let other = Configuration::from(variant(&graph, "web-1.0", ("s-2.0", true)));

        assert!(left.add_configuration(&right));
        assert!(left.is_fully_preferred());
        assert!(!left.add_configuration(&other));
        assert_eq!(left.members().len(), 2);
    }
}
