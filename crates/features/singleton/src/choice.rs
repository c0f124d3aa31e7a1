use fvgen_graph::{FeatureGraph, FeatureId};
use serde::Serialize;
use std::collections::BTreeMap;

pub use fvgen_graph::ChoiceGroupId;

/// A selection of one feature within its choice group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Choice {
    pub group: ChoiceGroupId,
    pub feature: FeatureId,
    /// `true` for the version named directly on an edge (or a root binding itself),
    /// `false` for a tolerated alternative.
    pub preferred: bool,
}

/// Group to choice map carried by variants and configurations.
pub type Bindings = BTreeMap<ChoiceGroupId, Choice>;

impl Choice {
    pub fn preferred(graph: &FeatureGraph, feature: FeatureId) -> Self {
        Self { group: graph.group(feature), feature, preferred: true }
    }

    pub fn tolerated(graph: &FeatureGraph, feature: FeatureId) -> Self {
        Self { group: graph.group(feature), feature, preferred: false }
    }

    /// Same group and same feature; the preferred flag is not compared.
    #[must_use]
    pub fn selects_same(&self, other: &Self) -> bool {
        self.group == other.group && self.feature == other.feature
    }

    /// Keeps the selection, preferred if either side is.
    #[must_use]
    pub fn upgraded(&self, other: &Self) -> Self {
        Self { preferred: self.preferred || other.preferred, ..self.clone() }
    }
}

/// `true` when every group bound on both sides selects the same feature.
#[must_use]
pub fn agree(left: &Bindings, right: &Bindings) -> bool {
    let (small, large) = if left.len() <= right.len() { (left, right) } else { (right, left) };
    small
        .iter()
        .all(|(group, choice)| large.get(group).is_none_or(|other| other.selects_same(choice)))
}

/// Folds `choice` into `bindings`.
///
/// The same selection is upgraded; a different selection is replaced only when the
/// incoming choice is preferred and the held one is not.
pub fn bind(bindings: &mut Bindings, choice: &Choice) {
    match bindings.get_mut(&choice.group) {
        Some(held) if held.selects_same(choice) => held.preferred |= choice.preferred,
        Some(held) => {
            if choice.preferred && !held.preferred {
                *held = choice.clone();
            }
        },
        None => {
            bindings.insert(choice.group.clone(), choice.clone());
        },
    }
}

/// Union of two binding maps under the [`bind`] rule.
#[must_use]
pub fn union(left: &Bindings, right: &Bindings) -> Bindings {
    let mut out = left.clone();
    for choice in right.values() {
        bind(&mut out, choice);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fvgen_domain::features::Feature;

    fn graph() -> FeatureGraph {
        FeatureGraph::new([
            Feature::new("s-1.0").singleton(),
            Feature::new("s-2.0").singleton(),
            Feature::new("t-1.0").singleton(),
        ])
        .unwrap()
    }

    fn id(graph: &FeatureGraph, name: &str) -> FeatureId {
        graph.require(name).unwrap()
    }

    #[test]
    fn preferred_flag_does_not_affect_selection() {
        let graph = graph();
        let a = Choice::preferred(&graph, id(&graph, "s-1.0"));
        let b = Choice::tolerated(&graph, id(&graph, "s-1.0"));
        assert!(a.selects_same(&b));
        assert!(b.upgraded(&a).preferred);
        assert!(!a.selects_same(&Choice::preferred(&graph, id(&graph, "s-2.0"))));
    }

    #[test]
    fn preferred_overrides_on_union() {
        let graph = graph();
        let s1 = Choice::tolerated(&graph, id(&graph, "s-1.0"));
        let s2 = Choice::preferred(&graph, id(&graph, "s-2.0"));
        let t = Choice::preferred(&graph, id(&graph, "t-1.0"));

        let left = Bindings::from([(s1.group.clone(), s1)]);
        let right = Bindings::from([(s2.group.clone(), s2.clone()), (t.group.clone(), t)]);

        assert!(!agree(&left, &right));
        let merged = union(&left, &right);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[&s2.group], s2);
    }

    #[test]
    fn disjoint_bindings_agree() {
        let graph = graph();
        let s = Choice::tolerated(&graph, id(&graph, "s-1.0"));
        let t = Choice::preferred(&graph, id(&graph, "t-1.0"));
        let left = Bindings::from([(s.group.clone(), s)]);
        let right = Bindings::from([(t.group.clone(), t)]);
        assert!(agree(&left, &right));
        assert!(agree(&left, &Bindings::new()));
    }
}
