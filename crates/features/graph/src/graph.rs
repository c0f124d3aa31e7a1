use crate::error::GraphError;
use crate::group::ChoiceGroupId;
use fvgen_domain::features::{Feature, GraphDocument, Visibility, sibling_version};
use fxhash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

/// Index of a feature inside its [`FeatureGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FeatureId(u32);

impl FeatureId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One `content_features` entry of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<'g> {
    pub name: &'g str,
    pub tolerates: &'g [String],
}

#[derive(Debug, Default)]
pub struct FeatureGraph {
    features: Vec<Feature>,
    groups: Vec<ChoiceGroupId>,
    by_name: FxHashMap<String, FeatureId>,
    by_short_name: FxHashMap<String, FeatureId>,
}

impl FeatureGraph {
    /// Builds the arena.
    ///
    /// # Errors
    /// Returns [`GraphError::DuplicateFeature`] when two records share a full name.
    pub fn new(features: impl IntoIterator<Item = Feature>) -> Result<Self, GraphError> {
        let features: Vec<Feature> = features.into_iter().collect();
        let mut by_name = FxHashMap::default();
        let mut by_short_name = FxHashMap::default();

        for (index, feature) in features.iter().enumerate() {
            let id = FeatureId(u32::try_from(index).map_err(|_| GraphError::Internal {
                message: "Too many features for one graph".into(),
                context: None,
            })?);

            if by_name.insert(feature.name.clone(), id).is_some() {
                return Err(GraphError::DuplicateFeature {
                    name: feature.name.clone(),
                    context: Some("Building feature graph".into()),
                });
            }
            if let Some(short) = &feature.short_name
                && let Some(previous) = by_short_name.insert(short.clone(), id)
            {
                warn!(
                    short_name = %short,
                    kept = %feature.name,
                    dropped = %features[previous.index()].name,
                    "Short name shared by two features"
                );
            }
        }

        let groups = derive_groups(&features);
        debug!(features = features.len(), "Feature graph built");

        Ok(Self { features, groups, by_name, by_short_name })
    }

    /// Builds the arena from a loaded document.
    ///
    /// # Errors
    /// See [`FeatureGraph::new`].
    pub fn from_document(document: GraphDocument) -> Result<Self, GraphError> {
        Self::new(document.features)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Looks a feature up by full name, falling back to the short name.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<FeatureId> {
        self.by_name.get(name).or_else(|| self.by_short_name.get(name)).copied()
    }

    /// Like [`FeatureGraph::id`], failing for unknown names.
    ///
    /// # Errors
    /// Returns [`GraphError::MissingFeature`].
    pub fn require(&self, name: &str) -> Result<FeatureId, GraphError> {
        self.id(name).ok_or_else(|| GraphError::missing(name))
    }

    #[must_use]
    pub fn feature(&self, id: FeatureId) -> &Feature {
        &self.features[id.index()]
    }

    #[must_use]
    pub fn name(&self, id: FeatureId) -> &str {
        &self.feature(id).name
    }

    #[must_use]
    pub fn is_singleton(&self, id: FeatureId) -> bool {
        self.feature(id).singleton
    }

    #[must_use]
    pub fn visibility(&self, id: FeatureId) -> Visibility {
        self.feature(id).visibility
    }

    /// Choice group of the family `id` belongs to.
    #[must_use]
    pub fn group(&self, id: FeatureId) -> ChoiceGroupId {
        self.groups[id.index()].clone()
    }

    pub fn ids(&self) -> impl Iterator<Item = FeatureId> + '_ {
        (0..self.features.len()).filter_map(|i| u32::try_from(i).ok().map(FeatureId))
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureId, &Feature)> + '_ {
        self.ids().map(|id| (id, self.feature(id)))
    }

    pub fn edges(&self, id: FeatureId) -> impl Iterator<Item = Edge<'_>> + '_ {
        self.feature(id)
            .content_features
            .iter()
            .map(|(name, tolerates)| Edge { name, tolerates })
    }

    #[must_use]
    pub fn has_edges(&self, id: FeatureId) -> bool {
        !self.feature(id).content_features.is_empty()
    }

    /// Resolves the target of an edge.
    ///
    /// # Errors
    /// Returns [`GraphError::MissingFeature`] if the edge names an unknown feature.
    pub fn target(&self, edge: &Edge<'_>) -> Result<FeatureId, GraphError> {
        self.by_name.get(edge.name).copied().ok_or_else(|| GraphError::missing(edge.name))
    }

    /// Tolerated alternatives of an edge that exist in the graph, in declaration order.
    ///
    /// A tolerated version naming the preferred target itself is skipped.
    #[must_use]
    pub fn alternatives(&self, edge: &Edge<'_>) -> Vec<FeatureId> {
        let mut seen = FxHashSet::default();
        edge.tolerates
            .iter()
            .map(|version| sibling_version(edge.name, version))
            .filter(|name| name != edge.name)
            .filter_map(|name| self.by_name.get(&name).copied())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Every feature reachable from `roots` over edges and tolerated alternatives,
    /// roots included. Unknown edge targets are skipped.
    #[must_use]
    pub fn reachable(&self, roots: impl IntoIterator<Item = FeatureId>) -> BTreeSet<FeatureId> {
        let mut seen = BTreeSet::new();
        let mut stack: Vec<FeatureId> = roots.into_iter().collect();

        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            for edge in self.edges(id) {
                if let Ok(target) = self.target(&edge) {
                    stack.push(target);
                }
                stack.extend(self.alternatives(&edge));
            }
        }
        seen
    }
}

fn derive_groups(features: &[Feature]) -> Vec<ChoiceGroupId> {
    let mut public_families = FxHashSet::default();
    let mut singleton_families = FxHashSet::default();
    for feature in features.iter().filter(|f| f.singleton) {
        singleton_families.insert(feature.family());
        if !feature.visibility.is_private() {
            public_families.insert(feature.family());
        }
    }

    features
        .iter()
        .map(|feature| {
            let family = feature.family();
            let is_private = if singleton_families.contains(family) {
                !public_families.contains(family)
            } else {
                feature.visibility.is_private()
            };
            ChoiceGroupId::new(family, is_private)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> FeatureGraph {
        FeatureGraph::new([
            Feature::new("app-1.0").requires("db-1.0", ["2.0", "3.0", "1.0"]),
            Feature::new("db-1.0").singleton().short_name("db"),
            Feature::new("db-2.0").singleton().with_visibility(Visibility::Private),
        ])
        .unwrap()
    }

    #[test]
    fn alternatives_skip_unknown_and_self() {
        let graph = graph();
        let app = graph.require("app-1.0").unwrap();
        let edge = graph.edges(app).next().unwrap();
        let alternatives = graph.alternatives(&edge);
        assert_eq!(alternatives, vec![graph.require("db-2.0").unwrap()]);
    }

    #[test]
    fn mixed_family_is_public() {
        let graph = graph();
        let group = graph.group(graph.require("db-2.0").unwrap());
        assert!(!group.is_private);
        assert_eq!(&*group.prefix, "db");
        assert_eq!(group, graph.group(graph.require("db-1.0").unwrap()));
    }

    #[test]
    fn short_name_lookup() {
        let graph = graph();
        assert_eq!(graph.id("db"), graph.id("db-1.0"));
        assert!(graph.id("nope").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = FeatureGraph::new([Feature::new("a-1.0"), Feature::new("a-1.0")]).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateFeature { ref name, .. } if name == "a-1.0"));
    }
}
