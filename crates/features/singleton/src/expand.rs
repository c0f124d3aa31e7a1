use crate::choice::{Bindings, Choice};
use crate::error::{SingletonError, SingletonErrorExt};
use crate::merge::merge;
use crate::variant::{ResolvedVariant, UnresolvedVariant};
use fvgen_graph::{Edge, FeatureGraph, FeatureId};
use fxhash::FxHashSet;
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Enumerates every legal variant of `root`.
///
/// Open choices on the root's own singleton edges are enumerated exhaustively. Below the
/// root, a group already decided above is followed as decided; an undecided private group
/// forks into its preferred version and every tolerated alternative; an undecided public
/// group only takes the preferred version.
///
/// # Errors
/// Returns [`SingletonError::Graph`] when an edge names a feature absent from the graph.
pub fn expand(
    graph: &FeatureGraph,
    root: FeatureId,
) -> Result<BTreeSet<ResolvedVariant>, SingletonError> {
    let mut expander = Expander { graph, path: FxHashSet::default() };
    let variants = expander.root(root)?;
    debug!(root = graph.name(root), variants = variants.len(), "Expanded feature");
    Ok(variants)
}

struct Expander<'g> {
    graph: &'g FeatureGraph,
    path: FxHashSet<FeatureId>,
}

impl Expander<'_> {
    fn root(&mut self, root: FeatureId) -> Result<BTreeSet<ResolvedVariant>, SingletonError> {
        let unresolved = UnresolvedVariant::of(self.graph, root)
            .context(format!("Expanding {}", self.graph.name(root)))?;

        let mut out = BTreeSet::new();
        for mut permutation in unresolved.permutations() {
            if self.graph.is_singleton(root) {
                let own = Choice::preferred(self.graph, root);
                permutation.insert(own.group.clone(), own);
            }
            trace!(root = self.graph.name(root), bindings = permutation.len(), "Root permutation");
            out.extend(self.node(root, &permutation)?);
        }
        Ok(out)
    }

    /// Expands `id` under `constraints`, which are already narrowed to what `id` recognizes.
    fn node(
        &mut self,
        id: FeatureId,
        constraints: &Bindings,
    ) -> Result<BTreeSet<ResolvedVariant>, SingletonError> {
        let ancestor = ResolvedVariant::new(id, constraints.clone());
        if !self.graph.has_edges(id) || self.path.contains(&id) {
            return Ok(BTreeSet::from([ancestor]));
        }

        self.path.insert(id);
        let branches = self.branches(id, constraints);
        self.path.remove(&id);

        Ok(merge(&ancestor, &branches?))
    }

    fn branches(
        &mut self,
        id: FeatureId,
        constraints: &Bindings,
    ) -> Result<Vec<BTreeSet<ResolvedVariant>>, SingletonError> {
        let graph = self.graph;
        let mut branches = Vec::new();

        if graph.is_singleton(id) {
            let group = graph.group(id);
            let own =
                constraints.get(&group).cloned().unwrap_or_else(|| Choice::preferred(graph, id));
            let own = ResolvedVariant::new(id, Bindings::from([(group, own)]));
            branches.push(BTreeSet::from([own]));
        }

        for edge in graph.edges(id) {
            branches.push(self.branch(id, &edge, constraints)?);
        }
        Ok(branches)
    }

    fn branch(
        &mut self,
        parent: FeatureId,
        edge: &Edge<'_>,
        constraints: &Bindings,
    ) -> Result<BTreeSet<ResolvedVariant>, SingletonError> {
        let graph = self.graph;
        let target = graph.target(edge).context(format!("Expanding {}", graph.name(parent)))?;

        if !graph.is_singleton(target) {
            let narrowed = self.narrow(target, constraints, None)?;
            return self.node(target, &narrowed);
        }

        let group = graph.group(target);
        let alternatives = graph.alternatives(edge);

        if let Some(chosen) = constraints.get(&group) {
            if chosen.feature != target && !alternatives.contains(&chosen.feature) {
                trace!(
                    parent = graph.name(parent),
                    edge = edge.name,
                    chosen = graph.name(chosen.feature),
                    "Edge cannot reach the chosen feature"
                );
                return Ok(BTreeSet::new());
            }
            let narrowed = self.narrow(chosen.feature, constraints, Some(chosen.clone()))?;
            return self.node(chosen.feature, &narrowed);
        }

        let preferred = Choice::preferred(graph, target);
        let narrowed = self.narrow(target, constraints, Some(preferred))?;
        let mut out = self.node(target, &narrowed)?;

        if group.is_private {
            for alternative in alternatives {
                let tolerated = Choice::tolerated(graph, alternative);
                let narrowed = self.narrow(alternative, constraints, Some(tolerated))?;
                out.extend(self.node(alternative, &narrowed)?);
            }
        }
        Ok(out)
    }

    /// Keeps the constraints `child` recognizes: the groups of its own singleton edges, and
    /// its own group bound to `own`.
    fn narrow(
        &self,
        child: FeatureId,
        constraints: &Bindings,
        own: Option<Choice>,
    ) -> Result<Bindings, SingletonError> {
        let recognized = UnresolvedVariant::of(self.graph, child)
            .context(format!("Expanding {}", self.graph.name(child)))?;

        let mut narrowed: Bindings = recognized
            .groups()
            .filter_map(|group| constraints.get(group).map(|c| (group.clone(), c.clone())))
            .collect();
        if let Some(own) = own {
            narrowed.insert(own.group.clone(), own);
        }
        Ok(narrowed)
    }
}
