use crate::choice::{bind, union};
use crate::variant::ResolvedVariant;
use std::collections::BTreeSet;

/// Combines the branch results of one node into variants of `ancestor.feature`.
///
/// Each result takes one candidate per branch. Candidates must be accepted by the ancestor
/// and agree with each other; their bindings are unioned with preferred choices winning,
/// then the ancestor's own bindings are folded in. Any empty branch empties the result.
#[must_use]
pub fn merge(
    ancestor: &ResolvedVariant,
    branches: &[BTreeSet<ResolvedVariant>],
) -> BTreeSet<ResolvedVariant> {
    if branches.iter().any(BTreeSet::is_empty) {
        return BTreeSet::new();
    }
    if branches.is_empty() {
        return BTreeSet::from([ancestor.clone()]);
    }

    merge_from(ancestor, branches, 0)
        .into_iter()
        .map(|mut merged| {
            for choice in ancestor.bindings.values() {
                bind(&mut merged.bindings, choice);
            }
            merged
        })
        .collect()
}

fn merge_from(
    ancestor: &ResolvedVariant,
    branches: &[BTreeSet<ResolvedVariant>],
    depth: usize,
) -> BTreeSet<ResolvedVariant> {
    let local = branches[depth].iter().filter(|candidate| ancestor.accepts_descendant(candidate));

    if depth + 1 == branches.len() {
        return local.map(|candidate| candidate.rebased(ancestor.feature)).collect();
    }

    let deeper = merge_from(ancestor, branches, depth + 1);
    let mut out = BTreeSet::new();
    for candidate in local {
        for rest in deeper.iter().filter(|rest| candidate.agrees_with(rest)) {
            out.insert(ResolvedVariant::new(
                ancestor.feature,
                union(&candidate.bindings, &rest.bindings),
            ));
        }
    }
    out
}
