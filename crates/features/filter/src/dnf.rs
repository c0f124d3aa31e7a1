use crate::error::FilterError;
use crate::parser::parse;
use fvgen_domain::constants::{FEATURE_TYPE, IDENTITY_ATTRIBUTE, TYPE_ATTRIBUTE};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// One `attribute=value` comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Clause {
    pub attribute: String,
    pub value: String,
}

/// An AND-group of clauses.
pub type ClauseSet = BTreeSet<Clause>;

pub(crate) type Dnf = Vec<ClauseSet>;

/// AND of DNF children: every combination of one set from each child.
pub(crate) fn and(children: Vec<Dnf>) -> Dnf {
    children.into_iter().fold(vec![ClauseSet::new()], |acc, child| {
        let mut product = Vec::with_capacity(acc.len() * child.len());
        for left in &acc {
            for right in &child {
                push_unique(&mut product, left.union(right).cloned().collect());
            }
        }
        product
    })
}

/// OR of DNF children: the concatenation, without repeats.
pub(crate) fn or(children: Vec<Dnf>) -> Dnf {
    let mut out = Vec::new();
    for set in children.into_iter().flatten() {
        push_unique(&mut out, set);
    }
    out
}

fn push_unique(out: &mut Dnf, set: ClauseSet) {
    if !out.contains(&set) {
        out.push(set);
    }
}

/// Parses a trigger filter and reduces every AND-group to the feature names it requires.
///
/// Each group must carry `type=osgi.subsystem.feature`; other attributes are ignored.
///
/// # Errors
/// Parse errors, plus one [`FilterError::MissingTypeMarker`] per group without the marker.
pub fn required_features(input: &str) -> Result<Vec<BTreeSet<String>>, Vec<FilterError>> {
    let dnf = parse(input)?;
    let mut errors = Vec::new();
    let mut required = Vec::with_capacity(dnf.len());

    for (index, set) in dnf.iter().enumerate() {
        let typed = set.iter().any(|c| c.attribute == TYPE_ATTRIBUTE && c.value == FEATURE_TYPE);
        if !typed {
            errors.push(FilterError::MissingTypeMarker { index, context: None });
            continue;
        }
        required.push(
            set.iter()
                .filter(|c| c.attribute == IDENTITY_ATTRIBUTE)
                .map(|c| c.value.clone())
                .collect(),
        );
    }

    if errors.is_empty() {
        Ok(required)
    } else {
        debug!(input, errors = errors.len(), "Trigger filter rejected");
        Err(errors)
    }
}
