use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Identifies a family of mutually exclusive singleton versions.
///
/// Only [`FeatureGraph::group`](crate::FeatureGraph::group) creates these, so a family
/// always maps to one id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ChoiceGroupId {
    pub prefix: Arc<str>,
    pub is_private: bool,
}

impl ChoiceGroupId {
    pub(crate) fn new(prefix: &str, is_private: bool) -> Self {
        Self { prefix: Arc::from(prefix), is_private }
    }
}

impl fmt::Display for ChoiceGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_private {
            write!(f, "{} (private)", self.prefix)
        } else {
            f.write_str(&self.prefix)
        }
    }
}
