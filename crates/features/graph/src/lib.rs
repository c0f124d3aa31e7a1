//! # Feature Graph
//!
//! Immutable description of the features taking part in a run.
//!
//! Features live in an arena and are addressed by [`FeatureId`]. Lookups accept either the
//! full name (`servlet-4.0`) or the short name (`servlet`). Edges keep the required name as
//! written, so a reference to a feature missing from the graph surfaces only when something
//! actually walks that edge.
//!
//! The graph is also the single place that derives a [`ChoiceGroupId`]: a family
//! (`servlet-*`) is private iff every singleton member of the family is private.
//!
//! ```rust
//! use fvgen_domain::features::{Feature, Visibility};
//! use fvgen_graph::FeatureGraph;
//!
//! let graph = FeatureGraph::new([
//!     Feature::new("app-1.0").requires("db-1.0", ["2.0"]),
//!     Feature::new("db-1.0").singleton().with_visibility(Visibility::Private),
//!     Feature::new("db-2.0").singleton().with_visibility(Visibility::Private),
//! ])
//! .unwrap();
//!
//! let app = graph.require("app-1.0").unwrap();
//! let edge = graph.edges(app).next().unwrap();
//! assert_eq!(graph.alternatives(&edge).len(), 1);
//! assert!(graph.group(graph.require("db-2.0").unwrap()).is_private);
//! ```

mod error;
mod graph;
mod group;

pub use crate::error::{GraphError, GraphErrorExt};
pub use crate::graph::{Edge, FeatureGraph, FeatureId};
pub use crate::group::ChoiceGroupId;

pub type Result<T> = std::result::Result<T, GraphError>;
