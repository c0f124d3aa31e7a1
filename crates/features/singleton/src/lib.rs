//! # Singleton Resolution
//!
//! Turns a feature graph into the smallest set of test configurations that still covers
//! every legal combination of singleton versions.
//!
//! ## Pipeline
//!
//! 1. [`expand`] enumerates the [`ResolvedVariant`]s of one root feature. Open choices on
//!    the root's own singleton edges are enumerated; below the root, private families fork
//!    over their tolerated alternatives while public ones stay on the preferred version.
//! 2. [`merge`] folds the branch results of a node together, keeping only variants that
//!    agree with their siblings and with what the ancestor already decided.
//! 3. [`pack`] bin-packs the candidate variants into [`Configuration`]s, repairs leftovers
//!    with helpers from a wider pool, merges compatible buckets and backfills every
//!    tolerated binding with a pool variant that prefers it.
//!
//! [`generate`] runs the pipeline for a list of requested features and
//! [`validate_triggers`] checks auto feature triggers against its output.
//!
//! ```rust
//! use fvgen_domain::config::GenerationConfig;
//! use fvgen_domain::features::Feature;
//! use fvgen_graph::FeatureGraph;
//! use fvgen_singleton::generate;
//!
//! let graph = FeatureGraph::new([
//!     Feature::new("p-1.0").requires("s-1.0", Vec::<String>::new()),
//!     Feature::new("q-1.0").requires("s-2.0", Vec::<String>::new()),
//!     Feature::new("s-1.0").singleton(),
//!     Feature::new("s-2.0").singleton(),
//! ])
//! .unwrap();
//!
//! let outcome = generate(&graph, &["p-1.0", "q-1.0"], &GenerationConfig::default()).unwrap();
//! assert_eq!(outcome.configurations.len(), 2);
//! ```

pub mod choice;
pub mod configuration;
mod error;
pub mod expand;
pub mod generator;
pub mod merge;
pub mod pack;
pub mod triggers;
pub mod variant;

pub use crate::choice::{Bindings, Choice, ChoiceGroupId};
pub use crate::configuration::Configuration;
pub use crate::error::{PackError, PackErrorExt, SingletonError, SingletonErrorExt};
pub use crate::expand::expand;
pub use crate::generator::{GenerationOutcome, PermutationSets, generate};
pub use crate::merge::merge;
pub use crate::pack::{PackOutcome, pack};
pub use crate::triggers::{TriggerReport, validate_trigger, validate_triggers};
pub use crate::variant::{ResolvedVariant, UnresolvedVariant};

pub type Result<T> = std::result::Result<T, SingletonError>;
