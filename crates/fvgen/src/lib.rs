//! Facade crate for the fvgen feature slices and shared modules.
//! Re-exports domain/kernel primitives and the resolution pipeline.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! ```rust,no_run
//! use fvgen::domain::config::GeneratorConfig;
//! use fvgen::kernel::{config::load_config, graph::load_graph};
//!
//! let config: GeneratorConfig = load_config(None::<&str>).unwrap();
//! let graph = load_graph("features.json").unwrap();
//! let outcome = fvgen::generate(&graph, &["servlet-4.0"], &config.generation).unwrap();
//! println!("{} configurations", outcome.configurations.len());
//! ```

pub use fvgen_domain as domain;
pub use fvgen_kernel as kernel;

pub use fvgen_graph::{FeatureGraph, FeatureId};
pub use fvgen_singleton::{
    Configuration, GenerationOutcome, ResolvedVariant, TriggerReport, expand, generate,
    validate_triggers,
};

/// Feature registry for runtime introspection.
pub mod features {
    pub use fvgen_filter as filter;
    pub use fvgen_graph as graph;
    pub use fvgen_singleton as singleton;

    /// Slices compiled into this build.
    pub const ENABLED: &[&str] = &["graph", "filter", "singleton"];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}
