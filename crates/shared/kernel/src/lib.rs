//! Kernel utilities shared by the fvgen front ends.
//! Keep this crate lightweight; it only turns files and environment variables into domain
//! values.
//!
//! ## Config loading
//! ```rust,no_run
//! use fvgen_domain::config::GeneratorConfig;
//! use fvgen_kernel::config::load_config;
//!
//! let cfg: GeneratorConfig = load_config(Some("fvgen.toml")).unwrap();
//! assert!(cfg.generation.include_reachable);
//! ```
//!
//! ## Graph loading
//! ```rust,no_run
//! use fvgen_kernel::graph::load_graph;
//!
//! let graph = load_graph("features.json").unwrap();
//! println!("{} features", graph.len());
//! ```
pub mod config;
pub mod graph;

pub use fvgen_domain as domain;
