//! # Trigger Filters
//!
//! Parses the LDAP-style filters auto features use as triggers,
//! `(&(type=osgi.subsystem.feature)(osgi.identity=servlet-4.0))`, into disjunctive normal
//! form: a list of clause sets where each set is an AND-group and the list is an OR.
//!
//! Only `(attr=value)`, `(&...)` and `(|...)` are understood. Negation and the ordering or
//! approximate operators are reported as errors. Every problem found in one input is
//! returned together, each carrying the byte offset it was found at.
//!
//! ```rust
//! use fvgen_filter::required_features;
//!
//! let sets = required_features(
//!     "(|(&(type=osgi.subsystem.feature)(osgi.identity=a-1.0))\
//!        (&(type=osgi.subsystem.feature)(osgi.identity=b-1.0)))",
//! )
//! .unwrap();
//! assert_eq!(sets.len(), 2);
//! assert!(sets[0].contains("a-1.0"));
//! ```

mod dnf;
mod error;
mod parser;

pub use crate::dnf::{Clause, ClauseSet, required_features};
pub use crate::error::{FilterError, FilterErrorExt};
pub use crate::parser::parse;
