mod pack;

pub use pack::{PackError, PackErrorExt};

use fvgen_graph::GraphError;
use std::borrow::Cow;

/// A specialized [`SingletonError`] enum of this crate.
#[fvgen_derive::fvgen_error]
pub enum SingletonError {
    /// The graph is inconsistent with what the expander walked.
    #[error("Graph error{}: {source}", format_context(.context))]
    Graph { source: GraphError, context: Option<Cow<'static, str>> },
    /// Packing broke one of its own invariants.
    #[error("Packing failed{}: {source}", format_context(.context))]
    Pack { source: PackError, context: Option<Cow<'static, str>> },
    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal singleton error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
