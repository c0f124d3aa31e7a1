use std::borrow::Cow;

/// A specialized [`GraphError`] enum of this crate.
#[fvgen_derive::fvgen_error]
pub enum GraphError {
    /// A name referenced by a lookup or an edge is not part of the graph.
    #[error("Missing feature{}: {name}", format_context(.context))]
    MissingFeature { name: String, context: Option<Cow<'static, str>> },
    /// Two records share the same full name.
    #[error("Duplicate feature{}: {name}", format_context(.context))]
    DuplicateFeature { name: String, context: Option<Cow<'static, str>> },
    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal graph error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl GraphError {
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingFeature { name: name.into(), context: None }
    }
}
