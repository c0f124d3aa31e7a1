use std::borrow::Cow;

/// Fatal outcomes of [`pack`](crate::pack::pack).
#[fvgen_derive::fvgen_error]
pub enum PackError {
    /// A configuration would leave a binding non-preferred.
    #[error("Packing invariant violated{}: {message}", format_context(.context))]
    Invariant { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal packing error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
