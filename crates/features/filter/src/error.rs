use std::borrow::Cow;

/// A specialized [`FilterError`] enum of this crate.
///
/// `position` is a byte offset into the filter text.
#[fvgen_derive::fvgen_error]
#[derive(Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Negation is not supported at byte {position}{}", format_context(.context))]
    Negation { position: usize, context: Option<Cow<'static, str>> },
    #[error("Unbalanced parentheses at byte {position}{}", format_context(.context))]
    Unbalanced { position: usize, context: Option<Cow<'static, str>> },
    #[error("Malformed filter at byte {position}{}: {message}", format_context(.context))]
    Malformed { position: usize, message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("Unexpected trailing input at byte {position}{}", format_context(.context))]
    Trailing { position: usize, context: Option<Cow<'static, str>> },
    /// An AND-group does not carry `type=osgi.subsystem.feature`.
    #[error("Clause set {index} is missing the feature type marker{}", format_context(.context))]
    MissingTypeMarker { index: usize, context: Option<Cow<'static, str>> },
}

impl FilterError {
    pub(crate) fn malformed(position: usize, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Malformed { position, message: message.into(), context: None }
    }

    /// Byte offset of the problem, if it has one.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::Negation { position, .. }
            | Self::Unbalanced { position, .. }
            | Self::Malformed { position, .. }
            | Self::Trailing { position, .. } => Some(*position),
            Self::MissingTypeMarker { .. } => None,
        }
    }
}
