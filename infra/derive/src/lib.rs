#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the fvgen workspace.
//!
//! The only macro exported today is [`macro@fvgen_error`], which turns a plain enum into a
//! `thiserror`-backed error type with context support. Every crate in the workspace declares
//! its error enum through it, so error wiring (`?`, `.context(...)`, `Internal` fallbacks)
//! looks the same everywhere.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! fvgen-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source`
///   field (or a field marked `#[source]`/`#[from]`), enabling the `?` operator.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` when an
///   `Internal` variant is present.
/// * **Formatting helper**: Emits a module-private `format_context` function used by the
///   `#[error(...)]` strings.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Every variant must use named fields.
/// 3. Variants wrapping an upstream error must also carry
///    `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use fvgen_derive::fvgen_error;
/// use std::borrow::Cow;
///
/// #[fvgen_error]
/// pub enum LoadError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &str) -> Result<String, LoadError> {
///     std::fs::read_to_string(path).context("Reading graph document")
/// }
/// ```
#[proc_macro_attribute]
pub fn fvgen_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}
