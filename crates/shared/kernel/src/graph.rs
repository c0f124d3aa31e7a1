use fvgen_domain::features::GraphDocument;
use fvgen_graph::{FeatureGraph, GraphError};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Errors raised while reading a feature graph document.
#[fvgen_derive::fvgen_error]
pub enum LoadError {
    #[error("Failed to read graph document{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },
    #[error("Invalid JSON graph document{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },
    #[error("Invalid TOML graph document{}: {source}", format_context(.context))]
    Toml { source: toml::de::Error, context: Option<Cow<'static, str>> },
    #[error("Inconsistent feature graph{}: {source}", format_context(.context))]
    Graph { source: GraphError, context: Option<Cow<'static, str>> },
    #[error("Unsupported graph document format{}: {}", format_context(.context), .path.display())]
    UnsupportedFormat { path: PathBuf, context: Option<Cow<'static, str>> },
}

/// On-disk encodings of a [`GraphDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Picks the format from the file extension, case-insensitively.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Decodes a graph document from `text`.
///
/// # Errors
/// Returns [`LoadError::Json`] or [`LoadError::Toml`] when `text` does not decode.
pub fn parse_document(text: &str, format: DocumentFormat) -> Result<GraphDocument, LoadError> {
    let document = match format {
        DocumentFormat::Json => serde_json::from_str(text)?,
        DocumentFormat::Toml => toml::from_str(text)?,
    };
    Ok(document)
}

/// Reads the document at `path` and builds the graph from it.
///
/// # Errors
/// Fails when the file cannot be read, its extension is neither `json` nor `toml`, the
/// content does not decode, or the records do not form a consistent graph.
pub fn load_graph(path: impl AsRef<Path>) -> Result<FeatureGraph, LoadError> {
    let path = path.as_ref();
    let Some(format) = DocumentFormat::from_path(path) else {
        return Err(LoadError::UnsupportedFormat { path: path.to_path_buf(), context: None });
    };

    let origin = format!("Loading {}", path.display());
    let text = fs::read_to_string(path).context(origin.clone())?;
    debug!(path = %path.display(), ?format, bytes = text.len(), "Graph document read");

    let document = parse_document(&text, format).context(origin.clone())?;
    let graph = FeatureGraph::from_document(document).context(origin)?;

    info!(path = %path.display(), features = graph.len(), "Feature graph loaded");
    Ok(graph)
}
