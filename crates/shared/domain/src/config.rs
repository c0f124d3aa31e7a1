use crate::constants::PROTECTED_PREFIX;
use crate::features::FeatureKind;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level generator configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfigInner {
    pub generation: GenerationConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config, cloned into every command handler.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    #[serde(flatten, default)]
    inner: Arc<GeneratorConfigInner>,
}

impl Deref for GeneratorConfig {
    type Target = GeneratorConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for GeneratorConfig {
    fn deref_mut(&mut self) -> &mut GeneratorConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

impl From<GeneratorConfigInner> for GeneratorConfig {
    fn from(inner: GeneratorConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

/// Knobs for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GenerationConfig {
    /// Features never used as roots or candidates, whatever the request says.
    pub ignored_features: BTreeSet<String>,
    /// Feature kinds skipped when picking roots.
    pub exclude: FeatureKind,
    /// Whether candidates reachable from the requested roots are expanded too.
    pub include_reachable: bool,
}

impl GenerationConfig {
    /// Returns `true` if `name` with `kind` may seed a generation run.
    ///
    /// Names starting with [`PROTECTED_PREFIX`] never do.
    #[must_use]
    pub fn admits(&self, name: &str, kind: FeatureKind) -> bool {
        !name.starts_with(PROTECTED_PREFIX)
            && !self.ignored_features.contains(name)
            && !kind.intersects(self.exclude)
    }
}

/// Logging output settings; CLI flags take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            ignored_features: BTreeSet::new(),
            exclude: FeatureKind::AUTO | FeatureKind::TEST,
            include_reachable: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_owned(), directory: None, json: false }
    }
}
