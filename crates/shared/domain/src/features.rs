use crate::constants::VERSION_SEPARATOR;
use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Who may list a feature directly in a server configuration.
///
/// Manifests that omit the header are private, so that is the default.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    #[default]
    Private,
}

impl Visibility {
    #[must_use]
    pub const fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }

    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        })
    }
}

bitflags! {
    /// Kinds a feature can have at the same time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct FeatureKind: u8 {
        const SINGLETON = 1 << 0;
        const AUTO = 1 << 1;
        const TEST = 1 << 2;
    }
}

impl From<&str> for FeatureKind {
    fn from(s: &str) -> Self {
        match s.trim() {
            "singleton" => Self::SINGLETON,
            "auto" => Self::AUTO,
            "test" => Self::TEST,
            "all" | "*" => Self::all(),
            _ => Self::empty(),
        }
    }
}

impl Serialize for FeatureKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.iter_names()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect::<Vec<_>>()
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FeatureKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        Ok(names.iter().fold(Self::empty(), |acc, n| acc | Self::from(n.as_str())))
    }
}

/// One feature record, already parsed from its manifest.
///
/// `content_features` maps every required feature name to the version suffixes that edge
/// additionally tolerates, e.g. `"servlet-3.1" -> ["4.0"]` also accepts `servlet-4.0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub singleton: bool,
    #[serde(default)]
    pub auto_feature: bool,
    #[serde(default)]
    pub test_feature: bool,
    /// Trigger filter of an auto feature (`(&(type=osgi.subsystem.feature)(osgi.identity=a))`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<String>,
    #[serde(default)]
    pub content_features: BTreeMap<String, Vec<String>>,
}

impl Feature {
    /// Creates a public, non-singleton feature with no content.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_name: None,
            visibility: Visibility::Public,
            singleton: false,
            auto_feature: false,
            test_feature: false,
            triggers: None,
            content_features: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub const fn singleton(mut self) -> Self {
        self.singleton = true;
        self
    }

    #[must_use]
    pub fn auto(mut self, triggers: impl Into<String>) -> Self {
        self.auto_feature = true;
        self.triggers = Some(triggers.into());
        self
    }

    #[must_use]
    pub const fn test(mut self) -> Self {
        self.test_feature = true;
        self
    }

    #[must_use]
    pub fn short_name(mut self, short: impl Into<String>) -> Self {
        self.short_name = Some(short.into());
        self
    }

    /// Adds a required feature; `tolerates` lists extra version suffixes for that edge.
    #[must_use]
    pub fn requires<I, S>(mut self, name: impl Into<String>, tolerates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_features.insert(name.into(), tolerates.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn kind(&self) -> FeatureKind {
        let mut kind = FeatureKind::empty();
        kind.set(FeatureKind::SINGLETON, self.singleton);
        kind.set(FeatureKind::AUTO, self.auto_feature);
        kind.set(FeatureKind::TEST, self.test_feature);
        kind
    }

    /// Family prefix shared by every version of this feature (`foo-1.0` -> `foo`).
    #[must_use]
    pub fn family(&self) -> &str {
        family_of(&self.name)
    }
}

/// Family prefix of a feature name: everything before the last version separator.
#[must_use]
pub fn family_of(name: &str) -> &str {
    name.rsplit_once(VERSION_SEPARATOR).map_or(name, |(prefix, _)| prefix)
}

/// Name of the `version` member of the family `name` belongs to (`foo-1.0`, `2.0` -> `foo-2.0`).
#[must_use]
pub fn sibling_version(name: &str, version: &str) -> String {
    format!("{}{VERSION_SEPARATOR}{}", family_of(name), version.trim())
}

/// The feature list handed over by the manifest loader.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub features: Vec<Feature>,
}
