//! Well-known names shared across crates.

/// Separator between a feature's family prefix and its version (`servlet-4.0`).
pub const VERSION_SEPARATOR: char = '-';

/// Filter attribute carrying the required capability type.
pub const TYPE_ATTRIBUTE: &str = "type";

/// Capability type that marks a trigger clause as a feature requirement.
pub const FEATURE_TYPE: &str = "osgi.subsystem.feature";

/// Filter attribute carrying the required feature name.
pub const IDENTITY_ATTRIBUTE: &str = "osgi.identity";

/// Name prefix of internal features that never seed a generation run.
pub const PROTECTED_PREFIX: &str = "protected";

/// Default configuration file stem (resolved as `fvgen.toml`, `fvgen.json`, ...).
pub const DEFAULT_CONFIG_FILE: &str = "fvgen";

/// Prefix for environment overrides (`FVGEN__GENERATION__IGNORED_FEATURES`).
pub const ENV_PREFIX: &str = "FVGEN";
