use config::{Config, Environment, File};
use fvgen_domain::constants::{DEFAULT_CONFIG_FILE, ENV_PREFIX};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Custom error type for config loading.
#[fvgen_derive::fvgen_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: Loads settings from a file (e.g., `fvgen.toml`). An explicit path must
///    exist; without one, an optional `fvgen` file in the working directory is used.
/// 2. **Environment Overrides**: Overlays values from environment variables prefixed with `FVGEN__`.
///    Nested structures are accessed using double underscores (e.g.,
///    `FVGEN__GENERATION__INCLUDE_REACHABLE` maps to `generation.include_reachable`). Values
///    that parse as booleans or numbers are typed accordingly.
///
/// # Errors
/// This function will return an error if:
/// * An explicitly given configuration file cannot be found.
/// * The content of the file or the environment does not match the structure of type `T`.
///
/// # Example
/// ```rust
/// use fvgen_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     level: String,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_layers(path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true)
}

fn load_layers<T>(
    path: Option<impl AsRef<Path>>,
    environment: Environment,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let required = path.is_some();
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(environment);

    info!(path = %effective_path.display(), required, "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fvgen_domain::config::GeneratorConfig;
    use std::io::Write;

    fn file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn env(pairs: &[(&str, &str)]) -> Environment {
        let map: ::config::Map<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        environment().source(Some(map))
    }

    #[test]
    fn environment_overrides_file() {
        let file = file("[generation]\ninclude_reachable = true\n[logging]\nlevel = \"info\"\n");
        let cfg: GeneratorConfig = load_layers(
            Some(file.path()),
            env(&[
                ("FVGEN__GENERATION__INCLUDE_REACHABLE", "false"),
                ("FVGEN__LOGGING__LEVEL", "trace"),
            ]),
        )
        .unwrap();

        assert!(!cfg.generation.include_reachable);
        assert_eq!(cfg.logging.level, "trace");
    }

    #[test]
    fn unrelated_variables_are_ignored() {
        let file = file("[logging]\njson = true\n");
        let cfg: GeneratorConfig =
            load_layers(Some(file.path()), env(&[("OTHER__LOGGING__JSON", "false")])).unwrap();
        assert!(cfg.logging.json);
    }
}
