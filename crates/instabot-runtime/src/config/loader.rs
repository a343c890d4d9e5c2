//! Layered configuration loading.
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. Programmatic overrides passed to [`ConfigLoader::merge`]
//! 3. Main file (`instabot.toml`, `config.toml`, `instabot.yaml`, ...)
//! 4. Profile overlay next to it (`instabot.{profile}.toml`)
//! 5. `INSTABOT_*` environment variables
//!
//! Nested keys are separated by `__`:
//!
//! - `INSTABOT_CLIENT__ACCESS_TOKEN=EAAG...` → `client.access_token`
//! - `INSTABOT_LOGGING__LEVEL=debug` → `logging.level`
//!
//! File formats are gated by the `toml-config` *(default)* and `yaml-config`
//! features.
//!
//! ```rust,ignore
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .file("./deploy/instabot.toml")
//!     .load()?;
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::InstabotConfig;

const ENV_PREFIX: &str = "INSTABOT_";
const PROFILE_VAR: &str = "INSTABOT_PROFILE";
const APP_DIR: &str = "instabot";

#[cfg(feature = "toml-config")]
const TOML_NAMES: &[&str] = &["instabot.toml", "config.toml"];
#[cfg(feature = "yaml-config")]
const YAML_NAMES: &[&str] = &["instabot.yaml", "instabot.yml", "config.yaml", "config.yml"];

/// Deployment profile, selects `instabot.{profile}.*` overlay files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Development,
    Production,
    Custom(String),
}

impl Profile {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Reads `INSTABOT_PROFILE`, falling back to development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_VAR)
            .map(|name| Self::parse(&name))
            .unwrap_or_default()
    }

    fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder over a [`Figment`] that resolves an [`InstabotConfig`].
pub struct ConfigLoader {
    overrides: Figment,
    profile: Profile,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            overrides: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a directory to search. When none are given, the current
    /// directory and `<config dir>/instabot` are searched.
    pub fn search_path(mut self, path: impl AsRef<Path>) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Loads exactly this file instead of searching. It must exist.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Layers `config` over the defaults, below files and the environment.
    pub fn merge(mut self, config: InstabotConfig) -> Self {
        self.overrides = self.overrides.merge(Serialized::defaults(config));
        self
    }

    /// Resolves every source and validates the result.
    pub fn load(self) -> ConfigResult<InstabotConfig> {
        let profile = self.profile.clone();
        let config: InstabotConfig = self.build_figment()?.extract()?;
        config.validate()?;

        debug!(
            profile = %profile,
            api_version = %config.client.api_version,
            logging_level = %config.logging.level,
            "Configuration loaded"
        );

        Ok(config)
    }

    fn build_figment(mut self) -> ConfigResult<Figment> {
        let overrides = std::mem::take(&mut self.overrides);
        let mut figment =
            Figment::from(Serialized::defaults(InstabotConfig::default())).merge(overrides);

        figment = match &self.config_file {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "Loading configuration file");
                merge_file(figment, path)?
            }
            Some(path) => return Err(ConfigError::FileNotFound(path.clone())),
            None => self.search_files(figment),
        };

        if self.load_env {
            trace!(prefix = ENV_PREFIX, "Loading environment variables");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        Ok(figment)
    }

    fn resolved_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        std::env::current_dir()
            .ok()
            .into_iter()
            .chain(dirs::config_dir().map(|dir| dir.join(APP_DIR)))
            .collect()
    }

    /// Merges the first main file found for each enabled format, followed by
    /// its profile overlay when one sits next to it.
    fn search_files(&self, mut figment: Figment) -> Figment {
        let search_paths = self.resolved_search_paths();
        let mut found = false;

        #[cfg(feature = "toml-config")]
        if let Some(path) = first_existing(&search_paths, TOML_NAMES) {
            figment = self.merge_with_profile(figment, &path, |f, p| f.merge(Toml::file(p)));
            found = true;
        }

        #[cfg(feature = "yaml-config")]
        if let Some(path) = first_existing(&search_paths, YAML_NAMES) {
            figment = self.merge_with_profile(figment, &path, |f, p| f.merge(Yaml::file(p)));
            found = true;
        }

        if !found {
            warn!("No configuration file found, using defaults");
        }
        figment
    }

    #[cfg(any(feature = "toml-config", feature = "yaml-config"))]
    fn merge_with_profile(
        &self,
        figment: Figment,
        path: &Path,
        merge: impl Fn(Figment, &Path) -> Figment,
    ) -> Figment {
        info!(path = %path.display(), "Loading configuration file");
        let figment = merge(figment, path);

        match profile_variant(path, &self.profile) {
            Some(overlay) if overlay.exists() => {
                debug!(path = %overlay.display(), "Loading profile configuration");
                merge(figment, &overlay)
            }
            _ => figment,
        }
    }
}

/// Loads from the default locations.
pub fn load_config() -> ConfigResult<InstabotConfig> {
    ConfigLoader::new().load()
}

/// Loads `path` plus the environment.
pub fn load_config_from_file(path: impl AsRef<Path>) -> ConfigResult<InstabotConfig> {
    ConfigLoader::new().file(path).load()
}

fn merge_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        #[cfg(feature = "toml-config")]
        "toml" => Ok(figment.merge(Toml::file(path))),
        #[cfg(feature = "yaml-config")]
        "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
        _ => Err(ConfigError::ParseError(format!(
            "unsupported or disabled configuration format: .{ext}"
        ))),
    }
}

#[cfg(any(feature = "toml-config", feature = "yaml-config"))]
fn first_existing(search_paths: &[PathBuf], names: &[&str]) -> Option<PathBuf> {
    search_paths
        .iter()
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// `dir/instabot.toml` → `dir/instabot.{profile}.toml`
#[cfg(any(feature = "toml-config", feature = "yaml-config"))]
fn profile_variant(path: &Path, profile: &Profile) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_str()?;
    let ext = path.extension()?.to_str()?;
    Some(path.with_file_name(format!("{stem}.{}.{ext}", profile.as_str())))
}
