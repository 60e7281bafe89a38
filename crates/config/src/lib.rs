//! Manages application configuration by loading settings from standard locations.
//!
//! This crate provides a unified configuration object (`Config`) that aggregates
//! settings from files and environment variables, making them accessible
//! globally via a lazily initialized static reference (`CONFIG`).

use std::path::PathBuf;
use std::sync::LazyLock;

use etcetera::BaseStrategy;
use figment::providers::{Env, Format, Toml};
use figment::{Figment, Metadata, Provider};
use serde::{Deserialize, Serialize};

/// The default configuration values
const DEFAULT_TOML_CONFIG: &str = include_str!("./localrepo.default.toml");

/// Name of the per-project configuration file, looked up in the working directory.
pub const PROJECT_CONFIG_NAME: &str = ".localrepo.toml";

/// Prefix of the environment variables merged last into the configuration.
pub const ENV_PREFIX: &str = "LOCALREPO_";

//================================================================================================
// Statics
//================================================================================================

/// Provides a lazily instantiated static reference to the application `Config`.
///
/// This static variable ensures that configuration is parsed only once from
/// canonical locations and then made immutably available throughout the
/// application's lifecycle.
pub static CONFIG: LazyLock<Config> = LazyLock::new(load_config);

//================================================================================================
// Types
//================================================================================================

/// Settings describing how per-version manifests are named and defaulted.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ManifestConfig {
    /// Literal file name prefix, `composer` in `composer.1.0.0.json`.
    pub prefix: String,
    /// Literal file name suffix, `json` in `composer.1.0.0.json`.
    pub suffix: String,
    /// Value given to the `type` field of manifests that omit it.
    pub default_type: String,
}

/// Represents the application's primary configuration structure.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory the index is written to; relative paths resolve against the project root.
    pub output: PathBuf,
    /// Manifest discovery settings.
    pub manifest: ManifestConfig,
}

//================================================================================================
// Impls
//================================================================================================

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            prefix: "composer".into(),
            suffix: "json".into(),
            default_type: "metapackage".into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from("build/local-repository"),
            manifest: ManifestConfig::default(),
        }
    }
}

impl Config {
    /// Constructs a `Figment` instance for configuration loading.
    ///
    /// This method builds a configuration provider by layering default settings,
    /// user-specific configuration files, the project configuration file and
    /// environment variables. Nested keys are separated by `__` in the
    /// environment, e.g. `LOCALREPO_MANIFEST__DEFAULT_TYPE`.
    pub fn figment() -> Figment {
        let mut fig = Figment::from(Config::default()).merge(Toml::string(DEFAULT_TOML_CONFIG));

        if let Ok(c) = etcetera::choose_base_strategy() {
            let config = c.config_dir().join("localrepo.toml");
            fig = fig.admerge(Toml::file(config));
        }

        fig.admerge(Toml::file(PROJECT_CONFIG_NAME))
            .admerge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

impl Provider for Config {
    fn metadata(&self) -> figment::Metadata {
        Metadata::named("localrepo Config")
    }

    fn data(
        &self,
    ) -> Result<figment::value::Map<figment::Profile, figment::value::Dict>, figment::Error> {
        figment::providers::Serialized::defaults(self).data()
    }
}

//================================================================================================
// Functions
//================================================================================================

/// Loads the application configuration using the default `Figment` provider.
///
/// This function is used to initialize the `CONFIG` static variable.
fn load_config() -> Config {
    Config::figment().extract().unwrap_or_else(|e| {
        tracing::error!(error = %e, "problem loading config from default sources, falling back to built-in defaults");
        Config::default()
    })
}
