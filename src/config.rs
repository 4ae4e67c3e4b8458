//! Run configuration.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. Built-in defaults, including the three stock profiles
//! 2. An optional YAML config file (`--config`)
//! 3. Command-line overrides and environment variables
//!
//! # Profiles
//!
//! A profile bundles the model, the verbosity and the output file of a run.
//!
//! | Profile    | Model         | Verbose | Output                   |
//! |------------|---------------|---------|--------------------------|
//! | `standard` | `gpt-4o`      | no      | `public/news.html`       |
//! | `lite`     | `gpt-4o-mini` | no      | `public/news_lite.html`  |
//! | `debug`    | `gpt-4o`      | yes     | `public/news_debug.html` |
//!
//! # Example config file
//!
//! ```yaml
//! regions: [1, 2, 7]
//! max_payload_bytes: 30000
//! profiles:
//!   nightly:
//!     model: gpt-4o-mini
//!     output: public/nightly.html
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://www.tagesschau.de/api2u/homepage";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 30_000;
/// Size of an empty list (`[]`); no smaller budget can be met.
pub const MIN_PAYLOAD_BYTES: usize = 2;
/// Baden-Württemberg, Bayern, Hessen.
pub const DEFAULT_REGIONS: [u32; 3] = [1, 2, 7];
pub const DEFAULT_PROFILE: &str = "standard";
pub const DEFAULT_PAGE_TITLE: &str = "Marked in the browser";

/// A named run configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    /// Chat model identifier.
    pub model: String,
    /// Log tool calls at `info` instead of `debug`.
    #[serde(default)]
    pub verbose: bool,
    /// Where the rendered page is written.
    pub output: PathBuf,
}

impl Profile {
    fn new(model: &str, verbose: bool, output: &str) -> Self {
        Self {
            model: model.to_string(),
            verbose,
            output: PathBuf::from(output),
        }
    }
}

fn builtin_profiles() -> BTreeMap<String, Profile> {
    BTreeMap::from([
        (
            "standard".to_string(),
            Profile::new("gpt-4o", false, "public/news.html"),
        ),
        (
            "lite".to_string(),
            Profile::new("gpt-4o-mini", false, "public/news_lite.html"),
        ),
        (
            "debug".to_string(),
            Profile::new("gpt-4o", true, "public/news_debug.html"),
        ),
    ])
}

/// Contents of the optional YAML config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// News endpoint to fetch.
    pub endpoint: String,
    /// Region identifiers kept from the regional feed.
    pub regions: Vec<u32>,
    /// Ceiling for the serialized item list handed to the model.
    pub max_payload_bytes: usize,
    /// Per-request timeout for both HTTP clients.
    pub timeout_secs: u64,
    /// `<title>` of the rendered page.
    pub page_title: String,
    /// Profiles by name; merged over the built-in ones.
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            regions: DEFAULT_REGIONS.to_vec(),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            timeout_secs: 120,
            page_title: DEFAULT_PAGE_TITLE.to_string(),
            profiles: builtin_profiles(),
        }
    }
}

impl Config {
    /// Parse a config document, merging its profiles over the built-in ones.
    pub fn from_yaml(path: &str, yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Config =
            serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
                path: path.to_string(),
                source,
            })?;
        if config.max_payload_bytes < MIN_PAYLOAD_BYTES {
            return Err(ConfigError::PayloadBudgetTooSmall {
                min: MIN_PAYLOAD_BYTES,
                got: config.max_payload_bytes,
            });
        }
        let mut profiles = builtin_profiles();
        profiles.extend(std::mem::take(&mut config.profiles));
        config.profiles = profiles;
        Ok(config)
    }

    /// Load the config file at `path`, or the defaults when no path is given.
    ///
    /// Runs before logging is set up, so it reports through its result only.
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Config::default());
        };
        let display = path.display().to_string();
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: display.clone(),
                source,
            })?;
        Config::from_yaml(&display, &yaml)
    }
}

/// Process environment relevant to a run.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Set when a `CI` variable is present.
    pub ci: bool,
}

impl Environment {
    /// Read the environment. Call after the `.env` file has been loaded.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("OPENAI_BASE_URL").ok(),
            ci: std::env::var_os("CI").is_some(),
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: String,
    pub regions: Vec<u32>,
    pub max_payload_bytes: usize,
    pub timeout: Duration,
    pub page_title: String,
    pub profile: String,
    pub model: String,
    pub verbose: bool,
    pub output: PathBuf,
    pub base_url: String,
    pub api_key: Option<String>,
    pub ci: bool,
}

impl Settings {
    /// Combine config file, CLI flags and environment into run settings.
    pub fn resolve(cli: &Cli, config: Config, env: Environment) -> Result<Self, ConfigError> {
        let profile = config
            .profiles
            .get(&cli.profile)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownProfile(cli.profile.clone()))?;

        Ok(Self {
            endpoint: config.endpoint,
            regions: config.regions,
            max_payload_bytes: config.max_payload_bytes,
            timeout: Duration::from_secs(config.timeout_secs),
            page_title: config.page_title,
            profile: cli.profile.clone(),
            model: cli.model.clone().unwrap_or(profile.model),
            verbose: cli.verbose || profile.verbose,
            output: cli.output.clone().unwrap_or(profile.output),
            base_url: env.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: env.api_key,
            ci: env.ci,
        })
    }
}
