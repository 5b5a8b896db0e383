//! Configuration loading
//!
//! Optional TOML configuration merged beneath the CLI flags. Precedence,
//! lowest first: built-in defaults, config file, environment variables,
//! command-line flags.
//!
//! # Configuration file
//!
//! Read from the path given with `--config`, otherwise from
//! `./rdfpath.toml` when present.
//!
//! ```toml
//! # rdfpath.toml
//!
//! [finder]
//! max_path_length = 64
//! include_literal_endpoints = false
//!
//! [prefixes]
//! ex = "http://example.org/"
//! foaf = "http://xmlns.com/foaf/0.1/"
//! ```
//!
//! # Environment variables
//!
//! - `RDFPATH_MAX_PATH_LENGTH` — cap on predicate count per witness
//! - `RDFPATH_INCLUDE_LITERALS` — `true`/`false`, retain literal endpoints

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::expr::PrefixMap;
use crate::finder::FinderConfig;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "rdfpath.toml";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {var}: {value}")]
    Env { var: String, value: String },
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RdfPathConfig {
    /// Search settings
    pub finder: FinderSection,
    /// Extra prefix bindings, added on top of the standard namespaces
    pub prefixes: HashMap<String, String>,
}

/// `[finder]` section
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FinderSection {
    /// Cap on predicate count per witness
    pub max_path_length: Option<usize>,
    /// Retain witnesses whose destination is a literal
    pub include_literal_endpoints: bool,
}

impl RdfPathConfig {
    /// Load configuration: explicit file, else `./rdfpath.toml` when
    /// present, else defaults; then apply environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Apply `RDFPATH_*` environment overrides
    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(raw) = env::var("RDFPATH_MAX_PATH_LENGTH") {
            let parsed = raw.parse::<usize>().map_err(|_| ConfigError::Env {
                var: "RDFPATH_MAX_PATH_LENGTH".into(),
                value: raw.clone(),
            })?;
            self.finder.max_path_length = Some(parsed);
        }

        if let Ok(raw) = env::var("RDFPATH_INCLUDE_LITERALS") {
            self.finder.include_literal_endpoints = match raw.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::Env {
                        var: "RDFPATH_INCLUDE_LITERALS".into(),
                        value: raw,
                    });
                }
            };
        }

        Ok(())
    }

    /// The search configuration this file describes
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig {
            max_path_length: self.finder.max_path_length,
            include_literal_endpoints: self.finder.include_literal_endpoints,
        }
    }

    /// Standard namespaces plus the file's `[prefixes]` bindings
    pub fn prefix_map(&self) -> PrefixMap {
        let mut map = PrefixMap::with_defaults();
        for (prefix, namespace) in &self.prefixes {
            map.add(prefix.clone(), namespace.clone());
        }
        map
    }
}
