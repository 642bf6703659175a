use std::path::Path;

use museum_input::InputConfig;
use museum_kernel::config::load_json;
use museum_kernel::{ConfigError, MuseumConfig};
use serde::{Deserialize, Serialize};

/// Settings file shared by the desktop app and the CLI.
///
/// Museum settings sit at the top level; input tuning lives under `"input"`.
/// Every field is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(flatten)]
    pub museum: MuseumConfig,
    pub input: InputConfig,
}

impl AppConfig {
    /// Load from `path`, or use defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => load_json(path),
            None => Ok(Self::default()),
        }
    }
}
