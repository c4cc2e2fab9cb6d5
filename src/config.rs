//! Layered configuration: built-in defaults, then an optional TOML file,
//! then `QUIZ_KEEPER_*` environment variables.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::StorageKeys;

pub const PROJECT_CONFIG_FILE: &str = "quiz-keeper.toml";
const ENV_PREFIX: &str = "QUIZ_KEEPER_";

#[derive(Debug, Error)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(#[from] Box<figment::Error>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Question catalog; the built-in sample set when unset.
    pub questions: Option<PathBuf>,
    pub progress_file: PathBuf,
    pub log_file: PathBuf,
    /// When false, progress lives only as long as the process.
    pub persist: bool,
    pub keys: StorageKeys,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            questions: None,
            progress_file: PathBuf::from("quiz-progress.json"),
            log_file: PathBuf::from("quiz-keeper.log"),
            persist: true,
            keys: StorageKeys::default(),
        }
    }
}

impl Config {
    /// Load from defaults, `./quiz-keeper.toml` (or `explicit` when given),
    /// and the environment, later sources winning.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        match explicit {
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                let project = Path::new(PROJECT_CONFIG_FILE);
                if project.exists() {
                    figment = figment.merge(Toml::file(project));
                }
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        figment.extract().map_err(|err| ConfigError(Box::new(err)))
    }
}
