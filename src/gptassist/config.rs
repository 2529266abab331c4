use crate::error::{AssistError, Result};
use crate::model::DEFAULT_IGNORES;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_DIRNAME: &str = ".gptassist";
pub const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_HEADER: &str = "GPT Assist";

/// Startup configuration, stored as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssistConfig {
    /// Ignore patterns installed into every new session
    #[serde(default = "default_ignores")]
    pub default_ignores: Vec<String>,

    /// Allowed extensions for new sessions ("*" allows everything)
    #[serde(default = "default_extensions")]
    pub default_extensions: Vec<String>,

    /// Where to write the resolution log, if anywhere
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Path offered by save/load when none is typed
    #[serde(default)]
    pub state_file: Option<PathBuf>,

    /// Banner around the help listing
    #[serde(default = "default_header")]
    pub header: String,
}

fn default_ignores() -> Vec<String> {
    DEFAULT_IGNORES.iter().map(|s| s.to_string()).collect()
}

fn default_extensions() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_header() -> String {
    DEFAULT_HEADER.to_string()
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            default_ignores: default_ignores(),
            default_extensions: default_extensions(),
            log_file: None,
            state_file: None,
            header: default_header(),
        }
    }
}

impl AssistConfig {
    /// Load config from the given file, or return defaults if it does not exist
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(AssistError::Io)?;
        let config: AssistConfig =
            serde_json::from_str(&content).map_err(AssistError::Serialization)?;
        Ok(config)
    }

    /// Candidate config files, most specific first: the project's
    /// `.gptassist/config.json`, then the per-user config directory.
    pub fn search_paths(cwd: &Path) -> Vec<PathBuf> {
        let mut paths = vec![cwd.join(CONFIG_DIRNAME).join(CONFIG_FILENAME)];
        if let Some(dirs) = ProjectDirs::from("com", "gptassist", "gptassist") {
            paths.push(dirs.config_dir().join(CONFIG_FILENAME));
        }
        paths
    }

    /// The first config found along `search_paths`, or defaults.
    pub fn discover(cwd: &Path) -> Result<Self> {
        match Self::search_paths(cwd).into_iter().find(|p| p.exists()) {
            Some(path) => Self::load_file(path),
            None => Ok(Self::default()),
        }
    }
}
