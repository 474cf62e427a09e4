//! File configuration
//!
//! Configuration loaded from .gh-review-bot.toml. Every key is optional;
//! flags and environment variables take precedence (see `BotConfig`).

use crate::error::ConfigError;
use crate::reviewers::ReviewerAssignments;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the CWD and the home directory
pub const CONFIG_FILE: &str = ".gh-review-bot.toml";

/// Name of the workflow whose stale runs are pruned
pub const DEFAULT_CHECK_WORKFLOW: &str = "Check";

/// Marker contained in the payload of commits created and signed by GitHub
pub const DEFAULT_BOT_COMMITTER: &str = "committer GitHub <noreply@github.com>";

/// Default deadline for a whole invocation
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration loaded from .gh-review-bot.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FileConfig {
    /// Author → required reviewers
    #[serde(default)]
    pub reviewers: ReviewerAssignments,

    /// Reviewers for authors absent from `reviewers`
    #[serde(default)]
    pub default_reviewers: Vec<String>,

    /// Name of the workflow to prune stale runs of
    #[serde(default = "default_check_workflow")]
    pub check_workflow: String,

    /// Payload marker identifying platform-generated commits
    #[serde(default = "default_bot_committer")]
    pub bot_committer: String,

    /// Deadline for a whole invocation, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_check_workflow() -> String {
    DEFAULT_CHECK_WORKFLOW.to_string()
}

fn default_bot_committer() -> String {
    DEFAULT_BOT_COMMITTER.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            reviewers: ReviewerAssignments::new(),
            default_reviewers: Vec::new(),
            check_workflow: default_check_workflow(),
            bot_committer: default_bot_committer(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FileConfig {
    /// Load config from CWD first, then home directory, or use defaults
    ///
    /// Unlike a missing file, a file that fails to parse is an error: a
    /// half-read reviewer policy must never be silently replaced by defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let home = std::env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE));
        Self::load_first(std::iter::once(PathBuf::from(CONFIG_FILE)).chain(home))
    }

    /// Load the first readable candidate, or defaults if none is readable
    fn load_first(candidates: impl IntoIterator<Item = PathBuf>) -> Result<Self, ConfigError> {
        for path in candidates {
            if let Ok(content) = std::fs::read_to_string(&path) {
                let config = Self::parse(&path, &content)?;
                log::info!("Loaded config from {}", path.display());
                return Ok(config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Parse config file content
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::FileParse {
            path: path.to_path_buf(),
            source,
        })
    }
}
