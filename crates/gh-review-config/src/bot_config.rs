//! Resolved bot configuration
//!
//! Values are resolved with the following precedence:
//!
//! 1. Command line flags (`ConfigOverrides`)
//! 2. Environment variables (a `.env` file is loaded first if present)
//! 3. `.gh-review-bot.toml` (`FileConfig`)
//! 4. Built-in defaults

use crate::error::ConfigError;
use crate::file_config::FileConfig;
use crate::reviewers::{parse_assignments, parse_reviewer_list, ReviewerAssignments};
use crate::{EVENT_PATH_ENV, REPOSITORY_ENV};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Environment variable holding the reviewer assignments JSON
pub const REVIEWERS_ENV: &str = "REVIEWERS";

/// Environment variable holding the default reviewers
pub const DEFAULT_REVIEWERS_ENV: &str = "DEFAULT_REVIEWERS";

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Reviewer assignments as a JSON object
    pub reviewers: Option<String>,
    /// Default reviewers as a JSON array or comma-separated list
    pub default_reviewers: Option<String>,
    /// Name of the workflow to prune
    pub check_workflow: Option<String>,
    /// Invocation deadline in seconds
    pub timeout_secs: Option<u64>,
}

/// `owner/name` of a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySlug {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepositorySlug {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(ConfigError::InvalidValue {
                key: REPOSITORY_ENV,
                reason: format!("'{}' is not in the format '<repo owner>/<repo name>'", s),
            }),
        }
    }
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Fully resolved configuration for one invocation
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Author → required reviewers
    pub reviewers: ReviewerAssignments,
    /// Reviewers for authors absent from `reviewers`
    pub default_reviewers: Vec<String>,
    /// Name of the workflow whose stale runs are pruned
    pub check_workflow: String,
    /// Payload marker identifying platform-generated commits
    pub bot_committer: String,
    /// Deadline for the whole invocation
    pub timeout: Duration,
    event_path: Option<PathBuf>,
    repository: Option<RepositorySlug>,
}

impl BotConfig {
    /// Load configuration from every source
    pub fn load(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("Loaded .env file from: {:?}", path),
            Err(_) => log::debug!(".env file not found, relying on environment variables"),
        }

        let file = FileConfig::load()?;
        Self::resolve(overrides, file, |key| std::env::var(key).ok())
    }

    /// Resolve configuration from explicit sources
    ///
    /// `env` looks up environment variables; it is a parameter so resolution
    /// can be tested without touching the process environment.
    pub fn resolve(
        overrides: ConfigOverrides,
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let reviewers = match overrides.reviewers.or_else(|| env(REVIEWERS_ENV)) {
            Some(raw) => parse_assignments(&raw)?,
            None => file.reviewers,
        };

        // A blank env value counts as unset
        let default_reviewers = match overrides.default_reviewers.or_else(|| {
            env(DEFAULT_REVIEWERS_ENV).filter(|s| !s.trim().is_empty())
        }) {
            Some(raw) => parse_reviewer_list(&raw)?,
            None => file.default_reviewers,
        };

        let timeout_secs = overrides.timeout_secs.unwrap_or(file.timeout_secs);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }

        let repository = env(REPOSITORY_ENV)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse())
            .transpose()?;

        Ok(Self {
            reviewers,
            default_reviewers,
            check_workflow: overrides.check_workflow.unwrap_or(file.check_workflow),
            bot_committer: file.bot_committer,
            timeout: Duration::from_secs(timeout_secs),
            event_path: env(EVENT_PATH_ENV)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            repository,
        })
    }

    /// Path of the triggering event payload
    pub fn event_path(&self) -> Result<&Path, ConfigError> {
        self.event_path
            .as_deref()
            .ok_or(ConfigError::Missing {
                key: EVENT_PATH_ENV,
                hint: "set it to the path of the pull request event payload",
            })
    }

    /// Repository the bot runs in
    pub fn repository(&self) -> Result<&RepositorySlug, ConfigError> {
        self.repository.as_ref().ok_or(ConfigError::Missing {
            key: REPOSITORY_ENV,
            hint: "set it to '<repo owner>/<repo name>'",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_resolve_defaults() {
        let config =
            BotConfig::resolve(ConfigOverrides::default(), FileConfig::default(), env_from(&[]))
                .unwrap();

        assert!(config.reviewers.is_empty());
        assert_eq!(config.check_workflow, "Check");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.event_path().is_err());
        assert!(config.repository().is_err());
    }

    #[test]
    fn test_flag_beats_env_beats_file() {
        let mut file = FileConfig::default();
        file.reviewers
            .insert("file-author".to_string(), vec!["x".to_string()]);
        file.default_reviewers = vec!["file-default".to_string()];

        let env = env_from(&[
            (REVIEWERS_ENV, r#"{"env-author": ["y"]}"#),
            (DEFAULT_REVIEWERS_ENV, "env-default"),
        ]);

        let overrides = ConfigOverrides {
            reviewers: Some(r#"{"flag-author": ["z"]}"#.to_string()),
            ..Default::default()
        };
        let config = BotConfig::resolve(overrides, file, env).unwrap();

        assert!(config.reviewers.contains_key("flag-author"));
        assert!(!config.reviewers.contains_key("env-author"));
        assert_eq!(config.default_reviewers, vec!["env-default"]);
    }

    #[test]
    fn test_file_used_when_nothing_else_set() {
        let mut file = FileConfig::default();
        file.reviewers
            .insert("alice".to_string(), vec!["bob".to_string()]);
        file.timeout_secs = 10;

        let config =
            BotConfig::resolve(ConfigOverrides::default(), file, env_from(&[])).unwrap();
        assert_eq!(config.reviewers["alice"], vec!["bob"]);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_empty_reviewers_flag_is_rejected() {
        let overrides = ConfigOverrides {
            reviewers: Some(String::new()),
            ..Default::default()
        };
        let result = BotConfig::resolve(overrides, FileConfig::default(), env_from(&[]));
        assert!(matches!(result, Err(ConfigError::InvalidReviewers { .. })));
    }

    #[test]
    fn test_blank_default_reviewers_env_keeps_file_value() {
        let mut file = FileConfig::default();
        file.default_reviewers = vec!["carol".to_string()];

        for blank in ["", "  "] {
            let config = BotConfig::resolve(
                ConfigOverrides::default(),
                file.clone(),
                env_from(&[(DEFAULT_REVIEWERS_ENV, blank)]),
            )
            .unwrap();
            assert_eq!(config.default_reviewers, vec!["carol"]);
        }
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let overrides = ConfigOverrides {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(BotConfig::resolve(overrides, FileConfig::default(), env_from(&[])).is_err());
    }

    #[test]
    fn test_event_path_and_repository_from_env() {
        let env = env_from(&[
            (EVENT_PATH_ENV, "/github/workflow/event.json"),
            (REPOSITORY_ENV, "gravitational/teleport"),
        ]);
        let config =
            BotConfig::resolve(ConfigOverrides::default(), FileConfig::default(), env).unwrap();

        assert_eq!(
            config.event_path().unwrap(),
            Path::new("/github/workflow/event.json")
        );
        let repo = config.repository().unwrap();
        assert_eq!(repo.owner, "gravitational");
        assert_eq!(repo.name, "teleport");
        assert_eq!(repo.to_string(), "gravitational/teleport");
    }

    #[test]
    fn test_repository_slug_parse() {
        assert!("owner/name".parse::<RepositorySlug>().is_ok());
        assert!("owner".parse::<RepositorySlug>().is_err());
        assert!("owner/".parse::<RepositorySlug>().is_err());
        assert!("a/b/c".parse::<RepositorySlug>().is_err());
    }
}
