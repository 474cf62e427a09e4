//! Configuration and input loading for gh-review-bot
//!
//! This crate provides:
//! - Configuration file loading (TOML)
//! - Resolution of flags, environment and file values into `BotConfig`
//! - Reviewer assignment parsing
//! - GitHub token resolution
//! - Pull request event payload loading

pub mod bot_config;
pub mod error;
pub mod event;
pub mod file_config;
pub mod reviewers;
pub mod token;

pub use bot_config::{BotConfig, ConfigOverrides, RepositorySlug};
pub use error::ConfigError;
pub use event::{load_event, PullRequestEvent};
pub use file_config::FileConfig;
pub use reviewers::{parse_assignments, parse_reviewer_list, ReviewerAssignments};
pub use token::TokenResolver;

/// Environment variable holding the path to the triggering event payload
pub const EVENT_PATH_ENV: &str = "GITHUB_EVENT_PATH";

/// Environment variable holding `owner/name` of the current repository
pub const REPOSITORY_ENV: &str = "GITHUB_REPOSITORY";
