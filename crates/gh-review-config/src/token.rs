//! GitHub token resolution

use crate::error::ConfigError;
use log::debug;

/// Resolves the GitHub token used to authenticate API calls
///
/// Tries multiple sources in order:
/// 1. The `--token` flag
/// 2. `GITHUB_TOKEN` or `GH_TOKEN`
/// 3. `gh auth token` command
#[derive(Debug, Clone, Default)]
pub struct TokenResolver {
    /// Token passed explicitly on the command line
    explicit: Option<String>,
    /// Cached token from GITHUB_TOKEN/GH_TOKEN
    env_token: Option<String>,
}

impl TokenResolver {
    /// Create a new token resolver reading the process environment
    pub fn new(explicit: Option<String>) -> Self {
        let env_token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GH_TOKEN"))
            .ok();

        Self::with_sources(explicit, env_token)
    }

    /// Create a resolver from explicit sources
    pub fn with_sources(explicit: Option<String>, env_token: Option<String>) -> Self {
        Self {
            explicit: explicit.filter(|t| !t.is_empty()),
            env_token: env_token.filter(|t| !t.is_empty()),
        }
    }

    /// Get a token, falling back to the gh CLI
    pub async fn get_token(&self) -> Result<String, ConfigError> {
        if let Some(token) = self.explicit.as_ref().or(self.env_token.as_ref()) {
            debug!("Using token from flag or environment");
            return Ok(token.clone());
        }

        debug!("Trying gh auth token");
        let output = tokio::process::Command::new("gh")
            .args(["auth", "token"])
            .output()
            .await;

        if let Ok(output) = output {
            if output.status.success() {
                let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !token.is_empty() {
                    debug!("Using token from gh CLI");
                    return Ok(token);
                }
            }
        }

        Err(ConfigError::Missing {
            key: "token",
            hint: "pass --token, set GITHUB_TOKEN or run 'gh auth login'",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_explicit_token_wins() {
        let resolver =
            TokenResolver::with_sources(Some("flag".to_string()), Some("env".to_string()));
        assert_eq!(resolver.get_token().await.unwrap(), "flag");
    }

    #[tokio::test]
    async fn test_env_token_used_without_flag() {
        let resolver = TokenResolver::with_sources(Some(String::new()), Some("env".to_string()));
        assert_eq!(resolver.get_token().await.unwrap(), "env");
    }
}
