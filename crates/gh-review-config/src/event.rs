//! Pull request event payload loading
//!
//! GitHub Actions writes the triggering webhook payload to the file named by
//! `GITHUB_EVENT_PATH`. Only the fields the bot needs are modelled; every
//! field defaults to empty so that validation can name exactly what is
//! missing instead of failing with a generic parse error.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// The `pull_request` part of a pull request event
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PullRequestEvent {
    #[serde(default)]
    pub number: u64,
    #[serde(default)]
    pub user: EventUser,
    #[serde(default)]
    pub head: EventRef,
    #[serde(default)]
    pub base: EventRef,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct EventUser {
    #[serde(default)]
    pub login: String,
}

/// One side (head or base) of a pull request
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct EventRef {
    #[serde(default, rename = "ref")]
    pub ref_field: String,
    #[serde(default)]
    pub sha: String,
    #[serde(default)]
    pub repo: EventRepo,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct EventRepo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner: EventUser,
}

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    #[serde(default)]
    pull_request: PullRequestEvent,
}

/// Load the pull request from an event payload file
pub fn load_event(path: &Path) -> Result<PullRequestEvent, ConfigError> {
    let body = std::fs::read_to_string(path).map_err(|source| ConfigError::EventRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_event(&body).map_err(|source| ConfigError::EventParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse an event payload body
pub fn parse_event(body: &str) -> Result<PullRequestEvent, serde_json::Error> {
    let envelope: EventEnvelope = serde_json::from_str(body)?;
    Ok(envelope.pull_request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EVENT: &str = r#"{
        "action": "synchronize",
        "pull_request": {
            "number": 2,
            "state": "open",
            "user": { "login": "Codertocat", "id": 21031067 },
            "head": {
                "label": "Codertocat:changes",
                "ref": "changes",
                "sha": "ec26c3e57ca3a959ca5aad62de7213c562f8c821",
                "repo": {
                    "name": "Hello-World",
                    "owner": { "login": "Codertocat" }
                }
            },
            "base": {
                "ref": "master",
                "sha": "f95f852bd8fca8fcc58a9a2d6c842781e32a215e",
                "repo": {
                    "name": "Hello-World",
                    "owner": { "login": "Codertocat" }
                }
            }
        }
    }"#;

    #[test]
    fn test_parse_event() {
        let pr = parse_event(EVENT).unwrap();
        assert_eq!(pr.number, 2);
        assert_eq!(pr.user.login, "Codertocat");
        assert_eq!(pr.head.ref_field, "changes");
        assert_eq!(pr.head.sha, "ec26c3e57ca3a959ca5aad62de7213c562f8c821");
        assert_eq!(pr.base.repo.owner.login, "Codertocat");
        assert_eq!(pr.base.repo.name, "Hello-World");
    }

    #[test]
    fn test_parse_event_missing_fields_default_to_empty() {
        let pr = parse_event(r#"{"pull_request": {"number": 3}}"#).unwrap();
        assert_eq!(pr.number, 3);
        assert!(pr.user.login.is_empty());
        assert!(pr.head.sha.is_empty());

        let none = parse_event(r#"{"action": "opened"}"#).unwrap();
        assert_eq!(none, PullRequestEvent::default());
    }

    #[test]
    fn test_load_event_from_file() {
        let path = std::env::temp_dir().join(format!("gh-review-event-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(EVENT.as_bytes()).unwrap();

        let pr = load_event(&path).unwrap();
        assert_eq!(pr.number, 2);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_event_errors() {
        let missing = load_event(Path::new("/nonexistent/event.json"));
        assert!(matches!(missing, Err(ConfigError::EventRead { .. })));

        let path = std::env::temp_dir().join(format!("gh-review-bad-{}.json", std::process::id()));
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(load_event(&path), Err(ConfigError::EventParse { .. })));
        std::fs::remove_file(&path).unwrap();
    }
}
