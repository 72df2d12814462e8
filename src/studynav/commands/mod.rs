use crate::config::{StudyNavConfig, HOME_ENV};
use crate::error::{Result, StudyNavError};
use crate::model::{Note, RecordKind, Task};
use directories::BaseDirs;
use std::path::PathBuf;

pub mod config;
pub mod helpers;
pub mod migrate;
pub mod notes;
pub mod paths;
pub mod search;
pub mod tasks;

const DEFAULT_DIR_NAME: &str = ".studynav";
const VAULT_DIR_NAME: &str = "vault";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyNavPaths {
    /// Holds `config.json` and the JSON collections.
    pub data_dir: PathBuf,
    /// Root of the Markdown vault, with one subdirectory per record kind.
    pub vault_dir: PathBuf,
}

impl StudyNavPaths {
    pub fn new(data_dir: PathBuf, vault_dir: Option<PathBuf>) -> Self {
        let vault_dir = vault_dir.unwrap_or_else(|| data_dir.join(VAULT_DIR_NAME));
        Self {
            data_dir,
            vault_dir,
        }
    }

    /// The data directory: `home_override` when given and non-empty, else `~/.studynav`.
    pub fn data_dir(home_override: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = home_override.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(dir);
        }
        BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(DEFAULT_DIR_NAME))
            .ok_or_else(|| {
                StudyNavError::Config(format!(
                    "Could not determine home directory; set {}",
                    HOME_ENV
                ))
            })
    }

    /// Resolve every location, honoring `vault_dir` from the config.
    pub fn resolve(data_dir: PathBuf, config: &StudyNavConfig) -> Self {
        Self::new(data_dir, config.vault_dir.clone())
    }

    pub fn collection_file(&self, kind: RecordKind) -> PathBuf {
        self.data_dir.join(kind.collection_file_name())
    }

    pub fn vault_subdir(&self, kind: RecordKind) -> PathBuf {
        self.vault_dir.join(kind.vault_dir_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// A labeled filesystem location, as reported by `where`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub label: &'static str,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub notes: Vec<Note>,
    pub tasks: Vec<Task>,
    pub locations: Vec<Location>,
    pub config: Option<StudyNavConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_notes(mut self, notes: Vec<Note>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn with_locations(mut self, locations: Vec<Location>) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_config(mut self, config: StudyNavConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vault_defaults_under_data_dir() {
        let paths = StudyNavPaths::new(PathBuf::from("/data"), None);
        assert_eq!(paths.vault_dir, PathBuf::from("/data/vault"));
        assert_eq!(
            paths.vault_subdir(RecordKind::Task),
            PathBuf::from("/data/vault/tasks")
        );
        assert_eq!(
            paths.collection_file(RecordKind::Note),
            PathBuf::from("/data/notes.json")
        );
    }

    #[test]
    fn configured_vault_wins() {
        let config = StudyNavConfig {
            vault_dir: Some(PathBuf::from("/elsewhere")),
            ..Default::default()
        };
        let paths = StudyNavPaths::resolve(PathBuf::from("/data"), &config);
        assert_eq!(paths.vault_subdir(RecordKind::Note), PathBuf::from("/elsewhere/notes"));
    }

    #[test]
    fn home_override_is_used_when_set() {
        let dir = StudyNavPaths::data_dir(Some(PathBuf::from("/custom"))).unwrap();
        assert_eq!(dir, PathBuf::from("/custom"));
    }
}
