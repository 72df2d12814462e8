use crate::error::{Result, StudyNavError};
use crate::store::atomic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CONFIG_FILENAME: &str = "config.json";

/// Overrides the data directory (default `~/.studynav`).
pub const HOME_ENV: &str = "STUDYNAV_HOME";
/// Overrides the configured backend.
pub const BACKEND_ENV: &str = "STUDYNAV_BACKEND";
/// Log filter directives, as understood by `tracing_subscriber::EnvFilter`.
pub const LOG_ENV: &str = "STUDYNAV_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Json,
    Markdown,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Json => "json",
            Backend::Markdown => "markdown",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = StudyNavError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Backend::Json),
            "markdown" | "md" => Ok(Backend::Markdown),
            other => Err(StudyNavError::Config(format!(
                "Unknown backend '{}' (expected json or markdown)",
                other
            ))),
        }
    }
}

/// Configuration for studynav, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudyNavConfig {
    /// Storage backend used when neither the flag nor the environment picks one
    #[serde(default)]
    pub backend: Backend,

    /// Root of the Markdown vault (default `<data dir>/vault`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_dir: Option<PathBuf>,
}

impl StudyNavConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        serde_json::from_str(&content).map_err(|e| {
            StudyNavError::Config(format!("{}: {}", config_path.display(), e))
        })
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        atomic::write(&config_dir.join(CONFIG_FILENAME), content.as_bytes())
    }

    /// Backend after applying the flag and environment overrides, in that order.
    pub fn effective_backend(&self, flag: Option<Backend>, env: Option<&str>) -> Result<Backend> {
        if let Some(backend) = flag {
            return Ok(backend);
        }
        match env.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => value.parse(),
            None => Ok(self.backend),
        }
    }

    /// Read a key for the `config` command.
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "backend" => Ok(self.backend.to_string()),
            "vault_dir" => Ok(self
                .vault_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()),
            other => Err(unknown_key(other)),
        }
    }

    /// Set a key for the `config` command. An empty `vault_dir` clears it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "backend" => self.backend = value.parse()?,
            "vault_dir" => {
                let value = value.trim();
                self.vault_dir = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["backend", "vault_dir"]
    }
}

fn unknown_key(key: &str) -> StudyNavError {
    StudyNavError::Config(format!(
        "Unknown config key '{}' (expected one of: {})",
        key,
        StudyNavConfig::keys().join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = StudyNavConfig::default();
        assert_eq!(config.backend, Backend::Json);
        assert_eq!(config.vault_dir, None);
    }

    #[test]
    fn load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = StudyNavConfig::load(dir.path()).unwrap();
        assert_eq!(config, StudyNavConfig::default());
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let mut config = StudyNavConfig::default();
        config.set("backend", "markdown").unwrap();
        config.set("vault_dir", "/tmp/vault").unwrap();
        config.save(&home).unwrap();

        let loaded = StudyNavConfig::load(&home).unwrap();
        assert_eq!(loaded.backend, Backend::Markdown);
        assert_eq!(loaded.vault_dir, Some(PathBuf::from("/tmp/vault")));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{}").unwrap();
        assert_eq!(
            StudyNavConfig::load(dir.path()).unwrap(),
            StudyNavConfig::default()
        );
    }

    #[test]
    fn bad_file_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{\"backend\": \"sqlite\"}").unwrap();
        let err = StudyNavConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, StudyNavError::Config(_)));
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let config = StudyNavConfig {
            backend: Backend::Markdown,
            vault_dir: None,
        };
        assert_eq!(
            config
                .effective_backend(Some(Backend::Json), Some("markdown"))
                .unwrap(),
            Backend::Json
        );
        assert_eq!(
            config.effective_backend(None, Some("JSON")).unwrap(),
            Backend::Json
        );
        assert_eq!(
            config.effective_backend(None, Some("  ")).unwrap(),
            Backend::Markdown
        );
        assert!(config.effective_backend(None, Some("sqlite")).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut config = StudyNavConfig::default();
        assert!(config.get("editor").is_err());
        assert!(config.set("editor", "vim").is_err());
        config.set("vault_dir", "").unwrap();
        assert_eq!(config.get("vault_dir").unwrap(), "");
    }
}
