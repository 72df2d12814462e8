use crate::commands::{CmdMessage, CmdResult, StudyNavPaths};
use crate::config::StudyNavConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(paths: &StudyNavPaths, action: ConfigAction) -> Result<CmdResult> {
    let dir = &paths.data_dir;
    match action {
        ConfigAction::ShowAll => {
            let config = StudyNavConfig::load(dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = StudyNavConfig::load(dir)?;
            let value = config.get(&key)?;
            Ok(CmdResult::default().with_message(CmdMessage::info(value)))
        }
        ConfigAction::Set(key, value) => {
            let mut config = StudyNavConfig::load(dir)?;
            config.set(&key, &value)?;
            config.save(dir)?;

            let display_val = config.get(&key)?;
            Ok(CmdResult::default()
                .with_message(CmdMessage::success(format!(
                    "{} set to {}",
                    key, display_val
                )))
                .with_config(config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Backend;
    use tempfile::TempDir;

    fn paths(dir: &TempDir) -> StudyNavPaths {
        StudyNavPaths::new(dir.path().to_path_buf(), None)
    }

    #[test]
    fn set_persists_and_show_reads_back() {
        let dir = TempDir::new().unwrap();
        let paths = paths(&dir);

        let res = run(
            &paths,
            ConfigAction::Set("backend".into(), "Markdown".into()),
        )
        .unwrap();
        assert_eq!(res.messages[0].content, "backend set to markdown");

        let res = run(&paths, ConfigAction::ShowKey("backend".into())).unwrap();
        assert_eq!(res.messages[0].content, "markdown");

        let res = run(&paths, ConfigAction::ShowAll).unwrap();
        assert_eq!(res.config.unwrap().backend, Backend::Markdown);
    }

    #[test]
    fn bad_values_do_not_touch_the_file() {
        let dir = TempDir::new().unwrap();
        let paths = paths(&dir);
        assert!(run(&paths, ConfigAction::Set("backend".into(), "sqlite".into())).is_err());
        assert!(run(&paths, ConfigAction::ShowKey("nope".into())).is_err());
        assert!(!dir.path().join("config.json").exists());
    }
}
