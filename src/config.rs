use crate::task::{default_columns, Column};
use anyhow::{bail, Context};
use serde::Deserialize;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info};

const APP_DIR: &str = "taskboard";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "taskboard.log";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data_dir: PathBuf,
    pub columns: Vec<Column>,
    pub toast_ms: u64,
    pub exit_transition_ms: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR),
            columns: default_columns(),
            toast_ms: 2000,
            exit_transition_ms: 150,
            log_file: None,
        }
    }
}

impl Config {
    /// Reads `explicit` if given, otherwise the per-user config file when
    /// it exists, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        let Some(path) = path else {
            debug!("no config file; using defaults");
            return Ok(Self::default());
        };

        info!(config = %path.display(), "loading config");
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.columns.is_empty() {
            bail!("at least one column is required");
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.id.trim().is_empty() {
                bail!("column ids must not be empty");
            }
            if !seen.insert(column.id.as_str()) {
                bail!("duplicate column id {:?}", column.id);
            }
        }
        Ok(())
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(LOG_FILE))
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ms)
    }

    pub fn exit_transition(&self) -> Duration {
        Duration::from_millis(self.exit_transition_ms)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.columns.len(), 3);
        assert_eq!(config.columns[1].id, "in-progress");
    }

    #[test]
    fn overrides_columns_and_timings() {
        let config = Config::from_toml(
            r#"
            data_dir = "/tmp/board"
            toast_ms = 500
            exit_transition_ms = 0

            [[columns]]
            id = "backlog"
            title = "Backlog"

            [[columns]]
            id = "shipped"
            title = "Shipped"
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/board"));
        assert_eq!(config.toast_ttl(), Duration::from_millis(500));
        assert_eq!(config.exit_transition(), Duration::ZERO);
        assert_eq!(config.log_path(), PathBuf::from("/tmp/board/taskboard.log"));
        let ids: Vec<_> = config.columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["backlog", "shipped"]);
    }

    #[test]
    fn rejects_bad_columns() {
        assert!(Config::from_toml("columns = []").is_err());
        assert!(Config::from_toml(
            r#"
            [[columns]]
            id = "todo"
            title = "A"
            [[columns]]
            id = "todo"
            title = "B"
            "#
        )
        .is_err());
        assert!(Config::from_toml("colour = \"red\"").is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let temp = tempdir().expect("tempdir");
        assert!(Config::load(Some(&temp.path().join("missing.toml"))).is_err());

        let path = temp.path().join("config.toml");
        fs::write(&path, "toast_ms = 10\n").unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap().toast_ms, 10);
    }
}
