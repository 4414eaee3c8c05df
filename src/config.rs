//! Configuration management.
//!
//! Settings live in `~/.student-management/config.toml`. Every key is
//! optional; a missing file means defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".student-management";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "students.sqlite";
const LOG_FILE_NAME: &str = "student-management.log";

/// Overrides the database location regardless of the config file.
pub const DB_PATH_ENV: &str = "STUDENT_MANAGEMENT_DB";

const DEFAULT_COURSES: &[&str] = &["Biology", "Math", "Astronomy", "Physics"];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file. Defaults to `students.sqlite` in the data directory.
    pub database_path: Option<PathBuf>,
    /// Log file. Defaults to `student-management.log` in the data directory.
    pub log_path: Option<PathBuf>,
    /// Choices offered by the course field of the student dialogs.
    pub courses: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            log_path: None,
            courses: DEFAULT_COURSES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Load `config.toml` from the data directory.
    pub fn load() -> Result<Self> {
        Self::load_from(&data_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load from an explicit path, falling back to defaults when the file
    /// does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(contents).context("failed to parse config")?;
        config.courses = config
            .courses
            .iter()
            .map(|course| course.trim().to_string())
            .filter(|course| !course.is_empty())
            .collect();
        if config.courses.is_empty() {
            bail!("config must list at least one course");
        }
        Ok(config)
    }

    /// Resolve the database path: environment override, then config file,
    /// then the data directory default.
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = env::var_os(DB_PATH_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(DB_FILE_NAME)),
        }
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(LOG_FILE_NAME)),
        }
    }
}

/// Resolve the application data directory inside the user's home.
fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Serializes tests that touch `STUDENT_MANAGEMENT_DB`.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.courses, vec!["Biology", "Math", "Astronomy", "Physics"]);
    }

    #[test]
    fn courses_are_trimmed_and_blank_entries_dropped() {
        let config = AppConfig::parse(
            r#"
            database_path = "/tmp/school.sqlite"
            courses = [" Chemistry ", "", "History"]
            "#,
        )
        .unwrap();
        assert_eq!(config.courses, vec!["Chemistry", "History"]);
        assert_eq!(
            config.database_path,
            Some(PathBuf::from("/tmp/school.sqlite"))
        );
    }

    #[test]
    fn empty_course_list_is_rejected() {
        let err = AppConfig::parse("courses = []").unwrap_err();
        assert!(err.to_string().contains("at least one course"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(AppConfig::parse("courses = ").is_err());
    }

    #[test]
    fn configured_database_path_used_without_env_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var(DB_PATH_ENV);

        let config = AppConfig {
            database_path: Some(PathBuf::from("/srv/school/students.sqlite")),
            ..AppConfig::default()
        };
        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/srv/school/students.sqlite")
        );
    }

    #[test]
    fn env_override_wins_over_config() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var(DB_PATH_ENV, "/tmp/override.sqlite");

        let config = AppConfig {
            database_path: Some(PathBuf::from("/srv/school/students.sqlite")),
            ..AppConfig::default()
        };
        let resolved = config.database_path();
        env::remove_var(DB_PATH_ENV);
        assert_eq!(resolved.unwrap(), PathBuf::from("/tmp/override.sqlite"));
    }

    #[test]
    fn paths_default_to_data_dir() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var(DB_PATH_ENV);
        if BaseDirs::new().is_none() {
            return;
        }

        let config = AppConfig::default();
        assert!(config
            .database_path()
            .unwrap()
            .ends_with(Path::new(DATA_DIR_NAME).join(DB_FILE_NAME)));
        assert!(config
            .log_path()
            .unwrap()
            .ends_with(Path::new(DATA_DIR_NAME).join(LOG_FILE_NAME)));
    }

    #[test]
    fn configured_log_path_is_used() {
        let config = AppConfig {
            log_path: Some(PathBuf::from("/var/log/students.log")),
            ..AppConfig::default()
        };
        assert_eq!(
            config.log_path().unwrap(),
            PathBuf::from("/var/log/students.log")
        );
    }
}
