//! Server Configuration
//!
//! Defaults, then `queue-server.toml`, then environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const CONFIG_FILE: &str = "queue-server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub database_path: PathBuf,
    pub log_dir: PathBuf,
    /// Log file stem
    pub app_name: String,
    /// Station created when the database has none
    pub default_station: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8787".into(),
            database_path: PathBuf::from("./data/queue.db"),
            log_dir: PathBuf::from("./logs"),
            app_name: "QueueServer".into(),
            default_station: "Main".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    bind_addr: Option<String>,
    database_path: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    app_name: Option<String>,
    default_station: Option<String>,
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from<F>(path: &Path, env: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file) => {
                if let Some(v) = file.bind_addr {
                    settings.bind_addr = v;
                }
                if let Some(v) = file.database_path {
                    settings.database_path = v;
                }
                if let Some(v) = file.log_dir {
                    settings.log_dir = v;
                }
                if let Some(v) = file.app_name {
                    settings.app_name = v;
                }
                if let Some(v) = file.default_station {
                    settings.default_station = v;
                }
            }
            // Logger is not up yet
            Err(e) => eprintln!("Ignoring {}: {}", path.display(), e),
        }
    }

    if let Some(v) = env("QUEUE_BIND_ADDR") {
        settings.bind_addr = v;
    }
    if let Some(v) = env("QUEUE_DATABASE_PATH") {
        settings.database_path = PathBuf::from(v);
    }
    if let Some(v) = env("QUEUE_LOG_DIR") {
        settings.log_dir = PathBuf::from(v);
    }

    settings
}
