use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "repwatch")
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("repwatch_config.json"))
    }

    /// Log file under $HOME/.local/state/repwatch, falling back to the platform data dir
    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("repwatch")
                .join("repwatch.log");
        }
        ProjectDirs::from("", "", "repwatch")
            .map(|pd| pd.data_local_dir().join("repwatch.log"))
            .unwrap_or_else(|| PathBuf::from("repwatch.log"))
    }
}
