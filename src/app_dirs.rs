use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/strands`, or the platform data dir without `$HOME`.
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("strands"),
            )
        } else {
            ProjectDirs::from("", "", "strands").map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    pub fn db_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("history.db"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("strands.log"))
    }

    pub fn progress_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "strands").map(|pd| pd.data_dir().join("progress"))
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "strands").map(|pd| pd.config_dir().join("config.json"))
    }
}
