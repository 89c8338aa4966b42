use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "keybored";
const LOG_FILE: &str = "keybored.log";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where scores, settings and the log live
    pub fn data_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME)
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::data_dir().map(|dir| dir.join(LOG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_lives_in_data_dir() {
        if let (Some(data), Some(log)) = (AppDirs::data_dir(), AppDirs::log_path()) {
            assert_eq!(log.parent(), Some(data.as_path()));
            assert!(data.ends_with(APP_NAME));
        }
    }
}
