use std::path::PathBuf;

/// Registry file name, resolved against the working directory.
pub const DEFAULT_REGISTRY_FILE: &str = "save_paths.json";

/// Environment variable that overrides the registry file location.
pub const REGISTRY_ENV: &str = "GSM_REGISTRY";

/// Where the folder picker starts: roaming app data (`%APPDATA%` on Windows).
pub fn picker_start_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.data_dir().to_path_buf())
}
