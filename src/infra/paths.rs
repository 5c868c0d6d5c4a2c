// src/infra/paths.rs — Config and session file locations
//
// All paths respect the KCOPILOT_HOME environment variable for isolation.
// When unset, everything lives under ~/.kcopilot/.

use std::path::PathBuf;

/// Returns the KCOPILOT_HOME override, if set.
fn kcopilot_home() -> Option<PathBuf> {
    std::env::var_os("KCOPILOT_HOME").map(PathBuf::from)
}

/// Home directory, if the platform can tell us one.
pub fn dirs_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}

/// Configuration directory: $KCOPILOT_HOME/ or ~/.kcopilot/
pub fn config_dir() -> PathBuf {
    if let Some(home) = kcopilot_home() {
        return home;
    }
    dirs_home()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".kcopilot")
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Persisted bearer token
pub fn session_file_path() -> PathBuf {
    config_dir().join("session.json")
}
