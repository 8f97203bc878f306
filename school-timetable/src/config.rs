use std::path::PathBuf;

/// Runtime settings for the CLI and the web collaborator.
///
/// Defaults are overridden by environment variables in [`AppConfig::from_env`]
/// and then by command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Teacher records; `.csv` selects the CSV layout, anything else JSON.
    pub registry_path: PathBuf,
    /// Where `generate` writes the rendered grid.
    pub output_path: PathBuf,
    pub port: u16,
    /// Required in `X-Admin-Password` for mutating web endpoints.
    pub admin_password: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            registry_path: PathBuf::from("teachers.json"),
            output_path: PathBuf::from("timetable.txt"),
            port: 8080,
            admin_password: "admin123".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`; unparsable values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = lookup("TIMETABLE_REGISTRY") {
            config.registry_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("TIMETABLE_OUTPUT") {
            config.output_path = PathBuf::from(path);
        }
        if let Some(port) = lookup("TIMETABLE_PORT").and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        if let Some(password) = lookup("ADMIN_PASSWORD") {
            config.admin_password = password;
        }
        if let Some(level) = lookup("TIMETABLE_LOG") {
            config.log_level = level;
        }
        config
    }
}
