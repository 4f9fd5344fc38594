//! Data directory resolution and config loading.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use mobilia_types::config::AppConfig;

/// Resolve the data directory: `MOBILIA_DATA_DIR` when set, otherwise
/// `~/.mobilia`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MOBILIA_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".mobilia"))
        .unwrap_or_else(|| PathBuf::from(".mobilia"))
}

/// The SQLite database URL inside the data directory.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("mobilia.db").display())
}

/// Root directory for product image files.
pub fn media_root(data_dir: &Path) -> PathBuf {
    data_dir.join("media")
}

/// Load `config.toml` from the data directory. A missing file yields the
/// defaults; a present but malformed file is an error.
pub fn load_config(data_dir: &Path) -> anyhow::Result<AppConfig> {
    let path = data_dir.join("config.toml");
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// API key for the completion service, from `OPENAI_API_KEY`.
pub fn openai_api_key() -> Option<String> {
    std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[assistant]\nsite_name = \"Testoria\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.assistant.site_name, "Testoria");
        assert_eq!(config.assistant.model, "gpt-4o-mini");
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "not [valid toml").unwrap();
        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn database_url_points_into_data_dir() {
        let url = database_url(Path::new("/tmp/mobilia"));
        assert!(url.starts_with("sqlite://"));
        assert!(url.contains("/tmp/mobilia/mobilia.db"));
    }
}
