use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration. All fields are optional so partial configs
/// work; CLI flags and env vars take precedence over anything here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Gmail label holding the Scholar alert emails.
    pub label: Option<String>,
    /// Default report format (markdown, html, json, jsonl).
    pub format: Option<String>,
    /// Number of concurrent Gmail API requests.
    pub concurrency: Option<usize>,
    /// OAuth bearer token for the Gmail API.
    pub token: Option<String>,
}

/// Platform config path: `<config_dir>/scholar-digest/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("scholar-digest").join("config.toml"))
}

/// Load config by cascading CWD `.scholar-digest.toml` over the platform
/// config. CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".scholar-digest.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        label: overlay.label.or(base.label),
        format: overlay.format.or(base.format),
        concurrency: overlay.concurrency.or(base.concurrency),
        token: overlay.token.or(base.token),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn overlay_wins_where_set() {
        let base = ConfigFile {
            label: Some("scholar".to_string()),
            format: Some("markdown".to_string()),
            concurrency: Some(10),
            token: None,
        };
        let overlay = ConfigFile {
            label: Some("alerts".to_string()),
            format: None,
            concurrency: None,
            token: Some("t".to_string()),
        };

        let merged = merge(base, overlay);
        assert_eq!(merged.label.as_deref(), Some("alerts"));
        assert_eq!(merged.format.as_deref(), Some("markdown"));
        assert_eq!(merged.concurrency, Some(10));
        assert_eq!(merged.token.as_deref(), Some("t"));
    }

    #[test]
    fn partial_file_parses() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "label = \"ml-in-se\"").unwrap();
        let cfg = load_from_path(f.path()).unwrap();
        assert_eq!(cfg.label.as_deref(), Some("ml-in-se"));
        assert!(cfg.format.is_none());
    }

    #[test]
    fn missing_file_is_none() {
        assert!(load_from_path(Path::new("/nonexistent/config.toml")).is_none());
    }
}
