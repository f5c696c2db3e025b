// Configuration: endpoint, token and feature toggles.
//
// Settings come from `~/.memos.conf` (dotenv syntax) with process
// environment variables of the same name taking precedence. The resulting
// `Config` is built once per invocation and never changes afterwards.

use crate::error::ConfigError;
use crate::model::Visibility;
use reqwest::header::HeaderValue;
use reqwest::Url;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const CONFIG_FILE_NAME: &str = ".memos.conf";

pub const KEY_URL: &str = "MEMOS_URL";
pub const KEY_TOKEN: &str = "MEMOS_TOKEN";
pub const KEY_VISIBILITY: &str = "MEMOS_VISIBILITY";
pub const KEY_ADVANCED: &str = "MEMOS_ADVANCED_FEATURES";
pub const KEY_CODE_FENCE: &str = "MEMOS_CODE_FENCE";

const KEYS: [&str; 5] = [KEY_URL, KEY_TOKEN, KEY_VISIBILITY, KEY_ADVANCED, KEY_CODE_FENCE];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the instance, without a trailing slash.
    pub endpoint: String,
    pub token: String,
    pub default_visibility: Visibility,
    /// Opt-in for clipboard posting, list-last and search.
    pub advanced_enabled: bool,
    /// Wrap posted content in a ```text fenced block.
    pub code_fence: bool,
}

/// `~/.memos.conf`, if a home directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

impl Config {
    /// Load from the default file location and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = default_config_path();
        Self::load_from(path.as_deref(), |key| std::env::var(key).ok())
    }

    /// Load from `path` (a missing file is fine) and an environment lookup.
    pub fn load_from(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(p) => read_file(p)?,
            None => HashMap::new(),
        };
        for key in KEYS {
            if let Some(value) = env(key) {
                settings.insert(key.to_string(), value);
            }
        }
        let location = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "the environment".to_string());
        Self::from_settings(&settings, &location)
    }

    /// Validate a flat key/value map into a `Config`.
    pub fn from_settings(
        settings: &HashMap<String, String>,
        location: &str,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            settings
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let endpoint = get(KEY_URL).ok_or_else(|| ConfigError::MissingCredential {
            key: KEY_URL,
            location: location.to_string(),
        })?;
        let token = get(KEY_TOKEN).ok_or_else(|| ConfigError::MissingCredential {
            key: KEY_TOKEN,
            location: location.to_string(),
        })?;

        let endpoint = normalize_endpoint(endpoint)?;
        if HeaderValue::from_str(&format!("Bearer {token}")).is_err() {
            return Err(ConfigError::InvalidToken);
        }

        let default_visibility = match get(KEY_VISIBILITY) {
            None => Visibility::Private,
            Some(raw) => raw.parse().unwrap_or_else(|bad| {
                warn!("unknown {KEY_VISIBILITY} {bad:?}, falling back to PRIVATE");
                Visibility::Private
            }),
        };

        Ok(Config {
            endpoint,
            token: token.to_string(),
            default_visibility,
            advanced_enabled: parse_flag(KEY_ADVANCED, get(KEY_ADVANCED)),
            code_fence: parse_flag(KEY_CODE_FENCE, get(KEY_CODE_FENCE)),
        })
    }
}

fn read_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(dotenvy::Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
            return Ok(HashMap::new());
        }
        Err(source) => {
            return Err(ConfigError::Unreadable {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut settings = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        settings.insert(key, value);
    }
    Ok(settings)
}

fn normalize_endpoint(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim_end_matches('/');
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            Ok(trimmed.to_string())
        }
        _ => Err(ConfigError::InvalidEndpoint(raw.to_string())),
    }
}

/// Boolean-like toggle; anything unrecognized counts as off.
fn parse_flag(key: &str, raw: Option<&str>) -> bool {
    let Some(raw) = raw else { return false };
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => {
            warn!("{key}={raw:?} is not a boolean, treating it as false");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn minimal_settings_use_defaults() {
        let cfg = Config::from_settings(
            &settings(&[(KEY_URL, "https://memos.example/"), (KEY_TOKEN, "abc")]),
            "test",
        )
        .unwrap();
        assert_eq!(cfg.endpoint, "https://memos.example");
        assert_eq!(cfg.token, "abc");
        assert_eq!(cfg.default_visibility, Visibility::Private);
        assert!(!cfg.advanced_enabled);
        assert!(!cfg.code_fence);
    }

    #[test]
    fn missing_token_is_fatal() {
        let err = Config::from_settings(&settings(&[(KEY_URL, "https://m.example")]), "test")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingCredential { key: KEY_TOKEN, .. }
        ));
    }

    #[test]
    fn blank_url_counts_as_missing() {
        let err = Config::from_settings(&settings(&[(KEY_URL, "  "), (KEY_TOKEN, "t")]), "test")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingCredential { key: KEY_URL, .. }
        ));
    }

    #[test]
    fn non_http_url_is_rejected() {
        let err = Config::from_settings(
            &settings(&[(KEY_URL, "ftp://memos.example"), (KEY_TOKEN, "t")]),
            "test",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint(_)));
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let err = Config::from_settings(
            &settings(&[(KEY_URL, "https://m.example"), (KEY_TOKEN, "a\nb")]),
            "test",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidToken));
    }

    #[test]
    fn unknown_visibility_falls_back_to_private() {
        let cfg = Config::from_settings(
            &settings(&[
                (KEY_URL, "https://m.example"),
                (KEY_TOKEN, "t"),
                (KEY_VISIBILITY, "friends-only"),
            ]),
            "test",
        )
        .unwrap();
        assert_eq!(cfg.default_visibility, Visibility::Private);
    }

    #[test]
    fn advanced_flag_fails_closed() {
        for (raw, expected) in [
            ("TRUE", true),
            ("yes", true),
            ("1", true),
            ("false", false),
            ("maybe", false),
            ("", false),
        ] {
            let cfg = Config::from_settings(
                &settings(&[
                    (KEY_URL, "https://m.example"),
                    (KEY_TOKEN, "t"),
                    (KEY_ADVANCED, raw),
                ]),
                "test",
            )
            .unwrap();
            assert_eq!(cfg.advanced_enabled, expected, "value {raw:?}");
        }
    }

    #[test]
    fn reads_dotenv_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "# memos\nMEMOS_URL=\"https://memos.example\"\nMEMOS_TOKEN=\"tok\"\nMEMOS_VISIBILITY=\"PUBLIC\"\nMEMOS_ADVANCED_FEATURES=\"true\"\n",
        )
        .unwrap();

        let cfg = Config::load_from(Some(path.as_path()), no_env).unwrap();
        assert_eq!(cfg.endpoint, "https://memos.example");
        assert_eq!(cfg.token, "tok");
        assert_eq!(cfg.default_visibility, Visibility::Public);
        assert!(cfg.advanced_enabled);
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "MEMOS_URL=https://file.example\nMEMOS_TOKEN=file\n").unwrap();

        let cfg = Config::load_from(Some(path.as_path()), |key| {
            (key == KEY_TOKEN).then(|| "from-env".to_string())
        })
        .unwrap();
        assert_eq!(cfg.endpoint, "https://file.example");
        assert_eq!(cfg.token, "from-env");
    }

    #[test]
    fn missing_file_reports_missing_credentials() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.conf");
        let err = Config::load_from(Some(path.as_path()), no_env).unwrap_err();
        match err {
            ConfigError::MissingCredential { key, location } => {
                assert_eq!(key, KEY_URL);
                assert!(location.ends_with("absent.conf"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
