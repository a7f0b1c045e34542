use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use vendor_provision::layout::DEFAULT_VENDOR_ROOT;
use vendor_provision::targets::MINGIT_URL;

pub const DEFAULT_CONFIG_FILE: &str = "vendor-prep.toml";

const ENV_ROOT: &str = "VENDOR_PREP_ROOT";
const ENV_MINGIT_URL: &str = "VENDOR_PREP_MINGIT_URL";
const ENV_TIMEOUT_SECS: &str = "VENDOR_PREP_TIMEOUT_SECS";

/// Optional `vendor-prep.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub root: Option<String>,
    pub mingit_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub root: Option<String>,
    pub mingit_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub root: PathBuf,
    pub mingit_url: String,
    pub timeout: Option<Duration>,
}

/// Reads the explicit config file, or the default one when it exists.
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return Ok(FileConfig::default());
            }
            default
        }
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_file_config(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_file_config(text: &str) -> Result<FileConfig> {
    Ok(toml::from_str(text)?)
}

pub fn resolve_settings(overrides: Overrides) -> Result<Settings> {
    let file = load_file_config(overrides.config.as_deref())?;
    resolve_settings_with(overrides, file, |key| std::env::var(key).ok())
}

/// Flag, then environment, then file, then default.
pub fn resolve_settings_with<F>(overrides: Overrides, file: FileConfig, env: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let root = normalize_optional(overrides.root)
        .or_else(|| normalize_optional(env(ENV_ROOT)))
        .or_else(|| normalize_optional(file.root))
        .unwrap_or_else(|| DEFAULT_VENDOR_ROOT.to_string());

    let mingit_url = normalize_optional(overrides.mingit_url)
        .or_else(|| normalize_optional(env(ENV_MINGIT_URL)))
        .or_else(|| normalize_optional(file.mingit_url))
        .unwrap_or_else(|| MINGIT_URL.to_string());

    let env_timeout = match normalize_optional(env(ENV_TIMEOUT_SECS)) {
        Some(value) => Some(
            value
                .parse::<u64>()
                .with_context(|| format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds"))?,
        ),
        None => None,
    };
    let timeout = overrides
        .timeout_secs
        .or(env_timeout)
        .or(file.timeout_secs)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);

    Ok(Settings {
        root: PathBuf::from(root),
        mingit_url,
        timeout,
    })
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_any_source() {
        let settings =
            resolve_settings_with(Overrides::default(), FileConfig::default(), env_from(&[]))
                .expect("resolve");

        assert_eq!(settings.root, PathBuf::from("vendor"));
        assert_eq!(settings.mingit_url, MINGIT_URL);
        assert_eq!(settings.timeout, None);
    }

    #[test]
    fn flags_beat_environment_beat_file() {
        let file = parse_file_config(
            "root = \"from-file\"\nmingit_url = \"https://file.example/mingit.zip\"\ntimeout_secs = 30\n",
        )
        .expect("parse");
        let env = env_from(&[
            (ENV_ROOT, "from-env"),
            (ENV_MINGIT_URL, "https://env.example/mingit.zip"),
        ]);
        let overrides = Overrides {
            root: Some("from-flag".into()),
            ..Default::default()
        };

        let settings = resolve_settings_with(overrides, file, env).expect("resolve");
        assert_eq!(settings.root, PathBuf::from("from-flag"));
        assert_eq!(settings.mingit_url, "https://env.example/mingit.zip");
        assert_eq!(settings.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let overrides = Overrides {
            root: Some("   ".into()),
            ..Default::default()
        };
        let env = env_from(&[(ENV_ROOT, ""), (ENV_TIMEOUT_SECS, " ")]);

        let settings =
            resolve_settings_with(overrides, FileConfig::default(), env).expect("resolve");
        assert_eq!(settings.root, PathBuf::from("vendor"));
        assert_eq!(settings.timeout, None);
    }

    #[test]
    fn zero_timeout_disables_the_limit() {
        let overrides = Overrides {
            timeout_secs: Some(0),
            ..Default::default()
        };
        let file = FileConfig {
            timeout_secs: Some(60),
            ..Default::default()
        };

        let settings = resolve_settings_with(overrides, file, env_from(&[])).expect("resolve");
        assert_eq!(settings.timeout, None);
    }

    #[test]
    fn invalid_timeout_in_environment_is_rejected() {
        let env = env_from(&[(ENV_TIMEOUT_SECS, "soon")]);
        let err = resolve_settings_with(Overrides::default(), FileConfig::default(), env)
            .expect_err("non-numeric timeout");
        assert!(err.to_string().contains(ENV_TIMEOUT_SECS));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_file_config("mirror = \"https://example\"\n").is_err());
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        let missing = temp.path().join("vendor-prep.toml");
        assert!(load_file_config(Some(&missing)).is_err());

        std::fs::write(&missing, "root = \"third_party\"\n").expect("write config");
        let file = load_file_config(Some(&missing)).expect("load config");
        assert_eq!(file.root.as_deref(), Some("third_party"));
    }
}
