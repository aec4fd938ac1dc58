//! User settings: `settings.json` in the config dir, then `PAIRS_*`
//! environment overrides.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

const APP_DIR_NAME: &str = "pairs";
const SETTINGS_FILE_NAME: &str = "settings.json";
const ENV_MISMATCH_DELAY_MS: &str = "PAIRS_MISMATCH_DELAY_MS";
const ENV_SEED: &str = "PAIRS_SEED";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How long a mismatched pair stays face up.
    pub mismatch_delay_ms: u64,
    /// Fixed shuffle seed; random when unset.
    pub seed: Option<u64>,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            mismatch_delay_ms: 1000,
            seed: None,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Reads the settings file and environment. Every problem found is
    /// returned next to the settings, with the affected values left at their
    /// defaults, so the caller can report them once logging is up.
    pub fn load() -> (Self, Vec<ConfigError>) {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// [`Settings::load`] with every environment read going through `lookup`.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> (Self, Vec<ConfigError>) {
        let mut problems = Vec::new();
        let mut settings = match settings_path(&lookup).map(|path| Self::from_file(&path)) {
            Some(Ok(Some(settings))) => settings,
            Some(Err(err)) => {
                problems.push(err);
                Settings::default()
            }
            Some(Ok(None)) | None => Settings::default(),
        };
        problems.extend(settings.apply_env(lookup));
        (settings, problems)
    }

    /// `Ok(None)` when the file does not exist.
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_json(&raw).map(Some),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Applies overrides from `lookup` and returns the ones it rejected.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(raw) = lookup(ENV_MISMATCH_DELAY_MS) {
            match raw.trim().parse() {
                Ok(value) => self.mismatch_delay_ms = value,
                Err(_) => errors.push(ConfigError::InvalidValue {
                    key: ENV_MISMATCH_DELAY_MS,
                    value: raw,
                }),
            }
        }
        if let Some(raw) = lookup(ENV_SEED) {
            match raw.trim().parse() {
                Ok(value) => self.seed = Some(value),
                Err(_) => errors.push(ConfigError::InvalidValue {
                    key: ENV_SEED,
                    value: raw,
                }),
            }
        }
        errors
    }

    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms)
    }
}

fn settings_path(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    let base = match lookup("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(lookup("HOME")?).join(".config"),
    };
    Some(base.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_hold_a_one_second_delay() {
        let settings = Settings::default();
        assert_eq!(settings.mismatch_delay(), Duration::from_secs(1));
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42 }"#).unwrap();
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.mismatch_delay_ms, 1000);
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            Settings::from_json("{ seed: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_overrides_win() {
        let mut settings = Settings::default();
        let errors = settings.apply_env(env(&[
            ("PAIRS_MISMATCH_DELAY_MS", "250"),
            ("PAIRS_SEED", " 7 "),
        ]));
        assert!(errors.is_empty());
        assert_eq!(settings.mismatch_delay_ms, 250);
        assert_eq!(settings.seed, Some(7));
    }

    #[test]
    fn bad_env_values_are_reported_and_skipped() {
        let mut settings = Settings::default();
        let errors = settings.apply_env(env(&[("PAIRS_MISMATCH_DELAY_MS", "soon")]));
        assert_eq!(errors.len(), 1);
        assert_eq!(settings.mismatch_delay_ms, 1000);
    }

    /// A scratch config dir holding `pairs/settings.json` with `contents`.
    fn config_home(name: &str, contents: &str) -> PathBuf {
        let home = std::env::temp_dir().join(format!("pairs-{name}-{}", std::process::id()));
        let dir = home.join(APP_DIR_NAME);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(SETTINGS_FILE_NAME), contents).unwrap();
        home
    }

    #[test]
    fn settings_path_prefers_xdg_then_home() {
        assert_eq!(
            settings_path(env(&[("XDG_CONFIG_HOME", "/xdg"), ("HOME", "/home/u")])),
            Some(PathBuf::from("/xdg/pairs/settings.json"))
        );
        assert_eq!(
            settings_path(env(&[("XDG_CONFIG_HOME", ""), ("HOME", "/home/u")])),
            Some(PathBuf::from("/home/u/.config/pairs/settings.json"))
        );
        assert_eq!(settings_path(env(&[])), None);
    }

    #[test]
    fn load_reads_the_file_then_applies_env() {
        let home = config_home("load-ok", r#"{ "mismatch_delay_ms": 400, "seed": 3 }"#);
        let (settings, problems) = Settings::load_with(env(&[
            ("XDG_CONFIG_HOME", home.to_str().unwrap()),
            ("PAIRS_SEED", "nine"),
        ]));
        fs::remove_dir_all(&home).unwrap();

        assert_eq!(settings.mismatch_delay_ms, 400);
        assert_eq!(settings.seed, Some(3));
        assert!(matches!(
            problems.as_slice(),
            [ConfigError::InvalidValue { key: "PAIRS_SEED", .. }]
        ));
    }

    #[test]
    fn load_reports_a_broken_file_and_a_bad_env_value() {
        let home = config_home("load-broken", "{ not json");
        let (settings, problems) = Settings::load_with(env(&[
            ("HOME", "/nowhere"),
            ("XDG_CONFIG_HOME", home.to_str().unwrap()),
            ("PAIRS_MISMATCH_DELAY_MS", "-5"),
        ]));
        fs::remove_dir_all(&home).unwrap();

        assert_eq!(settings, Settings::default());
        assert!(matches!(
            problems.as_slice(),
            [
                ConfigError::Parse(_),
                ConfigError::InvalidValue { key: "PAIRS_MISMATCH_DELAY_MS", .. }
            ]
        ));
    }

    #[test]
    fn load_without_any_config_dir_uses_defaults() {
        let (settings, problems) = Settings::load_with(env(&[]));
        assert_eq!(settings, Settings::default());
        assert!(problems.is_empty());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = PathBuf::from("/definitely/not/here/settings.json");
        assert!(matches!(Settings::from_file(&path), Ok(None)));
    }
}
