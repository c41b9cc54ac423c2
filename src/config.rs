use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::accumulator::{AccumulatorConfig, MergeRule};
use crate::client::{ClientSettings, DEFAULT_ENDPOINT};
use crate::error::{BrowseError, Result};

const ENDPOINT_ENV: &str = "CHARS_ENDPOINT";

#[derive(Deserialize, Default, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub merge_rule: Option<MergeRule>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(config_path).map_err(|e| BrowseError::ConfigRead {
                path: config_path.to_path_buf(),
                source: e,
            })?;

        toml::from_str(&contents).map_err(|e| BrowseError::ConfigParse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "chars")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(BrowseError::NoConfigDir)
    }

    /// Resolve the endpoint: explicit argument, then env var, then config file
    pub fn endpoint(&self, explicit: Option<&str>) -> String {
        if let Some(endpoint) = explicit {
            return endpoint.to_string();
        }

        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                return endpoint;
            }
        }

        self.endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    pub fn client_settings(&self, timeout_override: Option<u64>) -> ClientSettings {
        let defaults = ClientSettings::default();
        ClientSettings {
            connect_timeout: self
                .connect_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            request_timeout: timeout_override
                .or(self.timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }

    pub fn accumulator_config(
        &self,
        endpoint: Option<&str>,
        merge_rule: Option<MergeRule>,
    ) -> AccumulatorConfig {
        AccumulatorConfig::new(self.endpoint(endpoint))
            .with_merge_rule(merge_rule.or(self.merge_rule).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parses_all_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
endpoint = "http://localhost:3000/api/character/"
timeout_secs = 5
connect_timeout_secs = 2
merge_rule = "prev-link"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(
            config.endpoint.as_deref(),
            Some("http://localhost:3000/api/character/")
        );
        assert_eq!(config.merge_rule, Some(MergeRule::PrevLink));

        let settings = config.client_settings(None);
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert_eq!(settings.connect_timeout, Duration::from_secs(2));
        assert_eq!(
            config.client_settings(Some(9)).request_timeout,
            Duration::from_secs(9)
        );
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key = \"nope\"").unwrap();
        assert!(matches!(
            Config::load_from(file.path()),
            Err(BrowseError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_explicit_endpoint_wins() {
        let config = Config {
            endpoint: Some("http://file.example/".to_string()),
            ..Config::default()
        };
        assert_eq!(config.endpoint(Some("http://flag.example/")), "http://flag.example/");
    }

    #[test]
    fn test_merge_rule_defaults_to_reason() {
        let acc = Config::default().accumulator_config(Some("http://flag.example/"), None);
        assert_eq!(acc.merge_rule, MergeRule::Reason);
        assert_eq!(acc.endpoint, "http://flag.example/");
    }
}
