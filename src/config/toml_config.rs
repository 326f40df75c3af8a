use crate::core::header::{DEFAULT_MIN_KEYWORD_MATCHES, DEFAULT_SCAN_LINES};
use crate::core::ConfigProvider;
use crate::utils::error::{IngestError, Result};
use crate::utils::validation::{validate_path, validate_positive_number, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub store: StoreConfig,
    pub header: Option<HeaderConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderConfig {
    pub scan_lines: Option<usize>,
    pub min_keyword_matches: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub enabled: bool,
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(IngestError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| IngestError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${STORE_DIR})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("store.path", &self.store.path)?;
        validate_range("header.scan_lines", self.header_scan_lines(), 1, 1000)?;
        validate_positive_number(
            "header.min_keyword_matches",
            self.header_min_keyword_matches(),
            1,
        )?;

        if let Some(level) = self.log_level() {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level) {
                return Err(IngestError::InvalidConfigValueError {
                    field: "monitoring.log_level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }
        Ok(())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn store_path(&self) -> &str {
        &self.store.path
    }

    fn header_scan_lines(&self) -> usize {
        self.header
            .as_ref()
            .and_then(|h| h.scan_lines)
            .unwrap_or(DEFAULT_SCAN_LINES)
    }

    fn header_min_keyword_matches(&self) -> usize {
        self.header
            .as_ref()
            .and_then(|h| h.min_keyword_matches)
            .unwrap_or(DEFAULT_MIN_KEYWORD_MATCHES)
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
