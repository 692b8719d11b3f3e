use crate::core::client::DEFAULT_ENDPOINT;
use crate::core::ConfigProvider;
use crate::domain::model::{FormFactor, QueryConfig, QueryType};
use crate::utils::error::{Result, VitalsError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub query: QuerySection,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuerySection {
    #[serde(default, rename = "type")]
    pub query_type: QueryType,
    #[serde(default)]
    pub form_factor: FormFactor,
    #[serde(default)]
    pub domains: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    #[serde(default)]
    pub archive: bool,
    #[serde(default)]
    pub show_raw: bool,
    #[serde(default)]
    pub summary: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_formats() -> Vec<String> {
    vec!["console".to_string()]
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            timeout_seconds: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            formats: default_formats(),
            archive: false,
            show_raw: false,
            summary: false,
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(VitalsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| VitalsError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CRUX_API_KEY})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 取得有效的 API key；空白或未替換的 `${...}` 視為未設定
    fn resolved_api_key(&self) -> Option<&str> {
        self.api
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !env_var_pattern().is_match(key))
    }

    pub fn output_path(&self) -> &str {
        &self.output.path
    }

    pub fn show_raw(&self) -> bool {
        self.output.show_raw
    }

    pub fn show_summary(&self) -> bool {
        self.output.summary
    }

    pub fn wants_console(&self) -> bool {
        self.output.formats.iter().any(|f| f == "console")
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.api.endpoint
    }

    fn api_key(&self) -> Option<&str> {
        self.resolved_api_key()
    }

    fn domains(&self) -> &[String] {
        &self.query.domains
    }

    fn query_config(&self) -> QueryConfig {
        QueryConfig {
            query_type: self.query.query_type,
            form_factor: self.query.form_factor,
        }
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn archive(&self) -> bool {
        self.output.archive
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.api.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.endpoint", &self.api.endpoint)?;

        if self.resolved_api_key().is_none() {
            return Err(VitalsError::MissingConfigError {
                field: "api_key".to_string(),
            });
        }

        validation::validate_non_empty_string("output.path", &self.output.path)?;
        validation::validate_output_formats("output.formats", &self.output.formats)?;

        if self.output.archive && !self.output.formats.iter().any(|f| f != "console") {
            return Err(VitalsError::InvalidConfigValueError {
                field: "output.archive".to_string(),
                value: "true".to_string(),
                reason: "archive needs at least one of json or csv".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[api]
endpoint = "https://crux.example.com/v1/records:queryRecord"
api_key = "abc123"
timeout_seconds = 10

[query]
type = "url"
form_factor = "DESKTOP"
domains = ["example.com/page", "example.org"]

[output]
path = "./reports"
formats = ["console", "json"]
archive = true
show_raw = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_key(), Some("abc123"));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.query_config().query_type, QueryType::Url);
        assert_eq!(config.query_config().form_factor, FormFactor::Desktop);
        assert_eq!(config.domains().len(), 2);
        assert_eq!(config.output_path(), "./reports");
        assert!(config.archive());
        assert!(config.show_raw());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_for_missing_sections() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.api_endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.query_config(), QueryConfig::default());
        assert_eq!(config.query_config().form_factor, FormFactor::Phone);
        assert_eq!(config.output_formats(), ["console".to_string()]);
        assert!(config.wants_console());
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CRUX_VITALS_TEST_KEY", "from-env");

        let config = TomlConfig::from_toml_str(
            r#"
[api]
api_key = "${CRUX_VITALS_TEST_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.api_key(), Some("from-env"));

        std::env::remove_var("CRUX_VITALS_TEST_KEY");
    }

    #[test]
    fn test_unresolved_api_key_fails_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
api_key = "${CRUX_VITALS_UNSET_VARIABLE}"
"#,
        )
        .unwrap();

        assert_eq!(config.api_key(), None);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, VitalsError::MissingConfigError { .. }));
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
endpoint = "invalid-url"
api_key = "abc"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[api]
api_key = "abc"

[output]
formats = ["xml"]
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[api]
api_key = "abc"

[output]
archive = true
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_selector_is_parse_error() {
        let result = TomlConfig::from_toml_str(
            r#"
[query]
form_factor = "TABLET"
"#,
        );
        assert!(matches!(result, Err(VitalsError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[query]
domains = ["www.homes.com", "www.apartments.com"]
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.domains(), ["www.homes.com", "www.apartments.com"]);
    }
}
