use crate::config::ClientConfig;
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub loading: LoadingSection,
    #[serde(default)]
    pub flags: FlagsSection,
    #[serde(default)]
    pub auth: AuthSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub base_url: Option<String>,
    /// `alpha`, `local` or anything else for production; ignored when `base_url` is set.
    pub deployment: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadingSection {
    pub min_duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlagsSection {
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSection {
    pub token_path: Option<PathBuf>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ClientError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ClientError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_BASE_URL})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Layers the file's settings over `base`; unset keys keep the base value.
    pub fn apply_to(&self, mut base: ClientConfig) -> ClientConfig {
        if let Some(url) = &self.api.base_url {
            base.api_base_url = url.clone();
        } else if let Some(deployment) = &self.api.deployment {
            base.api_base_url =
                crate::adapters::resolve_api_base(Some(deployment.as_str())).to_string();
        }
        if let Some(secs) = self.api.timeout_seconds {
            base.request_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = self.loading.min_duration_ms {
            base.min_loading_duration = Duration::from_millis(ms);
        }
        if let Some(ms) = self.flags.poll_interval_ms {
            base.flags_poll_interval = Duration::from_millis(ms);
        }
        if let Some(path) = &self.auth.token_path {
            base.token_path = Some(path.clone());
        }
        base
    }

    pub fn into_client_config(self) -> ClientConfig {
        self.apply_to(ClientConfig::default())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.clone().into_client_config().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[api]
base_url = "https://alpha.openhack.ro"
timeout_seconds = 5

[loading]
min_duration_ms = 250

[flags]
poll_interval_ms = 2000

[auth]
token_path = "/tmp/openhack/token.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content)
            .unwrap()
            .into_client_config();

        assert_eq!(config.api_base_url(), "https://alpha.openhack.ro");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.min_loading_duration(), Duration::from_millis(250));
        assert_eq!(config.flags_poll_interval(), Duration::from_millis(2000));
        assert_eq!(
            config.token_path(),
            Some(Path::new("/tmp/openhack/token.json"))
        );
    }

    #[test]
    fn test_empty_file_keeps_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap().into_client_config();
        let defaults = ClientConfig::default();
        assert_eq!(config.min_loading_duration(), defaults.min_loading_duration());
        assert_eq!(config.request_timeout(), defaults.request_timeout());
    }

    #[test]
    fn test_deployment_selects_backend() {
        let config = TomlConfig::from_toml_str("[api]\ndeployment = \"local\"\n")
            .unwrap()
            .into_client_config();
        assert_eq!(config.api_base_url(), "http://localhost:9000/");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("OPENHACK_TEST_BASE_URL", "https://test.openhack.ro");

        let toml_content = r#"
[api]
base_url = "${OPENHACK_TEST_BASE_URL}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.api.base_url.as_deref(),
            Some("https://test.openhack.ro")
        );

        std::env::remove_var("OPENHACK_TEST_BASE_URL");
    }

    #[test]
    fn test_config_validation() {
        let invalid_url = TomlConfig::from_toml_str("[api]\nbase_url = \"invalid-url\"\n").unwrap();
        assert!(invalid_url.validate().is_err());

        let zero_poll = TomlConfig::from_toml_str("[flags]\npoll_interval_ms = 0\n").unwrap();
        assert!(zero_poll.validate().is_err());

        // 0 ms 表示停用最短顯示時間，屬合法設定
        let no_smoothing = TomlConfig::from_toml_str("[loading]\nmin_duration_ms = 0\n").unwrap();
        assert!(no_smoothing.validate().is_ok());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[flags]\npoll_interval_ms = 1500\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.flags.poll_interval_ms, Some(1500));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[api\nbase_url = 1").unwrap_err();
        assert!(matches!(err, ClientError::Config { .. }));
    }
}
