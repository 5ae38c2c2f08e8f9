use crate::core::partition::{DEFAULT_GROUP_SIZE, DEFAULT_THEME, MAX_GROUP_SIZE, MIN_GROUP_SIZE};
use crate::domain::model::{CongratulationMode, DEFAULT_CONGRATULATION_TEMPLATE};
use crate::utils::error::{RaffleError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub collaborator: CollaboratorConfig,
    #[serde(default)]
    pub raffle: RaffleConfig,
    #[serde(default)]
    pub grouping: GroupingConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollaboratorConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaffleConfig {
    pub allow_repeat: Option<bool>,
    pub mode: Option<CongratulationMode>,
    pub template: Option<String>,
    pub rolling_frames: Option<usize>,
    pub rolling_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupingConfig {
    pub group_size: Option<usize>,
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    pub output_path: Option<String>,
}

impl CollaboratorConfig {
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(10)
    }

    /// Configured key, ignoring blanks and unresolved `${VAR}` placeholders.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !k.starts_with("${"))
    }
}

impl RaffleConfig {
    pub fn allow_repeat(&self) -> bool {
        self.allow_repeat.unwrap_or(false)
    }

    pub fn mode(&self) -> CongratulationMode {
        self.mode.unwrap_or_default()
    }

    pub fn template(&self) -> &str {
        self.template.as_deref().unwrap_or(DEFAULT_CONGRATULATION_TEMPLATE)
    }

    pub fn rolling_frames(&self) -> usize {
        self.rolling_frames.unwrap_or(30)
    }

    pub fn rolling_interval_ms(&self) -> u64 {
        self.rolling_interval_ms.unwrap_or(80)
    }
}

impl GroupingConfig {
    pub fn group_size(&self) -> usize {
        self.group_size.unwrap_or(DEFAULT_GROUP_SIZE)
    }

    pub fn theme(&self) -> &str {
        self.theme.as_deref().unwrap_or(DEFAULT_THEME)
    }
}

impl ExportConfig {
    pub fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or("./output")
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RaffleError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RaffleError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 若配置未提供 API key，依序嘗試環境變數
    pub fn apply_env_defaults(&mut self) {
        if self.collaborator.api_key().is_some() {
            return;
        }
        if let Some(key) = API_KEY_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|v| !v.trim().is_empty())
        {
            self.collaborator.api_key = Some(key);
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("collaborator.endpoint", self.collaborator.endpoint())?;
        validation::validate_non_empty_string("collaborator.model", self.collaborator.model())?;
        validation::validate_range(
            "collaborator.timeout_seconds",
            self.collaborator.timeout_seconds(),
            1,
            120,
        )?;

        // 群組大小在使用時會被夾住，但配置檔寫錯仍應提示
        validation::validate_range(
            "grouping.group_size",
            self.grouping.group_size(),
            MIN_GROUP_SIZE,
            MAX_GROUP_SIZE,
        )?;
        validation::validate_non_empty_string("grouping.theme", self.grouping.theme())?;

        validation::validate_path("export.output_path", self.export.output_path())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.collaborator.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.grouping.group_size(), 4);
        assert_eq!(config.grouping.theme(), "创意小组");
        assert!(!config.raffle.allow_repeat());
        assert_eq!(config.raffle.mode(), CongratulationMode::Template);
        assert!(config.collaborator.api_key().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[collaborator]
endpoint = "http://localhost:9000"
model = "m1"
api_key = "abc"
timeout_seconds = 3

[raffle]
allow_repeat = true
mode = "generated"
template = "funny"
rolling_frames = 0

[grouping]
group_size = 6
theme = "Team"

[export]
output_path = "./exports"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.collaborator.api_key(), Some("abc"));
        assert_eq!(config.raffle.mode(), CongratulationMode::Generated);
        assert_eq!(config.raffle.rolling_frames(), 0);
        assert_eq!(config.grouping.group_size(), 6);
        assert_eq!(config.export.output_path(), "./exports");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RAFFLE_KIT_TEST_KEY", "from-env");
        let config = TomlConfig::from_toml_str(
            r#"
[collaborator]
api_key = "${RAFFLE_KIT_TEST_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.collaborator.api_key(), Some("from-env"));
        std::env::remove_var("RAFFLE_KIT_TEST_KEY");
    }

    #[test]
    fn test_unresolved_placeholder_is_not_a_key() {
        let config = TomlConfig::from_toml_str(
            r#"
[collaborator]
api_key = "${RAFFLE_KIT_SURELY_UNSET_VAR}"
"#,
        )
        .unwrap();
        assert!(config.collaborator.api_key().is_none());
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[collaborator]
endpoint = "not-a-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[grouping]\ngroup_size = 1\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[grouping\n").unwrap_err();
        assert!(matches!(err, RaffleError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[grouping]\ntheme = \"File Team\"\n")
            .unwrap();
        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.grouping.theme(), "File Team");
    }
}
