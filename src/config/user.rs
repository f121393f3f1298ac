/// ユーザー設定モジュール
///
/// 実行時にユーザーディレクトリから読み込まれる動的設定を管理します。
/// Windows: C:\Users\<User>\AppData\Roaming\vidgen\config.toml
/// macOS:   /Users/<User>/Library/Application Support/vidgen/config.toml
/// Linux:   /home/<user>/.config/vidgen/config.toml
///
/// 初回起動時にデフォルト値から自動的にconfig.tomlを作成します。
/// APIキーを含むため、保存時は所有者のみ読み書き可能にします。
use crate::config::error::ConfigError;
use crate::config::permissions::restrict_to_owner;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// デフォルトのタイムゾーンオフセット（UTC）
const DEFAULT_TIMEZONE_OFFSET: i32 = 0;

/// タイムゾーンオフセットの最大値（+18時間 = 64800秒）
const MAX_TIMEZONE_OFFSET: i32 = 64800;

/// タイムゾーンオフセットの最小値（-18時間 = -64800秒）
const MIN_TIMEZONE_OFFSET: i32 = -64800;

/// Azure OpenAI 認証設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthConfig {
    /// APIキー（`api-key` ヘッダーで送る）
    pub api_key: String,

    /// リソース名、またはエンドポイントURL
    pub resource: String,
}

/// ユーザー設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserConfig {
    /// タイムゾーンオフセット(秒単位)
    /// 例: UTC=0, JST(UTC+9)=32400, PST(UTC-8)=-28800
    #[serde(default = "default_timezone_offset")]
    pub timezone_offset_seconds: i32,

    /// ステータス確認の間隔(秒)。未指定ならAPP_CONFIGの値
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_seconds: Option<u64>,

    /// ポーリングの最大待機時間(秒)。0 は無制限
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_wait_seconds: Option<u64>,

    /// APIリクエストのタイムアウト(秒)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_seconds: Option<u64>,

    /// 認証情報（TOMLではテーブルになるので最後に置く）
    pub auth: Option<AuthConfig>,
}

// プライベート関数（serde用）
fn default_timezone_offset() -> i32 {
    DEFAULT_TIMEZONE_OFFSET
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            auth: None,
            timezone_offset_seconds: DEFAULT_TIMEZONE_OFFSET,
            poll_interval_seconds: None,
            max_wait_seconds: None,
            request_timeout_seconds: None,
        }
    }
}

impl UserConfig {
    /// ユーザー設定ファイルのパスを取得
    ///
    /// # Errors
    /// 設定ディレクトリが取得できない場合に ConfigError::DirectoryNotFound を返します。
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .ok_or_else(|| ConfigError::directory_not_found("Failed to get user config directory"))
            .map(|config_dir| config_dir.join("vidgen").join("config.toml"))
    }

    /// ユーザー設定を読み込む
    ///
    /// 設定ファイルが存在しない場合は、デフォルトテンプレートから自動的に作成します。
    /// 読み込み後、自動的に検証を実行します（Fail Fast）。
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスからユーザー設定を読み込む
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            ConfigError::file_system(
                format!("Failed to read config file: {}", config_path.display()),
                e,
            )
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ConfigError::parse_error(
                format!("Failed to parse config file ({})", config_path.display()),
                e,
            )
        })?;

        config.validate()?;

        Ok(config)
    }

    /// デフォルト設定ファイルを作成
    fn create_default_config(config_path: &Path) -> Result<(), ConfigError> {
        Self::ensure_config_dir(config_path)?;

        fs::write(config_path, Self::default_toml_content()).map_err(|e| {
            ConfigError::file_system(
                format!("Failed to create default config file: {}", config_path.display()),
                e,
            )
        })?;

        Ok(())
    }

    /// デフォルトTOML設定を生成
    fn default_toml_content() -> String {
        format!(
            r#"# vidgen - User Configuration
# Credentials are set with 'vidgen login'.
# AZURE_API_KEY / AZURE_RESOURCE_NAME (environment or .env) take precedence.

# Timezone offset in seconds used when printing timestamps
# Examples: UTC=0, JST(UTC+9)=32400, PST(UTC-8)=-28800
timezone_offset_seconds = {}

# Seconds between status checks while waiting for a job
# poll_interval_seconds = 20

# Give up waiting after this many seconds (0 = wait forever)
# max_wait_seconds = 1800
"#,
            DEFAULT_TIMEZONE_OFFSET
        )
    }

    /// 設定ディレクトリがなければ作成し、所有者専用にする
    ///
    /// 既存のディレクトリのモードは変更しない。
    fn ensure_config_dir(config_path: &Path) -> Result<(), ConfigError> {
        let Some(parent) = config_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty() && !parent.exists())
        else {
            return Ok(());
        };

        fs::create_dir_all(parent).map_err(|e| {
            ConfigError::file_system(
                format!("Failed to create config directory: {}", parent.display()),
                e,
            )
        })?;
        restrict_to_owner(parent)
    }

    /// ユーザー設定を保存する
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// 指定パスにユーザー設定を保存する
    ///
    /// 必要に応じて設定ディレクトリを作成し、保存後にパーミッションを絞ります。
    pub fn save_to(&self, config_path: &Path) -> Result<(), ConfigError> {
        Self::ensure_config_dir(config_path)?;

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::serialize_error("Failed to serialize config", e))?;

        fs::write(config_path, content).map_err(|e| {
            ConfigError::file_system(
                format!("Failed to write config file: {}", config_path.display()),
                e,
            )
        })?;

        restrict_to_owner(config_path)?;

        Ok(())
    }

    /// ユーザー設定を検証
    ///
    /// # 検証内容
    /// - auth.api_key / auth.resource: 空文字列でないこと
    /// - timezone_offset_seconds: ±18時間以内
    /// - poll_interval_seconds / request_timeout_seconds: 1以上
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(auth) = &self.auth {
            Self::validate_auth_field(&auth.api_key, "api_key")?;
            Self::validate_auth_field(&auth.resource, "resource")?;
        }

        Self::validate_timezone_offset(self.timezone_offset_seconds)?;

        if self.poll_interval_seconds == Some(0) {
            return Err(ConfigError::validation_error(
                "poll_interval_seconds must be at least 1",
            ));
        }

        if self.request_timeout_seconds == Some(0) {
            return Err(ConfigError::validation_error(
                "request_timeout_seconds must be at least 1",
            ));
        }

        Ok(())
    }

    fn validate_auth_field(value: &str, field_name: &str) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::validation_error(format!(
                "Authentication {} cannot be empty. Please run 'vidgen login' again.",
                field_name
            )));
        }
        Ok(())
    }

    fn validate_timezone_offset(offset: i32) -> Result<(), ConfigError> {
        if !(MIN_TIMEZONE_OFFSET..=MAX_TIMEZONE_OFFSET).contains(&offset) {
            return Err(ConfigError::validation_error(format!(
                "Invalid timezone offset '{}' seconds. Must be between {} and {} (±18 hours)",
                offset, MIN_TIMEZONE_OFFSET, MAX_TIMEZONE_OFFSET
            )));
        }
        Ok(())
    }

    /// 認証情報を設定
    pub fn set_auth(&mut self, api_key: String, resource: String) {
        self.auth = Some(AuthConfig { api_key, resource });
    }

    /// 認証情報を取得
    pub fn get_auth(&self) -> Option<&AuthConfig> {
        self.auth.as_ref()
    }

    /// 認証情報が存在するかチェック
    pub fn has_auth(&self) -> bool {
        self.auth.is_some()
    }

    /// 認証情報を削除
    pub fn clear_auth(&mut self) {
        self.auth = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_config_path() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("vidgen").join("config.toml");
        (temp_dir, path)
    }

    #[test]
    fn test_has_auth() {
        let mut config = UserConfig::default();
        assert!(!config.has_auth());

        config.set_auth("key".to_string(), "my-resource".to_string());
        assert!(config.has_auth());
        assert_eq!(config.get_auth().unwrap().resource, "my-resource");
    }

    #[test]
    fn test_clear_auth() {
        let mut config = UserConfig::default();
        config.set_auth("key".to_string(), "my-resource".to_string());
        config.clear_auth();
        assert!(!config.has_auth());
        assert!(config.get_auth().is_none());
    }

    #[test]
    fn test_config_path() {
        let path = UserConfig::config_path().expect("Failed to get config path");
        assert!(path.to_string_lossy().contains("vidgen"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_load_creates_default_if_not_exists() {
        let (_temp_dir, path) = temp_config_path();

        let config = UserConfig::load_from(&path).expect("Default config should load");

        assert!(path.exists(), "Config file should be created");
        assert_eq!(config, UserConfig::default());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("timezone_offset_seconds"));
        assert!(content.contains("vidgen login"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (_temp_dir, path) = temp_config_path();

        let mut config = UserConfig {
            timezone_offset_seconds: 32400,
            poll_interval_seconds: Some(5),
            ..UserConfig::default()
        };
        config.set_auth("secret-key".to_string(), "my-resource".to_string());
        config.save_to(&path).expect("Failed to save config");

        let loaded = UserConfig::load_from(&path).expect("Failed to load config");
        assert_eq!(loaded, config);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (_temp_dir, path) = temp_config_path();
        let mut config = UserConfig::default();
        config.set_auth("secret-key".to_string(), "my-resource".to_string());
        config.save_to(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);

        let dir_mode = fs::metadata(path.parent().unwrap()).unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700);
    }

    #[test]
    fn test_load_rejects_broken_toml() {
        let (_temp_dir, path) = temp_config_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "timezone_offset_seconds = \"nine\"").unwrap();

        let result = UserConfig::load_from(&path);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_validate_rejects_empty_api_key() {
        let mut config = UserConfig::default();
        config.set_auth("".to_string(), "my-resource".to_string());

        match config.validate() {
            Err(ConfigError::ValidationError { message }) => assert!(message.contains("api_key")),
            other => panic!("Expected ValidationError for empty api_key, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_offset() {
        let config = UserConfig {
            timezone_offset_seconds: 90_000,
            ..UserConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = UserConfig {
            poll_interval_seconds: Some(0),
            ..UserConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
