/// 実行時設定の解決
///
/// プロセス起動時に一度だけ、環境変数（.env を含む）とユーザー設定ファイルから
/// `Settings` を組み立て、クライアントのコンストラクタへ明示的に渡す。
/// クライアント自身は環境変数を読まない。
///
/// 優先順位: 環境変数 > .env > config.toml > APP_CONFIG
use crate::config::APP_CONFIG;
use crate::config::error::ConfigError;
use crate::config::user::UserConfig;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// APIキーの環境変数
pub const ENV_API_KEY: &str = "AZURE_API_KEY";

/// リソース名（またはエンドポイントURL）の環境変数
pub const ENV_RESOURCE_NAME: &str = "AZURE_RESOURCE_NAME";

/// クライアントに渡す解決済み設定
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
    pub download_timeout: Duration,
    pub poll_interval: Duration,
    /// None は無制限
    pub max_wait: Option<Duration>,
}

impl Settings {
    /// APIキーとベースURLから、その他をデフォルト値で埋めた設定を作成
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(APP_CONFIG.api.timeout_seconds),
            download_timeout: Duration::from_secs(APP_CONFIG.api.download_timeout_seconds),
            poll_interval: Duration::from_secs(APP_CONFIG.polling.interval_seconds),
            max_wait: max_wait_from_secs(APP_CONFIG.polling.max_wait_seconds),
        }
    }

    /// 環境変数とユーザー設定から解決する
    ///
    /// # Errors
    /// APIキーまたはリソースがどこにも無い場合、不足している変数名を
    /// すべて含む ConfigError::ConfigurationMissing を返す。
    pub fn resolve<F>(user_config: &UserConfig, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = |name: &str| env(name).filter(|v| !v.trim().is_empty());
        let auth = user_config.get_auth();

        let api_key =
            from_env(ENV_API_KEY).or_else(|| auth.map(|a| a.api_key.clone()));
        let resource =
            from_env(ENV_RESOURCE_NAME).or_else(|| auth.map(|a| a.resource.clone()));

        let (api_key, resource) = match (api_key, resource) {
            (Some(key), Some(resource)) => (key, resource),
            (None, Some(_)) => return Err(ConfigError::configuration_missing(&[ENV_API_KEY])),
            (Some(_), None) => {
                return Err(ConfigError::configuration_missing(&[ENV_RESOURCE_NAME]));
            }
            (None, None) => {
                return Err(ConfigError::configuration_missing(&[
                    ENV_API_KEY,
                    ENV_RESOURCE_NAME,
                ]));
            }
        };

        let mut settings = Self::new(api_key.trim(), base_url_for(&resource));

        if let Some(secs) = user_config.request_timeout_seconds {
            settings.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = user_config.poll_interval_seconds {
            settings.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = user_config.max_wait_seconds {
            settings.max_wait = max_wait_from_secs(secs);
        }

        Ok(settings)
    }

    /// プロセス環境から解決する
    pub fn from_environment(user_config: &UserConfig) -> Result<Self, ConfigError> {
        Self::resolve(user_config, |name| std::env::var(name).ok())
    }

    /// マスキングしたAPIキー（ログ・表示用）
    pub fn masked_api_key(&self) -> String {
        mask_secret(&self.api_key)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.masked_api_key())
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("download_timeout", &self.download_timeout)
            .field("poll_interval", &self.poll_interval)
            .field("max_wait", &self.max_wait)
            .finish()
    }
}

/// 0 秒は「無制限」を意味する
pub fn max_wait_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// リソース名からベースURLを組み立てる
///
/// - "my-resource"               → https://my-resource.openai.azure.com/openai/v1
/// - "https://example.com/"      → https://example.com/openai/v1
/// - "https://x/openai/v1"       → そのまま
pub fn base_url_for(resource: &str) -> String {
    let resource = resource.trim().trim_end_matches('/');
    let base_path = APP_CONFIG.api.base_path;

    if resource.starts_with("http://") || resource.starts_with("https://") {
        if resource.ends_with(base_path) {
            resource.to_string()
        } else {
            format!("{}{}", resource, base_path)
        }
    } else {
        format!(
            "https://{}{}{}",
            resource, APP_CONFIG.api.host_suffix, base_path
        )
    }
}

/// 秘密情報をマスキングする（先頭4文字と末尾4文字のみ残す）
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}***{}", head, tail)
    }
}

/// カレントディレクトリ（および親）の .env を読み込む
///
/// 既に設定されている環境変数は上書きしない。見つかったファイルのパスを返す。
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}
