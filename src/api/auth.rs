/// 認証ヘッダー
///
/// Azure OpenAI の静的APIキー認証を扱います。
/// 全リクエストに `api-key: <value>` ヘッダーを付けるだけで、トークン交換は行いません。
use crate::config::APP_CONFIG;
use crate::config::settings::mask_secret;
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue};
use std::fmt;

/// APIキー認証
#[derive(Clone)]
pub struct ApiKeyAuth {
    api_key: String,
}

impl ApiKeyAuth {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// ヘッダー名
    pub fn header_name(&self) -> &'static str {
        APP_CONFIG.api.api_key_header
    }

    /// 認証ヘッダーを含むデフォルトヘッダーを生成
    ///
    /// ヘッダー値は sensitive としてマークし、reqwest のデバッグ出力に出さない。
    pub fn default_headers(&self) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&self.api_key)?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(self.header_name(), value);
        Ok(headers)
    }

    /// マスキングしたAPIキー
    pub fn masked(&self) -> String {
        mask_secret(&self.api_key)
    }
}

impl fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("api_key", &self.masked())
            .finish()
    }
}
