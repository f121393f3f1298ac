/// HTTPクライアント
///
/// 動画生成APIとの通信を担当するHTTPクライアント。
/// タイムアウト、エラーハンドリング、`api-key` ヘッダー認証を含みます。
use crate::api::auth::ApiKeyAuth;
use crate::api::error::InfraError;
use crate::config::APP_CONFIG;
use reqwest::multipart::Form;
use reqwest::{Client, Response};
use std::time::Duration;

/// APIクライアントの結果型
type ApiResult<T> = Result<T, InfraError>;

/// APIクライアント
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// 新しいAPIクライアントを作成
    ///
    /// # Arguments
    /// * `base_url` - APIのベースURL（例: "https://my-resource.openai.azure.com/openai/v1"）
    /// * `auth` - 全リクエストに付与する認証
    /// * `timeout` - リクエストごとのタイムアウト
    pub fn new(base_url: impl Into<String>, auth: &ApiKeyAuth, timeout: Duration) -> ApiResult<Self> {
        let headers = auth
            .default_headers()
            .map_err(|e| InfraError::transport(format!("Invalid API key header value: {}", e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(APP_CONFIG.api.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| InfraError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GETリクエストを送信
    ///
    /// # Arguments
    /// * `endpoint` - エンドポイントパス（例: "/videos/{id}"）
    pub async fn get(&self, endpoint: &str) -> ApiResult<Response> {
        let request = self.client.get(self.build_url(endpoint));
        Self::send_with_error_handling(request, endpoint, "GET").await
    }

    /// クエリ付きGETリクエストを、個別のタイムアウトで送信（動画本体のダウンロード用）
    pub async fn get_with_timeout(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        timeout: Duration,
    ) -> ApiResult<Response> {
        let request = self
            .client
            .get(self.build_url(endpoint))
            .query(query)
            .timeout(timeout);
        Self::send_with_error_handling(request, endpoint, "GET").await
    }

    /// JSONボディのPOSTリクエストを送信
    pub async fn post_json<T: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> ApiResult<Response> {
        let request = self.client.post(self.build_url(endpoint)).json(body);
        Self::send_with_error_handling(request, endpoint, "POST").await
    }

    /// multipartボディのPOSTリクエストを送信
    pub async fn post_multipart(&self, endpoint: &str, form: Form) -> ApiResult<Response> {
        let request = self.client.post(self.build_url(endpoint)).multipart(form);
        Self::send_with_error_handling(request, endpoint, "POST").await
    }

    /// DELETEリクエストを送信
    pub async fn delete(&self, endpoint: &str) -> ApiResult<Response> {
        let request = self.client.delete(self.build_url(endpoint));
        Self::send_with_error_handling(request, endpoint, "DELETE").await
    }

    /// URLを構築
    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// リクエストを送信し、エラーハンドリングを行う
    async fn send_with_error_handling(
        request: reqwest::RequestBuilder,
        endpoint: &str,
        method: &str,
    ) -> ApiResult<Response> {
        tracing::debug!(method, endpoint, "sending request");

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                InfraError::timeout(format!("{} {}", method, endpoint))
            } else if e.is_connect() {
                InfraError::transport(format!(
                    "Connection failed for {} {}: {}",
                    method, endpoint, e
                ))
            } else {
                InfraError::transport(format!("Request failed for {} {}: {}", method, endpoint, e))
            }
        })?;

        tracing::debug!(method, endpoint, status = response.status().as_u16(), "received response");
        Ok(response)
    }

    /// レスポンスをチェックしてエラーを返す
    ///
    /// 404 は NotFound、429 は QuotaExceeded、その他の非成功ステータスは
    /// ステータスコードとボディを保持した RequestRejected になる。
    pub async fn check_response(response: Response, endpoint: &str) -> ApiResult<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        tracing::warn!(endpoint, status_code, body = %error_body, "request rejected");

        Err(InfraError::from_status(endpoint, status_code, error_body))
    }

    /// JSONレスポンスをデシリアライズ
    pub async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> ApiResult<T> {
        response
            .json()
            .await
            .map_err(|e| InfraError::invalid_response(format!("Failed to parse JSON response: {}", e)))
    }

    /// バイナリレスポンスを読み取る
    pub async fn read_bytes(response: Response, endpoint: &str) -> ApiResult<Vec<u8>> {
        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                InfraError::timeout(format!("GET {}", endpoint))
            } else {
                InfraError::transport(format!("Failed to read body of {}: {}", endpoint, e))
            }
        })?;
        Ok(bytes.to_vec())
    }
}
