/// インフラ層のエラー定義
///
/// 外部システム（ネットワーク、動画生成API、ファイルシステム）との
/// やり取りで発生するエラーを構造化して定義。
/// #[from] / #[source] を使って原因連鎖を保持する。
use crate::domain::error::DomainError;
use crate::error_severity::ErrorSeverity;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfraError {
    /// 接続失敗などの通信エラー
    #[error("transport error: {message}")]
    Transport { message: String },

    /// HTTPリクエストのタイムアウト
    #[error("operation timed out: {operation}")]
    Timeout { operation: String },

    /// リモートが非成功ステータスを返した
    #[error("request rejected by {endpoint} (HTTP {status_code}): {message}")]
    RequestRejected {
        endpoint: String,
        status_code: u16,
        message: String,
    },

    /// 同時実行ジョブ数の上限（HTTP 429）
    #[error("quota exceeded: {message}")]
    QuotaExceeded { message: String },

    /// 存在しない、期限切れ、または削除済みのリソース（HTTP 404）
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// 最大待機時間を超えた
    #[error("job {job_id} did not finish within {waited_secs} seconds")]
    PollTimeout { job_id: String, waited_secs: u64 },

    /// 待機がキャンセルされた
    #[error("waiting for job {job_id} was cancelled")]
    PollCancelled { job_id: String },

    /// レスポンスの形式が想定外
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// その他のI/Oエラー
    #[error("I/O error")]
    Io(#[from] io::Error),
}

impl InfraError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// HTTPステータスからエラーを作成
    pub fn from_status(endpoint: impl Into<String>, status_code: u16, body: String) -> Self {
        let endpoint = endpoint.into();
        match status_code {
            404 => Self::NotFound { resource: endpoint },
            429 => Self::QuotaExceeded { message: body },
            _ => Self::RequestRejected {
                endpoint,
                status_code,
                message: body,
            },
        }
    }

    /// 再試行すれば成功しうるエラーか（自動再試行はしない）
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. }
                | Self::Timeout { .. }
                | Self::QuotaExceeded { .. }
                | Self::PollTimeout { .. }
        )
    }

    /// エラーの深刻度を返す
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::RequestRejected {
                status_code: 401 | 403,
                ..
            } => ErrorSeverity::ConfigError,
            Self::RequestRejected { .. } | Self::NotFound { .. } => ErrorSeverity::UserError,
            Self::PollCancelled { .. } => ErrorSeverity::Interrupted,
            _ => ErrorSeverity::SystemError,
        }
    }

    /// ユーザー向けのヒントメッセージを返す
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Transport { .. } => {
                Some("Check your network connection and the resource name, then try again.")
            }
            Self::Timeout { .. } => Some("The service did not respond in time. Try again later."),
            Self::RequestRejected {
                status_code: 401 | 403,
                ..
            } => Some("The API key was rejected. Run 'vidgen login' or check AZURE_API_KEY."),
            Self::RequestRejected { .. } => Some(
                "Check the size, duration and reference image (its dimensions must match the size).",
            ),
            Self::QuotaExceeded { .. } => Some(
                "Too many jobs in flight. Wait for a running job to finish, then try again.",
            ),
            Self::NotFound { .. } => {
                Some("The job may have expired (24 hours) or been deleted. Run 'vidgen list'.")
            }
            Self::PollTimeout { .. } => Some(
                "The job is still running. Check again later with 'vidgen status <id>'.",
            ),
            Self::PollCancelled { .. } => {
                Some("The job keeps running remotely. Resume with 'vidgen status <id>'.")
            }
            Self::InvalidResponse { .. } => None,
            Self::Io(_) => Some("Check that the output path is writable."),
        }
    }
}

/// クライアントが返すエラー
///
/// ローカルの事前条件違反（DomainError）とリモート・通信の失敗（InfraError）を
/// 1つの型でまとめる。
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

impl ClientError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Domain(e) => e.severity(),
            Self::Infra(e) => e.severity(),
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Domain(e) => e.hint(),
            Self::Infra(e) => e.hint(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Infra(InfraError::NotFound { .. }))
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Domain(_) => false,
            Self::Infra(e) => e.is_retryable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            InfraError::from_status("/videos/x", 404, String::new()),
            InfraError::NotFound { .. }
        ));
        assert!(matches!(
            InfraError::from_status("/videos", 429, "limit".to_string()),
            InfraError::QuotaExceeded { .. }
        ));

        let rejected = InfraError::from_status("/videos", 400, "bad seconds".to_string());
        assert!(rejected.to_string().contains("HTTP 400"));
        assert!(rejected.to_string().contains("bad seconds"));
        assert_eq!(rejected.severity(), ErrorSeverity::UserError);
    }

    #[test]
    fn test_auth_rejection_is_config_error() {
        let err = InfraError::from_status("/videos", 401, "unauthorized".to_string());
        assert_eq!(err.severity(), ErrorSeverity::ConfigError);
        assert!(err.hint().unwrap().contains("login"));
    }

    #[test]
    fn test_retryable() {
        assert!(InfraError::transport("refused").is_retryable());
        assert!(InfraError::timeout("GET /videos").is_retryable());
        assert!(
            !InfraError::from_status("/videos", 400, String::new()).is_retryable()
        );
        assert!(!ClientError::from(DomainError::EmptyPrompt).is_retryable());
    }

    #[test]
    fn test_cancelled_is_interrupted() {
        let err = InfraError::PollCancelled {
            job_id: "video_1".to_string(),
        };
        assert_eq!(err.severity().exit_code(), 130);
    }

    #[test]
    fn test_client_error_is_transparent() {
        let err = ClientError::from(InfraError::NotFound {
            resource: "/videos/video_1".to_string(),
        });
        assert_eq!(err.to_string(), "not found: /videos/video_1");
        assert!(err.is_not_found());
    }
}
