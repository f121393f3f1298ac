/// ドメイン層のエラー定義
///
/// ジョブリクエストの前提条件違反やジョブ状態に関するエラーを構造化して定義。
/// ネットワークを使う前に検出できるものはすべてここに属する。
use crate::domain::job::JobState;
use crate::error_severity::ErrorSeverity;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// プロンプトが空
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// 未対応の出力サイズ
    #[error("unsupported video size '{value}' (expected one of: {expected})")]
    UnsupportedSize { value: String, expected: String },

    /// 未対応の動画長
    #[error("invalid duration '{value}' seconds (expected one of: {expected})")]
    UnsupportedDuration { value: String, expected: String },

    /// 参照画像ファイルが存在しない
    #[error("reference image not found: {path}")]
    ReferenceFileMissing { path: String },

    /// ディレクトリが指定された（ファイルが期待される場所）
    #[error("'{path}' is a directory, not a file")]
    NotAFile { path: String },

    /// ファイルが空
    #[error("file is empty: {path}")]
    EmptyFile { path: String },

    /// 参照画像の形式が無効
    #[error("unsupported reference image type: {path} (expected: {expected}, found: {found})")]
    UnsupportedImageType {
        path: String,
        expected: String,
        found: String,
    },

    /// 画像ヘッダーを読み取れない
    #[error("unable to read image dimensions from {path}: {message}")]
    UnreadableImage { path: String, message: String },

    /// 参照画像の解像度と出力サイズが一致しない
    #[error("reference image {path} is {found} but the requested size is {expected}")]
    ImageDimensionMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// 完了していないジョブの結果を取得しようとした
    #[error("result for job {job_id} is not ready (status: {state})")]
    ResultNotReady { job_id: String, state: JobState },

    /// ジョブが failed / cancelled で終了した
    #[error("job {job_id} ended with status {state}{}", .reason.as_deref().map(|r| format!(": {}", r)).unwrap_or_default())]
    JobUnsuccessful {
        job_id: String,
        state: JobState,
        reason: Option<String>,
    },
}

impl DomainError {
    /// 参照画像が見つからないエラーを生成
    pub fn reference_file_missing(path: impl Into<String>) -> Self {
        Self::ReferenceFileMissing { path: path.into() }
    }

    /// 無効な画像形式エラーを生成
    pub fn unsupported_image_type(
        path: impl Into<String>,
        supported: &[&str],
        found: impl Into<String>,
    ) -> Self {
        Self::UnsupportedImageType {
            path: path.into(),
            expected: format!("one of: {}", supported.join(", ")),
            found: found.into(),
        }
    }

    /// エラーの深刻度を返す
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::JobUnsuccessful { .. } => ErrorSeverity::JobFailed,
            _ => ErrorSeverity::UserError,
        }
    }

    /// ユーザー向けのヒントメッセージを返す
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::EmptyPrompt => Some("Pass a description with --prompt or --prompt-file."),
            Self::UnsupportedSize { .. } => {
                Some("Supported sizes: 720x1280, 1280x720, 1024x1792, 1792x1024")
            }
            Self::UnsupportedDuration { .. } => Some("Supported durations: 4, 8, 12 seconds"),
            Self::ReferenceFileMissing { .. } => {
                Some("Please check the image path and ensure the file exists.")
            }
            Self::NotAFile { .. } => Some("Please specify a file, not a directory."),
            Self::EmptyFile { .. } => Some("The file appears to be empty or corrupted."),
            Self::UnsupportedImageType { .. } => {
                Some("Reference images must be JPEG, PNG or WebP.")
            }
            Self::UnreadableImage { .. } => Some("The image header could not be decoded."),
            Self::ImageDimensionMismatch { .. } => Some(
                "Resize the image to match --size exactly, or pass --skip-dimension-check to let the service decide.",
            ),
            Self::ResultNotReady { .. } => {
                Some("Wait for the job to complete with 'vidgen status <id>' before downloading.")
            }
            Self::JobUnsuccessful { .. } => {
                Some("Review the prompt and parameters, then submit a new job.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_not_ready_message_names_state() {
        let err = DomainError::ResultNotReady {
            job_id: "video_123".to_string(),
            state: JobState::Processing,
        };
        let message = err.to_string();
        assert!(message.contains("video_123"));
        assert!(message.contains("processing"));
        assert_eq!(err.severity(), ErrorSeverity::UserError);
    }

    #[test]
    fn test_job_unsuccessful_includes_reason() {
        let err = DomainError::JobUnsuccessful {
            job_id: "video_1".to_string(),
            state: JobState::Failed,
            reason: Some("moderation_blocked".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "job video_1 ended with status failed: moderation_blocked"
        );
        assert_eq!(err.severity().exit_code(), 4);

        let err = DomainError::JobUnsuccessful {
            job_id: "video_2".to_string(),
            state: JobState::Cancelled,
            reason: None,
        };
        assert_eq!(err.to_string(), "job video_2 ended with status cancelled");
    }

    #[test]
    fn test_unsupported_image_type_lists_expected() {
        let err = DomainError::unsupported_image_type("a.gif", &["jpg", "png"], "gif");
        assert!(err.to_string().contains("one of: jpg, png"));
        assert!(err.hint().is_some());
    }
}
