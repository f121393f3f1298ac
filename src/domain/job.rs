/// ドメインモデル: 動画生成ジョブ
///
/// リクエスト（JobRequest）、リモートが発行するハンドル（JobHandle）、
/// 観測したステータス（JobStatus）、取得した結果（JobResult）を定義する。
/// ジョブの状態遷移はリモートサービスだけが書き込み、クライアントは読むだけ。
use crate::config::APP_CONFIG;
use crate::domain::error::DomainError;
use crate::domain::validator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 出力動画の解像度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VideoSize {
    /// 縦長 9:16
    #[default]
    #[serde(rename = "720x1280")]
    Portrait720x1280,
    /// 横長 16:9
    #[serde(rename = "1280x720")]
    Landscape1280x720,
    #[serde(rename = "1024x1792")]
    Portrait1024x1792,
    #[serde(rename = "1792x1024")]
    Landscape1792x1024,
}

impl VideoSize {
    pub const ALL: [VideoSize; 4] = [
        Self::Portrait720x1280,
        Self::Landscape1280x720,
        Self::Portrait1024x1792,
        Self::Landscape1792x1024,
    ];

    /// ワイヤ上の表現（"WIDTHxHEIGHT"）
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Portrait720x1280 => "720x1280",
            Self::Landscape1280x720 => "1280x720",
            Self::Portrait1024x1792 => "1024x1792",
            Self::Landscape1792x1024 => "1792x1024",
        }
    }

    /// (幅, 高さ) をピクセルで返す
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Portrait720x1280 => (720, 1280),
            Self::Landscape1280x720 => (1280, 720),
            Self::Portrait1024x1792 => (1024, 1792),
            Self::Landscape1792x1024 => (1792, 1024),
        }
    }
}

impl fmt::Display for VideoSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoSize {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        Self::ALL
            .into_iter()
            .find(|size| size.as_str() == value)
            .ok_or_else(|| DomainError::UnsupportedSize {
                value: value.to_string(),
                expected: Self::ALL.map(|s| s.as_str()).join(", "),
            })
    }
}

/// 動画の長さ（秒）
///
/// リモートは数値ではなく文字列（"4" / "8" / "12"）を要求する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VideoDuration {
    #[default]
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "12")]
    Twelve,
}

impl VideoDuration {
    pub const ALL: [VideoDuration; 3] = [Self::Four, Self::Eight, Self::Twelve];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Four => "4",
            Self::Eight => "8",
            Self::Twelve => "12",
        }
    }

    pub fn seconds(self) -> u32 {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
            Self::Twelve => 12,
        }
    }
}

impl fmt::Display for VideoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoDuration {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == value)
            .ok_or_else(|| DomainError::UnsupportedDuration {
                value: value.to_string(),
                expected: Self::ALL.map(|d| d.as_str()).join(", "),
            })
    }
}

/// ジョブの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    #[serde(alias = "in_progress")]
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl JobState {
    /// これ以上遷移しない状態か
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// リモートが返した失敗の詳細
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFailure {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{} ({})", message, code),
            (None, Some(message)) => f.write_str(message),
            (Some(code), None) => f.write_str(code),
            (None, None) => f.write_str("no details provided"),
        }
    }
}

/// ある時点で観測したジョブのステータス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobStatus {
    pub state: JobState,
    /// 作成時刻（Unix秒）
    pub created_at: i64,
    /// リモートがエコーしたモデル名
    pub model: Option<String>,
    /// 進捗率（0-100、リモートが返す場合のみ）
    pub progress: Option<u8>,
    pub failure: Option<JobFailure>,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// リモートが発行したジョブの識別子と、最後に観測したステータス
///
/// IDは発行後に変わらない。ステータスはクライアントだけが更新する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobHandle {
    id: String,
    status: JobStatus,
}

impl JobHandle {
    pub fn new(id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            id: id.into(),
            status,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// 最後に観測したステータス
    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    pub fn state(&self) -> JobState {
        self.status.state
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// 観測したステータスで更新する
    pub(crate) fn observe(&mut self, status: JobStatus) {
        self.status = status;
    }
}

/// 参照画像のMIMEタイプ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImageMime {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/webp")]
    Webp,
}

impl ImageMime {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    /// 拡張子からMIMEタイプを推定する
    pub fn from_path(path: &Path) -> Option<Self> {
        mime_guess::from_path(path)
            .first_raw()
            .and_then(Self::from_mime_str)
    }

    pub fn from_mime_str(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 参照画像の取得元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// ローカルファイル（送信直前に読み込む）
    File(PathBuf),
    /// メモリ上のバイト列
    Bytes { file_name: String, data: Vec<u8> },
}

/// 参照画像（生成動画の最初のフレームになる）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    source: ImageSource,
    mime: ImageMime,
}

impl ReferenceImage {
    /// ファイルパスから参照画像を作成（存在・形式を検証する）
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let mime = validator::validate_reference_image(&path)?;
        Ok(Self {
            source: ImageSource::File(path),
            mime,
        })
    }

    /// メモリ上の画像から参照画像を作成
    pub fn from_bytes(file_name: impl Into<String>, data: Vec<u8>, mime: ImageMime) -> Self {
        Self {
            source: ImageSource::Bytes {
                file_name: file_name.into(),
                data,
            },
            mime,
        }
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    /// multipart の filename に使う名前
    pub fn file_name(&self) -> String {
        match &self.source {
            ImageSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "reference".to_string()),
            ImageSource::Bytes { file_name, .. } => file_name.clone(),
        }
    }

    /// 表示・エラーメッセージ用のラベル
    pub fn display_name(&self) -> String {
        match &self.source {
            ImageSource::File(path) => path.display().to_string(),
            ImageSource::Bytes { file_name, .. } => file_name.clone(),
        }
    }
}

/// 動画生成リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    prompt: String,
    model: String,
    size: VideoSize,
    seconds: VideoDuration,
    reference: Option<ReferenceImage>,
}

impl JobRequest {
    /// 最小限のリクエストを作成（プロンプトは空であってはならない）
    pub fn new(prompt: impl Into<String>) -> Result<Self, DomainError> {
        let prompt = prompt.into();
        validator::validate_prompt(&prompt)?;
        Ok(Self {
            prompt,
            model: APP_CONFIG.video.default_model.to_string(),
            size: VideoSize::default(),
            seconds: VideoDuration::default(),
            reference: None,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_size(mut self, size: VideoSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_seconds(mut self, seconds: VideoDuration) -> Self {
        self.seconds = seconds;
        self
    }

    pub fn with_reference(mut self, reference: ReferenceImage) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn size(&self) -> VideoSize {
        self.size
    }

    pub fn seconds(&self) -> VideoDuration {
        self.seconds
    }

    pub fn reference(&self) -> Option<&ReferenceImage> {
        self.reference.as_ref()
    }
}

/// 取得可能な結果の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentVariant {
    #[default]
    Video,
}

impl ContentVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
        }
    }
}

/// 完了したジョブの成果物（動画のバイト列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub job_id: String,
    pub variant: ContentVariant,
    pub content: Vec<u8>,
}

impl JobResult {
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// 一覧の1エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSummary {
    pub id: String,
    pub state: JobState,
    pub created_at: i64,
    pub object: String,
}

/// 削除の確認
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionConfirmation {
    pub id: String,
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(state: JobState) -> JobStatus {
        JobStatus {
            state,
            created_at: 1_760_000_000,
            model: Some("sora-2".to_string()),
            progress: None,
            failure: None,
        }
    }

    #[test]
    fn test_video_size_parse_and_dimensions() {
        let size: VideoSize = "1280x720".parse().unwrap();
        assert_eq!(size, VideoSize::Landscape1280x720);
        assert_eq!(size.dimensions(), (1280, 720));
        assert_eq!(VideoSize::default().as_str(), "720x1280");
    }

    #[test]
    fn test_video_size_rejects_unknown() {
        let err = "1920x1080".parse::<VideoSize>().unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedSize { .. }));
        assert!(err.to_string().contains("1792x1024"));
    }

    #[test]
    fn test_duration_serializes_as_string() {
        let json = serde_json::to_string(&VideoDuration::Eight).unwrap();
        assert_eq!(json, "\"8\"");
        assert_eq!("12".parse::<VideoDuration>().unwrap(), VideoDuration::Twelve);
    }

    #[test]
    fn test_duration_rejects_five() {
        let err = "5".parse::<VideoDuration>().unwrap_err();
        assert!(err.to_string().contains("invalid duration '5'"));
    }

    #[test]
    fn test_job_state_terminal_set() {
        assert!(!JobState::Queued.is_terminal());
        assert!(!JobState::Processing.is_terminal());
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(JobState::Cancelled.is_terminal());
    }

    #[test]
    fn test_job_state_accepts_in_progress_alias() {
        let state: JobState = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(state, JobState::Processing);
        let state: JobState = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(state, JobState::Cancelled);
    }

    #[test]
    fn test_job_handle_observe_keeps_id() {
        let mut handle = JobHandle::new("video_abc", status(JobState::Queued));
        handle.observe(status(JobState::Completed));
        assert_eq!(handle.id(), "video_abc");
        assert!(handle.is_terminal());
    }

    #[test]
    fn test_job_request_defaults() {
        let request = JobRequest::new("a cat").unwrap();
        assert_eq!(request.model(), "sora-2");
        assert_eq!(request.size(), VideoSize::Portrait720x1280);
        assert_eq!(request.seconds(), VideoDuration::Four);
        assert!(request.reference().is_none());
    }

    #[test]
    fn test_job_request_rejects_blank_prompt() {
        assert!(matches!(
            JobRequest::new("   "),
            Err(DomainError::EmptyPrompt)
        ));
    }

    #[test]
    fn test_image_mime_from_extension() {
        assert_eq!(ImageMime::from_path(Path::new("a.JPG")), Some(ImageMime::Jpeg));
        assert_eq!(ImageMime::from_path(Path::new("a.jpeg")), Some(ImageMime::Jpeg));
        assert_eq!(ImageMime::from_path(Path::new("a.png")), Some(ImageMime::Png));
        assert_eq!(ImageMime::from_path(Path::new("a.webp")), Some(ImageMime::Webp));
        assert_eq!(ImageMime::from_path(Path::new("a.gif")), None);
    }

    #[test]
    fn test_reference_from_bytes_file_name() {
        let image = ReferenceImage::from_bytes("horses.png", vec![1, 2, 3], ImageMime::Png);
        assert_eq!(image.file_name(), "horses.png");
        assert_eq!(image.mime().as_str(), "image/png");
    }

    #[test]
    fn test_job_failure_display() {
        let failure = JobFailure {
            code: Some("moderation_blocked".to_string()),
            message: Some("Your request was blocked".to_string()),
        };
        assert_eq!(
            failure.to_string(),
            "Your request was blocked (moderation_blocked)"
        );
    }
}
