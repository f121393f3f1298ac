/// API通信用の型定義
///
/// `/videos` エンドポイントのリクエスト・レスポンスを表す構造体を定義し、
/// ドメイン型への変換を提供します。
use crate::domain::job::{
    DeletionConfirmation, JobFailure, JobHandle, JobRequest, JobState, JobStatus, JobSummary,
    VideoDuration, VideoSize,
};
use serde::{Deserialize, Serialize};

/// POST /videos のJSONボディ
///
/// `seconds` は文字列（"4" / "8" / "12"）として送られる。
#[derive(Debug, Clone, Serialize)]
pub struct CreateVideoBody<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub size: VideoSize,
    pub seconds: VideoDuration,
}

impl<'a> From<&'a JobRequest> for CreateVideoBody<'a> {
    fn from(request: &'a JobRequest) -> Self {
        Self {
            model: request.model(),
            prompt: request.prompt(),
            size: request.size(),
            seconds: request.seconds(),
        }
    }
}

/// 動画ジョブオブジェクト
///
/// POST /videos、GET /videos/{id}、GET /videos の各要素に共通の形。
#[derive(Debug, Clone, Deserialize)]
pub struct VideoObject {
    pub id: String,

    #[serde(default = "default_object")]
    pub object: String,

    pub status: JobState,

    #[serde(default)]
    pub created_at: i64,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub progress: Option<f64>,

    #[serde(default)]
    pub error: Option<JobFailure>,
}

fn default_object() -> String {
    "video".to_string()
}

impl VideoObject {
    /// 観測したステータスに変換
    pub fn to_status(&self) -> JobStatus {
        JobStatus {
            state: self.status,
            created_at: self.created_at,
            model: self.model.clone(),
            progress: self.progress.map(|p| p.clamp(0.0, 100.0).round() as u8),
            failure: self.error.clone(),
        }
    }
}

impl From<VideoObject> for JobHandle {
    fn from(object: VideoObject) -> Self {
        let status = object.to_status();
        JobHandle::new(object.id, status)
    }
}

impl From<VideoObject> for JobSummary {
    fn from(object: VideoObject) -> Self {
        Self {
            id: object.id,
            state: object.status,
            created_at: object.created_at,
            object: object.object,
        }
    }
}

/// GET /videos のレスポンス（ページングなし）
#[derive(Debug, Clone, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub data: Vec<VideoObject>,
}

/// DELETE /videos/{id} のレスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct DeletedVideo {
    pub id: String,
    pub deleted: bool,
}

impl From<DeletedVideo> for DeletionConfirmation {
    fn from(deleted: DeletedVideo) -> Self {
        Self {
            id: deleted.id,
            deleted: deleted.deleted,
        }
    }
}
