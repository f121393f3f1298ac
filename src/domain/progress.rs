use crate::domain::job::{JobState, VideoDuration, VideoSize};
use serde::Serialize;
/// ドメイン層: ジョブ進捗イベント定義
///
/// 送信からダウンロードまでの各段階をイベントとして表現します。
/// プレゼンテーション層はこれらのイベントを受け取り、
/// 人間向けの進捗表示や機械向けのJSON行に変換します。
use std::time::SystemTime;

/// ジョブ処理の各段階を表すイベント
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum JobPhase {
    /// 送信開始
    Submitting {
        prompt_preview: String,
        size: VideoSize,
        seconds: VideoDuration,
        reference_image: Option<String>,
    },

    /// 送信完了（ハンドル発行）
    Submitted { job_id: String, state: JobState },

    /// ステータス確認（ポーリング1回分）
    Polling {
        job_id: String,
        state: JobState,
        progress: Option<u8>,
        elapsed_secs: u64,
    },

    /// 終端状態に到達
    Finished { job_id: String, state: JobState },

    /// ダウンロード開始
    Downloading { job_id: String },

    /// ダウンロード完了
    Downloaded { path: String, size_bytes: u64 },
}

/// ジョブ進捗情報
#[derive(Debug, Clone, Serialize)]
pub struct JobProgress {
    pub phase: JobPhase,
    /// イベント発生時刻
    #[serde(skip)]
    pub timestamp: SystemTime,
}

impl JobProgress {
    /// 新しい進捗情報を作成
    pub fn new(phase: JobPhase) -> Self {
        Self {
            phase,
            timestamp: SystemTime::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_serializes_with_tag() {
        let progress = JobProgress::new(JobPhase::Polling {
            job_id: "video_1".to_string(),
            state: JobState::Processing,
            progress: Some(40),
            elapsed_secs: 20,
        });
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["phase"]["phase"], "polling");
        assert_eq!(json["phase"]["state"], "processing");
        assert_eq!(json["phase"]["elapsed_secs"], 20);
        assert!(json.get("timestamp").is_none());
    }
}
