/// プレゼンテーション層: ジョブ進捗表示DTO
///
/// ドメイン層の`JobProgress`をUI表示に適した形式に変換します。
/// この変換により、プレゼンテーション層がドメイン層の実装詳細に
/// 依存しないようにします。
///
/// # 設計方針
/// - `From<&JobProgress>`で借用による変換（所有権を奪わない）
/// - `Option<DisplayProgress>`で表示抑制を明示的に表現
use crate::domain::formatter::format_bytes;
use crate::domain::job::JobState;
use crate::domain::progress::{JobPhase, JobProgress};

/// 進捗表示のカテゴリ
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressCategory {
    /// 送信
    Submission,
    /// 完了待ち
    Waiting,
    /// ダウンロード
    Download,
    /// 終端状態
    Finished,
}

/// プレゼンテーション層用の進捗情報
#[derive(Debug, Clone)]
pub struct DisplayProgress {
    /// 表示用メッセージ
    pub message: String,
    /// 進捗カテゴリ
    pub category: ProgressCategory,
    /// 詳細情報（オプション）
    pub details: Option<String>,
}

impl DisplayProgress {
    pub fn new(message: String, category: ProgressCategory) -> Self {
        Self {
            message,
            category,
            details: None,
        }
    }

    pub fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }
}

/// ドメイン層の`JobProgress`からプレゼンテーション層の`DisplayProgress`への変換
///
/// # 戻り値
/// - `Some(DisplayProgress)`: 表示すべき進捗情報
/// - `None`: 表示を抑制（送信直後の最初の確認など、直前の行と同じ内容）
impl From<&JobProgress> for Option<DisplayProgress> {
    fn from(progress: &JobProgress) -> Self {
        match &progress.phase {
            JobPhase::Submitting {
                prompt_preview,
                size,
                seconds,
                reference_image,
            } => {
                let mut details = format!("Prompt: {}", prompt_preview);
                if let Some(image) = reference_image {
                    details.push_str(&format!("\nReference image: {}", image));
                }

                Some(
                    DisplayProgress::new(
                        format!("Submitting {}s {} video job...", seconds, size),
                        ProgressCategory::Submission,
                    )
                    .with_details(details),
                )
            }
            JobPhase::Submitted { job_id, state } => Some(DisplayProgress::new(
                format!("Job submitted: {} ({})", job_id, state),
                ProgressCategory::Submission,
            )),
            JobPhase::Polling {
                state,
                progress,
                elapsed_secs,
                ..
            } => format_polling(*state, *progress, *elapsed_secs),
            JobPhase::Finished { job_id, state } => Some(DisplayProgress::new(
                format!("Job {} finished: {}", job_id, state),
                ProgressCategory::Finished,
            )),
            JobPhase::Downloading { job_id } => Some(DisplayProgress::new(
                format!("Downloading video for job {}...", job_id),
                ProgressCategory::Download,
            )),
            JobPhase::Downloaded { path, size_bytes } => Some(DisplayProgress::new(
                format!("Downloaded {} to {}", format_bytes(*size_bytes), path),
                ProgressCategory::Download,
            )),
        }
    }
}

/// 完了待ちの進捗表示
///
/// 最初の確認（経過0秒）は Submitted と同じ内容になるので表示しない。
fn format_polling(state: JobState, progress: Option<u8>, elapsed_secs: u64) -> Option<DisplayProgress> {
    if elapsed_secs == 0 {
        return None;
    }

    let message = match progress {
        Some(percent) => format!("Status: {} ({}%) - {}s elapsed", state, percent, elapsed_secs),
        None => format!("Status: {} - {}s elapsed", state, elapsed_secs),
    };

    Some(DisplayProgress::new(message, ProgressCategory::Waiting))
}

/// 進捗イベントを出力する
///
/// * `machine_output = false`: 人間向けの1行（stderr）
/// * `machine_output = true`: JSON Lines（stdout）
pub fn report(progress: &JobProgress, machine_output: bool) {
    if machine_output {
        match serde_json::to_string(&serde_json::json!({ "progress": progress.phase })) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::warn!(error = %e, "failed to serialize progress event"),
        }
        return;
    }

    if let Some(display) = Option::<DisplayProgress>::from(progress) {
        eprintln!("{}", display.message);
        if let Some(details) = display.details {
            for line in details.lines() {
                eprintln!("  {}", line);
            }
        }
    }
}
