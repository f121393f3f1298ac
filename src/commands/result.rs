/// コマンド実行結果を表す型
///
/// 各コマンドはこの型を返し、プレゼンテーション層（cli.rs / presentation::output）で
/// 人間向けと機械向けの出力フォーマットを決定する。
use crate::domain::error::DomainError;
use crate::domain::job::{JobHandle, JobState, JobSummary};
use serde::Serialize;

/// コマンド実行結果の統一型
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandResult {
    Create(CreateResult),
    Status(StatusResult),
    List(ListResult),
    Download(DownloadResult),
    Delete(DeleteResult),
    Login(LoginResult),
    Logout(LogoutResult),
}

/// createコマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct CreateResult {
    /// 送信した（--wait の場合は終端まで待った）ジョブ
    pub job: JobHandle,
    /// 終端状態まで待ったか
    pub waited: bool,
    /// --output 指定時のダウンロード結果
    pub download: Option<DownloadResult>,
}

/// statusコマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct StatusResult {
    pub job: JobHandle,
    pub waited: bool,
}

/// listコマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct ListResult {
    pub videos: Vec<JobSummary>,
    pub total_count: usize,
}

/// downloadコマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct DownloadResult {
    pub job_id: String,
    /// 書き込んだファイルの絶対パス
    pub path: String,
    pub size_bytes: u64,
}

/// deleteコマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResult {
    pub job_id: String,
    pub deleted: bool,
    /// リモートに既に存在しなかった（NotFound を成功として扱った）
    pub already_deleted: bool,
}

/// ログインコマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    /// 既にログイン済みだったか（上書き更新の場合true）
    pub was_logged_in: bool,
    pub resource: String,
    /// マスキングされたAPIキー
    pub api_key: String,
}

/// ログアウトコマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct LogoutResult {
    /// ログイン状態だったか
    pub was_logged_in: bool,
}

impl CommandResult {
    /// 待機したジョブが failed / cancelled で終わった場合のエラー
    ///
    /// 結果を出力した後、終了コードを決めるために使う。
    pub fn unsuccessful_job(&self) -> Option<DomainError> {
        let (job, waited) = match self {
            CommandResult::Create(r) => (&r.job, r.waited),
            CommandResult::Status(r) => (&r.job, r.waited),
            _ => return None,
        };

        if !waited {
            return None;
        }

        match job.state() {
            state @ (JobState::Failed | JobState::Cancelled) => Some(DomainError::JobUnsuccessful {
                job_id: job.id().to_string(),
                state,
                reason: job.status().failure.as_ref().map(|f| f.to_string()),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::{JobFailure, JobStatus};

    fn handle(state: JobState, failure: Option<JobFailure>) -> JobHandle {
        JobHandle::new(
            "video_1",
            JobStatus {
                state,
                created_at: 1_760_000_000,
                model: Some("sora-2".to_string()),
                progress: None,
                failure,
            },
        )
    }

    #[test]
    fn test_failed_job_after_wait_is_unsuccessful() {
        let result = CommandResult::Status(StatusResult {
            job: handle(
                JobState::Failed,
                Some(JobFailure {
                    code: Some("moderation_blocked".to_string()),
                    message: Some("Blocked".to_string()),
                }),
            ),
            waited: true,
        });

        let err = result.unsuccessful_job().expect("failed job should be reported");
        assert_eq!(err.severity().exit_code(), 4);
        assert!(err.to_string().contains("Blocked (moderation_blocked)"));
    }

    #[test]
    fn test_failed_job_without_wait_is_not_reported() {
        let result = CommandResult::Status(StatusResult {
            job: handle(JobState::Failed, None),
            waited: false,
        });
        assert!(result.unsuccessful_job().is_none());
    }

    #[test]
    fn test_completed_job_is_not_reported() {
        let result = CommandResult::Create(CreateResult {
            job: handle(JobState::Completed, None),
            waited: true,
            download: None,
        });
        assert!(result.unsuccessful_job().is_none());
    }

    #[test]
    fn test_serialized_with_command_tag() {
        let result = CommandResult::Logout(LogoutResult {
            was_logged_in: true,
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["command"], "logout");
        assert_eq!(json["was_logged_in"], true);
    }
}
