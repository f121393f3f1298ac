/// statusコマンド
///
/// ジョブの現在のステータスを取得し、デフォルトでは終端状態になるまで待ちます。
use crate::api::{Clock, PollOptions};
use crate::commands::result::{CommandResult, StatusResult};
use crate::config::Settings;
use crate::domain::progress::JobProgress;
use anyhow::{Context, Result};

/// statusコマンドを実行
///
/// # Arguments
/// * `wait` - false の場合は現在のステータスを1回取得するだけ
pub async fn execute<C, F>(
    settings: &Settings,
    job_id: &str,
    wait: bool,
    poll: &PollOptions,
    clock: &C,
    on_progress: F,
) -> Result<CommandResult>
where
    C: Clock,
    F: FnMut(JobProgress),
{
    let client = super::connect(settings)?;

    let mut handle = client
        .retrieve(job_id)
        .await
        .with_context(|| format!("Failed to retrieve job {}", job_id))?;

    if wait {
        client
            .poll_until_terminal(&mut handle, poll, clock, on_progress)
            .await
            .with_context(|| format!("Failed while waiting for job {}", job_id))?;
    }

    Ok(CommandResult::Status(StatusResult {
        job: handle,
        waited: wait,
    }))
}
