use crate::commands::result::{CommandResult, DeleteResult};
use crate::config::Settings;
use anyhow::{Context, Result};

/// 削除コマンドを実行する
///
/// 指定されたジョブをリモートから削除します。
/// リモートが NotFound を返した場合（削除済み・期限切れ）は「既に削除済み」として成功扱いにする。
///
/// # 引数
/// * `job_id` - 削除対象のジョブID
pub async fn execute(settings: &Settings, job_id: &str) -> Result<CommandResult> {
    let client = super::connect(settings)?;

    match client.delete(job_id).await {
        Ok(confirmation) => Ok(CommandResult::Delete(DeleteResult {
            job_id: confirmation.id,
            deleted: confirmation.deleted,
            already_deleted: false,
        })),
        Err(e) if e.is_not_found() => {
            tracing::info!(job_id, "job already deleted");
            Ok(CommandResult::Delete(DeleteResult {
                job_id: job_id.to_string(),
                deleted: false,
                already_deleted: true,
            }))
        }
        Err(e) => Err(e).with_context(|| format!("Failed to delete job {}", job_id)),
    }
}
