use crate::commands::result::{CommandResult, ListResult};
use crate::config::Settings;
use anyhow::{Context, Result};

/// リストコマンドを実行する
///
/// アカウントの全ジョブを取得します（ページングなし）。
///
/// # エラー
/// アプリケーション層としてanyhow::Resultを返し、
/// 設定・インフラ層のエラーを集約します。
pub async fn execute(settings: &Settings) -> Result<CommandResult> {
    let client = super::connect(settings)?;

    let videos = client
        .list_all()
        .await
        .context("Failed to fetch video list")?;

    let total_count = videos.len();

    Ok(CommandResult::List(ListResult {
        videos,
        total_count,
    }))
}
