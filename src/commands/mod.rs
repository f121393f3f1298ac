pub mod create;
pub mod delete;
pub mod download;
pub mod list;
pub mod login;
pub mod logout;
pub mod result;
pub mod status;

pub use result::CommandResult;

use crate::api::VideoJobClient;
use crate::config::Settings;
use anyhow::{Context, Result};

/// 解決済み設定からジョブクライアントを作成する
fn connect(settings: &Settings) -> Result<VideoJobClient> {
    VideoJobClient::new(settings).context("Failed to create API client")
}
