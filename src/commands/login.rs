/// ログインコマンド
///
/// Azure OpenAI のAPIキーとリソース名を検証し、config.tomlに保存します。
use crate::api::VideoJobClient;
use crate::commands::result::{CommandResult, LoginResult};
use crate::config::Settings;
use crate::config::settings::{base_url_for, mask_secret};
use crate::config::user::UserConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// ログイン認証情報
///
/// プレゼンテーション層（対話入力 / stdin）から渡される。
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub api_key: String,
    /// リソース名、またはエンドポイントURL
    pub resource: String,
}

/// ログインコマンドを実行
///
/// 一覧取得を1回行って認証情報を確認してから保存する。
pub async fn execute(credentials: LoginCredentials) -> Result<CommandResult> {
    let config_path = UserConfig::config_path().context("Failed to locate configuration file")?;
    execute_at(credentials, &config_path).await
}

/// 指定した設定ファイルに対してログインを実行
pub async fn execute_at(credentials: LoginCredentials, config_path: &Path) -> Result<CommandResult> {
    let settings = Settings::new(
        credentials.api_key.clone(),
        base_url_for(&credentials.resource),
    );

    let client = VideoJobClient::new(&settings).context("Failed to create API client")?;
    client.list_all().await.context(
        "Authentication failed. Please verify your API key and resource name are correct.",
    )?;

    let mut config = UserConfig::load_from(config_path).context("Failed to load configuration file")?;
    let was_logged_in = config.has_auth();

    config.set_auth(credentials.api_key.clone(), credentials.resource.clone());
    config
        .save_to(config_path)
        .context("Failed to save configuration file")?;

    tracing::info!(resource = %credentials.resource, "credentials saved");

    Ok(CommandResult::Login(LoginResult {
        was_logged_in,
        resource: credentials.resource,
        api_key: mask_secret(&credentials.api_key),
    }))
}
