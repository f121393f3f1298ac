/// ログアウトコマンド
///
/// 保存されている認証情報を削除します。
/// 環境変数（AZURE_API_KEY / AZURE_RESOURCE_NAME）には触れない。
use crate::commands::result::{CommandResult, LogoutResult};
use crate::config::user::UserConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// ログアウトコマンドを実行
pub fn execute() -> Result<CommandResult> {
    let config_path = UserConfig::config_path().context("Failed to locate configuration file")?;
    execute_at(&config_path)
}

/// 指定した設定ファイルに対してログアウトを実行
pub fn execute_at(config_path: &Path) -> Result<CommandResult> {
    let mut config = UserConfig::load_from(config_path).context("Failed to load configuration file")?;

    let was_logged_in = config.has_auth();

    if !was_logged_in {
        return Ok(CommandResult::Logout(LogoutResult { was_logged_in: false }));
    }

    config.clear_auth();

    config
        .save_to(config_path)
        .context("Failed to save configuration file")?;

    Ok(CommandResult::Logout(LogoutResult { was_logged_in: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_logout_without_credentials() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        match execute_at(&config_path).unwrap() {
            CommandResult::Logout(r) => assert!(!r.was_logged_in),
            other => panic!("Expected Logout result, got {:?}", other),
        }
    }

    #[test]
    fn test_logout_removes_credentials() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = UserConfig::default();
        config.set_auth("secret-key".to_string(), "my-resource".to_string());
        config.save_to(&config_path).unwrap();

        match execute_at(&config_path).unwrap() {
            CommandResult::Logout(r) => assert!(r.was_logged_in),
            other => panic!("Expected Logout result, got {:?}", other),
        }

        let reloaded = UserConfig::load_from(&config_path).unwrap();
        assert!(!reloaded.has_auth());
    }
}
