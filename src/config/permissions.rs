/// 認証情報の保存先を所有者専用にする
///
/// Unix系: ファイルは 0600、設定ディレクトリは 0700。
/// それ以外のプラットフォームでは何もしない。
use crate::config::error::ConfigError;
use std::path::Path;

/// 所有者のみ読み書きできるようにする
///
/// ディレクトリには実行ビットも付ける。
///
/// # Errors
/// パスが存在しない場合、またはモード変更に失敗した場合。
pub fn restrict_to_owner(path: &Path) -> Result<(), ConfigError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        ConfigError::file_system(format!("Cannot access {}", path.display()), e)
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mode = owner_only_mode(metadata.is_dir());
        if metadata.permissions().mode() & 0o777 == mode {
            return Ok(());
        }

        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(|e| {
            ConfigError::file_system(
                format!("Failed to set permissions ({:o}) on {}", mode, path.display()),
                e,
            )
        })
    }

    #[cfg(not(unix))]
    {
        let _ = metadata;
        Ok(())
    }
}

#[cfg(unix)]
fn owner_only_mode(is_dir: bool) -> u32 {
    if is_dir { 0o700 } else { 0o600 }
}
