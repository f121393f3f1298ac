/// ドメインサービス: リクエストのバリデーション
///
/// ネットワーク呼び出しの前に検出できる前提条件違反をここで弾く（Fail Fast）。
/// 対応する画像形式は APP_CONFIG から取得する。
use crate::config::APP_CONFIG;
use crate::domain::error::DomainError;
use crate::domain::job::{ImageMime, VideoSize};
use std::io::Cursor;
use std::path::Path;

/// プロンプトが空でないことを確認する
pub fn validate_prompt(prompt: &str) -> Result<(), DomainError> {
    if prompt.trim().is_empty() {
        return Err(DomainError::EmptyPrompt);
    }
    Ok(())
}

/// 参照画像ファイルをバリデーションする
///
/// # エラー
/// - ファイルが存在しない（ReferenceFileMissing）
/// - ディレクトリが指定された
/// - ファイルが空
/// - サポートされていない拡張子
pub fn validate_reference_image(path: &Path) -> Result<ImageMime, DomainError> {
    let label = path.display().to_string();

    if !path.exists() {
        return Err(DomainError::reference_file_missing(label));
    }

    let metadata =
        std::fs::metadata(path).map_err(|_| DomainError::reference_file_missing(&label))?;

    if metadata.is_dir() {
        return Err(DomainError::NotAFile { path: label });
    }

    if metadata.len() == 0 {
        return Err(DomainError::EmptyFile { path: label });
    }

    let supported = APP_CONFIG.video.supported_image_extensions;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .ok_or_else(|| DomainError::unsupported_image_type(&label, supported, "no extension"))?;

    if !supported.contains(&extension.as_str()) {
        return Err(DomainError::unsupported_image_type(&label, supported, extension));
    }

    ImageMime::from_path(path)
        .ok_or_else(|| DomainError::unsupported_image_type(&label, supported, extension))
}

/// 参照画像の解像度が出力サイズと一致するか確認する
///
/// リモートも同じ制約を課すが、数分待ってから拒否されるより
/// 送信前に失敗させたほうが早い。
pub fn check_reference_dimensions(
    label: &str,
    bytes: &[u8],
    size: VideoSize,
) -> Result<(), DomainError> {
    let (width, height) = read_dimensions(label, bytes)?;
    let (expected_width, expected_height) = size.dimensions();

    if (width, height) != (expected_width, expected_height) {
        return Err(DomainError::ImageDimensionMismatch {
            path: label.to_string(),
            expected: size.to_string(),
            found: format!("{}x{}", width, height),
        });
    }

    Ok(())
}

/// 画像ヘッダーだけを読んで (幅, 高さ) を返す
fn read_dimensions(label: &str, bytes: &[u8]) -> Result<(u32, u32), DomainError> {
    let unreadable = |message: String| DomainError::UnreadableImage {
        path: label.to_string(),
        message,
    };

    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| unreadable(e.to_string()))?
        .into_dimensions()
        .map_err(|e| unreadable(e.to_string()))
}
