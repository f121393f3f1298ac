/// 設定管理モジュール
///
/// このモジュールは3層の設定構造を提供します:
/// 1. AppConfig - コンパイル時定数として定義される静的設定（APP_CONFIG）
/// 2. UserConfig - 実行時に読み込まれるユーザー設定ファイル
/// 3. Settings - 環境変数と UserConfig から起動時に一度だけ解決され、
///    クライアントへ渡される設定
///
/// # 使用例
///
/// ```no_run
/// use vidgen::config::{APP_CONFIG, Settings, UserConfig};
///
/// let interval = APP_CONFIG.polling.interval_seconds;
///
/// let user_config = UserConfig::load()?;
/// let settings = Settings::from_environment(&user_config)?;
/// # Ok::<(), vidgen::config::error::ConfigError>(())
/// ```
pub mod app;
pub mod error;
pub mod permissions;
pub mod settings;
pub mod user;

pub use app::APP_CONFIG;
pub use settings::Settings;
pub use user::UserConfig;
