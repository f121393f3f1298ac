/// アプリケーション設定モジュール
///
/// コンパイル時定数として埋め込まれる静的設定を管理します。
/// これらの設定は実行時には変更できません（実行時の上書きは UserConfig / 環境変数で行う）。

/// アプリケーション全体の設定
#[derive(Debug, Clone, Copy)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub polling: PollingConfig,
    pub video: VideoConfig,
    pub logging: LoggingConfig,
}

/// API関連の設定
#[derive(Debug, Clone, Copy)]
pub struct ApiConfig {
    /// リソース名の後ろに付くホスト名（https://{resource}.openai.azure.com）
    pub host_suffix: &'static str,

    /// APIのベースパス
    pub base_path: &'static str,

    /// 認証ヘッダー名
    pub api_key_header: &'static str,

    /// 通常のAPIリクエストのタイムアウト(秒)
    pub timeout_seconds: u64,

    /// 動画ダウンロードのタイムアウト(秒)
    pub download_timeout_seconds: u64,

    pub user_agent: &'static str,
}

/// ポーリング関連の設定
#[derive(Debug, Clone, Copy)]
pub struct PollingConfig {
    /// ステータス確認の間隔(秒)
    pub interval_seconds: u64,

    /// CLIでの最大待機時間(秒)。0 は無制限
    pub max_wait_seconds: u64,
}

/// 動画生成リクエスト関連の設定
#[derive(Debug, Clone, Copy)]
pub struct VideoConfig {
    /// デフォルトのモデル
    pub default_model: &'static str,

    /// 参照画像として受け付ける拡張子
    pub supported_image_extensions: &'static [&'static str],

    /// 進捗表示でのプロンプトの最大文字数
    pub prompt_preview_chars: usize,
}

/// ロギング関連の設定
#[derive(Debug, Clone, Copy)]
pub struct LoggingConfig {
    /// ログフィルタを読む環境変数
    pub env_var: &'static str,

    /// -v 指定なしのログレベル
    pub default_level: &'static str,
}

/// グローバル設定定数
pub const APP_CONFIG: AppConfig = AppConfig {
    api: ApiConfig {
        host_suffix: ".openai.azure.com",
        base_path: "/openai/v1",
        api_key_header: "api-key",
        timeout_seconds: 120,
        download_timeout_seconds: 600,
        user_agent: concat!("vidgen/", env!("CARGO_PKG_VERSION")),
    },
    polling: PollingConfig {
        interval_seconds: 20,
        max_wait_seconds: 1800,
    },
    video: VideoConfig {
        default_model: "sora-2",
        supported_image_extensions: &["jpg", "jpeg", "png", "webp"],
        prompt_preview_chars: 100,
    },
    logging: LoggingConfig {
        env_var: "VIDGEN_LOG",
        default_level: "warn",
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_values() {
        assert_eq!(APP_CONFIG.api.base_path, "/openai/v1");
        assert_eq!(APP_CONFIG.api.api_key_header, "api-key");
        assert_eq!(APP_CONFIG.polling.interval_seconds, 20);
        assert_eq!(APP_CONFIG.video.default_model, "sora-2");
        assert!(APP_CONFIG.api.user_agent.starts_with("vidgen/"));
    }
}
