/// ログ出力の初期化
///
/// ログは常にstderrに出す（stdoutは --machine のJSON用）。
/// `VIDGEN_LOG` が設定されていればそのフィルタを使い、
/// なければ -v の回数からレベルを決める。
use crate::config::APP_CONFIG;
use tracing_subscriber::EnvFilter;

/// -v の回数からフィルタ文字列を決める
///
/// 依存クレートは warn のまま、このクレートのレベルだけを上げる。
pub fn filter_for_verbosity(verbosity: u8) -> String {
    let level = match verbosity {
        0 => return APP_CONFIG.logging.default_level.to_string(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("{},vidgen={}", APP_CONFIG.logging.default_level, level)
}

/// グローバルsubscriberを設定する（2回目以降の呼び出しは無視される）
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(APP_CONFIG.logging.env_var)
        .unwrap_or_else(|_| EnvFilter::new(filter_for_verbosity(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_for_verbosity() {
        assert_eq!(filter_for_verbosity(0), "warn");
        assert_eq!(filter_for_verbosity(1), "warn,vidgen=info");
        assert_eq!(filter_for_verbosity(2), "warn,vidgen=debug");
        assert_eq!(filter_for_verbosity(5), "warn,vidgen=trace");
    }

    #[test]
    fn test_filter_strings_parse() {
        for verbosity in 0..4 {
            assert!(EnvFilter::try_new(filter_for_verbosity(verbosity)).is_ok());
        }
    }
}
