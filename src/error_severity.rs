//! 終了コードの決定に使用するエラー深刻度
//!
//! 全レイヤー（domain, api, config）のエラーはこの分類に写像され、
//! `main` がエラーチェーンから終了コードを決定する。
//!
//! **依存方向の原則:**
//! - 内側層はこのモジュールに依存してOK
//! - このモジュールは他のモジュールに依存しない

use std::fmt;

/// エラーの深刻度と対応する終了コード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// ユーザーの入力エラー
    ///
    /// 参照画像が見つからない、未完了ジョブのダウンロード、
    /// リモートによるパラメータ拒否など、ユーザーが直せるもの。
    ///
    /// **Exit Code: 1**
    UserError,

    /// 設定エラー
    ///
    /// API キー未設定、認証拒否、設定ファイル破損など。
    ///
    /// **Exit Code: 2**
    ConfigError,

    /// システムエラー
    ///
    /// ネットワーク障害、タイムアウト、クォータ超過など外部要因。
    ///
    /// **Exit Code: 3**
    SystemError,

    /// ジョブが failed / cancelled で終了した
    ///
    /// **Exit Code: 4**
    JobFailed,

    /// ユーザーによる中断（Ctrl-C）
    ///
    /// **Exit Code: 130**
    Interrupted,
}

impl ErrorSeverity {
    /// 対応する Unix 終了コードを返す
    pub fn exit_code(self) -> i32 {
        match self {
            Self::UserError => 1,
            Self::ConfigError => 2,
            Self::SystemError => 3,
            Self::JobFailed => 4,
            Self::Interrupted => 130,
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserError => write!(f, "user error"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::SystemError => write!(f, "system error"),
            Self::JobFailed => write!(f, "job failed"),
            Self::Interrupted => write!(f, "interrupted"),
        }
    }
}
