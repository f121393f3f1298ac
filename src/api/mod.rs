/// インフラ層: 動画生成APIとの通信
///
/// - `client`: HTTP送受信とステータスコードのエラー変換
/// - `auth`: `api-key` ヘッダー
/// - `types`: ワイヤ形式の型とドメイン型への変換
/// - `clock`: ポーリング待機の抽象
/// - `jobs`: 送信・ポーリング・取得・削除・一覧のクライアント
pub mod auth;
pub mod client;
pub mod clock;
pub mod error;
pub mod jobs;
pub mod types;

pub use clock::{Clock, TokioClock};
pub use error::{ClientError, InfraError};
pub use jobs::{PollOptions, VideoJobClient};
