/// ドメイン層
///
/// ジョブのデータモデル、送信前の前提条件チェック、表示用フォーマット、
/// 進捗イベントを提供します。外部通信は行いません。
pub mod error;
pub mod formatter;
pub mod job;
pub mod progress;
pub mod validator;
