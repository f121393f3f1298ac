//! Sora-2 (Azure OpenAI) の動画生成ジョブを扱うクライアントとCLI
//!
//! - `api`: `/videos` エンドポイントへのHTTPアクセスとポーリング
//! - `domain`: ジョブ・リクエスト・エラーなどのドメインモデル
//! - `config`: 静的設定、ユーザー設定ファイル、環境変数の解決
//! - `commands`: CLIの各サブコマンド（アプリケーション層）
//! - `presentation`: 人間向け / 機械向けの出力
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error_severity;
pub mod logging;
pub mod presentation;
