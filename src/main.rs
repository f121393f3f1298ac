use clap::Parser;
use vidgen::api::{ClientError, InfraError};
use vidgen::cli::{self, Cli};
use vidgen::config::error::ConfigError;
use vidgen::config::settings;
use vidgen::domain::error::DomainError;
use vidgen::logging;
use vidgen::presentation::output::{self, ReportedError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // .env は環境変数より弱い（既存の値は上書きしない）
    let dotenv_path = settings::load_dotenv();
    logging::init(cli.verbose);
    if let Some(path) = dotenv_path {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let machine_output = cli.machine;
    if let Err(e) = cli::run(cli).await {
        handle_error(e, machine_output);
    }
}

/// エラーハンドリングとユーザーへの表示
///
/// anyhow::Error から元のエラー型を downcast して、
/// エラーの種類に応じた exit code とメッセージを決定する。
fn handle_error(error: anyhow::Error, machine_output: bool) -> ! {
    let exit_code = determine_exit_code(&error);
    let hint = get_error_hint(&error);

    if machine_output {
        // ReportedError は結果のJSONに含めて出力済み
        if error.downcast_ref::<ReportedError>().is_none() {
            let message = error
                .chain()
                .map(|cause| cause.to_string())
                .collect::<Vec<_>>()
                .join(": ");
            output::output_error_json(&message, exit_code, hint.as_deref());
        }
    } else {
        eprintln!("Error: {}", error);

        let chain: Vec<_> = error.chain().skip(1).collect();
        if !chain.is_empty() {
            eprintln!("\nCaused by:");
            for (i, cause) in chain.iter().enumerate() {
                eprintln!("  {}: {}", i + 1, cause);
            }
        }

        if let Some(hint) = &hint {
            eprintln!("\nHint: {}", hint);
        }
    }

    std::process::exit(exit_code);
}

/// エラーチェーンから適切な終了コードを決定
fn determine_exit_code(error: &anyhow::Error) -> i32 {
    for cause in error.chain() {
        if let Some(err) = cause.downcast_ref::<DomainError>() {
            return err.severity().exit_code();
        }
        if let Some(err) = cause.downcast_ref::<ClientError>() {
            return err.severity().exit_code();
        }
        if let Some(err) = cause.downcast_ref::<InfraError>() {
            return err.severity().exit_code();
        }
        if let Some(err) = cause.downcast_ref::<ConfigError>() {
            return err.severity().exit_code();
        }
    }

    // 不明なエラー
    1
}

/// エラーに対するユーザー向けヒントを取得
fn get_error_hint(error: &anyhow::Error) -> Option<String> {
    for cause in error.chain() {
        let hint = if let Some(err) = cause.downcast_ref::<DomainError>() {
            err.hint()
        } else if let Some(err) = cause.downcast_ref::<ClientError>() {
            err.hint()
        } else if let Some(err) = cause.downcast_ref::<InfraError>() {
            err.hint()
        } else if let Some(err) = cause.downcast_ref::<ConfigError>() {
            err.hint()
        } else {
            None
        };

        if let Some(hint) = hint {
            return Some(hint.to_string());
        }
    }

    None
}
