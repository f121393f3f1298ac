/// プレゼンテーション層: ユーザー入力処理
///
/// CLI引数やstdinからのユーザー入力を取得し、
/// アプリケーション層で使用可能な形式に変換します。
use crate::commands::login::LoginCredentials;
use anyhow::{Context, Result, bail};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// 対話的に認証情報を取得
pub fn read_credentials_interactive() -> Result<LoginCredentials> {
    eprintln!("Logging in to Azure OpenAI...");
    eprintln!();
    eprintln!("Please enter your Azure OpenAI API key and resource name.");
    eprintln!("You can find them in the Azure portal under 'Keys and Endpoint'.");
    eprintln!();

    eprint!("Resource name (or endpoint URL): ");
    io::stderr().flush()?;
    let resource = read_line(&mut io::stdin().lock(), "resource name")?;

    eprint!("API key: ");
    io::stderr().flush()?;
    let api_key = read_line(&mut io::stdin().lock(), "API key")?;

    eprintln!();
    eprintln!("Verifying credentials...");

    Ok(LoginCredentials { api_key, resource })
}

/// stdin からパイプで認証情報を取得（2行形式）
///
/// 形式:
///   1行目: APIキー
///   2行目: リソース名（またはエンドポイントURL）
pub fn read_credentials_from_stdin() -> Result<LoginCredentials> {
    read_credentials_from(&mut io::stdin().lock())
}

fn read_credentials_from(reader: &mut impl BufRead) -> Result<LoginCredentials> {
    let api_key = read_line(reader, "API key (line 1)")?;
    let resource = read_line(reader, "resource name (line 2)")?;
    Ok(LoginCredentials { api_key, resource })
}

fn read_line(reader: &mut impl BufRead, what: &str) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .with_context(|| format!("Failed to read {} from input", what))?;
    let value = line.trim().to_string();

    if value.is_empty() {
        bail!("The {} cannot be empty.", what);
    }

    Ok(value)
}

/// --prompt / --prompt-file からプロンプトを取得する
pub fn read_prompt(prompt: Option<String>, prompt_file: Option<&Path>) -> Result<String> {
    match (prompt, prompt_file) {
        (Some(prompt), _) => Ok(prompt),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt file: {}", path.display())),
        (None, None) => bail!("Either --prompt or --prompt-file is required."),
    }
}
