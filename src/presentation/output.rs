/// プレゼンテーション層: コマンド結果の出力
///
/// コマンド実行結果をユーザー向け（人間可読）または
/// 機械向け（JSON）形式で出力する責務を担います。
use crate::commands::result::{CommandResult, DownloadResult};
use crate::domain::error::DomainError;
use crate::domain::formatter::{format_bytes, format_timestamp};
use crate::domain::job::{JobHandle, JobState};
use anyhow::Result;
use thiserror::Error;

/// 機械可読JSONとして出力済みのエラー
///
/// main はこのエラーを再出力せず、終了コードだけを原因から決める。
#[derive(Error, Debug)]
#[error("{0}")]
pub struct ReportedError(#[source] pub DomainError);

/// コマンド結果を適切な形式で出力する
///
/// # Arguments
/// * `result` - コマンド実行結果
/// * `machine_output` - 機械可読出力フラグ
/// * `timezone_offset_seconds` - 時刻表示に使うオフセット
///
/// # Output
/// * `machine_output = false`: 人間向けの詳細メッセージ（stderr）
/// * `machine_output = true`: 機械可読JSON（stdout）
pub fn output_result(
    result: &CommandResult,
    machine_output: bool,
    timezone_offset_seconds: i32,
) -> Result<()> {
    if machine_output {
        println!("{}", serde_json::to_string(&machine_readable(result))?);
    } else {
        output_human_readable(result, timezone_offset_seconds);
    }

    Ok(())
}

/// 人間向けの詳細メッセージを出力（stderr）
///
/// すべての出力はstderrに送られ、stdoutはパイプライン用に予約されます。
fn output_human_readable(result: &CommandResult, tz: i32) {
    match result {
        CommandResult::Create(r) => {
            eprintln!();
            if r.waited {
                eprintln!("Video generation job finished.");
            } else {
                eprintln!("Video generation job submitted.");
            }
            print_job(&r.job, tz);

            if let Some(download) = &r.download {
                eprintln!();
                print_download(download);
            } else if !r.job.is_terminal() {
                eprintln!();
                eprintln!("Check progress with: vidgen status {}", r.job.id());
            }
        }
        CommandResult::Status(r) => {
            eprintln!();
            print_job(&r.job, tz);
            if r.job.state() == JobState::Completed {
                eprintln!();
                eprintln!("Download with: vidgen download {} <output.mp4>", r.job.id());
            }
        }
        CommandResult::List(r) => {
            eprintln!();
            for video in &r.videos {
                eprintln!("ID: {}", video.id);
                eprintln!("  Status:  {}", video.state);
                eprintln!("  Created: {}", format_timestamp(video.created_at, tz));
            }
            if !r.videos.is_empty() {
                eprintln!();
            }
            eprintln!("Total videos: {}", r.total_count);
        }
        CommandResult::Download(r) => {
            eprintln!();
            print_download(r);
        }
        CommandResult::Delete(r) => {
            eprintln!();
            if r.already_deleted {
                eprintln!("Video {} was already deleted.", r.job_id);
            } else if r.deleted {
                eprintln!("✓ Video deleted successfully!");
                eprintln!("ID: {}", r.job_id);
            } else {
                eprintln!("The service did not confirm deletion of {}.", r.job_id);
            }
        }
        CommandResult::Login(r) => {
            eprintln!();
            if r.was_logged_in {
                eprintln!("✓ Login credentials updated!");
            } else {
                eprintln!("Login successful.");
            }
            eprintln!("Resource: {}", r.resource);
            eprintln!("API key:  {}", r.api_key);
        }
        CommandResult::Logout(r) => {
            if r.was_logged_in {
                eprintln!("Logged out successfully.");
                eprintln!("Stored credentials have been removed.");
            } else {
                eprintln!("Already logged out.");
            }
        }
    }
}

fn print_job(job: &JobHandle, tz: i32) {
    let status = job.status();
    eprintln!("ID:      {}", job.id());
    eprintln!("Status:  {}", status.state);
    if let Some(model) = &status.model {
        eprintln!("Model:   {}", model);
    }
    eprintln!("Created: {}", format_timestamp(status.created_at, tz));
    if let Some(progress) = status.progress.filter(|_| !job.is_terminal()) {
        eprintln!("Progress: {}%", progress);
    }
    if let Some(failure) = &status.failure {
        eprintln!("Error:   {}", failure);
    }
}

fn print_download(download: &DownloadResult) {
    eprintln!("✓ Video saved: {}", download.path);
    eprintln!("Size: {}", format_bytes(download.size_bytes));
}

/// 機械可読JSONを組み立てる
///
/// スクリプトやパイプライン処理のために、
/// コマンド結果を構造化されたJSON形式にします。
fn machine_readable(result: &CommandResult) -> serde_json::Value {
    match result {
        CommandResult::Create(r) => serde_json::json!({
            "success": true,
            "command": "create",
            "job": r.job,
            "waited": r.waited,
            "download": r.download
        }),
        CommandResult::Status(r) => serde_json::json!({
            "success": true,
            "command": "status",
            "job": r.job,
            "waited": r.waited
        }),
        CommandResult::List(r) => serde_json::json!({
            "success": true,
            "command": "list",
            "videos": r.videos,
            "total_count": r.total_count
        }),
        CommandResult::Download(r) => serde_json::json!({
            "success": true,
            "command": "download",
            "job_id": r.job_id,
            "path": r.path,
            "size_bytes": r.size_bytes
        }),
        CommandResult::Delete(r) => serde_json::json!({
            "success": true,
            "command": "delete",
            "job_id": r.job_id,
            "deleted": r.deleted,
            "already_deleted": r.already_deleted
        }),
        CommandResult::Login(r) => serde_json::json!({
            "success": true,
            "command": "login",
            "was_logged_in": r.was_logged_in,
            "action": if r.was_logged_in { "updated" } else { "created" },
            "resource": r.resource
        }),
        CommandResult::Logout(r) => serde_json::json!({
            "success": true,
            "command": "logout",
            "was_logged_in": r.was_logged_in
        }),
    }
}

/// 待機したジョブが failed / cancelled で終わった結果を1つのJSONで出力（stdout）
pub fn output_unsuccessful_json(result: &CommandResult, error: &DomainError) -> Result<()> {
    println!("{}", serde_json::to_string(&unsuccessful_readable(result, error))?);
    Ok(())
}

/// 結果のJSONに失敗情報を重ねる
fn unsuccessful_readable(result: &CommandResult, error: &DomainError) -> serde_json::Value {
    let mut json = machine_readable(result);
    json["success"] = false.into();
    json["error"] = error.to_string().into();
    json["exit_code"] = error.severity().exit_code().into();
    json["hint"] = error.hint().into();
    json
}

/// エラーを機械可読JSONで出力（stdout）
pub fn output_error_json(message: &str, exit_code: i32, hint: Option<&str>) {
    let json = serde_json::json!({
        "success": false,
        "error": message,
        "exit_code": exit_code,
        "hint": hint
    });
    println!("{}", json);
}
