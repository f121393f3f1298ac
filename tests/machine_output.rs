//! `--machine` の stdout をバイナリ経由で検証する
//!
//! 設定ディレクトリと作業ディレクトリは一時ディレクトリに隔離し、
//! 認証情報は環境変数で渡す。
use serde_json::{Value, json};
use std::process::Output;
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn video(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "object": "video",
        "status": status,
        "model": "sora-2",
        "created_at": 1760627077,
        "error": if status == "failed" {
            json!({ "code": "moderation_blocked", "message": "Blocked" })
        } else {
            Value::Null
        }
    })
}

async fn mount_status(server: &MockServer, id: &str, status: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/openai/v1/videos/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(video(id, status)))
        .mount(server)
        .await;
}

async fn run_vidgen(server: &MockServer, home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vidgen"))
        .args(args)
        .current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("AZURE_API_KEY", "integration-key")
        .env("AZURE_RESOURCE_NAME", server.uri())
        .env_remove("VIDGEN_LOG")
        .output()
        .await
        .expect("Failed to run vidgen")
}

fn json_documents(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("stdout line is not JSON"))
        .collect()
}

#[tokio::test]
async fn failed_job_prints_one_failure_document() {
    let server = MockServer::start().await;
    mount_status(&server, "video_1", "failed").await;
    let home = TempDir::new().unwrap();

    let output = run_vidgen(&server, &home, &["status", "video_1", "--machine"]).await;

    assert_eq!(output.status.code(), Some(4));
    let documents = json_documents(&output);
    assert_eq!(documents.len(), 1, "stdout: {:?}", documents);

    let document = &documents[0];
    assert_eq!(document["success"], false);
    assert_eq!(document["exit_code"], 4);
    assert_eq!(document["command"], "status");
    assert_eq!(document["job"]["status"]["state"], "failed");
    assert!(document["error"].as_str().unwrap().contains("Blocked"));
}

#[tokio::test]
async fn completed_job_prints_one_success_document() {
    let server = MockServer::start().await;
    mount_status(&server, "video_2", "completed").await;
    let home = TempDir::new().unwrap();

    let output = run_vidgen(&server, &home, &["status", "video_2", "--machine"]).await;

    assert_eq!(output.status.code(), Some(0));
    let documents = json_documents(&output);
    assert_eq!(documents.len(), 1, "stdout: {:?}", documents);
    assert_eq!(documents[0]["success"], true);
    assert_eq!(documents[0]["job"]["status"]["state"], "completed");
}

#[tokio::test]
async fn missing_job_prints_one_error_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openai/v1/videos/video_gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Video not found"))
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    let output = run_vidgen(&server, &home, &["status", "video_gone", "--machine"]).await;

    assert_eq!(output.status.code(), Some(1));
    let documents = json_documents(&output);
    assert_eq!(documents.len(), 1, "stdout: {:?}", documents);
    assert_eq!(documents[0]["success"], false);
    assert_eq!(documents[0]["exit_code"], 1);
}
