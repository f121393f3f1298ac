/// downloadコマンド
///
/// 完了したジョブの動画を取得してファイルに保存します。
use crate::api::VideoJobClient;
use crate::api::error::InfraError;
use crate::commands::result::{CommandResult, DownloadResult};
use crate::config::Settings;
use crate::domain::job::{ContentVariant, JobHandle};
use crate::domain::progress::{JobPhase, JobProgress};
use anyhow::{Context, Result};
use std::path::Path;

/// downloadコマンドを実行する
///
/// ジョブの現在のステータスを取得し、completed でなければ ResultNotReady で失敗する。
/// 完了を待つことはしない（待つ場合は `status` または `create --wait` を使う）。
pub async fn execute<F>(
    settings: &Settings,
    job_id: &str,
    output: &Path,
    on_progress: F,
) -> Result<CommandResult>
where
    F: FnMut(JobProgress),
{
    let client = super::connect(settings)?;

    let handle = client
        .retrieve(job_id)
        .await
        .with_context(|| format!("Failed to retrieve job {}", job_id))?;

    let result = save_result(&client, &handle, output, on_progress).await?;

    Ok(CommandResult::Download(result))
}

/// 成果物を取得し、親ディレクトリを作成してから書き込む
pub(crate) async fn save_result<F>(
    client: &VideoJobClient,
    handle: &JobHandle,
    output: &Path,
    mut on_progress: F,
) -> Result<DownloadResult>
where
    F: FnMut(JobProgress),
{
    on_progress(JobProgress::new(JobPhase::Downloading {
        job_id: handle.id().to_string(),
    }));

    let result = client
        .fetch_result(handle, ContentVariant::Video)
        .await
        .with_context(|| format!("Failed to download video for job {}", handle.id()))?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(InfraError::from)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    tokio::fs::write(output, &result.content)
        .await
        .map_err(InfraError::from)
        .with_context(|| format!("Failed to write video file: {}", output.display()))?;

    let path = tokio::fs::canonicalize(output)
        .await
        .unwrap_or_else(|_| output.to_path_buf())
        .display()
        .to_string();
    let size_bytes = result.len() as u64;

    on_progress(JobProgress::new(JobPhase::Downloaded {
        path: path.clone(),
        size_bytes,
    }));

    Ok(DownloadResult {
        job_id: handle.id().to_string(),
        path,
        size_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClientError;
    use crate::domain::error::DomainError;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_status(server: &MockServer, status: &str) {
        Mock::given(method("GET"))
            .and(path("/videos/video_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "video_1",
                "object": "video",
                "status": status,
                "created_at": 1760627077
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_download_creates_parent_directories() {
        let server = MockServer::start().await;
        mount_status(&server, "completed").await;
        Mock::given(method("GET"))
            .and(path("/videos/video_1/content"))
            .and(query_param("variant", "video"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 1024]))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("nested").join("dir").join("output.mp4");
        let settings = Settings::new("test-key", server.uri());

        let result = execute(&settings, "video_1", &output, |_| {}).await.unwrap();

        match result {
            CommandResult::Download(r) => {
                assert_eq!(r.size_bytes, 1024);
                assert!(Path::new(&r.path).is_absolute());
            }
            other => panic!("Expected Download result, got {:?}", other),
        }
        assert_eq!(std::fs::read(&output).unwrap().len(), 1024);
    }

    #[tokio::test]
    async fn test_download_unfinished_job_is_not_ready() {
        let server = MockServer::start().await;
        mount_status(&server, "processing").await;
        Mock::given(method("GET"))
            .and(path("/videos/video_1/content"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("output.mp4");
        let settings = Settings::new("test-key", server.uri());

        let err = execute(&settings, "video_1", &output, |_| {}).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::Domain(DomainError::ResultNotReady { .. }))
        ));
        assert!(!output.exists());
    }
}
