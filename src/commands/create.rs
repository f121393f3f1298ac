/// createコマンド
///
/// プロンプト（と任意の参照画像）から動画生成ジョブを送信します。
/// --wait 指定時は終端状態まで待ち、--output 指定時は完了後にダウンロードします。
use crate::api::{Clock, PollOptions};
use crate::commands::download::save_result;
use crate::commands::result::{CommandResult, CreateResult};
use crate::config::{APP_CONFIG, Settings};
use crate::domain::formatter::preview_prompt;
use crate::domain::job::{JobRequest, JobState, ReferenceImage, VideoDuration, VideoSize};
use crate::domain::progress::{JobPhase, JobProgress};
use crate::domain::validator;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// createコマンドの入力
#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub prompt: String,
    pub image: Option<PathBuf>,
    pub size: VideoSize,
    pub seconds: VideoDuration,
    pub model: Option<String>,
    pub wait: bool,
    pub output: Option<PathBuf>,
    pub poll: PollOptions,
    /// 参照画像の解像度チェックを省略する
    pub skip_dimension_check: bool,
}

/// createコマンドを実行する
///
/// # エラー
/// ローカルの前提条件違反（空のプロンプト、参照画像の不備）はネットワークを使う前に返す。
/// リモートの拒否は RequestRejected としてステータスとボディを保持する。
pub async fn execute<C, F>(
    settings: &Settings,
    options: CreateOptions,
    clock: &C,
    mut on_progress: F,
) -> Result<CommandResult>
where
    C: Clock,
    F: FnMut(JobProgress),
{
    let request = build_request(&options)?;

    let client = super::connect(settings)?;

    on_progress(JobProgress::new(JobPhase::Submitting {
        prompt_preview: preview_prompt(request.prompt(), APP_CONFIG.video.prompt_preview_chars),
        size: request.size(),
        seconds: request.seconds(),
        reference_image: request.reference().map(|r| r.display_name()),
    }));

    let mut handle = client
        .submit(&request)
        .await
        .context("Failed to submit video generation job")?;

    on_progress(JobProgress::new(JobPhase::Submitted {
        job_id: handle.id().to_string(),
        state: handle.state(),
    }));

    let waited = options.wait || options.output.is_some();
    if waited {
        let job_id = handle.id().to_string();
        client
            .poll_until_terminal(&mut handle, &options.poll, clock, &mut on_progress)
            .await
            .with_context(|| format!("Failed while waiting for job {}", job_id))?;
    }

    let download = match &options.output {
        Some(output) if handle.state() == JobState::Completed => {
            Some(save_result(&client, &handle, output, &mut on_progress).await?)
        }
        _ => None,
    };

    Ok(CommandResult::Create(CreateResult {
        job: handle,
        waited,
        download,
    }))
}

/// 入力からリクエストを組み立て、ローカルで検証する
fn build_request(options: &CreateOptions) -> Result<JobRequest> {
    let mut request = JobRequest::new(options.prompt.clone())
        .context("Invalid prompt")?
        .with_size(options.size)
        .with_seconds(options.seconds);

    if let Some(model) = &options.model {
        request = request.with_model(model.clone());
    }

    if let Some(image) = &options.image {
        let reference = ReferenceImage::from_path(image)
            .with_context(|| format!("Invalid reference image: {}", image.display()))?;

        if !options.skip_dimension_check {
            let bytes = std::fs::read(image)
                .with_context(|| format!("Failed to read reference image: {}", image.display()))?;
            validator::check_reference_dimensions(&reference.display_name(), &bytes, options.size)
                .context("Reference image does not match the requested video size")?;
        }

        request = request.with_reference(reference);
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TokioClock;
    use crate::domain::error::DomainError;
    use std::io::Cursor;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn options(prompt: &str) -> CreateOptions {
        CreateOptions {
            prompt: prompt.to_string(),
            image: None,
            size: VideoSize::default(),
            seconds: VideoDuration::default(),
            model: None,
            wait: false,
            output: None,
            poll: PollOptions::default(),
            skip_dimension_check: false,
        }
    }

    fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
        let mut bytes = Vec::new();
        image::RgbImage::new(width, height)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_build_request_rejects_empty_prompt() {
        let err = build_request(&options("   ")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::EmptyPrompt)
        ));
    }

    #[test]
    fn test_build_request_rejects_dimension_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let mut opts = options("Animate this");
        opts.image = Some(write_png(&temp_dir, "frame.png", 1280, 720));

        let err = build_request(&opts).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::ImageDimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_build_request_skip_dimension_check() {
        let temp_dir = TempDir::new().unwrap();
        let mut opts = options("Animate this");
        opts.image = Some(write_png(&temp_dir, "frame.png", 1280, 720));
        opts.skip_dimension_check = true;

        let request = build_request(&opts).unwrap();
        assert!(request.reference().is_some());
    }

    #[tokio::test]
    async fn test_create_without_wait_reports_submission() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "video_1",
                "object": "video",
                "status": "queued",
                "model": "sora-2",
                "created_at": 1760627077
            })))
            .expect(1)
            .mount(&server)
            .await;

        let settings = Settings::new("test-key", server.uri());
        let mut phases = Vec::new();
        let result = execute(&settings, options("A cat"), &TokioClock, |p| phases.push(p.phase))
            .await
            .unwrap();

        match result {
            CommandResult::Create(r) => {
                assert_eq!(r.job.id(), "video_1");
                assert!(!r.waited);
                assert!(r.download.is_none());
            }
            other => panic!("Expected Create result, got {:?}", other),
        }
        assert!(matches!(phases[0], JobPhase::Submitting { .. }));
        assert!(matches!(phases[1], JobPhase::Submitted { .. }));
    }
}
