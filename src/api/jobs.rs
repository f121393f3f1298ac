/// 動画生成ジョブクライアント
///
/// 送信 → 終端状態までポーリング → 結果取得 → 削除 → 一覧 の
/// ライフサイクルを、通信の詳細を隠して提供します。
///
/// 設定は起動時に解決された `Settings` としてコンストラクタに渡され、
/// クライアント内で環境変数を読むことはありません。
use crate::api::auth::ApiKeyAuth;
use crate::api::client::ApiClient;
use crate::api::clock::Clock;
use crate::api::error::{ClientError, InfraError};
use crate::api::types::{CreateVideoBody, DeletedVideo, VideoListResponse, VideoObject};
use crate::config::{APP_CONFIG, Settings};
use crate::domain::error::DomainError;
use crate::domain::job::{
    ContentVariant, DeletionConfirmation, ImageSource, JobHandle, JobRequest, JobResult,
    JobState, JobStatus, JobSummary, ReferenceImage,
};
use crate::domain::progress::{JobPhase, JobProgress};
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const VIDEOS_ENDPOINT: &str = "/videos";

type ClientResult<T> = Result<T, ClientError>;

/// ポーリングの設定
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// ステータス確認の間隔
    pub interval: Duration,
    /// 合計待機時間の上限（None は無制限）
    pub max_wait: Option<Duration>,
    /// 待機の中断（ポーリングの区切りでのみ観測される）
    pub cancel: Option<CancellationToken>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(APP_CONFIG.polling.interval_seconds),
            max_wait: None,
            cancel: None,
        }
    }
}

impl PollOptions {
    /// 解決済み設定の間隔と上限を使う
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            interval: settings.poll_interval,
            max_wait: settings.max_wait,
            cancel: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }
}

/// 動画生成ジョブのクライアント
pub struct VideoJobClient {
    api: ApiClient,
    download_timeout: Duration,
}

impl VideoJobClient {
    /// 解決済み設定からクライアントを作成
    pub fn new(settings: &Settings) -> Result<Self, InfraError> {
        let auth = ApiKeyAuth::new(settings.api_key.clone());
        let api = ApiClient::new(settings.base_url.clone(), &auth, settings.request_timeout)?;

        tracing::debug!(
            base_url = %settings.base_url,
            api_key = %auth.masked(),
            "video job client created"
        );

        Ok(Self {
            api,
            download_timeout: settings.download_timeout,
        })
    }

    /// ジョブを送信する
    ///
    /// 参照画像があれば multipart、なければ JSON で送る。ネットワーク呼び出しは1回。
    /// 参照画像ファイルの存在はネットワークより先に確認する。
    pub async fn submit(&self, request: &JobRequest) -> ClientResult<JobHandle> {
        let response = match request.reference() {
            Some(reference) => {
                let form = Self::build_form(request, reference).await?;
                self.api.post_multipart(VIDEOS_ENDPOINT, form).await?
            }
            None => {
                self.api
                    .post_json(VIDEOS_ENDPOINT, &CreateVideoBody::from(request))
                    .await?
            }
        };

        let response = ApiClient::check_response(response, VIDEOS_ENDPOINT).await?;
        let object: VideoObject = ApiClient::parse_json(response).await?;
        let handle = JobHandle::from(object);

        tracing::info!(
            job_id = handle.id(),
            state = %handle.state(),
            size = %request.size(),
            seconds = %request.seconds(),
            with_reference = request.reference().is_some(),
            "job submitted"
        );

        Ok(handle)
    }

    /// multipart ボディを組み立てる
    async fn build_form(request: &JobRequest, reference: &ReferenceImage) -> ClientResult<Form> {
        let data = match reference.source() {
            ImageSource::File(path) => {
                if !path.exists() {
                    return Err(DomainError::reference_file_missing(path.display().to_string()).into());
                }
                tokio::fs::read(path).await.map_err(InfraError::from)?
            }
            ImageSource::Bytes { data, .. } => data.clone(),
        };

        let part = Part::bytes(data)
            .file_name(reference.file_name())
            .mime_str(reference.mime().as_str())
            .map_err(|e| InfraError::transport(format!("Failed to build image part: {}", e)))?;

        Ok(Form::new()
            .text("model", request.model().to_string())
            .text("prompt", request.prompt().to_string())
            .text("size", request.size().as_str())
            .text("seconds", request.seconds().as_str())
            .part("input_reference", part))
    }

    /// IDからジョブを取得する（以前のプロセスで送信したジョブ用）
    pub async fn retrieve(&self, job_id: &str) -> ClientResult<JobHandle> {
        let object = self.get_video(job_id).await?;
        Ok(JobHandle::from(object))
    }

    /// ステータスを1回問い合わせ、ハンドルのキャッシュを更新する
    pub async fn refresh(&self, handle: &mut JobHandle) -> ClientResult<JobStatus> {
        let status = self.get_video(handle.id()).await?.to_status();

        if status.state != handle.state() {
            tracing::info!(
                job_id = handle.id(),
                from = %handle.state(),
                to = %status.state,
                "job state changed"
            );
        }

        handle.observe(status.clone());
        Ok(status)
    }

    async fn get_video(&self, job_id: &str) -> Result<VideoObject, InfraError> {
        let endpoint = format!("{}/{}", VIDEOS_ENDPOINT, job_id);
        let response = self.api.get(&endpoint).await?;
        let response = ApiClient::check_response(response, &endpoint).await?;
        ApiClient::parse_json(response).await
    }

    /// 終端状態（completed / failed / cancelled）になるまで待つ
    ///
    /// キャッシュ済みのステータスが既に終端なら、通信せずにそれを返す。
    /// 非終端を観測するたびに `interval` だけ待ってから再度問い合わせる。
    /// 通信エラーは再試行せずにそのまま返す。
    ///
    /// # Errors
    /// - `PollTimeout`: `max_wait` を超えた
    /// - `PollCancelled`: キャンセルトークンが発火した（問い合わせ中のリクエストは中断しない）
    pub async fn poll_until_terminal<C, F>(
        &self,
        handle: &mut JobHandle,
        options: &PollOptions,
        clock: &C,
        mut on_progress: F,
    ) -> ClientResult<JobStatus>
    where
        C: Clock,
        F: FnMut(JobProgress),
    {
        let started = clock.now();

        loop {
            let elapsed = clock.now().saturating_duration_since(started);

            if handle.is_terminal() {
                on_progress(JobProgress::new(JobPhase::Finished {
                    job_id: handle.id().to_string(),
                    state: handle.state(),
                }));
                return Ok(handle.status().clone());
            }

            if options.is_cancelled() {
                return Err(Self::cancelled(handle));
            }

            if let Some(max_wait) = options.max_wait {
                if elapsed >= max_wait {
                    tracing::warn!(job_id = handle.id(), waited_secs = elapsed.as_secs(), "poll timed out");
                    return Err(InfraError::PollTimeout {
                        job_id: handle.id().to_string(),
                        waited_secs: elapsed.as_secs(),
                    }
                    .into());
                }
            }

            on_progress(JobProgress::new(JobPhase::Polling {
                job_id: handle.id().to_string(),
                state: handle.state(),
                progress: handle.status().progress,
                elapsed_secs: elapsed.as_secs(),
            }));

            let wait = match options.max_wait {
                Some(max_wait) => options.interval.min(max_wait - elapsed),
                None => options.interval,
            };

            match &options.cancel {
                Some(token) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => return Err(Self::cancelled(handle)),
                        _ = clock.sleep(wait) => {}
                    }
                }
                None => clock.sleep(wait).await,
            }

            self.refresh(handle).await?;
        }
    }

    fn cancelled(handle: &JobHandle) -> ClientError {
        tracing::info!(job_id = handle.id(), "polling cancelled");
        InfraError::PollCancelled {
            job_id: handle.id().to_string(),
        }
        .into()
    }

    /// 完了したジョブの成果物を取得する
    ///
    /// キャッシュ済みのステータスが completed でなければ、通信せずに
    /// `ResultNotReady` を返す。暗黙のポーリングは行わない。
    pub async fn fetch_result(
        &self,
        handle: &JobHandle,
        variant: ContentVariant,
    ) -> ClientResult<JobResult> {
        if handle.state() != JobState::Completed {
            return Err(DomainError::ResultNotReady {
                job_id: handle.id().to_string(),
                state: handle.state(),
            }
            .into());
        }

        let endpoint = format!("{}/{}/content", VIDEOS_ENDPOINT, handle.id());
        let response = self
            .api
            .get_with_timeout(&endpoint, &[("variant", variant.as_str())], self.download_timeout)
            .await?;
        let response = ApiClient::check_response(response, &endpoint).await?;
        let content = ApiClient::read_bytes(response, &endpoint).await?;

        tracing::info!(job_id = handle.id(), size_bytes = content.len(), "result fetched");

        Ok(JobResult {
            job_id: handle.id().to_string(),
            variant,
            content,
        })
    }

    /// ジョブを削除する
    ///
    /// 削除済みのIDに対しては `NotFound` を返す（冪等ではない）。
    pub async fn delete(&self, job_id: &str) -> ClientResult<DeletionConfirmation> {
        let endpoint = format!("{}/{}", VIDEOS_ENDPOINT, job_id);
        let response = self.api.delete(&endpoint).await?;
        let response = ApiClient::check_response(response, &endpoint).await?;
        let deleted: DeletedVideo = ApiClient::parse_json(response).await?;

        tracing::info!(job_id, deleted = deleted.deleted, "job deleted");

        Ok(deleted.into())
    }

    /// 全ジョブを取得する（ページングなし、呼ぶたびに再取得）
    pub async fn list_all(&self) -> ClientResult<Vec<JobSummary>> {
        let response = self.api.get(VIDEOS_ENDPOINT).await?;
        let response = ApiClient::check_response(response, VIDEOS_ENDPOINT).await?;
        let list: VideoListResponse = ApiClient::parse_json(response).await?;

        tracing::debug!(count = list.data.len(), "jobs listed");

        Ok(list.data.into_iter().map(JobSummary::from).collect())
    }
}
