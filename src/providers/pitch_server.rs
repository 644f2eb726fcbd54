use futures_util::{Stream, StreamExt};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info};

use super::{TaskBackend, UploadProgress};
use crate::constants::UPLOAD_CHUNK_BYTES;
use crate::error::{EditorError, Result};
use crate::state::{
    ApplyRequest, ApplyResponse, AutoProcessOptions, DownloadKind, StatusResponse, UploadResponse,
};
use crate::timeline::MediaSource;
use crate::utils::upload_percent;

/// HTTP client for the pitch processing server.
#[derive(Debug, Clone)]
pub struct PitchServerClient {
    client: reqwest::Client,
    base_url: String,
}

impl PitchServerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn audio_url(&self, task_id: &str) -> String {
        self.endpoint(&format!("/audio/{}", urlencoding::encode(task_id)))
    }

    pub fn video_url(&self, task_id: &str) -> String {
        self.endpoint(&format!("/video/{}", urlencoding::encode(task_id)))
    }

    pub fn download_url(&self, task_id: &str, kind: DownloadKind) -> String {
        self.endpoint(&format!(
            "/download/{}?type={}",
            urlencoding::encode(task_id),
            kind.as_query()
        ))
    }

    /// Stream a finished result to `dest`. Returns the number of bytes written.
    pub async fn download(&self, task_id: &str, kind: DownloadKind, dest: &Path) -> Result<u64> {
        let response = self.client.get(self.download_url(task_id, kind)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EditorError::Server { status, body });
        }
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        info!(task_id, bytes = written, path = ?dest, "Downloaded result");
        Ok(written)
    }
}

impl TaskBackend for PitchServerClient {
    async fn upload_for_processing(
        &self,
        file: &Path,
        options: &AutoProcessOptions,
        progress: Option<UploadProgress>,
    ) -> Result<UploadResponse> {
        let form = Form::new()
            .part("file", file_part(file, progress).await?)
            .text("mode", options.mode.backend_token())
            .text("pitch", options.pitch.to_string())
            .text("double_check", if options.double_check { "1" } else { "0" });
        let response = self
            .client
            .post(self.endpoint("/upload"))
            .multipart(form)
            .send()
            .await?;
        parse_json(response).await
    }

    async fn upload_for_editor(&self, file: &Path, progress: Option<UploadProgress>) -> Result<UploadResponse> {
        let form = Form::new().part("file", file_part(file, progress).await?);
        let response = self
            .client
            .post(self.endpoint("/upload_for_editor"))
            .multipart(form)
            .send()
            .await?;
        parse_json(response).await
    }

    async fn fetch_status(&self, task_id: &str) -> Result<StatusResponse> {
        let url = self.endpoint(&format!("/status/{}", urlencoding::encode(task_id)));
        let response = self.client.get(url).send().await?;
        parse_json(response).await
    }

    async fn apply_manual_pitch(&self, request: &ApplyRequest) -> Result<ApplyResponse> {
        debug!(
            task_id = %request.task_id,
            regions = request.regions.len(),
            "Submitting manual regions"
        );
        let response = self
            .client
            .post(self.endpoint("/apply_manual_pitch"))
            .json(request)
            .send()
            .await?;
        parse_json(response).await
    }

    fn media_source(&self, task_id: &str) -> MediaSource {
        MediaSource {
            audio_url: self.audio_url(task_id),
            video_url: Some(self.video_url(task_id)),
        }
    }
}

/// Multipart file part whose body is read from disk as it is sent.
async fn file_part(path: &Path, progress: Option<UploadProgress>) -> Result<Part> {
    let file = tokio::fs::File::open(path).await?;
    let total = file.metadata().await?.len();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let body = reqwest::Body::wrap_stream(file_chunks(file, total, progress));
    let part = Part::stream_with_length(body, total)
        .file_name(file_name)
        .mime_str(mime.as_ref())?;
    Ok(part)
}

/// Read `file` in `UPLOAD_CHUNK_BYTES` pieces, reporting progress per chunk.
fn file_chunks(
    file: tokio::fs::File,
    total: u64,
    progress: Option<UploadProgress>,
) -> impl Stream<Item = std::io::Result<Vec<u8>>> {
    futures_util::stream::try_unfold((file, 0u64), move |(mut file, sent)| {
        let progress = progress.clone();
        async move {
            let mut chunk = vec![0u8; UPLOAD_CHUNK_BYTES];
            let read = file.read(&mut chunk).await?;
            if read == 0 {
                return Ok(None);
            }
            chunk.truncate(read);
            let sent = sent + read as u64;
            if let Some(progress) = progress.as_ref() {
                progress(upload_percent(sent, total));
            }
            Ok::<_, std::io::Error>(Some((chunk, (file, sent))))
        }
    })
}

async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(EditorError::Server { status, body });
    }
    Ok(response.json().await?)
}
