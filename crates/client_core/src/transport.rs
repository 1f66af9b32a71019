//! `reqwest` implementation of the pipeline backend surface.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{multipart, Client};
use shared::{
    domain::StepId,
    protocol::{LogsSnapshot, PreviewPayload, StepRequest, UploadResponse},
};
use tracing::debug;
use url::Url;

use crate::{ClientError, PipelineBackend};

pub struct HttpPipelineBackend {
    http: Client,
    base_url: Url,
}

impl HttpPipelineBackend {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: Client::new(),
            base_url: parse_base_url(server_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|source| ClientError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                source,
            })
    }
}

/// Parses the server URL so that relative joins keep any path prefix.
fn parse_base_url(server_url: &str) -> Result<Url, ClientError> {
    let mut raw = server_url.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|source| ClientError::InvalidUrl {
        url: server_url.to_string(),
        source,
    })
}

#[async_trait]
impl PipelineBackend for HttpPipelineBackend {
    async fn start_step(&self, request: &StepRequest) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("api/{}", request.step().name()))?;
        let builder = self.http.post(url);
        let builder = match request {
            StepRequest::Scrape(body) => builder.json(body),
            StepRequest::ConvertCv(body) => builder.json(body),
            StepRequest::Empty(_) => builder,
        };
        builder.send().await?.error_for_status()?;
        Ok(())
    }

    async fn upload_cv(&self, filename: &str, bytes: Vec<u8>) -> Result<String, ClientError> {
        let part = multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = multipart::Form::new().part("file", part);
        let response = self
            .http
            .post(self.endpoint("api/step3/upload")?)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body: UploadResponse = response.json().await?;
        if let Some(error) = body.error {
            return Err(ClientError::UploadRejected(error));
        }
        if !status.is_success() {
            return Err(ClientError::UploadRejected(format!("status {status}")));
        }
        body.filename.ok_or_else(|| {
            ClientError::UnexpectedResponse("upload response is missing a filename".to_string())
        })
    }

    async fn fetch_logs(&self) -> Result<LogsSnapshot, ClientError> {
        let cache_bust = Utc::now().timestamp_millis();
        let snapshot: LogsSnapshot = self
            .http
            .get(self.endpoint("api/logs")?)
            .query(&[("t", cache_bust)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(
            task_state = %snapshot.task_state,
            active_task = ?snapshot.active_task,
            lines = snapshot.logs.len(),
            "fetched pipeline snapshot"
        );
        Ok(snapshot)
    }

    async fn fetch_preview(&self, step: StepId) -> Result<PreviewPayload, ClientError> {
        let payload = self
            .http
            .get(self.endpoint(&format!("api/preview/{}", step.name()))?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(payload)
    }
}
