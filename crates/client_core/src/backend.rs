use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use serde::de::DeserializeOwned;
use shared::protocol::{LookupQuery, LookupResponse, SubmitResponse, SubmitSurveyRequest};
use tracing::{debug, warn};
use url::Url;

use crate::{config::Settings, error::ClientError};

/// Apps Script web apps reject CORS-preflighted content types, so the JSON
/// body is labeled as plain text.
pub const SUBMIT_CONTENT_TYPE: &str = "text/plain;charset=utf-8";

/// The spreadsheet-backed service that stores survey records.
#[async_trait]
pub trait SurveyBackend: Send + Sync {
    async fn submit(&self, request: &SubmitSurveyRequest) -> Result<SubmitResponse, ClientError>;
    async fn lookup(&self, survey_url: &str) -> Result<LookupResponse, ClientError>;
}

pub struct HttpSurveyBackend {
    http: Client,
    endpoint: Url,
}

impl HttpSurveyBackend {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ClientError> {
        let endpoint = settings.endpoint()?;
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Non-2xx statuses become transport errors carrying the raw body; 2xx bodies
/// must decode as `T`.
async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        warn!(status = status.as_u16(), "backend returned error status");
        return Err(ClientError::Transport {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|err| ClientError::MalformedResponse(err.to_string()))
}

#[async_trait]
impl SurveyBackend for HttpSurveyBackend {
    async fn submit(&self, request: &SubmitSurveyRequest) -> Result<SubmitResponse, ClientError> {
        let body = serde_json::to_string(request)
            .map_err(|err| ClientError::Dispatch(format!("failed to encode request: {err}")))?;
        debug!(survey_url = %request.survey_url, "submitting survey");
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, SUBMIT_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;
        decode_response(response).await
    }

    async fn lookup(&self, survey_url: &str) -> Result<LookupResponse, ClientError> {
        debug!(survey_url, "looking up survey");
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&LookupQuery { url: survey_url })
            .send()
            .await?;
        decode_response(response).await
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
