//! OpenAI HTTP client: request building and status mapping.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::gateway::RunEventStream;
use crate::streaming::run_event_stream;
use crate::GatewayError;

use super::config::OpenAiConfig;

pub(crate) const ASSISTANTS_BETA: &str = "assistants=v2";

/// Assistants API gateway backed by `reqwest`.
pub struct OpenAiGateway {
    pub(crate) config: OpenAiConfig,
    pub(crate) http: reqwest::Client,
}

impl OpenAiGateway {
    pub fn new(config: OpenAiConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| GatewayError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Authenticated request with the Assistants beta header.
    pub(crate) fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(&self.config.api_key)
            .header("OpenAI-Beta", ASSISTANTS_BETA)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        debug!(path, "GET");
        let builder = self
            .request(reqwest::Method::GET, path)
            .timeout(self.config.request_timeout);
        self.send_json(builder).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(path, "POST");
        let builder = self
            .request(reqwest::Method::POST, path)
            .timeout(self.config.request_timeout)
            .json(body);
        self.send_json(builder).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        debug!(path, "DELETE");
        let builder = self
            .request(reqwest::Method::DELETE, path)
            .timeout(self.config.request_timeout);
        self.send_json(builder).await
    }

    /// POST with `stream: true` and return the decoded event stream.
    pub(crate) async fn post_stream(
        &self,
        path: &str,
        mut body: serde_json::Value,
    ) -> Result<RunEventStream, GatewayError> {
        body["stream"] = serde_json::json!(true);
        debug!(path, "POST (stream)");
        let response = self
            .request(reqwest::Method::POST, path)
            .header("Accept", "text/event-stream")
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(run_event_stream(response))
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = builder.send().await?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| GatewayError::ParseError(e.to_string()))
    }
}

/// Map non-success HTTP statuses to gateway errors.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GatewayError::RateLimited);
    }
    let text = response.text().await.unwrap_or_default();
    let text = error_detail(&text);
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(GatewayError::NotFound(text));
    }
    Err(GatewayError::ApiError(format!("HTTP {status}: {text}")))
}

/// The service's `error.message` when present, else the truncated body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.chars().take(200).collect())
}
