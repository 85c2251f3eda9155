//! Model discovery against an OpenAI-compatible `/v1/models` route.

use crate::endpoint::{models_endpoint, normalize_base_url};
use crate::style;
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// One entry of the model listing. Other fields of the payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Model {
    pub id: String,
    #[serde(default)]
    pub owned_by: Option<String>,
}

impl Model {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owned_by: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    data: Option<Vec<Model>>,
}

#[derive(Debug, thiserror::Error)]
#[error("failed to fetch the model list: {message}")]
pub struct ModelFetchError {
    pub message: String,
    pub status: Option<u16>,
}

impl ModelFetchError {
    fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }
}

/// Anything that can list the models behind an endpoint.
pub trait ModelSource {
    fn fetch_models(&self, base_url: &str, auth_token: &str)
        -> Result<Vec<Model>, ModelFetchError>;
}

pub struct ModelCatalogClient {
    client: reqwest::blocking::Client,
}

impl ModelCatalogClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("failed to build model-fetch HTTP client")?;
        Ok(Self { client })
    }
}

impl ModelSource for ModelCatalogClient {
    fn fetch_models(
        &self,
        base_url: &str,
        auth_token: &str,
    ) -> Result<Vec<Model>, ModelFetchError> {
        let endpoint = models_endpoint(base_url);
        println!(
            "{}",
            style::yellow(&format!("Fetching the model list from {endpoint}..."))
        );
        log::debug!("base url as entered: {base_url}");
        log::debug!("normalized base url: {}", normalize_base_url(base_url));

        let response = self
            .client
            .get(&endpoint)
            .bearer_auth(auth_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .map_err(|err| ModelFetchError::new(err.to_string(), None))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| ModelFetchError::new(err.to_string(), Some(status.as_u16())))?;

        if !status.is_success() {
            let message = server_error_message(&body)
                .unwrap_or_else(|| format!("request failed with status {status}"));
            return Err(ModelFetchError::new(message, Some(status.as_u16())));
        }

        let parsed: ModelsResponse = serde_json::from_str(&body).map_err(|err| {
            ModelFetchError::new(
                format!("invalid model list response: {err}"),
                Some(status.as_u16()),
            )
        })?;

        let models = parsed.data.unwrap_or_default();
        log::debug!("endpoint returned {} models", models.len());
        Ok(models)
    }
}

/// Picks the most specific message out of an error body: `error.message`,
/// then a top-level `message`, then a plain string `error`.
fn server_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let candidates = [
        value.pointer("/error/message"),
        value.get("message"),
        value.get("error"),
    ];
    let message = candidates
        .into_iter()
        .flatten()
        .filter_map(serde_json::Value::as_str)
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string);
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn fetch(base_url: String, token: &'static str) -> Result<Vec<Model>, ModelFetchError> {
        // The blocking client must not run on an async worker thread.
        tokio::task::spawn_blocking(move || {
            ModelCatalogClient::new()
                .expect("build client")
                .fetch_models(&base_url, token)
        })
        .await
        .expect("join fetch task")
    }

    #[test]
    fn prefers_nested_error_message() {
        let body = r#"{"error":{"message":"invalid api key"},"message":"generic"}"#;
        assert_eq!(server_error_message(body).as_deref(), Some("invalid api key"));
    }

    #[test]
    fn falls_back_to_top_level_message() {
        let body = r#"{"error":{"code":401},"message":"unauthorized"}"#;
        assert_eq!(server_error_message(body).as_deref(), Some("unauthorized"));
    }

    #[test]
    fn accepts_plain_string_error() {
        assert_eq!(
            server_error_message(r#"{"error":"quota exceeded"}"#).as_deref(),
            Some("quota exceeded")
        );
    }

    #[test]
    fn nested_message_outranks_string_error_and_top_level() {
        let body = r#"{"error":{"message":"model access denied"},"message":"forbidden"}"#;
        assert_eq!(server_error_message(body).as_deref(), Some("model access denied"));
        let body = r#"{"error":"rate limited","message":"slow down"}"#;
        assert_eq!(server_error_message(body).as_deref(), Some("slow down"));
    }

    #[test]
    fn non_json_body_has_no_server_message() {
        assert_eq!(server_error_message("<html>502</html>"), None);
        assert_eq!(server_error_message(r#"{"message":"  "}"#), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn lists_models_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": [
                    {"id": "claude-3-opus", "object": "model", "owned_by": "anthropic"},
                    {"id": "gpt-4", "created": 1}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let models = fetch(format!("{}/v1/chat/completions", server.uri()), "sk-test")
            .await
            .expect("fetch models");

        assert_eq!(
            models,
            vec![
                Model {
                    id: "claude-3-opus".into(),
                    owned_by: Some("anthropic".into()),
                },
                Model::new("gpt-4"),
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_data_yields_empty_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"object": "list"})))
            .mount(&server)
            .await;

        let models = fetch(server.uri(), "sk-test").await.expect("fetch models");
        assert!(models.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn error_status_reports_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "invalid api key", "type": "auth"}
            })))
            .mount(&server)
            .await;

        let err = fetch(server.uri(), "bad").await.unwrap_err();
        assert_eq!(err.message, "invalid api key");
        assert_eq!(err.status, Some(401));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn error_status_without_message_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let err = fetch(server.uri(), "sk-test").await.unwrap_err();
        assert!(err.message.contains("503"), "{}", err.message);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unreachable_host_is_a_fetch_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);

        let err = fetch(format!("http://127.0.0.1:{port}"), "sk-test")
            .await
            .unwrap_err();
        assert_eq!(err.status, None);
        assert!(!err.message.is_empty());
    }
}
