//! Gemini API client.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, GeminiError};
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    SystemInstruction,
};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API client.
///
/// Cheap to clone; the HTTP connection pool is shared.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.inner.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl GeminiClient {
    /// Create a client for `config.model` using `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &GeminiConfig, api_key: SecretString) -> Result<Self, GeminiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("lumina-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                api_key,
                endpoint: format!(
                    "{}/v1beta/models/{}:generateContent",
                    config.api_base, config.model
                ),
                model: config.model.clone(),
            }),
        })
    }

    /// Send one user turn and return the reply text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with a
    /// non-success status, or the response holds no text.
    #[instrument(skip(self, parts, system), fields(model = %self.inner.model, parts = parts.len()))]
    pub async fn generate(
        &self,
        parts: Vec<Part>,
        system: &str,
        temperature: Option<f32>,
    ) -> Result<String, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            system_instruction: Some(SystemInstruction::text(system)),
            generation_config: temperature.map(|temperature| GenerationConfig { temperature }),
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(API_KEY_HEADER, self.inner.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let parsed = Self::handle_response(response).await?;
        parsed.text().ok_or(GeminiError::EmptyResponse)
    }

    async fn handle_response(
        response: reqwest::Response,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map_or(body, |api_error| api_error.error.describe());
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn config(api_base: String) -> GeminiConfig {
        GeminiConfig {
            api_key: None,
            model: "gemini-3-flash-preview".to_string(),
            api_base,
            temperature: 0.5,
        }
    }

    fn client(server: &mockito::Server) -> GeminiClient {
        GeminiClient::new(&config(server.url()), SecretString::from("test-key-9f8e7d"))
            .expect("client")
    }

    #[tokio::test]
    async fn test_generate_sends_key_and_parses_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-3-flash-preview:generateContent")
            .match_header("x-goog-api-key", "test-key-9f8e7d")
            .match_body(Matcher::PartialJson(json!({
                "contents": [{"role": "user", "parts": [{"text": "hello"}]}],
                "systemInstruction": {"parts": [{"text": "be brief"}]},
                "generationConfig": {"temperature": 0.5}
            })))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Hi there"}]}}]}"#)
            .create_async()
            .await;

        let reply = client(&server)
            .generate(vec![Part::Text("hello".to_string())], "be brief", Some(0.5))
            .await
            .expect("reply");

        assert_eq!(reply, "Hi there");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_maps_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#)
            .create_async()
            .await;

        let err = client(&server)
            .generate(vec![Part::Text("hello".to_string())], "sys", None)
            .await
            .expect_err("should fail");

        assert!(
            matches!(err, GeminiError::Api { status: 403, ref message } if message == "PERMISSION_DENIED: API key not valid")
        );
    }

    #[tokio::test]
    async fn test_generate_without_text_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let err = client(&server)
            .generate(vec![Part::Text("hello".to_string())], "sys", None)
            .await
            .expect_err("should fail");

        assert!(matches!(err, GeminiError::EmptyResponse));
    }
}
