//! Generation service client built on rig's OpenAI provider.
//!
//! One non-streaming prompt per request. Failures are reported as
//! [`GenerationError`] and never retried here.

use crate::error::GenerationError;
use log::{debug, info};
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4.1";
const TEMPERATURE: f64 = 0.7;

/// A chat-style code generation backend.
pub trait CompletionService {
    /// Fail early when the service cannot be used, before any prompt is sent.
    fn ensure_configured(&self) -> Result<(), GenerationError> {
        Ok(())
    }

    /// Send one system and one user message and return the response text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError>;
}

/// Settings for the generation service.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
    pub timeout: Option<Duration>,
}

impl ServiceConfig {
    fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }
}

/// Client for the OpenAI API or any compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: ServiceConfig,
}

impl OpenAiClient {
    /// The credential is checked by [`CompletionService::ensure_configured`],
    /// not here.
    pub fn new(config: ServiceConfig) -> Self {
        info!(
            "OpenAI client ready: model={} base_url={}",
            config.model,
            config.base_url()
        );

        Self { config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

fn create_client(api_key: &str, base_url: &str) -> Result<openai::Client, GenerationError> {
    openai::Client::builder()
        .api_key(api_key)
        .base_url(base_url)
        .build()
        .map_err(|e| GenerationError::Service(format!("Failed to create OpenAI client: {}", e)))
}

impl CompletionService for OpenAiClient {
    fn ensure_configured(&self) -> Result<(), GenerationError> {
        self.config
            .api_key()
            .map(|_| ())
            .ok_or(GenerationError::Configuration)
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        let api_key = self
            .config
            .api_key()
            .ok_or(GenerationError::Configuration)?;

        let client = create_client(api_key, self.config.base_url())?;
        let agent = client
            .agent(&self.config.model)
            .preamble(system)
            .temperature(TEMPERATURE)
            .build();

        debug!(
            "Prompting {} at {} ({} prompt chars)",
            self.config.model,
            self.config.base_url(),
            user.len()
        );

        let response = match self.config.timeout {
            Some(timeout) => tokio::time::timeout(timeout, agent.prompt(user))
                .await
                .map_err(|_| {
                    GenerationError::Service(format!(
                        "Request timed out after {}s",
                        timeout.as_secs()
                    ))
                })?,
            None => agent.prompt(user).await,
        };

        response.map_err(|e| GenerationError::Service(format!("Model generation failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn config(api_key: Option<&str>) -> ServiceConfig {
        ServiceConfig {
            api_key: api_key.map(str::to_string),
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: None,
        }
    }

    /// Answer every request with the given status line and body; returns the base URL.
    async fn serve(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                read_request(&mut socket).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}/v1", addr)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            let Ok(n) = socket.read(&mut chunk).await else {
                return;
            };
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);

                if buf.len() >= header_end + 4 + content_length {
                    return;
                }
            }
        }
    }

    fn client_for(base_url: String) -> OpenAiClient {
        let mut cfg = config(Some("sk-test"));
        cfg.base_url = Some(base_url);
        cfg.timeout = Some(Duration::from_secs(10));
        OpenAiClient::new(cfg)
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let client = OpenAiClient::new(config(None));
        assert!(matches!(
            client.ensure_configured(),
            Err(GenerationError::Configuration)
        ));
    }

    #[test]
    fn test_blank_key_is_configuration_error() {
        let client = OpenAiClient::new(config(Some("   ")));
        assert!(client.ensure_configured().is_err());
    }

    #[test]
    fn test_present_key_is_configured() {
        let client = OpenAiClient::new(config(Some("sk-test")));
        assert!(client.ensure_configured().is_ok());
        assert_eq!(client.model(), "gpt-4.1");
    }

    #[test]
    fn test_base_url_default_and_override() {
        assert_eq!(config(None).base_url(), "https://api.openai.com/v1");

        let mut cfg = config(None);
        cfg.base_url = Some("http://localhost:8080/v1/".to_string());
        assert_eq!(cfg.base_url(), "http://localhost:8080/v1");
    }

    #[tokio::test]
    async fn test_complete_without_key_never_sends() {
        let mut cfg = config(None);
        cfg.base_url = Some("http://127.0.0.1:9".to_string());
        let client = OpenAiClient::new(cfg);

        let result = client.complete("system", "user").await;
        assert!(matches!(result, Err(GenerationError::Configuration)));
    }

    #[tokio::test]
    async fn test_server_error_is_service_error() {
        let base_url = serve(
            "500 Internal Server Error",
            r#"{"error": {"message": "upstream overloaded", "type": "server_error"}}"#,
        )
        .await;

        let result = client_for(base_url).complete("system", "user").await;

        match result {
            Err(GenerationError::Service(message)) => {
                assert!(message.contains("upstream overloaded"), "{}", message);
            }
            other => panic!("expected service error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_service_error() {
        let base_url = serve("200 OK", "this is not json").await;

        let result = client_for(base_url).complete("system", "user").await;

        assert!(matches!(result, Err(GenerationError::Service(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_service_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client_for(format!("http://{}/v1", addr))
            .complete("system", "user")
            .await;

        assert!(matches!(result, Err(GenerationError::Service(_))));
    }
}
