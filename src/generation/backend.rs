//! Generative backend client
//!
//! The backend is treated as an opaque capability: given a prompt, return
//! text, possibly invalid. The HTTP implementation speaks the
//! chat-completions wire format with retry and backoff; validation of the
//! returned text happens in the callers, not here.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::RngExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::TripsmithError;
use crate::config::GenerationConfig;

/// Opaque text-generation capability consumed by the sub-generators
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Send one prompt, return the raw text payload
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Chat-completions HTTP client for the generative backend
pub struct HttpGenerativeBackend {
    client: Client,
    config: GenerationConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl HttpGenerativeBackend {
    /// Create a new backend client
    pub fn new(config: GenerationConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Tripsmith/0.1.0")
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Make a request with retry and exponential backoff
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn make_request(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.7,
        };

        let mut attempt = 0;
        let max_attempts = self.config.max_retries + 1;
        let request_start = Instant::now();

        debug!("Starting backend request (max attempts: {})", max_attempts);

        loop {
            let mut request = self.client.post(&url).json(&body);
            if let Some(api_key) = &self.config.api_key {
                request = request.bearer_auth(api_key);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed: ChatResponse = response
                            .json()
                            .await
                            .with_context(|| "Failed to parse backend response envelope")?;
                        let content = parsed
                            .choices
                            .into_iter()
                            .next()
                            .map(|choice| choice.message.content)
                            .ok_or_else(|| {
                                TripsmithError::backend("Backend returned no choices")
                            })?;

                        info!(
                            "Backend call succeeded in {:.3}s (attempt {})",
                            request_start.elapsed().as_secs_f64(),
                            attempt + 1
                        );
                        return Ok(content);
                    }

                    if status.as_u16() == 401 {
                        error!("Backend authentication failed (HTTP 401)");
                        return Err(TripsmithError::backend(
                            "Invalid backend API key. Please check your configuration.",
                        )
                        .into());
                    }

                    let error_msg = format!(
                        "Backend request failed with status: {} - {}",
                        status,
                        status.canonical_reason().unwrap_or("Unknown error")
                    );
                    warn!("HTTP error on attempt {}: {}", attempt + 1, error_msg);

                    if attempt + 1 >= max_attempts {
                        error!("Backend request failed after all attempts: {}", error_msg);
                        return Err(TripsmithError::backend(error_msg).into());
                    }
                }
                Err(e) => {
                    warn!("Network error on attempt {}: {}", attempt + 1, e);
                    if attempt + 1 >= max_attempts {
                        error!("Network error after {} attempts: {}", max_attempts, e);
                        return Err(TripsmithError::backend(format!(
                            "Network error after {} attempts: {}",
                            max_attempts, e
                        ))
                        .into());
                    }
                }
            }

            // Exponential backoff with a little jitter to spread retries
            let jitter: f32 = rand::rng().random_range(0.9..1.1);
            let backoff = Duration::from_millis(1000 * 2u64.pow(attempt)).mul_f32(jitter);
            debug!("Backing off {:.1}s before retry", backoff.as_secs_f64());
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl GenerativeBackend for HttpGenerativeBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.make_request(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = GenerationConfig {
            api_key: None,
            base_url: "http://localhost:11434/v1".to_string(),
            model: "llama3.1".to_string(),
            timeout_seconds: 10,
            max_retries: 1,
        };
        assert!(HttpGenerativeBackend::new(config).is_ok());
    }

    #[test]
    fn test_chat_request_wire_shape() {
        let body = ChatRequest {
            model: "llama3.1",
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
            temperature: 0.7,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "llama3.1");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_chat_response_parsing() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"{}"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "{}");
    }
}
