//! Field extraction through the OpenRouter chat completions API.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::prompt::{extraction_prompt, KEY_CHECK_PROMPT};
use super::response::parse_field_values;
use super::{FieldExtractor, FieldValues};
use crate::error::{Error, Result};

/// Chat completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1";

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Options for the OpenRouter client.
#[derive(Debug, Clone)]
pub struct OpenRouterOptions {
    /// Endpoint URL
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens in the answer
    pub max_tokens: u32,

    /// Request timeout
    pub timeout: Duration,
}

impl OpenRouterOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the answer token limit.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for OpenRouterOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            max_tokens: 2000,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Field extractor backed by an OpenRouter model.
#[derive(Clone, Debug)]
pub struct OpenRouterExtractor {
    client: Client,
    api_key: String,
    options: OpenRouterOptions,
}

impl OpenRouterExtractor {
    /// Create an extractor with default options.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, OpenRouterOptions::default())
    }

    /// Create an extractor with custom options.
    pub fn with_options(api_key: impl Into<String>, options: OpenRouterOptions) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::InvalidInput("an OpenRouter API key is required".to_string()));
        }
        let client = Client::builder().timeout(options.timeout).build()?;
        Ok(Self {
            client,
            api_key,
            options,
        })
    }

    /// Options in use.
    pub fn options(&self) -> &OpenRouterOptions {
        &self.options
    }

    /// Send one prompt and return the answer text.
    pub fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.options.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };

        log::debug!(
            "POST {} (model {}, {} prompt characters)",
            self.options.endpoint,
            self.options.model,
            prompt.len()
        );
        let response = self
            .client
            .post(&self.options.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().map_err(|e| {
            Error::MalformedResponse(format!("Unexpected API response format: {}", e))
        })?;
        chat.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| {
                Error::MalformedResponse("Unexpected API response format: no choices".to_string())
            })
    }

    /// Check that the service accepts the credential.
    pub fn validate_key(&self) -> bool {
        match self.complete(KEY_CHECK_PROMPT) {
            Ok(answer) => !answer.is_empty(),
            Err(e) => {
                log::debug!("API key check failed: {}", e);
                false
            }
        }
    }
}

impl FieldExtractor for OpenRouterExtractor {
    fn extract(&self, fields: &[String], source_text: &str) -> Result<FieldValues> {
        let prompt = extraction_prompt(fields, source_text);
        let answer = self.complete(&prompt)?;
        let values = parse_field_values(&answer, fields)?;
        log::info!(
            "Extracted {} of {} fields",
            values.found_count(),
            fields.len()
        );
        Ok(values)
    }
}
