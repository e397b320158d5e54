//! Completion service seam.
//!
//! # Responsibility
//! - Define the one blocking call the generator makes to the outside world.
//! - Provide the OpenAI-compatible chat completions implementation.
//!
//! # Invariants
//! - Every call is bounded by the configured timeout.
//! - Error bodies from the service are sanitized and truncated before they
//!   travel further up.

use crate::config::GeneratorConfig;
use crate::logging::sanitize_message;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

const MAX_ERROR_BODY_CHARS: usize = 200;

/// One chat completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    MissingApiKey,
    Timeout(Duration),
    Transport(String),
    Status { status: u16, body: String },
    /// The service answered without any message content.
    EmptyCompletion,
    InvalidResponse(String),
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "completion service API key is not configured"),
            Self::Timeout(limit) => {
                write!(f, "completion service did not answer within {limit:?}")
            }
            Self::Transport(reason) => write!(f, "completion service unreachable: {reason}"),
            Self::Status { status, body } => {
                write!(f, "completion service returned status {status}: {body}")
            }
            Self::EmptyCompletion => write!(f, "completion service returned no content"),
            Self::InvalidResponse(reason) => {
                write!(f, "completion service response not understood: {reason}")
            }
        }
    }
}

impl Error for ClientError {}

/// External natural-language-to-structured-data service.
pub trait CompletionClient {
    /// Returns the raw message text of the first completion choice.
    fn complete(&self, request: &CompletionRequest) -> Result<String, ClientError>;
}

impl<C: CompletionClient + ?Sized> CompletionClient for &C {
    fn complete(&self, request: &CompletionRequest) -> Result<String, ClientError> {
        (**self).complete(request)
    }
}

impl<C: CompletionClient + ?Sized> CompletionClient for Box<C> {
    fn complete(&self, request: &CompletionRequest) -> Result<String, ClientError> {
        (**self).complete(request)
    }
}

/// Blocking client for `POST {api_base}/chat/completions`.
pub struct OpenAiChatClient {
    http: Client,
    api_base: String,
    api_key: String,
    timeout: Duration,
}

impl OpenAiChatClient {
    /// Builds a client; fails without an API key.
    pub fn new(config: &GeneratorConfig) -> Result<Self, ClientError> {
        let api_key = config.api_key.clone().ok_or(ClientError::MissingApiKey)?;
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("pagegen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ClientError::Transport(err.to_string()))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            timeout: config.timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout)
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionClient for OpenAiChatClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, ClientError> {
        let body = ChatCompletionBody {
            model: &request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: request.temperature,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|err| self.classify(err))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: sanitize_message(&text, MAX_ERROR_BODY_CHARS),
            });
        }

        let payload = response
            .json::<ChatCompletionResponse>()
            .map_err(|err| self.classify(err))?;

        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ClientError::EmptyCompletion)
    }
}
