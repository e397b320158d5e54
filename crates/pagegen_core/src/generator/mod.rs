//! Natural-language to content document generation.
//!
//! # Responsibility
//! - Issue exactly one completion call per request with the fixed instruction.
//! - Parse the reply into an untyped JSON tree, then validate it into a
//!   `ContentDocument`.
//!
//! # Invariants
//! - Blank prompts fail before any outbound call.
//! - Nothing is retried here: malformed or incomplete output is surfaced.
//! - Nothing is persisted here.

pub mod client;
pub mod instruction;

use crate::config::GeneratorConfig;
use crate::model::content::{ContentDocument, ContentValidationError};
use crate::model::page::Principal;
use client::{ClientError, CompletionClient, CompletionRequest};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

pub type GenerateResult<T> = Result<T, GenerateError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// Prompt is empty after trimming.
    InvalidInput(&'static str),
    /// The completion call hit its deadline.
    Timeout(Duration),
    /// The reply is not a JSON object.
    Malformed(String),
    /// The reply parsed but required fields are missing or invalid.
    Incomplete(Vec<String>),
    /// The service failed for a reason other than timeout.
    Upstream(ClientError),
}

impl GenerateError {
    /// Stable snake_case code used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Timeout(_) => "generation_timeout",
            Self::Malformed(_) => "generation_malformed",
            Self::Incomplete(_) => "generation_incomplete",
            Self::Upstream(_) => "generation_upstream",
        }
    }
}

impl Display for GenerateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(reason) => write!(f, "{reason}"),
            Self::Timeout(limit) => write!(f, "generation timed out after {limit:?}"),
            Self::Malformed(reason) => write!(f, "generated content is malformed: {reason}"),
            Self::Incomplete(fields) => write!(
                f,
                "generated content is missing required fields: {}",
                fields.join(", ")
            ),
            Self::Upstream(err) => write!(f, "generation failed: {err}"),
        }
    }
}

impl Error for GenerateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Upstream(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClientError> for GenerateError {
    fn from(value: ClientError) -> Self {
        match value {
            ClientError::Timeout(limit) => Self::Timeout(limit),
            ClientError::EmptyCompletion => Self::Malformed(value.to_string()),
            other => Self::Upstream(other),
        }
    }
}

impl From<ContentValidationError> for GenerateError {
    fn from(value: ContentValidationError) -> Self {
        match value {
            ContentValidationError::NotAnObject => Self::Malformed(value.to_string()),
            ContentValidationError::Fields(_) => Self::Incomplete(value.field_paths()),
        }
    }
}

/// Content generator over a completion client.
pub struct Generator<C: CompletionClient> {
    client: C,
    model: String,
    temperature: f32,
}

impl<C: CompletionClient> Generator<C> {
    pub fn new(client: C, config: &GeneratorConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    /// Generates one content document for `prompt` on behalf of `principal`.
    ///
    /// Identical prompts may produce different documents; results are never
    /// cached.
    pub fn generate(&self, prompt: &str, principal: &Principal) -> GenerateResult<ContentDocument> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerateError::InvalidInput("Prompt is required"));
        }

        let started_at = Instant::now();
        info!(
            "event=content_generate module=generator status=start owner={} prompt_chars={}",
            principal.id,
            prompt.chars().count()
        );

        let request = CompletionRequest {
            model: self.model.clone(),
            system: instruction::system_instruction().to_string(),
            user: prompt.to_string(),
            temperature: self.temperature,
        };
        let result = self
            .client
            .complete(&request)
            .map_err(GenerateError::from)
            .and_then(|reply| parse_content(&reply));

        match &result {
            Ok(content) => info!(
                "event=content_generate module=generator status=ok owner={} duration_ms={} features={}",
                principal.id,
                started_at.elapsed().as_millis(),
                content.features.len()
            ),
            Err(err) => error!(
                "event=content_generate module=generator status=error owner={} duration_ms={} error_code={}",
                principal.id,
                started_at.elapsed().as_millis(),
                err.code()
            ),
        }
        result
    }
}

/// Parses raw completion text and runs the content validation pass.
///
/// A surrounding Markdown code fence is tolerated.
pub fn parse_content(reply: &str) -> GenerateResult<ContentDocument> {
    let tree: serde_json::Value = serde_json::from_str(strip_code_fence(reply))
        .map_err(|err| GenerateError::Malformed(err.to_string()))?;
    Ok(ContentDocument::from_value(&tree)?)
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.strip_suffix("```").unwrap_or(rest);
    // Drop an info string such as `json` on the opening fence line.
    match body.split_once('\n') {
        Some((info, code)) if !info.trim_start().starts_with('{') => code.trim(),
        _ => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::client::{ClientError, CompletionClient, CompletionRequest};
    use super::{parse_content, strip_code_fence, GenerateError, Generator};
    use crate::config::GeneratorConfig;
    use crate::model::icon::IconSymbol;
    use crate::model::page::Principal;
    use std::cell::RefCell;
    use std::time::Duration;

    struct ScriptedClient {
        reply: Result<String, ClientError>,
        seen: RefCell<Vec<CompletionRequest>>,
    }

    impl ScriptedClient {
        fn replying(reply: Result<&str, ClientError>) -> Self {
            Self {
                reply: reply.map(str::to_string),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl CompletionClient for ScriptedClient {
        fn complete(&self, request: &CompletionRequest) -> Result<String, ClientError> {
            self.seen.borrow_mut().push(request.clone());
            self.reply.clone()
        }
    }

    const DEPLOYFLOW: &str = r#"{
        "title": "DeployFlow",
        "slug": "deployflow",
        "hero": {"headline": "Ship Faster", "subheadline": "...", "ctaText": "Get Started"},
        "cta": {"headline": "Start Today", "subheadline": "...", "buttonText": "Try Now"},
        "features": [],
        "benefits": null,
        "style": {}
    }"#;

    fn generate_with(client: &ScriptedClient, prompt: &str) -> Result<String, GenerateError> {
        let generator = Generator::new(client, &GeneratorConfig::default());
        generator
            .generate(prompt, &Principal::new("user-1"))
            .map(|doc| doc.title)
    }

    #[test]
    fn blank_prompt_fails_before_any_call() {
        let client = ScriptedClient::replying(Ok(DEPLOYFLOW));
        let err = generate_with(&client, "   ").unwrap_err();
        assert_eq!(err, GenerateError::InvalidInput("Prompt is required"));
        assert!(client.seen.borrow().is_empty());
    }

    #[test]
    fn valid_reply_becomes_content_document() {
        let client = ScriptedClient::replying(Ok(DEPLOYFLOW));
        let title = generate_with(&client, "  A SaaS for automating deployments ").unwrap();
        assert_eq!(title, "DeployFlow");

        let seen = client.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].user, "A SaaS for automating deployments");
        assert_eq!(seen[0].model, "gpt-3.5-turbo");
        assert!(seen[0].temperature > 0.0);
        assert!(seen[0].system.contains("\"hero\""));
    }

    #[test]
    fn unparsable_reply_is_malformed_and_not_retried() {
        let client = ScriptedClient::replying(Ok("Sure! Here is your page: {"));
        let err = generate_with(&client, "bakery").unwrap_err();
        assert!(matches!(err, GenerateError::Malformed(_)));
        assert_eq!(client.seen.borrow().len(), 1);
    }

    #[test]
    fn missing_required_fields_are_named() {
        let client = ScriptedClient::replying(Ok(r#"{"title": "", "hero": {"headline": "Hi"}}"#));
        let err = generate_with(&client, "bakery").unwrap_err();
        assert_eq!(
            err,
            GenerateError::Incomplete(vec!["title".to_string(), "cta".to_string()])
        );
        assert!(err.to_string().contains("title, cta"));
    }

    #[test]
    fn mistyped_optional_fields_still_generate() {
        let mut reply: serde_json::Value = serde_json::from_str(DEPLOYFLOW).unwrap();
        reply["features"] = serde_json::json!([null, {"title": "Fast", "icon": 5}]);
        reply["style"] = serde_json::json!({"primaryColor": 255});

        let doc = parse_content(&reply.to_string()).unwrap();
        assert_eq!(doc.features.len(), 1);
        assert_eq!(doc.features[0].icon().symbol(), IconSymbol::Zap);
        assert_eq!(doc.style.primary_color, "#000000");
    }

    #[test]
    fn client_failures_map_to_generation_errors() {
        let client =
            ScriptedClient::replying(Err(ClientError::Timeout(Duration::from_secs(30))));
        assert_eq!(
            generate_with(&client, "bakery").unwrap_err(),
            GenerateError::Timeout(Duration::from_secs(30))
        );

        let client = ScriptedClient::replying(Err(ClientError::EmptyCompletion));
        assert!(matches!(
            generate_with(&client, "bakery").unwrap_err(),
            GenerateError::Malformed(_)
        ));

        let client = ScriptedClient::replying(Err(ClientError::Status {
            status: 503,
            body: "overloaded".to_string(),
        }));
        let err = generate_with(&client, "bakery").unwrap_err();
        assert_eq!(err.code(), "generation_upstream");
    }

    #[test]
    fn json_array_reply_is_malformed() {
        assert!(matches!(
            parse_content("[1, 2]"),
            Err(GenerateError::Malformed(_))
        ));
    }

    #[test]
    fn code_fences_are_stripped() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
        assert!(parse_content(&format!("```json\n{DEPLOYFLOW}\n```")).is_ok());
    }
}
