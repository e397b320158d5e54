//! Generation and lookup use cases as request/response pairs.
//!
//! # Invariants
//! - Never panics; every failure becomes a response with a stable body.
//! - Authorization is checked before the body is looked at.
//! - Unpublished and missing pages produce the same 404.
//! - Each call opens its own store connection; nothing is shared across calls.

use chrono::{DateTime, SecondsFormat};
use log::{error, warn};
use pagegen_core::db::open_db;
use pagegen_core::{
    AppConfig, ClientError, CompletionClient, ErrorKind, GenerateError, Generator,
    GeneratorConfig, OpenAiChatClient, Page, PageReader, PageService, PageServiceError,
    Principal, RenderContext, SlugAllocator, SqlitePageRepository,
};
use serde_json::{json, Value};
use std::fmt::Display;
use std::path::{Path, PathBuf};

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";

const UNAUTHORIZED: &str = "Unauthorized";
const PROMPT_REQUIRED: &str = "Prompt is required";
const NOT_FOUND: &str = "not found";

/// Response envelope: status code, content type and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl ApiResponse {
    fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            content_type: CONTENT_TYPE_JSON,
            body: body.to_string(),
        }
    }

    fn html(body: String) -> Self {
        Self {
            status: 200,
            content_type: CONTENT_TYPE_HTML,
            body,
        }
    }

    fn message(status: u16, message: &str) -> Self {
        Self::json(status, json!({ "error": message }))
    }

    fn failure(kind: ErrorKind, message: impl Display) -> Self {
        let status = if kind.is_client_error() { 400 } else { 500 };
        Self::json(
            status,
            json!({ "error": message.to_string(), "kind": kind.code() }),
        )
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Page API bound to one store location and completion configuration.
#[derive(Debug, Clone)]
pub struct PageApi {
    db_path: PathBuf,
    generator: GeneratorConfig,
}

impl PageApi {
    pub fn new(db_path: impl Into<PathBuf>, generator: GeneratorConfig) -> Self {
        Self {
            db_path: db_path.into(),
            generator,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.db_path.clone(), config.generator.clone())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Generates and publishes a page using the configured completion service.
    pub fn generate(&self, principal: Option<&Principal>, body: &str) -> ApiResponse {
        self.generate_with(principal, body, OpenAiChatClient::new)
    }

    /// Same as [`PageApi::generate`] with a caller-supplied client constructor.
    ///
    /// `connect` only runs once the request is authorized and carries a prompt.
    pub fn generate_with<C, F>(
        &self,
        principal: Option<&Principal>,
        body: &str,
        connect: F,
    ) -> ApiResponse
    where
        C: CompletionClient,
        F: FnOnce(&GeneratorConfig) -> Result<C, ClientError>,
    {
        let Some(principal) = principal else {
            return ApiResponse::message(401, UNAUTHORIZED);
        };
        let Some(prompt) = extract_prompt(body) else {
            return ApiResponse::message(400, PROMPT_REQUIRED);
        };

        let client = match connect(&self.generator) {
            Ok(client) => client,
            Err(err) => {
                let err = PageServiceError::from(GenerateError::from(err));
                error!(
                    "event=api_generate module=api status=error owner={} error_code={}",
                    principal.id,
                    err.kind().code()
                );
                return ApiResponse::failure(err.kind(), err);
            }
        };

        let conn = match open_db(&self.db_path) {
            Ok(conn) => conn,
            Err(err) => return store_unavailable("api_generate", err),
        };
        let service = PageService::new(
            Generator::new(client, &self.generator),
            SlugAllocator::new(SqlitePageRepository::new(&conn)),
        );

        match service.create_page(&prompt, principal) {
            Ok(page) => page_response(&page),
            Err(err) => ApiResponse::failure(err.kind(), err),
        }
    }

    /// Published page for `slug` as JSON.
    pub fn lookup(&self, slug: &str) -> ApiResponse {
        match self.find_published(slug) {
            Ok(Some(page)) => page_response(&page),
            Ok(None) => ApiResponse::message(404, NOT_FOUND),
            Err(response) => response,
        }
    }

    /// Published page for `slug` as a standalone HTML document.
    pub fn page_html(&self, slug: &str) -> ApiResponse {
        self.page_html_in(slug, &RenderContext::current())
    }

    pub fn page_html_in(&self, slug: &str, ctx: &RenderContext) -> ApiResponse {
        match self.find_published(slug) {
            Ok(Some(page)) => ApiResponse::html(pagegen_core::render(&page, ctx).to_html()),
            Ok(None) => ApiResponse::message(404, NOT_FOUND),
            Err(response) => response,
        }
    }

    fn find_published(&self, slug: &str) -> Result<Option<Page>, ApiResponse> {
        let conn = open_db(&self.db_path).map_err(|err| store_unavailable("api_lookup", err))?;
        let reader = PageReader::new(SqlitePageRepository::new(&conn));
        reader.find_published(slug).map_err(|err| {
            warn!(
                "event=api_lookup module=api status=error error_code={}",
                err.kind().code()
            );
            ApiResponse::failure(err.kind(), err)
        })
    }
}

/// Non-empty trimmed `prompt` string from a JSON object body.
fn extract_prompt(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let prompt = value.get("prompt")?.as_str()?.trim();
    (!prompt.is_empty()).then(|| prompt.to_string())
}

fn page_response(page: &Page) -> ApiResponse {
    match page_json(page) {
        Ok(body) => ApiResponse::json(200, body),
        Err(err) => ApiResponse::failure(ErrorKind::StoreUnavailable, err),
    }
}

fn page_json(page: &Page) -> Result<Value, serde_json::Error> {
    Ok(json!({
        "id": page.id.to_string(),
        "title": page.title,
        "slug": page.slug,
        "description": page.description,
        "content": serde_json::to_value(&page.content)?,
        "published": page.published,
        "createdAt": created_at_rfc3339(page.created_at),
    }))
}

fn created_at_rfc3339(created_at_ms: i64) -> String {
    DateTime::from_timestamp_millis(created_at_ms)
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

fn store_unavailable(event: &str, err: impl Display) -> ApiResponse {
    error!("event={event} module=api status=error error_code=store_unavailable error={err}");
    ApiResponse::failure(ErrorKind::StoreUnavailable, format!("page store unavailable: {err}"))
}
