//! Content document schema and its validation pass.
//!
//! # Responsibility
//! - Define the typed shape of generated landing page copy.
//! - Convert an untyped JSON tree into that shape, reporting every missing or
//!   mistyped required field instead of stopping at the first one.
//!
//! # Invariants
//! - `title`, `hero.headline` and `cta.headline` are non-empty after trimming.
//! - `hero` and `cta` are always present.
//! - Optional fields never fail validation; a mistyped one takes its default.
//! - Icon tags are kept verbatim; unknown tags are a render concern only.
//! - Serialized field names match the keys `from_value` reads, so a persisted
//!   document re-validates on load.

use crate::model::icon::IconRef;
use serde::Serialize;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Primary color used when content does not provide one.
pub const DEFAULT_PRIMARY_COLOR: &str = "#000000";

/// Generated landing page content. Single source of truth for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    pub title: String,
    /// URL-friendly slug candidate proposed by the generator. May be empty.
    #[serde(rename = "slug")]
    pub slug_hint: String,
    pub description: String,
    pub hero: Hero,
    pub features: Vec<Feature>,
    pub benefits: Option<Benefits>,
    pub cta: CallToAction,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub headline: String,
    pub subheadline: String,
    pub cta_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub title: String,
    pub description: String,
    /// Raw icon tag as generated.
    pub icon: String,
}

impl Feature {
    pub fn icon(&self) -> IconRef {
        IconRef::resolve(&self.icon)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Benefits {
    pub headline: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToAction {
    pub headline: String,
    pub subheadline: String,
    pub button_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// Stored as generated; the renderer falls back when it is not a hex color.
    pub primary_color: String,
    pub theme: Theme,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            theme: Theme::default(),
        }
    }
}

/// Visual theme family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Modern,
    Minimal,
    Bold,
    Playful,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Self::Modern, Self::Minimal, Self::Bold, Self::Playful];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Minimal => "minimal",
            Self::Bold => "bold",
            Self::Playful => "playful",
        }
    }

    /// Lenient parse: anything unrecognized is `Modern`.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "minimal" => Self::Minimal,
            "bold" => Self::Bold,
            "playful" => Self::Playful,
            _ => Self::Modern,
        }
    }
}

/// What is wrong with one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    Missing,
    Empty,
    WrongType,
}

impl FieldProblem {
    fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Empty => "empty",
            Self::WrongType => "wrong type",
        }
    }
}

/// One rejected field, addressed by a dotted path such as `hero.headline`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub path: String,
    pub problem: FieldProblem,
}

/// Validation failure for content documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentValidationError {
    /// Root value is not a JSON object.
    NotAnObject,
    /// One or more fields are missing, empty or mistyped.
    Fields(Vec<FieldIssue>),
}

impl ContentValidationError {
    /// Paths of every rejected field, in document order.
    pub fn field_paths(&self) -> Vec<String> {
        match self {
            Self::NotAnObject => Vec::new(),
            Self::Fields(issues) => issues.iter().map(|issue| issue.path.clone()).collect(),
        }
    }
}

impl Display for ContentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "content document must be a JSON object"),
            Self::Fields(issues) => {
                let listed = issues
                    .iter()
                    .map(|issue| format!("{} ({})", issue.path, issue.problem.as_str()))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "content document has missing or invalid fields: {listed}")
            }
        }
    }
}

impl Error for ContentValidationError {}

impl ContentDocument {
    /// Runs the schema validation pass over an untyped JSON tree.
    ///
    /// Only `title`, `hero` (object with non-empty `headline`) and `cta`
    /// (object with non-empty `headline`) can fail. Every other field takes
    /// its default when absent or mistyped: strings become `""`, `features`
    /// keeps only object entries, `benefits` keeps only string items.
    pub fn from_value(value: &Value) -> Result<Self, ContentValidationError> {
        let root = value
            .as_object()
            .ok_or(ContentValidationError::NotAnObject)?;
        let mut issues = Issues::default();

        let title = issues.required_text(root, "title", "title");
        let slug_hint = match root.get("slug") {
            Some(Value::String(slug)) => slug.clone(),
            _ => lenient_text(root, "slugHint"),
        };
        let description = lenient_text(root, "description");

        let hero = issues.required_object(root, "hero").map(|hero| Hero {
            headline: issues.required_text(hero, "headline", "hero.headline"),
            subheadline: lenient_text(hero, "subheadline"),
            cta_text: lenient_text(hero, "ctaText"),
            image_prompt: hero
                .get("imagePrompt")
                .and_then(Value::as_str)
                .map(str::to_string),
        });

        let features = features(root);
        let benefits = root
            .get("benefits")
            .and_then(Value::as_object)
            .map(|benefits| Benefits {
                headline: lenient_text(benefits, "headline"),
                items: string_items(benefits, "items"),
            });

        let cta = issues.required_object(root, "cta").map(|cta| CallToAction {
            headline: issues.required_text(cta, "headline", "cta.headline"),
            subheadline: lenient_text(cta, "subheadline"),
            button_text: lenient_text(cta, "buttonText"),
        });

        let style = root
            .get("style")
            .and_then(Value::as_object)
            .map(|style| {
                let primary_color = lenient_text(style, "primaryColor");
                Style {
                    primary_color: if primary_color.trim().is_empty() {
                        DEFAULT_PRIMARY_COLOR.to_string()
                    } else {
                        primary_color.trim().to_string()
                    },
                    theme: Theme::parse_or_default(&lenient_text(style, "theme")),
                }
            })
            .unwrap_or_default();

        if !issues.0.is_empty() {
            return Err(ContentValidationError::Fields(issues.0));
        }

        match (hero, cta) {
            (Some(hero), Some(cta)) => Ok(Self {
                title,
                slug_hint,
                description,
                hero,
                features,
                benefits,
                cta,
                style,
            }),
            // `required_object` records a problem whenever it yields `None`,
            // so this arm is only reachable with issues.
            _ => Err(ContentValidationError::Fields(Vec::new())),
        }
    }

    /// Checks the required-field invariants on a typed document.
    pub fn validate(&self) -> Result<(), ContentValidationError> {
        let mut issues = Vec::new();
        for (path, value) in [
            ("title", &self.title),
            ("hero.headline", &self.hero.headline),
            ("cta.headline", &self.cta.headline),
        ] {
            if value.trim().is_empty() {
                issues.push(FieldIssue {
                    path: path.to_string(),
                    problem: FieldProblem::Empty,
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ContentValidationError::Fields(issues))
        }
    }

    /// Benefits to show, or `None` when the section must be omitted.
    pub fn visible_benefits(&self) -> Option<&Benefits> {
        self.benefits
            .as_ref()
            .filter(|benefits| !benefits.items.is_empty())
    }
}

/// Problems found on required fields.
#[derive(Default)]
struct Issues(Vec<FieldIssue>);

impl Issues {
    fn push(&mut self, path: impl Into<String>, problem: FieldProblem) {
        self.0.push(FieldIssue {
            path: path.into(),
            problem,
        });
    }

    fn required_text(&mut self, obj: &Map<String, Value>, key: &str, path: &str) -> String {
        match obj.get(key) {
            Some(Value::String(text)) => {
                if text.trim().is_empty() {
                    self.push(path, FieldProblem::Empty);
                }
                text.clone()
            }
            None | Some(Value::Null) => {
                self.push(path, FieldProblem::Missing);
                String::new()
            }
            Some(_) => {
                self.push(path, FieldProblem::WrongType);
                String::new()
            }
        }
    }

    fn required_object<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
    ) -> Option<&'v Map<String, Value>> {
        match obj.get(key) {
            Some(Value::Object(inner)) => Some(inner),
            None | Some(Value::Null) => {
                self.push(key, FieldProblem::Missing);
                None
            }
            Some(_) => {
                self.push(key, FieldProblem::WrongType);
                None
            }
        }
    }
}

/// String value of `key`, or `""` when absent or not a string.
fn lenient_text(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// A non-string icon becomes an empty tag, which renders as the default glyph.
fn features(root: &Map<String, Value>) -> Vec<Feature> {
    let Some(entries) = root.get("features").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| Feature {
            title: lenient_text(entry, "title"),
            description: lenient_text(entry, "description"),
            icon: lenient_text(entry, "icon"),
        })
        .collect()
}

fn string_items(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
