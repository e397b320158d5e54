//! Icon vocabulary for feature entries.
//!
//! Generated content carries free-form icon tags. Resolution is total: a tag
//! either names a known [`IconSymbol`] or falls into [`IconRef::Unknown`],
//! which renders as [`IconSymbol::DEFAULT`].

use std::fmt::{Display, Formatter};

/// Known icon symbols. Add a variant plus its tag and glyph to extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconSymbol {
    Rocket,
    Shield,
    Zap,
    Star,
    Check,
    ArrowRight,
}

impl IconSymbol {
    /// Every known symbol, in the order the generator instruction lists them.
    pub const ALL: [IconSymbol; 6] = [
        Self::Rocket,
        Self::Shield,
        Self::Zap,
        Self::Star,
        Self::Check,
        Self::ArrowRight,
    ];

    /// Substitute for tags outside the vocabulary.
    pub const DEFAULT: IconSymbol = Self::Zap;

    /// Stable tag used in content documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rocket => "rocket",
            Self::Shield => "shield",
            Self::Zap => "zap",
            Self::Star => "star",
            Self::Check => "check",
            Self::ArrowRight => "arrow-right",
        }
    }

    /// Looks up a tag, tolerating case, surrounding whitespace and `_`/`-`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalized = tag.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "rocket" => Some(Self::Rocket),
            "shield" => Some(Self::Shield),
            "zap" => Some(Self::Zap),
            "star" => Some(Self::Star),
            "check" => Some(Self::Check),
            "arrow-right" | "arrowright" => Some(Self::ArrowRight),
            _ => None,
        }
    }

    /// Inline SVG body (24x24 viewbox, stroke-based) for this symbol.
    pub fn glyph(self) -> Glyph {
        let svg_body = match self {
            Self::Rocket => concat!(
                r#"<path d="M4.5 16.5c-1.5 1.26-2 5-2 5s3.74-.5 5-2c.71-.84.7-2.13-.09-2.91a2.18 2.18 0 0 0-2.91-.09z"/>"#,
                r#"<path d="m12 15-3-3a22 22 0 0 1 2-3.95A12.88 12.88 0 0 1 22 2c0 2.72-.78 7.5-6 11a22.35 22.35 0 0 1-4 2z"/>"#,
                r#"<path d="M9 12H4s.55-3.03 2-4c1.62-1.08 5 0 5 0"/>"#,
                r#"<path d="M12 15v5s3.03-.55 4-2c1.08-1.62 0-5 0-5"/>"#
            ),
            Self::Shield => r#"<path d="M12 22s8-4 8-10V5l-8-3-8 3v7c0 6 8 10 8 10z"/>"#,
            Self::Zap => r#"<polygon points="13 2 3 14 12 14 11 22 21 10 12 10 13 2"/>"#,
            Self::Star => {
                r#"<polygon points="12 2 15.09 8.26 22 9.27 17 14.14 18.18 21.02 12 17.77 5.82 21.02 7 14.14 2 9.27 8.91 8.26 12 2"/>"#
            }
            Self::Check => r#"<polyline points="20 6 9 17 4 12"/>"#,
            Self::ArrowRight => {
                r#"<line x1="5" y1="12" x2="19" y2="12"/><polyline points="12 5 19 12 12 19"/>"#
            }
        };
        Glyph {
            name: self.as_str(),
            svg_body,
        }
    }
}

impl Display for IconSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual glyph for one icon symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub name: &'static str,
    pub svg_body: &'static str,
}

/// Result of resolving a raw icon tag from content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconRef {
    Known(IconSymbol),
    /// Tag outside the vocabulary, kept verbatim for diagnostics.
    Unknown(String),
}

impl IconRef {
    /// Resolves any string; never fails.
    pub fn resolve(tag: &str) -> Self {
        match IconSymbol::from_tag(tag) {
            Some(symbol) => Self::Known(symbol),
            None => Self::Unknown(tag.to_string()),
        }
    }

    /// Symbol to draw, substituting the default for unknown tags.
    pub fn symbol(&self) -> IconSymbol {
        match self {
            Self::Known(symbol) => *symbol,
            Self::Unknown(_) => IconSymbol::DEFAULT,
        }
    }

    pub fn glyph(&self) -> Glyph {
        self.symbol().glyph()
    }
}

/// Vocabulary rendered as `rocket|shield|...` for the generator instruction.
pub fn vocabulary_pipe_list() -> String {
    IconSymbol::ALL
        .iter()
        .map(|symbol| symbol.as_str())
        .collect::<Vec<_>>()
        .join("|")
}
