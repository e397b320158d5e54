//! Page rendering.
//!
//! # Responsibility
//! - Map a page's content into an ordered list of visual sections.
//! - Resolve theme colors and icon glyphs with fixed fallbacks.
//!
//! # Invariants
//! - Section order is Hero, Features, Benefits, Cta, Footer; Features and
//!   Benefits are omitted when they have nothing to show.
//! - Rendering is total and pure over `(page, ctx)`: no I/O, no clock reads,
//!   no mutation, identical output for identical input.

mod html;

use crate::model::content::{Style, Theme, DEFAULT_PRIMARY_COLOR};
use crate::model::icon::IconSymbol;
use crate::model::page::Page;
use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;

static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex color regex")
});

/// Inputs that are not part of the page itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    /// Year printed in the footer.
    pub year: i32,
}

impl RenderContext {
    pub fn for_year(year: i32) -> Self {
        Self { year }
    }

    /// Context for the current UTC year.
    pub fn current() -> Self {
        Self::for_year(chrono::Utc::now().year())
    }
}

/// Styling tokens derived from the theme family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeStyle {
    pub font_stack: &'static str,
    pub radius: &'static str,
    pub heading_weight: u16,
}

impl ThemeStyle {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Modern => Self {
                font_stack: "Inter, system-ui, sans-serif",
                radius: "0.5rem",
                heading_weight: 700,
            },
            Theme::Minimal => Self {
                font_stack: "system-ui, sans-serif",
                radius: "0.25rem",
                heading_weight: 500,
            },
            Theme::Bold => Self {
                font_stack: "'Arial Black', Impact, sans-serif",
                radius: "0",
                heading_weight: 800,
            },
            Theme::Playful => Self {
                font_stack: "'Comic Neue', 'Trebuchet MS', sans-serif",
                radius: "1.5rem",
                heading_weight: 700,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTheme {
    /// Always a valid `#rgb`/`#rrggbb` value.
    pub primary_color: String,
    pub theme: Theme,
    pub style: ThemeStyle,
}

/// Falls back to `#000000` for anything that is not a hex color.
pub fn resolve_theme(style: &Style) -> ResolvedTheme {
    let candidate = style.primary_color.trim();
    let primary_color = if HEX_COLOR_RE.is_match(candidate) {
        candidate.to_ascii_lowercase()
    } else {
        DEFAULT_PRIMARY_COLOR.to_string()
    };

    ResolvedTheme {
        primary_color,
        theme: style.theme,
        style: ThemeStyle::for_theme(style.theme),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Hero,
    Features,
    Benefits,
    Cta,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureItem {
    pub title: String,
    pub description: String,
    pub icon: IconSymbol,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Hero {
        headline: String,
        subheadline: String,
        cta_text: String,
    },
    Features {
        items: Vec<FeatureItem>,
    },
    Benefits {
        headline: String,
        items: Vec<String>,
    },
    Cta {
        headline: String,
        subheadline: String,
        button_text: String,
    },
    Footer {
        title: String,
        year: i32,
    },
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Self::Hero { .. } => SectionKind::Hero,
            Self::Features { .. } => SectionKind::Features,
            Self::Benefits { .. } => SectionKind::Benefits,
            Self::Cta { .. } => SectionKind::Cta,
            Self::Footer { .. } => SectionKind::Footer,
        }
    }
}

/// Render output: document metadata, theme and ordered sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub title: String,
    pub description: String,
    pub theme: ResolvedTheme,
    pub sections: Vec<Section>,
}

impl RenderedPage {
    pub fn section_kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(Section::kind).collect()
    }
}

/// Renders `page` into sections. Never fails.
pub fn render(page: &Page, ctx: &RenderContext) -> RenderedPage {
    let content = &page.content;
    let mut sections = Vec::with_capacity(5);

    sections.push(Section::Hero {
        headline: content.hero.headline.clone(),
        subheadline: content.hero.subheadline.clone(),
        cta_text: content.hero.cta_text.clone(),
    });

    if !content.features.is_empty() {
        sections.push(Section::Features {
            items: content
                .features
                .iter()
                .map(|feature| FeatureItem {
                    title: feature.title.clone(),
                    description: feature.description.clone(),
                    icon: feature.icon().symbol(),
                })
                .collect(),
        });
    }

    if let Some(benefits) = content.visible_benefits() {
        sections.push(Section::Benefits {
            headline: benefits.headline.clone(),
            items: benefits.items.clone(),
        });
    }

    sections.push(Section::Cta {
        headline: content.cta.headline.clone(),
        subheadline: content.cta.subheadline.clone(),
        button_text: content.cta.button_text.clone(),
    });

    sections.push(Section::Footer {
        title: page.title.clone(),
        year: ctx.year,
    });

    RenderedPage {
        title: page.title.clone(),
        description: page.description.clone(),
        theme: resolve_theme(&content.style),
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::{render, resolve_theme, RenderContext, Section, SectionKind, ThemeStyle};
    use crate::model::content::{Benefits, ContentDocument, Feature, Style, Theme};
    use crate::model::icon::IconSymbol;
    use crate::model::page::Page;
    use serde_json::json;

    fn page_with(edit: impl FnOnce(&mut ContentDocument)) -> Page {
        let mut content = ContentDocument::from_value(&json!({
            "title": "DeployFlow",
            "slug": "deployflow",
            "hero": {"headline": "Ship Faster", "subheadline": "...", "ctaText": "Get Started"},
            "cta": {"headline": "Start Today", "subheadline": "...", "buttonText": "Try Now"},
            "features": [],
            "benefits": null,
            "style": {}
        }))
        .unwrap();
        edit(&mut content);
        Page::publish("user-1", "deployflow", content, 1_700_000_000_000)
    }

    const CTX: RenderContext = RenderContext { year: 2026 };

    #[test]
    fn minimal_page_renders_hero_cta_footer() {
        let rendered = render(&page_with(|_| {}), &CTX);
        assert_eq!(
            rendered.section_kinds(),
            vec![SectionKind::Hero, SectionKind::Cta, SectionKind::Footer]
        );
        assert_eq!(
            rendered.sections[2],
            Section::Footer {
                title: "DeployFlow".to_string(),
                year: 2026
            }
        );
    }

    #[test]
    fn full_page_renders_sections_in_fixed_order() {
        let page = page_with(|content| {
            content.features.push(Feature {
                title: "Fast".to_string(),
                description: "Deploys in seconds".to_string(),
                icon: "rocket".to_string(),
            });
            content.benefits = Some(Benefits {
                headline: "Why".to_string(),
                items: vec!["Less toil".to_string()],
            });
        });
        assert_eq!(
            render(&page, &CTX).section_kinds(),
            vec![
                SectionKind::Hero,
                SectionKind::Features,
                SectionKind::Benefits,
                SectionKind::Cta,
                SectionKind::Footer
            ]
        );
    }

    #[test]
    fn unknown_icon_falls_back_and_keeps_feature_text() {
        let page = page_with(|content| {
            content.features.push(Feature {
                title: "Mystery".to_string(),
                description: "Still shown".to_string(),
                icon: "bogus-symbol".to_string(),
            });
        });
        match &render(&page, &CTX).sections[1] {
            Section::Features { items } => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].icon, IconSymbol::Zap);
                assert_eq!(items[0].title, "Mystery");
                assert_eq!(items[0].description, "Still shown");
            }
            other => panic!("expected features, got {other:?}"),
        }
    }

    #[test]
    fn benefits_with_no_items_are_omitted() {
        let page = page_with(|content| {
            content.benefits = Some(Benefits {
                headline: "X".to_string(),
                items: Vec::new(),
            });
        });
        assert!(!render(&page, &CTX)
            .section_kinds()
            .contains(&SectionKind::Benefits));
    }

    #[test]
    fn theme_resolution_falls_back_on_invalid_color() {
        let resolved = resolve_theme(&Style {
            primary_color: "red; background: url(x)".to_string(),
            theme: Theme::Bold,
        });
        assert_eq!(resolved.primary_color, "#000000");
        assert_eq!(resolved.style, ThemeStyle::for_theme(Theme::Bold));

        let resolved = resolve_theme(&Style {
            primary_color: "#3366FF".to_string(),
            theme: Theme::Modern,
        });
        assert_eq!(resolved.primary_color, "#3366ff");

        let resolved = resolve_theme(&Style {
            primary_color: String::new(),
            theme: Theme::Modern,
        });
        assert_eq!(resolved.primary_color, "#000000");
    }

    #[test]
    fn theme_does_not_change_sections() {
        let plain = render(&page_with(|_| {}), &CTX);
        let playful = render(
            &page_with(|content| content.style.theme = Theme::Playful),
            &CTX,
        );
        assert_eq!(plain.sections, playful.sections);
        assert_ne!(plain.theme, playful.theme);
    }
}
