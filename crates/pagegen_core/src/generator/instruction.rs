//! Fixed system instruction sent with every generation request.

use crate::model::content::Theme;
use crate::model::icon::vocabulary_pipe_list;
use once_cell::sync::Lazy;

static SYSTEM_INSTRUCTION: Lazy<String> = Lazy::new(|| {
    let themes = Theme::ALL
        .iter()
        .map(|theme| theme.as_str())
        .collect::<Vec<_>>()
        .join("|");
    let icons = vocabulary_pipe_list();

    format!(
        r#"You are an expert landing page designer. Generate a complete landing page structure based on the user's prompt.
Return a single JSON object and nothing else, with exactly this structure:
{{
  "title": "Page title",
  "slug": "url-friendly-slug",
  "description": "Brief description",
  "hero": {{
    "headline": "Main headline",
    "subheadline": "Supporting text",
    "ctaText": "Call to action button text",
    "imagePrompt": "Description for hero image"
  }},
  "features": [
    {{
      "title": "Feature title",
      "description": "Feature description",
      "icon": "one of {icons}"
    }}
  ],
  "benefits": {{
    "headline": "Benefits section headline",
    "items": ["Benefit 1", "Benefit 2", "Benefit 3"]
  }},
  "cta": {{
    "headline": "Final CTA headline",
    "subheadline": "Supporting text",
    "buttonText": "CTA button text"
  }},
  "style": {{
    "primaryColor": "hex color such as #2563eb",
    "theme": "one of {themes}"
  }}
}}
"title", "hero.headline" and "cta.headline" must never be empty."#
    )
});

/// Instruction describing the exact content document shape and vocabularies.
pub fn system_instruction() -> &'static str {
    SYSTEM_INSTRUCTION.as_str()
}
