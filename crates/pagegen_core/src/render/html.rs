//! Standalone HTML document output for rendered pages.

use super::{FeatureItem, RenderedPage, ResolvedTheme, Section};
use crate::model::icon::{Glyph, IconSymbol};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

impl RenderedPage {
    /// Serializes the page to an HTML5 document.
    ///
    /// All content text is escaped; the primary color is already validated
    /// by theme resolution before it reaches the stylesheet.
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(8 * 1024);
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        let _ = writeln!(out, "<title>{}</title>", encode_text(&self.title));
        if !self.description.is_empty() {
            let _ = writeln!(
                out,
                "<meta name=\"description\" content=\"{}\">",
                encode_double_quoted_attribute(&self.description)
            );
        }
        write_stylesheet(&mut out, &self.theme);
        let _ = writeln!(
            out,
            "</head>\n<body class=\"theme-{}\">",
            self.theme.theme.as_str()
        );

        for section in &self.sections {
            write_section(&mut out, section);
        }

        out.push_str("</body>\n</html>\n");
        out
    }
}

fn write_stylesheet(out: &mut String, theme: &ResolvedTheme) {
    let color = &theme.primary_color;
    let style = theme.style;
    let _ = write!(
        out,
        "<style>\n\
         body {{ margin: 0; font-family: {font}; color: #111827; }}\n\
         section, footer {{ padding: 5rem 1.5rem; text-align: center; }}\n\
         h1, h2, h3 {{ font-weight: {weight}; }}\n\
         .primary-button {{ background-color: {color}; color: #ffffff; border: 0; border-radius: {radius}; padding: 1rem 2rem; font-size: 1.125rem; }}\n\
         .primary-button:hover {{ opacity: 0.9; }}\n\
         .primary-text {{ color: {color}; }}\n\
         .icon {{ display: inline-flex; width: 3rem; height: 3rem; align-items: center; justify-content: center; border-radius: {radius}; background-color: {color}; color: #ffffff; }}\n\
         .features {{ display: grid; gap: 2rem; grid-template-columns: repeat(auto-fit, minmax(16rem, 1fr)); text-align: left; }}\n\
         .benefits li {{ display: flex; gap: 0.75rem; align-items: flex-start; text-align: left; }}\n\
         footer {{ padding: 2rem 1.5rem; font-size: 0.875rem; color: #4b5563; }}\n\
         </style>\n",
        font = style.font_stack,
        weight = style.heading_weight,
        radius = style.radius,
        color = color,
    );
}

fn write_section(out: &mut String, section: &Section) {
    match section {
        Section::Hero {
            headline,
            subheadline,
            cta_text,
        } => {
            let _ = write!(
                out,
                "<section class=\"hero\">\n<h1>{}</h1>\n<p>{}</p>\n<button class=\"primary-button\">{}</button>\n</section>\n",
                encode_text(headline),
                encode_text(subheadline),
                encode_text(cta_text)
            );
        }
        Section::Features { items } => {
            out.push_str("<section class=\"features-section\">\n<h2>Features</h2>\n");
            out.push_str("<p>Everything you need to succeed</p>\n<div class=\"features\">\n");
            for item in items {
                write_feature(out, item);
            }
            out.push_str("</div>\n</section>\n");
        }
        Section::Benefits { headline, items } => {
            let _ = write!(
                out,
                "<section class=\"benefits\">\n<h2>{}</h2>\n<ul>\n",
                encode_text(headline)
            );
            let check = svg(IconSymbol::Check.glyph(), "primary-text");
            for item in items {
                let _ = writeln!(out, "<li>{check}<span>{}</span></li>", encode_text(item));
            }
            out.push_str("</ul>\n</section>\n");
        }
        Section::Cta {
            headline,
            subheadline,
            button_text,
        } => {
            let _ = write!(
                out,
                "<section class=\"cta\">\n<h2>{}</h2>\n<p>{}</p>\n<button class=\"primary-button\">{}</button>\n</section>\n",
                encode_text(headline),
                encode_text(subheadline),
                encode_text(button_text)
            );
        }
        Section::Footer { title, year } => {
            let _ = writeln!(
                out,
                "<footer>\n<p>&copy; {year} {}. Built with Autosite.</p>\n</footer>",
                encode_text(title)
            );
        }
    }
}

fn write_feature(out: &mut String, item: &FeatureItem) {
    let _ = write!(
        out,
        "<div class=\"feature\">\n<span class=\"icon\">{}</span>\n<h3>{}</h3>\n<p>{}</p>\n</div>\n",
        svg(item.icon.glyph(), ""),
        encode_text(&item.title),
        encode_text(&item.description)
    );
}

fn svg(glyph: Glyph, class: &str) -> String {
    format!(
        "<svg class=\"glyph glyph-{} {class}\" width=\"24\" height=\"24\" viewBox=\"0 0 24 24\" fill=\"none\" stroke=\"currentColor\" stroke-width=\"2\" stroke-linecap=\"round\" stroke-linejoin=\"round\" aria-hidden=\"true\">{}</svg>",
        glyph.name, glyph.svg_body
    )
}

#[cfg(test)]
mod tests {
    use crate::model::content::{Benefits, ContentDocument, Feature};
    use crate::model::page::Page;
    use crate::render::{render, RenderContext};
    use serde_json::json;

    fn page() -> Page {
        let mut content = ContentDocument::from_value(&json!({
            "title": "Tom & Jerry's <Bakery>",
            "description": "Fresh \"bread\" daily",
            "hero": {"headline": "<script>alert(1)</script>", "subheadline": "Warm", "ctaText": "Order"},
            "cta": {"headline": "Visit", "subheadline": "Open 7-7", "buttonText": "Directions"},
            "style": {"primaryColor": "#ff6600", "theme": "playful"}
        }))
        .unwrap();
        content.features.push(Feature {
            title: "Ovens".to_string(),
            description: "Stone baked".to_string(),
            icon: "bogus-symbol".to_string(),
        });
        content.benefits = Some(Benefits {
            headline: "Why us".to_string(),
            items: vec!["Local flour".to_string()],
        });
        Page::publish("owner", "tom-jerry-s-bakery", content, 0)
    }

    #[test]
    fn html_escapes_all_content_text() {
        let html = render(&page(), &RenderContext::for_year(2026)).to_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("Tom &amp; Jerry's &lt;Bakery&gt;"));
        assert!(html.contains("content=\"Fresh &quot;bread&quot; daily\""));
    }

    #[test]
    fn html_carries_theme_glyphs_and_footer() {
        let html = render(&page(), &RenderContext::for_year(2026)).to_html();
        assert!(html.contains("background-color: #ff6600"));
        assert!(html.contains("class=\"theme-playful\""));
        assert!(html.contains("glyph-zap"));
        assert!(html.contains("glyph-check"));
        assert!(html.contains(
            "&copy; 2026 Tom &amp; Jerry's &lt;Bakery&gt;. Built with Autosite."
        ));

        let hero = html.find("class=\"hero\"").unwrap();
        let features = html.find("class=\"features-section\"").unwrap();
        let benefits = html.find("class=\"benefits\"").unwrap();
        let cta = html.find("class=\"cta\"").unwrap();
        let footer = html.find("<footer>").unwrap();
        assert!(hero < features && features < benefits && benefits < cta && cta < footer);
    }

    #[test]
    fn html_is_byte_identical_across_renders() {
        let page = page();
        let ctx = RenderContext::for_year(2026);
        let first = render(&page, &ctx).to_html();
        let second = render(&page, &ctx).to_html();
        assert_eq!(first, second);
    }
}
