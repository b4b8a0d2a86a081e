//! # Page Collaborator Seams
//!
//! The two places the engine talks to the surrounding site: the metadata sink
//! (SEO tooling) and the layout renderer (page chrome). Both are traits so the
//! real site can plug in its own implementations; the defaults here are enough
//! for tests and the CLI's `resolve` command.

use serde::{Deserialize, Serialize};

use crate::component::escape_html;

/// Per-page metadata handed to the SEO collaborator, once per page render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub canonical_url: String,
}

/// The only seam through which the engine talks to SEO tooling.
pub trait MetadataSink {
    fn set_page_meta(&mut self, meta: &PageMeta);
}

/// A metadata sink that records what it was given; useful in tests and as a
/// stand-in when no SEO tooling is wired up.
#[derive(Debug, Default, Clone)]
pub struct RecordingMetadataSink {
    pub pages: Vec<PageMeta>,
}

impl MetadataSink for RecordingMetadataSink {
    fn set_page_meta(&mut self, meta: &PageMeta) {
        self.pages.push(meta.clone());
    }
}

/// One entry in the related-calculators rail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLink {
    pub title: String,
    pub slug: String,
}

/// Everything the layout needs besides the component markup itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutContext {
    pub title: String,
    pub description: String,
    pub related: Vec<RelatedLink>,
}

/// Shared layout collaborator.
pub trait Layout {
    fn render_calculator_layout(&self, ctx: &LayoutContext, children: &str) -> String;
}

/// Minimal HTML shell used when the surrounding site does not supply a layout.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLayout;

impl Layout for DefaultLayout {
    fn render_calculator_layout(&self, ctx: &LayoutContext, children: &str) -> String {
        let mut html = String::with_capacity(children.len() + 512);
        html.push_str("<main class=\"calculator-page\">\n");
        html.push_str(&format!("<h1>{}</h1>\n", escape_html(&ctx.title)));
        html.push_str(&format!("<p>{}</p>\n", escape_html(&ctx.description)));
        html.push_str(children);
        if !ctx.related.is_empty() {
            html.push_str("<nav class=\"related-calculators\"><ul>\n");
            for link in &ctx.related {
                html.push_str(&format!(
                    "<li><a href=\"/calculators/{}\">{}</a></li>\n",
                    escape_html(&link.slug),
                    escape_html(&link.title),
                ));
            }
            html.push_str("</ul></nav>\n");
        }
        html.push_str("</main>\n");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingMetadataSink::default();
        sink.set_page_meta(&PageMeta {
            title: "BMI Calculator".to_string(),
            description: "desc".to_string(),
            keywords: vec!["bmi".to_string()],
            canonical_url: "/calculators/bmi-calculator".to_string(),
        });
        assert_eq!(sink.pages.len(), 1);
        assert_eq!(sink.pages[0].title, "BMI Calculator");
    }

    #[test]
    fn test_default_layout_renders_related_rail() {
        let ctx = LayoutContext {
            title: "Tip Calculator".to_string(),
            description: "Split the bill".to_string(),
            related: vec![RelatedLink {
                title: "Percentage Calculator".to_string(),
                slug: "percentage-calculator".to_string(),
            }],
        };
        let html = DefaultLayout.render_calculator_layout(&ctx, "<div>body</div>");
        assert!(html.contains("<h1>Tip Calculator</h1>"));
        assert!(html.contains("/calculators/percentage-calculator"));
        assert!(html.contains("<div>body</div>"));
    }
}
