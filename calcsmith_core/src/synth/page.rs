//! Per-calculator page unit emission.
//!
//! A page is a thin wrapper: it pushes the calculator's metadata to the SEO
//! collaborator, mounts the component, and renders it inside the shared
//! layout with the related-calculators rail. The related list is resolved at
//! generation time with the same policy the runtime resolver uses; dangling
//! references are dropped here, silently.

use crate::descriptor::CalculatorDescriptor;
use crate::errors::SiteResult;
use crate::related::{resolve_related, RELATED_CAP};
use crate::store::CalculatorStore;
use crate::synth::{rust_str, DerivedNames, SourceUnit};

/// Emit the page module for one descriptor.
pub fn synthesize_page(
    descriptor: &CalculatorDescriptor,
    store: &CalculatorStore,
) -> SiteResult<SourceUnit> {
    let names = DerivedNames::for_descriptor(descriptor)?;
    let related = resolve_related(descriptor, store, RELATED_CAP);
    let canonical = format!("/calculators/{}", descriptor.slug);

    let mut out = String::with_capacity(2048);
    out.push_str(&format!(
        "{header}\n//\n// {id} - {title} (page wrapper)\n\n",
        header = super::GENERATED_HEADER,
        id = descriptor.id,
        title = descriptor.title,
    ));
    out.push_str("use calcsmith_core::page::{Layout, LayoutContext, MetadataSink, PageMeta, RelatedLink};\n\n");
    out.push_str(&format!(
        "use crate::components::{ty};\n\n",
        ty = names.type_ident
    ));
    out.push_str(&format!(
        "/// Page for {title}, served at `{canonical}`.\npub struct {page};\n\n",
        title = descriptor.title,
        page = names.page_ident,
    ));
    out.push_str(&format!("impl {page} {{\n", page = names.page_ident));
    out.push_str(&format!(
        "    pub const SLUG: &'static str = {};\n",
        rust_str(&descriptor.slug)
    ));
    out.push_str(&format!(
        "    pub const CANONICAL_URL: &'static str = {};\n\n",
        rust_str(&canonical)
    ));
    out.push_str("    /// Render the full page: metadata, layout, component.\n");
    out.push_str("    pub fn render(sink: &mut dyn MetadataSink, layout: &dyn Layout) -> String {\n");
    out.push_str("        sink.set_page_meta(&PageMeta {\n");
    out.push_str(&format!(
        "            title: {}.to_string(),\n",
        rust_str(&descriptor.title)
    ));
    out.push_str(&format!(
        "            description: {}.to_string(),\n",
        rust_str(&descriptor.meta_description)
    ));
    out.push_str("            keywords: vec![\n");
    for keyword in &descriptor.seo_keywords {
        out.push_str(&format!(
            "                {}.to_string(),\n",
            rust_str(keyword)
        ));
    }
    out.push_str("            ],\n");
    out.push_str("            canonical_url: Self::CANONICAL_URL.to_string(),\n");
    out.push_str("        });\n\n");
    out.push_str("        let component = ");
    out.push_str(&names.type_ident);
    out.push_str("::mount();\n");
    out.push_str("        let ctx = LayoutContext {\n");
    out.push_str(&format!(
        "            title: {}.to_string(),\n",
        rust_str(&descriptor.title)
    ));
    out.push_str(&format!(
        "            description: {}.to_string(),\n",
        rust_str(&descriptor.description)
    ));
    out.push_str("            related: vec![\n");
    for link in &related {
        out.push_str(&format!(
            "                RelatedLink {{ title: {}.to_string(), slug: {}.to_string() }},\n",
            rust_str(&link.title),
            rust_str(&link.slug),
        ));
    }
    out.push_str("            ],\n");
    out.push_str("        };\n");
    out.push_str("        layout.render_calculator_layout(&ctx, &component.render_html())\n");
    out.push_str("    }\n}\n");

    Ok(SourceUnit {
        file_name: format!("{}.rs", names.page_ident),
        contents: out,
    })
}
