//! # Source Synthesis
//!
//! Expands descriptors into generated source units: one component module and
//! one page module per calculator, a barrel module aggregating every
//! component under its derived identifier, and the static route table.
//!
//! All emission is deterministic text: running the synthesizers twice over an
//! unchanged store produces byte-identical units, which is what makes the
//! generation pass idempotent end to end.
//!
//! The units target the site crate that consumes `calcsmith_core`; they are
//! written to disk by the generation pass (see [`crate::gen`]), not compiled
//! into this crate.

mod component;
mod page;

pub use component::synthesize_component;
pub use page::synthesize_page;

use std::collections::BTreeMap;

use crate::descriptor::CalculatorDescriptor;
use crate::errors::{SiteError, SiteResult};
use crate::ident::{derive_identifier, COMPONENT_SUFFIX, FILE_COMPONENT_SUFFIX, PAGE_SUFFIX};
use crate::store::CalculatorStore;

/// Marker line at the top of every generated file
pub const GENERATED_HEADER: &str = "// @generated by calcsmith. Do not edit.";

/// One generated source artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// File name relative to its output directory (e.g. `BmiComponent.rs`)
    pub file_name: String,
    pub contents: String,
}

/// The naming triple for one calculator, derived once and shared by the
/// component, page, barrel, and route synthesizers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedNames {
    /// Runtime lookup key: `derive_identifier(slug, "CalculatorComponent")`
    pub component_ident: String,
    /// Generated component type/file name: `derive_identifier(id, "Component")`
    pub type_ident: String,
    /// Generated page type/file name: `derive_identifier(id, "Page")`
    pub page_ident: String,
    /// Snake-case module name the barrel uses for the component file
    pub module_name: String,
}

impl DerivedNames {
    /// Derive all names for one descriptor.
    pub fn for_descriptor(descriptor: &CalculatorDescriptor) -> SiteResult<Self> {
        Ok(DerivedNames {
            component_ident: derive_identifier(&descriptor.slug, COMPONENT_SUFFIX)?,
            type_ident: derive_identifier(&descriptor.id, FILE_COMPONENT_SUFFIX)?,
            page_ident: derive_identifier(&descriptor.id, PAGE_SUFFIX)?,
            module_name: descriptor.id.replace('-', "_"),
        })
    }
}

/// Render a Rust string literal (quoted, escaped) for embedding in a unit.
pub(crate) fn rust_str(s: &str) -> String {
    format!("{s:?}")
}

/// Wrap pre-rendered JSON in a raw string literal, widening the `#` fence
/// until no content can terminate it early.
pub(crate) fn raw_str(content: &str) -> String {
    let mut fence = "#".to_string();
    while content.contains(&format!("\"{fence}")) {
        fence.push('#');
    }
    format!("r{fence}\"{content}\"{fence}")
}

/// Emit the barrel module aggregating every synthesized component.
///
/// The barrel re-exports each component type and builds the explicit
/// identifier-to-constructor map the runtime resolver depends on. Duplicate
/// identifiers are a build-fatal [`SiteError::DuplicateIdentifier`]: the map
/// must stay injective or dispatch becomes ambiguous.
pub fn aggregate(entries: &[(DerivedNames, &CalculatorDescriptor)]) -> SiteResult<SourceUnit> {
    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
    for (names, descriptor) in entries {
        if let Some(first) = seen.insert(&names.component_ident, &descriptor.slug) {
            return Err(SiteError::duplicate_identifier(
                &names.component_ident,
                first,
                &descriptor.slug,
            ));
        }
    }

    let mut out = String::with_capacity(1024 + entries.len() * 256);
    out.push_str(GENERATED_HEADER);
    out.push_str("\n//\n// Barrel module: every calculator component, re-exported under its\n");
    out.push_str("// derived identifier, plus the identifier -> constructor map.\n\n");
    out.push_str("#![allow(non_snake_case)]\n\n");
    out.push_str("use std::collections::BTreeMap;\n\n");
    out.push_str("use calcsmith_core::component::CalculatorComponent;\n\n");

    for (names, _) in entries {
        out.push_str(&format!(
            "#[path = {path}]\nmod {module};\npub use {module}::{ty};\n\n",
            path = rust_str(&format!("{}.rs", names.type_ident)),
            module = names.module_name,
            ty = names.type_ident,
        ));
    }

    out.push_str("/// Constructor signature shared by every generated component\n");
    out.push_str("pub type ComponentCtor = fn() -> CalculatorComponent;\n\n");
    out.push_str("/// The explicit identifier -> component map, built once at startup.\n");
    out.push_str("pub fn component_map() -> BTreeMap<&'static str, ComponentCtor> {\n");
    out.push_str("    let mut map: BTreeMap<&'static str, ComponentCtor> = BTreeMap::new();\n");
    for (names, _) in entries {
        out.push_str(&format!(
            "    map.insert({key}, {ty}::mount);\n",
            key = rust_str(&names.component_ident),
            ty = names.type_ident,
        ));
    }
    out.push_str("    map\n}\n");

    Ok(SourceUnit {
        file_name: "mod.rs".to_string(),
        contents: out,
    })
}

/// Emit the barrel module for the page units.
///
/// Pages have no runtime lookup map; the barrel only wires the
/// identifier-named files into the module tree for the route table.
pub fn aggregate_pages(entries: &[(DerivedNames, &CalculatorDescriptor)]) -> SiteResult<SourceUnit> {
    let mut out = String::with_capacity(512 + entries.len() * 128);
    out.push_str(GENERATED_HEADER);
    out.push_str("\n//\n// Barrel module: every calculator page.\n\n");
    out.push_str("#![allow(non_snake_case)]\n\n");
    for (names, _) in entries {
        out.push_str(&format!(
            "#[path = {path}]\nmod {module}_page;\npub use {module}_page::{page};\n\n",
            path = rust_str(&format!("{}.rs", names.page_ident)),
            module = names.module_name,
            page = names.page_ident,
        ));
    }

    Ok(SourceUnit {
        file_name: "mod.rs".to_string(),
        contents: out,
    })
}

/// Emit the static route table binding `/calculators/{slug}` to each page.
///
/// A slug that fails the deriver is build-fatal here (it already failed store
/// validation, but the table is the last line of defense): a silently-dropped
/// calculator is worse than a failed build.
pub fn synthesize_routes(store: &CalculatorStore) -> SiteResult<SourceUnit> {
    let mut out = String::with_capacity(512 + store.len() * 128);
    out.push_str(GENERATED_HEADER);
    out.push_str("\n//\n// Static route table: URL path -> page renderer.\n\n");
    out.push_str("use calcsmith_core::page::{Layout, MetadataSink};\n\n");
    out.push_str("use crate::pages;\n\n");
    out.push_str("/// Render signature shared by every generated page\n");
    out.push_str("pub type PageFn = fn(&mut dyn MetadataSink, &dyn Layout) -> String;\n\n");
    out.push_str("/// All calculator routes, in store order.\n");
    out.push_str("pub static ROUTES: &[(&str, PageFn)] = &[\n");
    for descriptor in store.calculators() {
        let names = DerivedNames::for_descriptor(descriptor)?;
        out.push_str(&format!(
            "    ({path}, pages::{page}::render),\n",
            path = rust_str(&format!("/calculators/{}", descriptor.slug)),
            page = names.page_ident,
        ));
    }
    out.push_str("];\n");

    Ok(SourceUnit {
        file_name: "routes.rs".to_string(),
        contents: out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CalculatorStore;

    #[test]
    fn test_derived_names() {
        let store = CalculatorStore::load_embedded().unwrap();
        let names = DerivedNames::for_descriptor(store.by_id("mortgage-payment").unwrap()).unwrap();
        assert_eq!(names.component_ident, "MortgageCalculatorComponent");
        assert_eq!(names.type_ident, "MortgagePaymentComponent");
        assert_eq!(names.page_ident, "MortgagePaymentPage");
        assert_eq!(names.module_name, "mortgage_payment");
    }

    #[test]
    fn test_raw_str_widens_fence() {
        assert_eq!(raw_str("plain"), "r#\"plain\"#");
        let tricky = "contains \"# terminator";
        let wrapped = raw_str(tricky);
        assert!(wrapped.starts_with("r##\""));
        assert!(wrapped.ends_with("\"##"));
    }

    #[test]
    fn test_aggregate_lists_every_component() {
        let store = CalculatorStore::load_embedded().unwrap();
        let entries: Vec<_> = store
            .calculators()
            .iter()
            .map(|c| (DerivedNames::for_descriptor(c).unwrap(), c))
            .collect();

        let barrel = aggregate(&entries).unwrap();
        assert_eq!(barrel.file_name, "mod.rs");
        for (names, _) in &entries {
            assert!(barrel.contents.contains(&names.component_ident));
            assert!(barrel.contents.contains(&names.type_ident));
        }
    }

    #[test]
    fn test_aggregate_rejects_duplicate_identifier() {
        let store = CalculatorStore::load_embedded().unwrap();
        let calc = store.by_id("bmi").unwrap();
        let names = DerivedNames::for_descriptor(calc).unwrap();
        let entries = vec![(names.clone(), calc), (names, calc)];

        let err = aggregate(&entries).unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_IDENTIFIER");
    }

    #[test]
    fn test_route_table_covers_store() {
        let store = CalculatorStore::load_embedded().unwrap();
        let routes = synthesize_routes(&store).unwrap();
        for descriptor in store.calculators() {
            assert!(routes
                .contents
                .contains(&format!("/calculators/{}", descriptor.slug)));
        }
    }
}
