//! # Calculator Store
//!
//! Loading and validation of the descriptor store document. Validation is
//! all-or-nothing and runs at load: a store that loads is a store the
//! generation pass and the runtime resolver can both trust, so neither has to
//! re-check invariants downstream.
//!
//! Checked at load (all build-fatal):
//! - duplicate `id` / `slug`, case-insensitive
//! - duplicate derived identifier across the store
//! - keys that fail the identifier deriver's precondition
//! - `metadata.total_calculators` vs. the actual count
//! - every declared category count vs. the actual tally
//! - duplicate input/output ids within one descriptor
//!
//! Dangling `related` references are deliberately NOT checked here; they are
//! dropped at resolution time (see [`crate::related`]).

use std::collections::BTreeMap;
use std::path::Path;

use rust_embed::RustEmbed;

use crate::descriptor::{CalculatorDescriptor, StoreDocument};
use crate::errors::{SiteError, SiteResult};
use crate::ident::{derive_identifier, validate_key, COMPONENT_SUFFIX, FILE_COMPONENT_SUFFIX};

/// Embedded default dataset (`data/calculators.json`)
#[derive(RustEmbed)]
#[folder = "data/"]
struct EmbeddedData;

const EMBEDDED_STORE: &str = "calculators.json";

/// A loaded, validated descriptor store.
///
/// Authored order of `calculators` is preserved; it is the site's display
/// order.
#[derive(Debug, Clone)]
pub struct CalculatorStore {
    doc: StoreDocument,
    by_id: BTreeMap<String, usize>,
    by_slug: BTreeMap<String, usize>,
}

impl CalculatorStore {
    /// Parse and validate a store document from JSON text.
    pub fn load_from_str(json: &str) -> SiteResult<Self> {
        let doc: StoreDocument = serde_json::from_str(json)
            .map_err(|e| SiteError::malformed_store(e.to_string()))?;
        Self::from_document(doc)
    }

    /// Read, parse, and validate a store document from disk.
    pub fn load_from_path(path: &Path) -> SiteResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            SiteError::file_error("read store", path.display().to_string(), e.to_string())
        })?;
        Self::load_from_str(&json)
    }

    /// Load the dataset embedded in this crate.
    pub fn load_embedded() -> SiteResult<Self> {
        let file = EmbeddedData::get(EMBEDDED_STORE).ok_or_else(|| SiteError::Internal {
            message: format!("embedded asset '{EMBEDDED_STORE}' missing"),
        })?;
        let json = std::str::from_utf8(file.data.as_ref())
            .map_err(|e| SiteError::malformed_store(e.to_string()))?;
        Self::load_from_str(json)
    }

    /// Validate an already-parsed document.
    pub fn from_document(doc: StoreDocument) -> SiteResult<Self> {
        validate_document(&doc)?;

        let by_id = doc
            .calculators
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();
        let by_slug = doc
            .calculators
            .iter()
            .enumerate()
            .map(|(i, c)| (c.slug.clone(), i))
            .collect();

        Ok(CalculatorStore {
            doc,
            by_id,
            by_slug,
        })
    }

    /// All descriptors, in authored order
    pub fn calculators(&self) -> &[CalculatorDescriptor] {
        &self.doc.calculators
    }

    /// Look up a descriptor by internal id (exact match)
    pub fn by_id(&self, id: &str) -> Option<&CalculatorDescriptor> {
        self.by_id.get(id).map(|&i| &self.doc.calculators[i])
    }

    /// Look up a descriptor by URL slug (exact match)
    pub fn by_slug(&self, slug: &str) -> Option<&CalculatorDescriptor> {
        self.by_slug.get(slug).map(|&i| &self.doc.calculators[i])
    }

    /// The raw document (categories listing, metadata)
    pub fn document(&self) -> &StoreDocument {
        &self.doc
    }

    pub fn len(&self) -> usize {
        self.doc.calculators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc.calculators.is_empty()
    }
}

fn validate_document(doc: &StoreDocument) -> SiteResult<()> {
    // Document-level counts first; a wrong total usually means a descriptor
    // was added without re-counting, and that is the clearest error to lead with.
    if doc.metadata.total_calculators != doc.calculators.len() {
        return Err(SiteError::MetadataMismatch {
            declared: doc.metadata.total_calculators,
            actual: doc.calculators.len(),
        });
    }

    let mut actual_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for calc in &doc.calculators {
        *actual_counts.entry(calc.category.key()).or_default() += 1;
    }
    for (key, info) in &doc.categories {
        let actual = actual_counts.get(key.as_str()).copied().unwrap_or(0);
        if info.count != actual {
            return Err(SiteError::CategoryCountMismatch {
                category: key.clone(),
                declared: info.count,
                actual,
            });
        }
    }

    // Key validity and case-insensitive uniqueness
    let mut ids_lower: BTreeMap<String, &str> = BTreeMap::new();
    let mut slugs_lower: BTreeMap<String, &str> = BTreeMap::new();
    for calc in &doc.calculators {
        validate_key(&calc.id)?;
        validate_key(&calc.slug)?;

        if ids_lower
            .insert(calc.id.to_ascii_lowercase(), &calc.id)
            .is_some()
        {
            return Err(SiteError::duplicate_key("id", &calc.id));
        }
        if slugs_lower
            .insert(calc.slug.to_ascii_lowercase(), &calc.slug)
            .is_some()
        {
            return Err(SiteError::duplicate_key("slug", &calc.slug));
        }
    }

    // Derived identifiers must stay injective across the store, for both the
    // runtime component key (from slug) and the generated file key (from id).
    let mut component_idents: BTreeMap<String, &str> = BTreeMap::new();
    let mut file_idents: BTreeMap<String, &str> = BTreeMap::new();
    for calc in &doc.calculators {
        let component = derive_identifier(&calc.slug, COMPONENT_SUFFIX)?;
        if let Some(first) = component_idents.insert(component.clone(), &calc.slug) {
            return Err(SiteError::duplicate_identifier(component, first, &calc.slug));
        }
        let file = derive_identifier(&calc.id, FILE_COMPONENT_SUFFIX)?;
        if let Some(first) = file_idents.insert(file.clone(), &calc.id) {
            return Err(SiteError::duplicate_identifier(file, first, &calc.id));
        }
    }

    // Per-descriptor input/output id uniqueness
    for calc in &doc.calculators {
        let mut input_ids: BTreeMap<&str, ()> = BTreeMap::new();
        for input in &calc.inputs {
            if input_ids.insert(&input.id, ()).is_some() {
                return Err(SiteError::duplicate_key(
                    format!("input id in '{}'", calc.id),
                    &input.id,
                ));
            }
        }
        let mut output_ids: BTreeMap<&str, ()> = BTreeMap::new();
        for output in &calc.outputs {
            if output_ids.insert(&output.id, ()).is_some() {
                return Err(SiteError::duplicate_key(
                    format!("output id in '{}'", calc.id),
                    &output.id,
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_store_json(calculators: &str, total: usize, categories: &str) -> String {
        format!(
            r#"{{
                "metadata": {{ "total_calculators": {total} }},
                "categories": {{ {categories} }},
                "calculators": [ {calculators} ]
            }}"#
        )
    }

    fn calc_json(id: &str, slug: &str, category: &str) -> String {
        format!(
            r#"{{
                "id": "{id}",
                "slug": "{slug}",
                "title": "T",
                "description": "D",
                "category": "{category}",
                "inputs": [],
                "outputs": []
            }}"#
        )
    }

    #[test]
    fn test_embedded_store_loads() {
        let store = CalculatorStore::load_embedded().unwrap();
        assert!(!store.is_empty());
        assert_eq!(store.len(), store.document().metadata.total_calculators);
        assert!(store.by_slug("bmi-calculator").is_some());
        assert!(store.by_id("bmi").is_some());
    }

    #[test]
    fn test_malformed_store_rejected() {
        let err = CalculatorStore::load_from_str("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_STORE");
    }

    #[test]
    fn test_duplicate_slug_case_insensitive() {
        let json = minimal_store_json(
            &format!(
                "{},{}",
                calc_json("a", "same-slug", "math"),
                calc_json("b", "Same-Slug", "math")
            ),
            2,
            r#""math": { "title": "Math", "count": 2 }"#,
        );
        let err = CalculatorStore::load_from_str(&json).unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_KEY");
    }

    #[test]
    fn test_total_mismatch_rejected() {
        let json = minimal_store_json(&calc_json("a", "a", "math"), 5, "");
        let err = CalculatorStore::load_from_str(&json).unwrap_err();
        assert_eq!(err.error_code(), "METADATA_MISMATCH");
    }

    #[test]
    fn test_category_count_mismatch_rejected() {
        let json = minimal_store_json(
            &calc_json("a", "a", "health"),
            1,
            r#""health": { "title": "Health", "count": 3 }"#,
        );
        let err = CalculatorStore::load_from_str(&json).unwrap_err();
        assert_eq!(
            err,
            SiteError::CategoryCountMismatch {
                category: "health".to_string(),
                declared: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn test_identifier_collision_rejected() {
        // Distinct slugs that derive the same identifier: the trailing
        // "-calculator" word strips away, colliding with the bare slug
        let json = minimal_store_json(
            &format!(
                "{},{}",
                calc_json("a", "loan", "financial"),
                calc_json("b", "loan-calculator", "financial")
            ),
            2,
            r#""financial": { "title": "Financial", "count": 2 }"#,
        );
        let err = CalculatorStore::load_from_str(&json).unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_IDENTIFIER");
    }

    #[test]
    fn test_invalid_key_rejected() {
        let json = minimal_store_json(&calc_json("bad id", "ok-slug", "math"), 1, "");
        let err = CalculatorStore::load_from_str(&json).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_KEY");
    }

    #[test]
    fn test_dangling_related_tolerated_at_load() {
        let mut calc = calc_json("a", "a-calc", "math");
        calc = calc.replace(
            "\"outputs\": []",
            "\"outputs\": [], \"related\": [\"no-such-calculator\"]",
        );
        let json = minimal_store_json(&calc, 1, "");
        assert!(CalculatorStore::load_from_str(&json).is_ok());
    }
}
