//! # Calculator Descriptors
//!
//! The `CalculatorDescriptor` struct is the authored record describing one
//! calculator: its identity, display copy, input/output schema, and the
//! provenance text of its formula. Descriptors are edited externally and are
//! immutable for the duration of one generation pass.
//!
//! ## Structure
//!
//! ```text
//! StoreDocument
//! ├── metadata: StoreMetadata (total_calculators)
//! ├── categories: BTreeMap<String, CategoryInfo> (declared per-category counts)
//! └── calculators: Vec<CalculatorDescriptor> (authored order is display order)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use calcsmith_core::descriptor::StoreDocument;
//!
//! let doc: StoreDocument = serde_json::from_str(r#"{
//!     "metadata": { "total_calculators": 0 },
//!     "categories": {},
//!     "calculators": []
//! }"#).unwrap();
//! assert!(doc.calculators.is_empty());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of calculator categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Financial,
    Health,
    Math,
    Other,
}

impl Category {
    /// All categories, in listing order
    pub const ALL: [Category; 4] = [
        Category::Financial,
        Category::Health,
        Category::Math,
        Category::Other,
    ];

    /// Stable key used in the store document's `categories` mapping
    pub fn key(&self) -> &'static str {
        match self {
            Category::Financial => "financial",
            Category::Health => "health",
            Category::Math => "math",
            Category::Other => "other",
        }
    }

    /// Display name for listing pages
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Financial => "Financial",
            Category::Health => "Health & Fitness",
            Category::Math => "Math",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Kind of form control rendered for an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Number,
    Text,
    Select,
}

/// One choice in a `select` input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Schema for one form input. Authored order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    /// Key in the inputs mapping passed to the compute function
    pub id: String,
    /// Label shown next to the control
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InputKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Only meaningful for `select` inputs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

/// How an output value is rendered.
///
/// Unrecognized format strings are preserved as `Raw` and fall back to plain
/// stringification rather than failing the load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Currency,
    Decimal,
    Number,
    #[serde(untagged)]
    Raw(String),
}

/// Schema for one read-only output row. Authored order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Key in the outputs mapping returned by the compute function
    pub id: String,
    /// Label shown next to the value
    pub name: String,
    pub format: OutputFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u8>,
}

/// The authored record for one calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorDescriptor {
    /// Stable internal identifier, kebab-case, unique across the store
    pub id: String,
    /// URL path segment, unique across the store; may differ from `id`
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub seo_keywords: Vec<String>,
    pub category: Category,
    pub inputs: Vec<InputSpec>,
    pub outputs: Vec<OutputSpec>,
    /// Display form of the formula (opaque to the engine)
    #[serde(default)]
    pub formula: String,
    #[serde(default)]
    pub formula_explanation: String,
    /// Provenance text of the per-calculator compute logic. The engine never
    /// evaluates this; execution goes through the compute registry keyed by `id`.
    #[serde(default)]
    pub calculate_function: String,
    /// Cross-references to other descriptors by `id` or `slug`. Dangling
    /// entries are dropped at resolution time, not treated as fatal.
    #[serde(default)]
    pub related: Vec<String>,
}

/// Declared listing info for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Must equal the number of calculators in this category
    pub count: usize,
}

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// Must equal `calculators.len()`
    pub total_calculators: usize,
}

/// The descriptor store document as authored (pre-validation).
///
/// Use [`crate::store::CalculatorStore`] to load and validate; this type is
/// the raw schema only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    pub metadata: StoreMetadata,
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryInfo>,
    pub calculators: Vec<CalculatorDescriptor>,
}
