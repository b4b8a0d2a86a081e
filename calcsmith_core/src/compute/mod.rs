//! # Compute Registry
//!
//! The descriptor store carries each calculator's formula as opaque provenance
//! text; the engine never evaluates it. Execution goes through a registry of
//! pure Rust functions keyed by calculator `id` -- a function-pointer table
//! that decouples the generic form/output machinery from calculator-specific
//! arithmetic.
//!
//! Functions are contractually pure and fast: a mapping of input ids to values
//! in, a mapping of output ids to values out, no I/O. A function that returns
//! an error (or panics, despite the contract) surfaces as a single generic
//! error row in the rendered component; it never reaches the page boundary.
//!
//! ## Usage
//!
//! ```rust
//! use calcsmith_core::compute::{CalcInputs, CalcValue, ComputeRegistry};
//!
//! let registry = ComputeRegistry::builtin();
//! let calc = registry.get("percentage").unwrap();
//!
//! let mut inputs = CalcInputs::new();
//! inputs.insert("value".to_string(), CalcValue::Number(250.0));
//! inputs.insert("percent".to_string(), CalcValue::Number(20.0));
//!
//! let outputs = calc(&inputs).unwrap();
//! assert_eq!(outputs["result"], 50.0);
//! ```

mod builtin;

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single user-entered input value, after client-side type coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalcValue {
    Number(f64),
    Text(String),
}

impl CalcValue {
    /// Numeric view of the value; text values are parsed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CalcValue::Number(n) => Some(*n),
            CalcValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Text view of the value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CalcValue::Text(s) => Some(s),
            CalcValue::Number(_) => None,
        }
    }
}

impl fmt::Display for CalcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcValue::Number(n) => write!(f, "{n}"),
            CalcValue::Text(s) => f.write_str(s),
        }
    }
}

/// Current values of a component's inputs, keyed by input id
pub type CalcInputs = BTreeMap<String, CalcValue>;

/// Computed results, keyed by output id
pub type CalcOutputs = BTreeMap<String, f64>;

/// Error from one compute function invocation.
///
/// These stay inside the component (rendered as a generic error row); they are
/// deliberately not part of [`crate::errors::SiteError`].
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum ComputeError {
    #[error("Missing input: {id}")]
    MissingInput { id: String },

    #[error("Invalid input '{id}': {reason}")]
    InvalidInput { id: String, reason: String },

    #[error("Computation failed: {reason}")]
    Failed { reason: String },
}

impl ComputeError {
    pub fn missing_input(id: impl Into<String>) -> Self {
        ComputeError::MissingInput { id: id.into() }
    }

    pub fn invalid_input(id: impl Into<String>, reason: impl Into<String>) -> Self {
        ComputeError::InvalidInput {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        ComputeError::Failed {
            reason: reason.into(),
        }
    }
}

/// Signature of one registered calculator function
pub type CalcFn = fn(&CalcInputs) -> Result<CalcOutputs, ComputeError>;

/// Table of compute functions, keyed by calculator `id`.
#[derive(Default, Clone)]
pub struct ComputeRegistry {
    fns: BTreeMap<String, CalcFn>,
}

impl ComputeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a compute function under a calculator id.
    ///
    /// Re-registering an id replaces the previous function; the store is the
    /// authority on which ids exist, so the registry does not police them.
    pub fn register(&mut self, id: impl Into<String>, f: CalcFn) {
        self.fns.insert(id.into(), f);
    }

    /// Look up the compute function for a calculator id
    pub fn get(&self, id: &str) -> Option<CalcFn> {
        self.fns.get(id).copied()
    }

    /// All registered ids, in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.fns.keys().map(String::as_str)
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.fns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fns.is_empty()
    }

    /// The builtin registry matching the embedded descriptor store.
    pub fn builtin() -> &'static ComputeRegistry {
        static BUILTIN: Lazy<ComputeRegistry> = Lazy::new(builtin::build);
        &BUILTIN
    }
}

impl fmt::Debug for ComputeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputeRegistry")
            .field("ids", &self.fns.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Pull a required numeric input out of the mapping.
///
/// Text values are parsed; a present-but-unparseable value is an
/// [`ComputeError::InvalidInput`], an absent one a [`ComputeError::MissingInput`].
pub fn require_number(inputs: &CalcInputs, id: &str) -> Result<f64, ComputeError> {
    let value = inputs
        .get(id)
        .ok_or_else(|| ComputeError::missing_input(id))?;
    value
        .as_number()
        .ok_or_else(|| ComputeError::invalid_input(id, "expected a number"))
}

/// Pull an optional numeric input, with a default when absent or blank.
pub fn number_or(inputs: &CalcInputs, id: &str, default: f64) -> f64 {
    inputs
        .get(id)
        .and_then(CalcValue::as_number)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_coercion() {
        assert_eq!(CalcValue::Number(3.5).as_number(), Some(3.5));
        assert_eq!(CalcValue::Text(" 42 ".to_string()).as_number(), Some(42.0));
        assert_eq!(CalcValue::Text("abc".to_string()).as_number(), None);
    }

    #[test]
    fn test_require_number() {
        let mut inputs = CalcInputs::new();
        inputs.insert("a".to_string(), CalcValue::Number(1.0));
        inputs.insert("b".to_string(), CalcValue::Text("oops".to_string()));

        assert_eq!(require_number(&inputs, "a").unwrap(), 1.0);
        assert_eq!(
            require_number(&inputs, "b").unwrap_err(),
            ComputeError::invalid_input("b", "expected a number")
        );
        assert_eq!(
            require_number(&inputs, "missing").unwrap_err(),
            ComputeError::missing_input("missing")
        );
    }

    #[test]
    fn test_registry_replaces_on_reregister() {
        fn one(_: &CalcInputs) -> Result<CalcOutputs, ComputeError> {
            Ok(CalcOutputs::from([("x".to_string(), 1.0)]))
        }
        fn two(_: &CalcInputs) -> Result<CalcOutputs, ComputeError> {
            Ok(CalcOutputs::from([("x".to_string(), 2.0)]))
        }

        let mut registry = ComputeRegistry::new();
        registry.register("calc", one);
        registry.register("calc", two);
        assert_eq!(registry.len(), 1);

        let outputs = registry.get("calc").unwrap()(&CalcInputs::new()).unwrap();
        assert_eq!(outputs["x"], 2.0);
    }

    #[test]
    fn test_builtin_registry_is_populated() {
        let registry = ComputeRegistry::builtin();
        assert!(registry.get("bmi").is_some());
        assert!(registry.get("compound-interest").is_some());
        assert!(registry.get("nope").is_none());
    }
}
