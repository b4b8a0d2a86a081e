//! # Identifier Derivation
//!
//! The single canonical transformation from a human-authored kebab-case key
//! (a calculator `slug` or `id`) to a code-safe identifier. Every consumer --
//! the component synthesizer, the page synthesizer, the barrel aggregator,
//! and the runtime slug resolver -- calls [`derive_identifier`]; there is no
//! second copy of this logic anywhere, so generation-time and request-time
//! naming cannot drift.
//!
//! ## Algorithm
//!
//! 1. Split the key on `-`.
//! 2. Escape any word whose first character is a digit with a leading `_`
//!    (identifiers may not start with a digit), then uppercase the word's
//!    first character.
//! 3. Concatenate the words.
//! 4. Strip exactly one trailing `"Calculator"` so a key ending in
//!    `...-calculator` does not double up against a `Calculator*` suffix.
//! 5. Append the suffix.
//!
//! ## Example
//!
//! ```rust
//! use calcsmith_core::ident::{derive_identifier, COMPONENT_SUFFIX};
//!
//! let ident = derive_identifier("compound-interest-calculator", COMPONENT_SUFFIX).unwrap();
//! assert_eq!(ident, "CompoundInterestCalculatorComponent");
//! ```

use crate::errors::{SiteError, SiteResult};

/// Suffix for the runtime component identifier (what the resolver looks up)
pub const COMPONENT_SUFFIX: &str = "CalculatorComponent";

/// Suffix for generated component file/type names (keyed off `id`)
pub const FILE_COMPONENT_SUFFIX: &str = "Component";

/// Suffix for generated page file/type names
pub const PAGE_SUFFIX: &str = "Page";

/// Derive a code-safe identifier from a kebab-case key.
///
/// Deterministic and side-effect free; total over non-empty strings drawn
/// from `[A-Za-z0-9-]`. Anything else is an [`SiteError::InvalidKey`].
///
/// # Example
///
/// ```rust
/// use calcsmith_core::ident::derive_identifier;
///
/// // Digit-leading words get escaped so the result stays a valid identifier
/// let ident = derive_identifier("4-wheel-drive-calculator", "Component").unwrap();
/// assert_eq!(ident, "_4WheelDriveComponent");
/// ```
pub fn derive_identifier(raw_key: &str, suffix: &str) -> SiteResult<String> {
    validate_key(raw_key)?;

    let mut joined = String::with_capacity(raw_key.len() + suffix.len());
    for word in raw_key.split('-') {
        let mut chars = word.chars();
        let Some(first) = chars.next() else {
            // Empty word from "--" or a leading/trailing "-"; nothing to emit.
            continue;
        };
        if first.is_ascii_digit() {
            joined.push('_');
            joined.push(first);
        } else {
            joined.push(first.to_ascii_uppercase());
        }
        joined.push_str(chars.as_str());
    }

    // Strip exactly one trailing "Calculator" before appending the suffix,
    // so "loan-calculator" + "CalculatorComponent" does not come out as
    // "LoanCalculatorCalculatorComponent".
    let base = joined
        .strip_suffix("Calculator")
        .unwrap_or(joined.as_str());

    let mut ident = String::with_capacity(base.len() + suffix.len());
    ident.push_str(base);
    ident.push_str(suffix);
    Ok(ident)
}

/// Check a raw key against the deriver's precondition.
///
/// Exposed separately so store validation can reject bad keys with a precise
/// error before any synthesis starts.
pub fn validate_key(raw_key: &str) -> SiteResult<()> {
    if raw_key.is_empty() {
        return Err(SiteError::invalid_key(raw_key, "key must not be empty"));
    }
    if let Some(bad) = raw_key
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
    {
        return Err(SiteError::invalid_key(
            raw_key,
            format!("character '{bad}' is outside [A-Za-z0-9-]"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_basic_derivation() {
        assert_eq!(
            derive_identifier("mortgage-payment", COMPONENT_SUFFIX).unwrap(),
            "MortgagePaymentCalculatorComponent"
        );
        assert_eq!(
            derive_identifier("bmi", PAGE_SUFFIX).unwrap(),
            "BmiPage"
        );
    }

    #[test]
    fn test_trailing_calculator_not_doubled() {
        assert_eq!(
            derive_identifier("loan-calculator", COMPONENT_SUFFIX).unwrap(),
            "LoanCalculatorComponent"
        );
        // Only one trailing occurrence is stripped
        assert_eq!(
            derive_identifier("calculator-calculator", FILE_COMPONENT_SUFFIX).unwrap(),
            "CalculatorComponent"
        );
    }

    #[test]
    fn test_digit_leading_word_is_escaped() {
        let ident = derive_identifier("4-wheel-drive-calculator", FILE_COMPONENT_SUFFIX).unwrap();
        assert_eq!(ident, "_4WheelDriveComponent");
        assert!(ident.starts_with("_4Wheel"));
    }

    #[test]
    fn test_mid_word_digits_left_alone() {
        assert_eq!(
            derive_identifier("base64-encoder", FILE_COMPONENT_SUFFIX).unwrap(),
            "Base64EncoderComponent"
        );
    }

    #[test]
    fn test_invalid_keys_rejected() {
        assert!(derive_identifier("", COMPONENT_SUFFIX).is_err());
        assert!(derive_identifier("has space", COMPONENT_SUFFIX).is_err());
        assert!(derive_identifier("unter_score", COMPONENT_SUFFIX).is_err());
        assert!(derive_identifier("emoji-🙂", COMPONENT_SUFFIX).is_err());
    }

    #[test]
    fn test_collapsed_separators() {
        assert_eq!(
            derive_identifier("a--b", FILE_COMPONENT_SUFFIX).unwrap(),
            "ABComponent"
        );
    }

    proptest! {
        /// Same key, same suffix, same output. Twice.
        #[test]
        fn prop_deterministic(key in "[a-z0-9]{1,12}(-[a-z0-9]{1,12}){0,4}") {
            let a = derive_identifier(&key, COMPONENT_SUFFIX).unwrap();
            let b = derive_identifier(&key, COMPONENT_SUFFIX).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Output is always a valid identifier: starts with a letter or
        /// underscore, contains only word characters.
        #[test]
        fn prop_output_is_identifier_safe(key in "[a-zA-Z0-9]{1,12}(-[a-zA-Z0-9]{1,12}){0,4}") {
            let ident = derive_identifier(&key, FILE_COMPONENT_SUFFIX).unwrap();
            let mut chars = ident.chars();
            let first = chars.next().unwrap();
            prop_assert!(first == '_' || first.is_ascii_alphabetic());
            prop_assert!(chars.all(|c| c == '_' || c.is_ascii_alphanumeric()));
        }

        /// Keys differing only by a trailing "-calculator" word map to the
        /// same component identifier; anything else distinct stays distinct
        /// when the words themselves differ by more than case.
        #[test]
        fn prop_calculator_suffix_is_canonical(base in "[a-z]{1,10}(-[a-z]{1,10}){0,3}") {
            // A base already ending in "calculator" strips in the plain form
            // too, which is the doubled-word case tested separately above.
            prop_assume!(!base.ends_with("calculator"));
            let with = format!("{base}-calculator");
            let plain = derive_identifier(&base, COMPONENT_SUFFIX).unwrap();
            let suffixed = derive_identifier(&with, COMPONENT_SUFFIX).unwrap();
            prop_assert_eq!(plain, suffixed);
        }
    }
}
