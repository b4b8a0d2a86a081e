//! # Output Formatting
//!
//! Turns raw compute results into display strings per each output's declared
//! format and precision. Formatting never fails: non-finite values render as
//! an em dash placeholder and unrecognized formats fall back to plain
//! stringification.

use crate::descriptor::{OutputFormat, OutputSpec};

/// Placeholder shown for NaN/infinite results
const NON_FINITE: &str = "\u{2014}";

/// Format a single computed value for display.
///
/// # Example
///
/// ```rust
/// use calcsmith_core::descriptor::{OutputFormat, OutputSpec};
/// use calcsmith_core::format::format_output;
///
/// let spec = OutputSpec {
///     id: "payment".into(),
///     name: "Monthly Payment".into(),
///     format: OutputFormat::Currency,
///     precision: None,
/// };
/// assert_eq!(format_output(1234.5, &spec), "$1,234.50");
/// ```
pub fn format_output(value: f64, spec: &OutputSpec) -> String {
    if !value.is_finite() {
        return NON_FINITE.to_string();
    }
    match &spec.format {
        OutputFormat::Currency => {
            let precision = spec.precision.unwrap_or(2) as usize;
            let formatted = group_thousands(&format!("{:.*}", precision, value.abs()));
            if value < 0.0 {
                format!("-${formatted}")
            } else {
                format!("${formatted}")
            }
        }
        OutputFormat::Decimal => {
            let precision = spec.precision.unwrap_or(2) as usize;
            format!("{value:.precision$}")
        }
        OutputFormat::Number => {
            let precision = spec.precision.unwrap_or(0) as usize;
            let mut raw = format!("{value:.precision$}");
            // An explicit precision is a maximum, not a fixed width: trim
            // trailing zeros (and a dangling '.') so "1234.50" reads "1,234.5".
            if spec.precision.is_some() && raw.contains('.') {
                raw.truncate(raw.trim_end_matches('0').trim_end_matches('.').len());
            }
            if raw.starts_with('-') {
                format!("-{}", group_thousands(&raw[1..]))
            } else {
                group_thousands(&raw)
            }
        }
        OutputFormat::Raw(_) => value.to_string(),
    }
}

/// Insert `,` separators into the integer part of an already-formatted
/// non-negative decimal string.
fn group_thousands(s: &str) -> String {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(s.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    if let Some(f) = frac_part {
        grouped.push('.');
        grouped.push_str(f);
    }
    grouped
}
