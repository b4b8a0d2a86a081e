//! # Runtime Calculator Component
//!
//! The live, stateful form for one calculator: a mapping of input ids to the
//! values the user has entered so far, plus the most recent compute results.
//! Each rendered page owns its own instance; there is no shared state between
//! components.
//!
//! Recompute semantics are strict: every input change replaces the results
//! mapping wholesale. An output key the compute function stopped returning
//! disappears from the rendered rows; it never lingers with a stale value.
//!
//! ## Example
//!
//! ```rust
//! use calcsmith_core::component::CalculatorComponent;
//! use calcsmith_core::compute::{CalcValue, ComputeRegistry};
//! use calcsmith_core::store::CalculatorStore;
//!
//! let store = CalculatorStore::load_embedded().unwrap();
//! let descriptor = store.by_slug("percentage-calculator").unwrap().clone();
//! let calc = ComputeRegistry::builtin().get(&descriptor.id).unwrap();
//!
//! let mut component = CalculatorComponent::mount(descriptor, calc);
//! component.set_input("value", CalcValue::Number(80.0));
//! component.set_input("percent", CalcValue::Number(25.0));
//!
//! let rows = component.rendered_outputs();
//! assert_eq!(rows[0].value.as_deref(), Some("20.00"));
//! ```

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::compute::{CalcFn, CalcInputs, CalcOutputs, CalcValue, ComputeError};
use crate::descriptor::{CalculatorDescriptor, InputKind};
use crate::format::format_output;

/// Label used for the single generic error row when compute fails
const ERROR_ROW_NAME: &str = "Calculation Error";
const ERROR_ROW_VALUE: &str = "Unable to calculate. Check your inputs.";

/// One formatted output row, in descriptor order.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub id: String,
    pub name: String,
    /// Formatted value; `None` while the output has not been computed (or the
    /// last recompute omitted this key).
    pub value: Option<String>,
}

/// A mounted, interactive calculator.
#[derive(Debug, Clone)]
pub struct CalculatorComponent {
    descriptor: CalculatorDescriptor,
    calc: CalcFn,
    inputs: CalcInputs,
    /// `None` until the first input change triggers a recompute
    results: Option<Result<CalcOutputs, ComputeError>>,
}

impl CalculatorComponent {
    /// Mount a component for a descriptor with its registered compute function.
    pub fn mount(descriptor: CalculatorDescriptor, calc: CalcFn) -> Self {
        CalculatorComponent {
            descriptor,
            calc,
            inputs: CalcInputs::new(),
            results: None,
        }
    }

    /// The descriptor this component was mounted for
    pub fn descriptor(&self) -> &CalculatorDescriptor {
        &self.descriptor
    }

    /// Current input values
    pub fn inputs(&self) -> &CalcInputs {
        &self.inputs
    }

    /// Merge one changed input value, then recompute.
    ///
    /// The results mapping is replaced wholesale, never merged, so outputs the
    /// compute function no longer returns cannot survive the recompute.
    pub fn set_input(&mut self, id: impl Into<String>, value: CalcValue) {
        self.inputs.insert(id.into(), value);
        self.recompute();
    }

    fn recompute(&mut self) {
        let calc = self.calc;
        let inputs = &self.inputs;
        // Compute functions are contractually panic-free, but a registered
        // function misbehaving must not take the page down with it.
        let result = match catch_unwind(AssertUnwindSafe(|| calc(inputs))) {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    calculator = %self.descriptor.id,
                    "compute function panicked; rendering error output"
                );
                Err(ComputeError::failed("compute function panicked"))
            }
        };
        self.results = Some(result);
    }

    /// Raw results of the last recompute, if any
    pub fn results(&self) -> Option<&Result<CalcOutputs, ComputeError>> {
        self.results.as_ref()
    }

    /// Formatted output rows, one per OutputSpec in descriptor order.
    ///
    /// A failed compute collapses to a single generic error row; the
    /// underlying error never propagates past the component.
    pub fn rendered_outputs(&self) -> Vec<OutputRow> {
        match &self.results {
            Some(Err(_)) => vec![OutputRow {
                id: "error".to_string(),
                name: ERROR_ROW_NAME.to_string(),
                value: Some(ERROR_ROW_VALUE.to_string()),
            }],
            Some(Ok(outputs)) => self
                .descriptor
                .outputs
                .iter()
                .map(|spec| OutputRow {
                    id: spec.id.clone(),
                    name: spec.name.clone(),
                    value: outputs.get(&spec.id).map(|v| format_output(*v, spec)),
                })
                .collect(),
            None => self
                .descriptor
                .outputs
                .iter()
                .map(|spec| OutputRow {
                    id: spec.id.clone(),
                    name: spec.name.clone(),
                    value: None,
                })
                .collect(),
        }
    }

    /// Render the whole component as an HTML fragment: inputs in order,
    /// outputs in order, then the formula display.
    pub fn render_html(&self) -> String {
        let mut html = String::with_capacity(1024);
        html.push_str("<div class=\"calculator\">\n");

        html.push_str("  <form class=\"calculator-inputs\">\n");
        for input in &self.descriptor.inputs {
            let label = escape_html(&input.name);
            let current = self.inputs.get(&input.id).map(ToString::to_string);
            html.push_str(&format!(
                "    <label for=\"{id}\">{label}{unit}</label>\n",
                id = escape_html(&input.id),
                unit = input
                    .unit
                    .as_deref()
                    .map(|u| format!(" ({})", escape_html(u)))
                    .unwrap_or_default(),
            ));
            match input.kind {
                InputKind::Select => {
                    html.push_str(&format!(
                        "    <select id=\"{}\" name=\"{0}\">\n",
                        escape_html(&input.id)
                    ));
                    for option in &input.options {
                        let selected = if current.as_deref() == Some(option.value.as_str()) {
                            " selected"
                        } else {
                            ""
                        };
                        html.push_str(&format!(
                            "      <option value=\"{}\"{selected}>{}</option>\n",
                            escape_html(&option.value),
                            escape_html(&option.label),
                        ));
                    }
                    html.push_str("    </select>\n");
                }
                InputKind::Number | InputKind::Text => {
                    let kind = match input.kind {
                        InputKind::Number => "number",
                        _ => "text",
                    };
                    html.push_str(&format!(
                        "    <input type=\"{kind}\" id=\"{id}\" name=\"{id}\" value=\"{value}\"{placeholder}{required}>\n",
                        id = escape_html(&input.id),
                        value = current.as_deref().map(escape_html).unwrap_or_default(),
                        placeholder = input
                            .placeholder
                            .as_deref()
                            .map(|p| format!(" placeholder=\"{}\"", escape_html(p)))
                            .unwrap_or_default(),
                        required = if input.required.unwrap_or(false) {
                            " required"
                        } else {
                            ""
                        },
                    ));
                }
            }
        }
        html.push_str("  </form>\n");

        html.push_str("  <dl class=\"calculator-outputs\">\n");
        for row in self.rendered_outputs() {
            html.push_str(&format!(
                "    <dt>{}</dt><dd>{}</dd>\n",
                escape_html(&row.name),
                row.value.as_deref().map(escape_html).unwrap_or_default(),
            ));
        }
        html.push_str("  </dl>\n");

        if !self.descriptor.formula.is_empty() {
            html.push_str(&format!(
                "  <div class=\"calculator-formula\"><code>{}</code>",
                escape_html(&self.descriptor.formula)
            ));
            if !self.descriptor.formula_explanation.is_empty() {
                html.push_str(&format!(
                    "<p>{}</p>",
                    escape_html(&self.descriptor.formula_explanation)
                ));
            }
            html.push_str("</div>\n");
        }

        html.push_str("</div>\n");
        html
    }
}

/// Minimal HTML escaping for text and attribute positions
pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
