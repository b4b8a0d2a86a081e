//! Per-calculator component unit emission.
//!
//! Each unit is a self-contained module: the descriptor is embedded as JSON,
//! the compute function is bound from the builtin registry by calculator id,
//! and `mount()` hands back a fresh [`crate::component::CalculatorComponent`]
//! that owns its own state. Nothing in the unit depends on any other generated file.

use crate::descriptor::CalculatorDescriptor;
use crate::errors::{SiteError, SiteResult};
use crate::synth::{raw_str, rust_str, DerivedNames, SourceUnit};

/// Emit the component module for one descriptor.
///
/// The file is named `<identifier>.rs` where the identifier derives from the
/// calculator `id` with the `"Component"` suffix.
pub fn synthesize_component(descriptor: &CalculatorDescriptor) -> SiteResult<SourceUnit> {
    let names = DerivedNames::for_descriptor(descriptor)?;
    let descriptor_json = serde_json::to_string_pretty(descriptor)
        .map_err(|e| SiteError::Internal {
            message: format!("descriptor '{}' failed to serialize: {e}", descriptor.id),
        })?;

    let mut out = String::with_capacity(descriptor_json.len() + 1024);
    out.push_str(&format!(
        "{header}\n//\n// {id} - {title}\n\n",
        header = super::GENERATED_HEADER,
        id = descriptor.id,
        title = descriptor.title,
    ));
    out.push_str("use calcsmith_core::component::CalculatorComponent;\n");
    out.push_str("use calcsmith_core::compute::ComputeRegistry;\n");
    out.push_str("use calcsmith_core::descriptor::CalculatorDescriptor;\n\n");
    out.push_str(&format!(
        "/// {title}\n///\n/// {short}\npub struct {ty};\n\n",
        title = descriptor.title,
        short = if descriptor.short_description.is_empty() {
            descriptor.description.as_str()
        } else {
            descriptor.short_description.as_str()
        },
        ty = names.type_ident,
    ));
    out.push_str(&format!("impl {ty} {{\n", ty = names.type_ident));
    out.push_str(&format!(
        "    pub const ID: &'static str = {};\n",
        rust_str(&descriptor.id)
    ));
    out.push_str(&format!(
        "    pub const SLUG: &'static str = {};\n\n",
        rust_str(&descriptor.slug)
    ));
    out.push_str(&format!(
        "    const DESCRIPTOR_JSON: &'static str = {};\n\n",
        raw_str(&descriptor_json)
    ));
    out.push_str(concat!(
        "    /// Mount a fresh component instance. Each caller owns its state.\n",
        "    pub fn mount() -> CalculatorComponent {\n",
        "        let descriptor: CalculatorDescriptor =\n",
        "            serde_json::from_str(Self::DESCRIPTOR_JSON)\n",
        "                .expect(\"generated descriptor is valid by construction\");\n",
        "        let calc = ComputeRegistry::builtin()\n",
        "            .get(Self::ID)\n",
        "            .expect(\"compute function registered for generated calculator\");\n",
        "        CalculatorComponent::mount(descriptor, calc)\n",
        "    }\n",
        "}\n",
    ));

    Ok(SourceUnit {
        file_name: format!("{}.rs", names.type_ident),
        contents: out,
    })
}
