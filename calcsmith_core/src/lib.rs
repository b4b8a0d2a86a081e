//! # calcsmith_core - Declarative Calculator Site Engine
//!
//! `calcsmith_core` turns a single structured dataset describing every
//! calculator on a content site into generated source units and a runtime
//! dispatch map. One descriptor per calculator drives everything: the
//! interactive component, the page wrapper, the barrel module, the route
//! table, and the request-time slug lookup.
//!
//! ## Design Philosophy
//!
//! - **One transformation, reused everywhere**: the slug-to-identifier
//!   derivation lives in exactly one pure function ([`ident`]), called by
//!   both the generators and the runtime resolver, so the two sides cannot
//!   drift.
//! - **All-or-nothing generation**: the store is fully validated at load and
//!   every unit is synthesized in memory before the first write; a broken
//!   store fails the build instead of silently dropping a calculator.
//! - **Defined failure branches**: runtime resolution misses (unknown slug,
//!   stale generated output, a misbehaving compute function) render a
//!   not-found or error state; nothing propagates past the page boundary.
//!
//! ## Quick Start
//!
//! ```rust
//! use calcsmith_core::compute::ComputeRegistry;
//! use calcsmith_core::resolver::{ExportMap, SlugResolver};
//! use calcsmith_core::store::CalculatorStore;
//!
//! let store = CalculatorStore::load_embedded().unwrap();
//! let exports = ExportMap::from_store(&store, ComputeRegistry::builtin()).unwrap();
//! let resolver = SlugResolver::new(store, exports);
//! ```
//!
//! ## Modules
//!
//! - [`descriptor`] - Calculator descriptor schema and store document types
//! - [`store`] - Store loading and build-fatal validation
//! - [`ident`] - The canonical slug/id to identifier transformation
//! - [`compute`] - Pure compute functions, keyed by calculator id
//! - [`format`] - Output value formatting (currency, decimal, number)
//! - [`component`] - The runtime interactive component
//! - [`synth`] - Component/page/barrel/route source emission
//! - [`gen`] - The one-shot generation pass (atomic writes)
//! - [`related`] - Related-calculator resolution policy
//! - [`page`] - Metadata and layout collaborator seams
//! - [`resolver`] - Request-time slug resolution
//! - [`errors`] - Structured error types

pub mod component;
pub mod compute;
pub mod descriptor;
pub mod errors;
pub mod format;
pub mod gen;
pub mod ident;
pub mod page;
pub mod related;
pub mod resolver;
pub mod store;
pub mod synth;

// Re-export commonly used types at crate root for convenience
pub use descriptor::CalculatorDescriptor;
pub use errors::{SiteError, SiteResult};
pub use ident::derive_identifier;
pub use resolver::{ExportMap, Resolution, SlugResolver};
pub use store::CalculatorStore;
