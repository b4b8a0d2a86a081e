//! # Runtime Slug Resolver
//!
//! The request-time half of the system. An incoming URL slug is re-derived
//! through the exact same [`crate::ident::derive_identifier`] the generators
//! used, then looked up in the export map. This is the only place where
//! generation-time and request-time logic must stay in lock-step, and the
//! lookup is an explicit map built once at startup so a violated convention
//! is a defined not-found branch, never an undefined-name error.
//!
//! Three ways to miss, one way to hit:
//! 1. no slug on the request -> not found
//! 2. slug not in the store -> not found
//! 3. slug in the store but its derived identifier absent from the export
//!    map (generator not re-run, or function never registered) -> logged
//!    diagnostic, not found
//! 4. otherwise -> the mounted component, wrapped in layout context
//!
//! ## Example
//!
//! ```rust
//! use calcsmith_core::compute::ComputeRegistry;
//! use calcsmith_core::resolver::{ExportMap, Resolution, SlugResolver};
//! use calcsmith_core::store::CalculatorStore;
//!
//! let store = CalculatorStore::load_embedded().unwrap();
//! let exports = ExportMap::from_store(&store, ComputeRegistry::builtin()).unwrap();
//! let resolver = SlugResolver::new(store, exports);
//!
//! assert!(matches!(resolver.resolve(Some("bmi-calculator")), Resolution::Found(_)));
//! assert!(matches!(resolver.resolve(Some("does-not-exist")), Resolution::NotFound { .. }));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::component::CalculatorComponent;
use crate::compute::ComputeRegistry;
use crate::errors::{SiteError, SiteResult};
use crate::ident::{derive_identifier, COMPONENT_SUFFIX};
use crate::page::{Layout, LayoutContext, MetadataSink, PageMeta};
use crate::related::{resolve_related, RELATED_CAP};
use crate::store::CalculatorStore;

/// Constructor for one component, keyed by derived identifier.
pub type ComponentCtor = Box<dyn Fn() -> CalculatorComponent + Send + Sync>;

/// The explicit identifier -> component-constructor map.
///
/// In the generated site this is what the barrel module's `component_map()`
/// produces; [`ExportMap::from_store`] builds the equivalent map in-process
/// from the store and a compute registry.
#[derive(Default)]
pub struct ExportMap {
    map: BTreeMap<String, ComponentCtor>,
    /// Raw key (slug) each identifier was derived from, for collision diagnostics
    sources: BTreeMap<String, String>,
}

impl ExportMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one component constructor under its identifier, recording the
    /// raw key (slug) it was derived from.
    ///
    /// Duplicate identifiers are rejected: the resolver depends on a total,
    /// injective mapping from identifier to component. The error names both
    /// colliding source keys so the operator can find the descriptors.
    pub fn insert(
        &mut self,
        identifier: impl Into<String>,
        source: impl Into<String>,
        ctor: ComponentCtor,
    ) -> SiteResult<()> {
        let identifier = identifier.into();
        let source = source.into();
        if let Some(first) = self.sources.get(&identifier) {
            return Err(SiteError::duplicate_identifier(
                identifier,
                first.clone(),
                source,
            ));
        }
        self.sources.insert(identifier.clone(), source);
        self.map.insert(identifier, ctor);
        Ok(())
    }

    /// Build the map from a validated store and a compute registry.
    ///
    /// Descriptors whose id has no registered compute function are skipped
    /// with a warning; at resolution time they surface as the
    /// [`NotFoundReason::MissingComponent`] branch, mirroring a generated
    /// barrel that predates the descriptor.
    pub fn from_store(store: &CalculatorStore, registry: &ComputeRegistry) -> SiteResult<Self> {
        let mut exports = ExportMap::new();
        for descriptor in store.calculators() {
            let identifier = derive_identifier(&descriptor.slug, COMPONENT_SUFFIX)?;
            let Some(calc) = registry.get(&descriptor.id) else {
                tracing::warn!(
                    calculator = %descriptor.id,
                    identifier = %identifier,
                    "no compute function registered; component left out of export map"
                );
                continue;
            };
            let descriptor = descriptor.clone();
            let slug = descriptor.slug.clone();
            exports.insert(
                identifier,
                slug,
                Box::new(move || CalculatorComponent::mount(descriptor.clone(), calc)),
            )?;
        }
        Ok(exports)
    }

    /// Mount a fresh component for an identifier, if present
    pub fn mount(&self, identifier: &str) -> Option<CalculatorComponent> {
        self.map.get(identifier).map(|ctor| ctor())
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.map.contains_key(identifier)
    }

    /// All identifiers, in sorted order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for ExportMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportMap")
            .field("identifiers", &self.map.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Why a resolution missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// The request carried no slug at all
    MissingSlug,
    /// The slug matches no descriptor in the store
    UnknownSlug,
    /// The store knows the slug but the export map lacks its identifier
    MissingComponent,
}

/// A successfully resolved calculator page.
pub struct ResolvedPage {
    /// Freshly mounted component; the caller owns its state
    pub component: CalculatorComponent,
    pub meta: PageMeta,
    pub layout: LayoutContext,
}

/// Terminal outcome of one resolution.
pub enum Resolution {
    NotFound { reason: NotFoundReason },
    Found(Box<ResolvedPage>),
}

impl Resolution {
    /// Render the outcome to HTML: the calculator page, or the not-found
    /// page. Never panics, never returns an error to the page boundary.
    pub fn render(&self, sink: &mut dyn MetadataSink, layout: &dyn Layout) -> String {
        match self {
            Resolution::NotFound { .. } => {
                "<main class=\"not-found\"><h1>Calculator Not Found</h1>\
                 <p>The calculator you are looking for does not exist.</p></main>\n"
                    .to_string()
            }
            Resolution::Found(page) => {
                sink.set_page_meta(&page.meta);
                layout.render_calculator_layout(&page.layout, &page.component.render_html())
            }
        }
    }
}

/// Resolves URL slugs to mounted components. Built once at startup.
pub struct SlugResolver {
    store: CalculatorStore,
    exports: ExportMap,
}

impl SlugResolver {
    pub fn new(store: CalculatorStore, exports: ExportMap) -> Self {
        SlugResolver { store, exports }
    }

    /// The backing store (category listings, etc.)
    pub fn store(&self) -> &CalculatorStore {
        &self.store
    }

    /// Resolve one navigation to a calculator URL.
    pub fn resolve(&self, slug: Option<&str>) -> Resolution {
        let Some(slug) = slug.filter(|s| !s.is_empty()) else {
            return Resolution::NotFound {
                reason: NotFoundReason::MissingSlug,
            };
        };

        let Some(descriptor) = self.store.by_slug(slug) else {
            return Resolution::NotFound {
                reason: NotFoundReason::UnknownSlug,
            };
        };

        // Same derivation the generators used; an invalid slug cannot reach
        // here because store validation already rejected it.
        let identifier = match derive_identifier(slug, COMPONENT_SUFFIX) {
            Ok(identifier) => identifier,
            Err(e) => {
                tracing::error!(slug = %slug, error = %e, "slug failed identifier derivation");
                return Resolution::NotFound {
                    reason: NotFoundReason::MissingComponent,
                };
            }
        };

        let Some(component) = self.exports.mount(&identifier) else {
            tracing::error!(
                slug = %slug,
                expected = %identifier,
                "descriptor present but component missing from export map; \
                 was the generator re-run after the store changed?"
            );
            return Resolution::NotFound {
                reason: NotFoundReason::MissingComponent,
            };
        };

        Resolution::Found(Box::new(ResolvedPage {
            component,
            meta: PageMeta {
                title: descriptor.title.clone(),
                description: descriptor.meta_description.clone(),
                keywords: descriptor.seo_keywords.clone(),
                canonical_url: format!("/calculators/{}", descriptor.slug),
            },
            layout: LayoutContext {
                title: descriptor.title.clone(),
                description: descriptor.description.clone(),
                related: resolve_related(descriptor, &self.store, RELATED_CAP),
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{DefaultLayout, RecordingMetadataSink};

    fn embedded_resolver() -> SlugResolver {
        let store = CalculatorStore::load_embedded().unwrap();
        let exports = ExportMap::from_store(&store, ComputeRegistry::builtin()).unwrap();
        SlugResolver::new(store, exports)
    }

    #[test]
    fn test_round_trip_dispatch_for_every_descriptor() {
        let resolver = embedded_resolver();
        for descriptor in resolver.store().calculators().to_vec() {
            match resolver.resolve(Some(&descriptor.slug)) {
                Resolution::Found(page) => {
                    assert_eq!(page.component.descriptor().id, descriptor.id);
                    assert_eq!(page.meta.canonical_url, format!("/calculators/{}", descriptor.slug));
                }
                Resolution::NotFound { reason } => {
                    panic!("'{}' failed to resolve: {reason:?}", descriptor.slug)
                }
            }
        }
    }

    #[test]
    fn test_missing_and_unknown_slugs() {
        let resolver = embedded_resolver();
        assert!(matches!(
            resolver.resolve(None),
            Resolution::NotFound {
                reason: NotFoundReason::MissingSlug
            }
        ));
        assert!(matches!(
            resolver.resolve(Some("")),
            Resolution::NotFound {
                reason: NotFoundReason::MissingSlug
            }
        ));
        assert!(matches!(
            resolver.resolve(Some("does-not-exist")),
            Resolution::NotFound {
                reason: NotFoundReason::UnknownSlug
            }
        ));
    }

    #[test]
    fn test_store_export_mismatch_is_defined_branch() {
        // A registry missing one function models a stale generated barrel
        let store = CalculatorStore::load_embedded().unwrap();
        let mut registry = ComputeRegistry::builtin().clone();
        let mut partial = ComputeRegistry::new();
        for id in registry.ids() {
            if id != "bmi" {
                partial.register(id, registry.get(id).unwrap());
            }
        }
        registry = partial;

        let exports = ExportMap::from_store(&store, &registry).unwrap();
        let resolver = SlugResolver::new(store, exports);

        assert!(matches!(
            resolver.resolve(Some("bmi-calculator")),
            Resolution::NotFound {
                reason: NotFoundReason::MissingComponent
            }
        ));
        // Everything else still resolves
        assert!(matches!(
            resolver.resolve(Some("tip-calculator")),
            Resolution::Found(_)
        ));
    }

    #[test]
    fn test_duplicate_insert_names_both_sources() {
        let store = CalculatorStore::load_embedded().unwrap();
        let descriptor = store.by_slug("tip-calculator").unwrap().clone();
        let calc = ComputeRegistry::builtin().get(&descriptor.id).unwrap();

        let mut exports = ExportMap::new();
        let first = descriptor.clone();
        exports
            .insert(
                "TipCalculatorComponent",
                "tip-calculator",
                Box::new(move || CalculatorComponent::mount(first.clone(), calc)),
            )
            .unwrap();

        let second = descriptor.clone();
        let err = exports
            .insert(
                "TipCalculatorComponent",
                "tip-alias",
                Box::new(move || CalculatorComponent::mount(second.clone(), calc)),
            )
            .unwrap_err();

        // Both colliding slugs appear in the diagnostic, not the identifier
        // repeated three times
        assert_eq!(
            err,
            SiteError::duplicate_identifier("TipCalculatorComponent", "tip-calculator", "tip-alias")
        );
    }

    #[test]
    fn test_render_never_throws() {
        let resolver = embedded_resolver();
        let mut sink = RecordingMetadataSink::default();

        let html = resolver
            .resolve(Some("does-not-exist"))
            .render(&mut sink, &DefaultLayout);
        assert!(html.contains("Calculator Not Found"));
        assert!(sink.pages.is_empty());

        let html = resolver
            .resolve(Some("percentage-calculator"))
            .render(&mut sink, &DefaultLayout);
        assert!(html.contains("Percentage Calculator"));
        assert_eq!(sink.pages.len(), 1);
        assert_eq!(
            sink.pages[0].canonical_url,
            "/calculators/percentage-calculator"
        );
    }

    #[test]
    fn test_found_page_carries_related_rail() {
        let resolver = embedded_resolver();
        match resolver.resolve(Some("bmi-calculator")) {
            Resolution::Found(page) => {
                assert!(page.layout.related.iter().any(|l| l.slug == "bmr-calculator"));
                assert!(page.layout.related.iter().all(|l| l.slug != "bmi-calculator"));
            }
            Resolution::NotFound { .. } => panic!("bmi should resolve"),
        }
    }
}
