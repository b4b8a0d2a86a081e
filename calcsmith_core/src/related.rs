//! # Related-Calculator Resolution
//!
//! One policy, used identically at generation time (page synthesis) and at
//! request time (the slug resolver): the explicit `related` list unioned with
//! same-category siblings, self excluded, deduplicated preserving order with
//! explicit entries first, capped to a small fixed count.
//!
//! Dangling `related` references are dropped here, silently. A missing
//! cross-reference is a content defect worth tolerating; a failed build over
//! one is not.

use std::collections::BTreeSet;

use crate::descriptor::CalculatorDescriptor;
use crate::page::RelatedLink;
use crate::store::CalculatorStore;

/// Default cap on the related-calculators rail
pub const RELATED_CAP: usize = 4;

/// Resolve the related list for one descriptor against the store.
///
/// Explicit `related` entries match by `id` or `slug`. Entries that resolve
/// nowhere are filtered out; category siblings fill any remaining slots in
/// store order.
pub fn resolve_related(
    descriptor: &CalculatorDescriptor,
    store: &CalculatorStore,
    cap: usize,
) -> Vec<RelatedLink> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    seen.insert(descriptor.slug.as_str());
    let mut links = Vec::with_capacity(cap);

    let explicit = descriptor
        .related
        .iter()
        .filter_map(|key| store.by_id(key).or_else(|| store.by_slug(key)));
    let siblings = store
        .calculators()
        .iter()
        .filter(|c| c.category == descriptor.category);

    for candidate in explicit.chain(siblings) {
        if links.len() >= cap {
            break;
        }
        if seen.insert(candidate.slug.as_str()) {
            links.push(RelatedLink {
                title: candidate.title.clone(),
                slug: candidate.slug.clone(),
            });
        }
    }
    links
}
