//! # Generation Pass
//!
//! The one-shot batch process that expands the descriptor store into the
//! generated source tree:
//!
//! ```text
//! <out>/
//! ├── components/<Identifier>Component.rs   (one per calculator)
//! ├── components/mod.rs                     (barrel + identifier map)
//! ├── pages/<Identifier>Page.rs             (one per calculator)
//! ├── pages/mod.rs
//! └── routes.rs                             (path -> page table)
//! ```
//!
//! The contract is all-or-nothing: every unit is synthesized in memory before
//! the first byte hits disk, so a fatal error leaves the output directory
//! untouched. Writes are atomic per file (temp file, sync, rename) so an
//! interrupted pass never leaves a half-written unit behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::compute::ComputeRegistry;
use crate::errors::{SiteError, SiteResult};
use crate::store::CalculatorStore;
use crate::synth::{
    aggregate, aggregate_pages, synthesize_component, synthesize_page, synthesize_routes,
    DerivedNames, SourceUnit,
};

/// Summary of one completed generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Paths written, relative to the output directory
    pub files_written: Vec<PathBuf>,
    /// Number of calculators expanded
    pub calculators: usize,
}

/// Run the full generation pass into `out_dir`.
///
/// The registry is only consulted for drift diagnostics: a calculator in the
/// store with no registered compute function (or the reverse) is logged as a
/// warning, not treated as fatal, since the mismatch surfaces as a defined
/// not-found branch at runtime rather than a broken build.
pub fn run(
    store: &CalculatorStore,
    registry: &ComputeRegistry,
    out_dir: &Path,
) -> SiteResult<GenerationReport> {
    warn_on_registry_drift(store, registry);

    // Synthesize everything before touching the filesystem.
    let mut entries = Vec::with_capacity(store.len());
    for descriptor in store.calculators() {
        entries.push((DerivedNames::for_descriptor(descriptor)?, descriptor));
    }

    let mut units: Vec<(PathBuf, SourceUnit)> = Vec::with_capacity(store.len() * 2 + 3);
    for descriptor in store.calculators() {
        let component = synthesize_component(descriptor)?;
        units.push((Path::new("components").join(&component.file_name), component));
        let page = synthesize_page(descriptor, store)?;
        units.push((Path::new("pages").join(&page.file_name), page));
    }
    let barrel = aggregate(&entries)?;
    units.push((Path::new("components").join(&barrel.file_name), barrel));
    let pages_barrel = aggregate_pages(&entries)?;
    units.push((Path::new("pages").join(&pages_barrel.file_name), pages_barrel));
    let routes = synthesize_routes(store)?;
    units.push((PathBuf::from(&routes.file_name), routes));

    for dir in ["components", "pages"] {
        let path = out_dir.join(dir);
        fs::create_dir_all(&path).map_err(|e| {
            SiteError::file_error("create dir", path.display().to_string(), e.to_string())
        })?;
    }

    let mut files_written = Vec::with_capacity(units.len());
    for (rel_path, unit) in &units {
        write_atomic(&out_dir.join(rel_path), &unit.contents)?;
        files_written.push(rel_path.clone());
    }

    tracing::info!(
        calculators = store.len(),
        files = files_written.len(),
        out = %out_dir.display(),
        "generation pass complete"
    );

    Ok(GenerationReport {
        files_written,
        calculators: store.len(),
    })
}

/// Log convention drift between the store and the compute registry.
///
/// Both directions matter: a store entry without a function means a page that
/// can never calculate; a registered function without a store entry means
/// dead arithmetic nobody can reach.
fn warn_on_registry_drift(store: &CalculatorStore, registry: &ComputeRegistry) {
    for descriptor in store.calculators() {
        if registry.get(&descriptor.id).is_none() {
            tracing::warn!(
                calculator = %descriptor.id,
                "store descriptor has no registered compute function"
            );
        }
    }
    for id in registry.ids() {
        if store.by_id(id).is_none() {
            tracing::warn!(
                calculator = %id,
                "registered compute function has no store descriptor"
            );
        }
    }
}

/// Write one file atomically: temp file in the same directory, sync, rename.
fn write_atomic(path: &Path, contents: &str) -> SiteResult<()> {
    let tmp_path = path.with_extension("rs.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        SiteError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    tmp_file.write_all(contents.as_bytes()).map_err(|e| {
        SiteError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    tmp_file.sync_all().map_err(|e| {
        SiteError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up temp file if rename fails
        let _ = fs::remove_file(&tmp_path);
        SiteError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn read_tree(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut tree = BTreeMap::new();
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(&dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    stack.push(path);
                } else {
                    let rel = path.strip_prefix(root).unwrap().to_path_buf();
                    tree.insert(rel, fs::read(&path).unwrap());
                }
            }
        }
        tree
    }

    #[test]
    fn test_pass_writes_expected_tree() {
        let store = CalculatorStore::load_embedded().unwrap();
        let out = tempfile::tempdir().unwrap();

        let report = run(&store, ComputeRegistry::builtin(), out.path()).unwrap();
        assert_eq!(report.calculators, store.len());
        // 2 files per calculator + 2 barrels + routes
        assert_eq!(report.files_written.len(), store.len() * 2 + 3);

        assert!(out.path().join("components/mod.rs").exists());
        assert!(out.path().join("components/BmiComponent.rs").exists());
        assert!(out.path().join("pages/BmiPage.rs").exists());
        assert!(out.path().join("routes.rs").exists());
    }

    #[test]
    fn test_pass_is_idempotent() {
        let store = CalculatorStore::load_embedded().unwrap();
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();

        run(&store, ComputeRegistry::builtin(), first.path()).unwrap();
        run(&store, ComputeRegistry::builtin(), second.path()).unwrap();

        // Byte-identical trees
        assert_eq!(read_tree(first.path()), read_tree(second.path()));
    }

    #[test]
    fn test_rerun_over_existing_output_is_stable() {
        let store = CalculatorStore::load_embedded().unwrap();
        let out = tempfile::tempdir().unwrap();

        run(&store, ComputeRegistry::builtin(), out.path()).unwrap();
        let before = read_tree(out.path());
        run(&store, ComputeRegistry::builtin(), out.path()).unwrap();
        assert_eq!(before, read_tree(out.path()));
    }
}
