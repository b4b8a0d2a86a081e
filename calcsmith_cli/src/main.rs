//! # Calcsmith CLI
//!
//! Operator interface for the generation pass and the runtime resolver:
//!
//! - `calcsmith generate` - expand the store into the generated source tree
//! - `calcsmith check`    - validate the store without writing anything
//! - `calcsmith list`     - show every calculator with its derived names
//! - `calcsmith resolve`  - exercise the runtime resolver for one slug
//!
//! Generation failures are data defects; they print the structured error and
//! exit nonzero so CI catches a broken store before it ships.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use calcsmith_core::compute::ComputeRegistry;
use calcsmith_core::ident::{derive_identifier, COMPONENT_SUFFIX};
use calcsmith_core::page::{DefaultLayout, RecordingMetadataSink};
use calcsmith_core::resolver::{ExportMap, Resolution, SlugResolver};
use calcsmith_core::store::CalculatorStore;

#[derive(Parser)]
#[command(name = "calcsmith", about = "Declarative calculator site generator", version)]
struct Cli {
    /// Path to the descriptor store JSON; omit to use the embedded dataset
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the generation pass: components, pages, barrel, route table
    Generate {
        /// Output directory for the generated tree
        #[arg(long, default_value = "generated")]
        out: PathBuf,
    },
    /// Validate the store and report, writing nothing
    Check,
    /// List every calculator with its slug and derived identifier
    List,
    /// Resolve one slug the way the runtime would, and print the outcome
    Resolve {
        /// The URL path segment to resolve
        slug: String,
        /// Print the rendered page HTML instead of a summary
        #[arg(long)]
        html: bool,
    },
}

fn load_store(path: Option<&PathBuf>) -> anyhow::Result<CalculatorStore> {
    match path {
        Some(path) => CalculatorStore::load_from_path(path)
            .with_context(|| format!("failed to load store from {}", path.display())),
        None => CalculatorStore::load_embedded().context("failed to load embedded store"),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let store = load_store(cli.store.as_ref())?;
    let registry = ComputeRegistry::builtin();

    match cli.command {
        Command::Generate { out } => {
            let report = calcsmith_core::gen::run(&store, registry, &out)?;
            println!(
                "Generated {} files for {} calculators in {}",
                report.files_written.len(),
                report.calculators,
                out.display()
            );
        }
        Command::Check => {
            // Loading already ran the full validation; report what held up.
            println!("Store OK: {} calculators", store.len());
            for (key, info) in &store.document().categories {
                println!("  {key}: {} ({})", info.count, info.title);
            }
        }
        Command::List => {
            for descriptor in store.calculators() {
                let identifier = derive_identifier(&descriptor.slug, COMPONENT_SUFFIX)?;
                let registered = if registry.get(&descriptor.id).is_some() {
                    ""
                } else {
                    "  [no compute fn]"
                };
                println!(
                    "{:<20} {:<32} {:<12} {identifier}{registered}",
                    descriptor.id, descriptor.slug, descriptor.category
                );
            }
        }
        Command::Resolve { slug, html } => {
            let exports = ExportMap::from_store(&store, registry)?;
            let resolver = SlugResolver::new(store, exports);
            let resolution = resolver.resolve(Some(&slug));

            if html {
                let mut sink = RecordingMetadataSink::default();
                println!("{}", resolution.render(&mut sink, &DefaultLayout));
            } else {
                match resolution {
                    Resolution::Found(page) => {
                        println!("Resolved: {}", page.meta.title);
                        println!("  canonical: {}", page.meta.canonical_url);
                        for link in &page.layout.related {
                            println!("  related:   {} ({})", link.title, link.slug);
                        }
                    }
                    Resolution::NotFound { reason } => {
                        println!("Not found ({reason:?})");
                    }
                }
            }
        }
    }

    Ok(())
}
