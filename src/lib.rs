//! catalogkit - Product catalog import tooling
//!
//! This crate prepares product data for bulk import into a catalog service:
//!
//! - **Enrichment**: reads a supplier spreadsheet (XLSX/XLS/ODS or CSV), fills in
//!   descriptions, product types, technical specs and image URLs (OpenAI and
//!   Unsplash when credentials are available, a keyword table otherwise), and
//!   writes an import-ready XLSX or CSV file with a summary.
//! - **Templates**: generates the bulk-import template (example rows, category
//!   catalog and instructions) as one XLSX workbook or a set of CSV files.
//! - **Category catalog**: parses the category `INSERT` statement into a tree
//!   with levels, breadcrumb paths and slugs.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use catalogkit::{EnrichmentBuilder, Settings};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credentials are read from the environment (and `.env`)
//!     let enrichment = EnrichmentBuilder::new()
//!         .with_settings(Settings::from_env())
//!         .build()?;
//!
//!     // `.csv` output writes a sibling `_resumen.csv` as well
//!     enrichment.run_file(
//!         Path::new("productos.xlsx"),
//!         Path::new("productos_enriquecidos.xlsx"),
//!     )?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Import Template
//!
//! ```rust,no_run
//! use std::path::Path;
//! use catalogkit::{OutputFormat, TemplateBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = TemplateBuilder::new()
//!         .with_output_format(OutputFormat::Csv)
//!         .build()?;
//!
//!     for path in generator.generate(Path::new("templates"))? {
//!         println!("{}", path.display());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Category Catalog
//!
//! ```rust
//! use catalogkit::catalog::default_tree;
//!
//! let tree = default_tree();
//! let first = &tree.entries()[0];
//! assert_eq!(first.level, 0);
//! assert_eq!(first.slug, "refacciones");
//! ```

mod api;
mod builder;
mod error;
mod slug;
mod specs;
mod types;

pub mod catalog;
pub mod config;
pub mod enrich;
pub mod input;
pub mod output;
pub mod report;
pub mod sql;
pub mod template;

// 公開API
pub use api::{InputFormat, OutputFormat, ProductType, UnknownProductType};
pub use builder::{EnrichmentBuilder, ProductEnrichment, TemplateBuilder, TemplateGenerator};
pub use config::{InputLimits, Settings, SheetStyle};
pub use error::CatalogError;
pub use report::EnrichmentReport;
pub use slug::slugify;
pub use specs::TechnicalSpecs;
pub use types::{CellValue, EnrichedProduct, Enrichment, InputProduct};
