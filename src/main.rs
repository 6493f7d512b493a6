//! catalogkit command line interface
//!
//! # Usage
//!
//! ```bash
//! # Enrich a supplier spreadsheet (OpenAI/Unsplash when keys are configured)
//! catalogkit enrich --input productos.xlsx --output productos_enriquecidos.xlsx
//!
//! # Keyword-only enrichment to CSV (also writes productos_resumen.csv)
//! catalogkit enrich --input productos.csv --output productos.csv --no-ai --no-images
//!
//! # Generate the bulk-import template
//! catalogkit template --format csv --out-dir templates
//!
//! # Inspect the parsed category catalog
//! catalogkit categories > categorias.csv
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalogkit::catalog::{CategoryTree, DEFAULT_CATEGORIES_SQL};
use catalogkit::output::Sheet;
use catalogkit::template::categories_sheet;
use catalogkit::{
    CatalogError, CellValue, EnrichmentBuilder, OutputFormat, Settings, TemplateBuilder,
};

#[derive(Parser)]
#[command(name = "catalogkit")]
#[command(version)]
#[command(about = "Product catalog enrichment and bulk-import template generation")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich products from a spreadsheet or CSV file
    Enrich {
        /// Input file (xlsx, xls, ods or csv)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (.csv writes CSV plus a `_resumen.csv` summary)
        #[arg(short, long, default_value = "productos_enriquecidos.xlsx")]
        output: PathBuf,

        /// OpenAI API key (overrides OPENAI_API_KEY)
        #[arg(long)]
        openai_key: Option<String>,

        /// Unsplash access key (overrides UNSPLASH_ACCESS_KEY)
        #[arg(long)]
        unsplash_key: Option<String>,

        /// Use keyword enrichment only
        #[arg(long)]
        no_ai: bool,

        /// Skip image search
        #[arg(long)]
        no_images: bool,

        /// OpenAI model (overrides OPENAI_MODEL)
        #[arg(long)]
        model: Option<String>,
    },

    /// Generate the bulk-import template
    Template {
        /// Output format
        #[arg(short, long, default_value = "xlsx", value_enum)]
        format: TemplateFormat,

        /// Output directory
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Category INSERT statement (defaults to the built-in catalog)
        #[arg(long)]
        categories_sql: Option<PathBuf>,
    },

    /// Print the parsed category catalog as CSV
    Categories {
        /// Category INSERT statement (defaults to the built-in catalog)
        #[arg(long)]
        categories_sql: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TemplateFormat {
    Xlsx,
    Csv,
}

impl From<TemplateFormat> for OutputFormat {
    fn from(format: TemplateFormat) -> Self {
        match format {
            TemplateFormat::Xlsx => OutputFormat::Xlsx,
            TemplateFormat::Csv => OutputFormat::Csv,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalogkit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            handle_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Enrich {
            input,
            output,
            openai_key,
            unsplash_key,
            no_ai,
            no_images,
            model,
        } => {
            let mut settings = Settings::from_env()
                .with_openai_key(openai_key)
                .with_unsplash_key(unsplash_key);
            if let Some(model) = model {
                settings.openai_model = model;
            }

            let enrichment = EnrichmentBuilder::new()
                .with_settings(settings)
                .with_ai(!no_ai)
                .with_image_search(!no_images)
                .build()?;
            tracing::info!("Enrichment mode: {}", enrichment.enricher_name());

            let written = enrichment
                .run_file(&input, &output)
                .with_context(|| format!("failed to enrich {}", input.display()))?;
            for path in written {
                tracing::info!("Saved {}", path.display());
            }
        }
        Commands::Template {
            format,
            out_dir,
            categories_sql,
        } => {
            let mut builder = TemplateBuilder::new().with_output_format(format.into());
            if let Some(path) = categories_sql {
                builder = builder.with_categories_sql(read_sql(&path)?);
            }
            let generator = builder.build()?;
            tracing::info!("Loaded {} categories", generator.tree().len());

            let written = generator
                .generate(&out_dir)
                .with_context(|| format!("failed to write template to {}", out_dir.display()))?;
            for path in written {
                tracing::info!("Saved {}", path.display());
            }
        }
        Commands::Categories { categories_sql } => {
            let tree = match categories_sql {
                Some(path) => CategoryTree::from_sql(&read_sql(&path)?),
                None => CategoryTree::from_sql(DEFAULT_CATEGORIES_SQL),
            };
            let stdout = io::stdout();
            write_plain_csv(&categories_sheet(&tree), stdout.lock())?;
        }
    }
    Ok(())
}

/// 標準出力向けにBOMなしのCSVを書き出す
fn write_plain_csv<W: Write>(sheet: &Sheet, writer: W) -> anyhow::Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    csv_writer.write_record(&sheet.header)?;
    for values in &sheet.rows {
        csv_writer.write_record(values.iter().map(CellValue::as_text))?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn read_sql(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn handle_error(error: &anyhow::Error) {
    eprintln!("Error: {:#}", error);

    let hint = match error.downcast_ref::<CatalogError>() {
        Some(CatalogError::MissingColumns { .. }) => Some(
            "The input needs a product name column (nombre/producto) and a price column (precio).",
        ),
        Some(CatalogError::InvalidCell { .. }) => {
            Some("Fix the value in the input file; prices may use '$' and ',' separators.")
        }
        Some(CatalogError::InputTooLarge { .. }) => Some("Split the input into smaller files."),
        Some(CatalogError::Spreadsheet(_)) => {
            Some("Check that the input is a valid xlsx, xls, ods or csv file.")
        }
        Some(CatalogError::Config(_)) => Some("Check the command line options and environment variables."),
        Some(CatalogError::Io(_)) => Some("Check that the paths exist and are writable."),
        _ => None,
    };
    if let Some(hint) = hint {
        eprintln!("Hint: {}", hint);
    }
}
