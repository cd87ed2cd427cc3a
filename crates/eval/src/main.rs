//! Evaluation CLI for the product-type classifier.
//!
//! Usage:
//!     eval classify --catalog patterns.json --products products.json
//!     eval single --catalog patterns.json "GE PowerMark Plus Circuit Breaker Panel"
//!     eval validate --catalog patterns.json

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prodtype_catalog::Catalog;
use prodtype_explain::{format_alternates, format_reasons, summarize};
use prodtype_model::Product;
use prodtype_resolve::{classify, classify_all, ResolveConfig};
use prodtype_score::ScoreWeights;

#[derive(Parser)]
#[command(name = "eval")]
#[command(about = "Classify products against a pattern catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the pattern catalog JSON file
    #[arg(long, global = true, default_value = "patterns.json")]
    catalog: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a JSON file of products
    Classify {
        /// Path to products JSON (array of product records)
        #[arg(short, long)]
        products: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Minimum score to classify (overrides the default threshold)
        #[arg(long)]
        min_score: Option<u32>,
    },

    /// Classify a single product given on the command line
    Single {
        /// Product title
        title: String,

        /// Product description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Validate a catalog file and report problems
    Validate,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("prodtype=debug".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify {
            products,
            format,
            min_score,
        } => {
            let catalog = load_catalog(&cli.catalog)?;
            run_classify(&catalog, &products, &format, min_score)?;
        }
        Commands::Single { title, description } => {
            let catalog = load_catalog(&cli.catalog)?;
            run_single(&catalog, &title, &description);
        }
        Commands::Validate => {
            run_validate(&cli.catalog);
        }
    }

    Ok(())
}

fn load_catalog(path: &str) -> Result<Catalog> {
    Catalog::load(path).with_context(|| format!("Loading catalog from {path}"))
}

fn run_classify(
    catalog: &Catalog,
    products_path: &str,
    format: &str,
    min_score: Option<u32>,
) -> Result<()> {
    let json = std::fs::read_to_string(products_path)
        .with_context(|| format!("Reading products from {products_path}"))?;
    let products: Vec<Product> =
        serde_json::from_str(&json).context("Parsing products JSON")?;

    let weights = ScoreWeights::default();
    let mut config = ResolveConfig::default();
    if let Some(min) = min_score {
        config.min_score = min;
    }

    let results = classify_all(&products, catalog, &weights, &config);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let mut classified = 0;
    for (i, (product, result)) in products.iter().zip(&results).enumerate() {
        println!("\n{}. {}", i + 1, product.title);
        println!("   {}", summarize(result));
        if !result.alternates.is_empty() {
            println!("   Alternates: {}", format_alternates(result));
        }
        if !result.is_unknown() {
            classified += 1;
        }
    }

    println!("\n---");
    println!(
        "Classified {} of {} products ({} unknown)",
        classified,
        results.len(),
        results.len() - classified
    );

    Ok(())
}

fn run_single(catalog: &Catalog, title: &str, description: &str) {
    let product = Product::new(title, description);
    let result = classify(
        &product,
        catalog,
        &ScoreWeights::default(),
        &ResolveConfig::default(),
    );

    println!("{}", summarize(&result));
    if !result.reasons.is_empty() {
        println!("{}", format_reasons(&result));
    }
    if !result.alternates.is_empty() {
        println!("Alternates: {}", format_alternates(&result));
    }
}

fn run_validate(path: &str) {
    print!("Validating {path}... ");

    match Catalog::load(path) {
        Ok(catalog) => {
            println!("OK ({} patterns)", catalog.len());
        }
        Err(e) => {
            println!("FAILED: {e}");
            std::process::exit(1);
        }
    }
}
