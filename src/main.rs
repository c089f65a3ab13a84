//! chemsearch CLI
//!
//! Front end for the marketplace search core and the seller price tooling:
//! - `search` - fuzzy multilingual search over products and categories
//! - `categories` - list the catalog
//! - `export-prices` / `import-prices` - seller price list CSV exchange

mod catalog;
mod cli;
mod error;
mod search;

use anyhow::Result;
use catalog::{expand, offers, pricelist, Catalog};
use clap::Parser;
use cli::{Cli, Commands};
use error::AppError;
use search::{DocKind, SearchHit, SearchIndex};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use tracing::info;

fn main() {
    let cli = Cli::parse();

    // Log to stderr to keep stdout clean for piped output
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(exit_code(&e));
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let catalog = load_catalog(&cli)?;
    match cli.command {
        Commands::Search(args) => run_search(&catalog, args),
        Commands::Categories => Ok(format_categories(&catalog)),
        Commands::ExportPrices(args) => run_export_prices(&catalog, args),
        Commands::ImportPrices(args) => run_import_prices(&catalog, args),
    }
}

fn load_catalog(cli: &Cli) -> Result<Catalog, AppError> {
    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::demo(),
    };
    Ok(match cli.large {
        Some(per_category) => expand::expand(&catalog, per_category),
        None => catalog,
    })
}

fn run_search(catalog: &Catalog, args: cli::SearchArgs) -> Result<String> {
    let index = SearchIndex::build(&catalog.categories);
    let hits = index.search(&args.query, args.limit);
    if args.json {
        Ok(serde_json::to_string_pretty(&hits)?)
    } else {
        Ok(format_hits(&hits))
    }
}

fn format_hits(hits: &[SearchHit<'_>]) -> String {
    if hits.is_empty() {
        return "No matches.".to_string();
    }
    let mut out = String::new();
    for (rank, hit) in hits.iter().enumerate() {
        let kind = match hit.doc.kind {
            DocKind::Product => "product",
            DocKind::Category => "category",
        };
        out.push_str(&format!(
            "{:>2}. [{:<8}] {:<28} {:<12} score {:.4}  ({})\n",
            rank + 1,
            kind,
            hit.doc.title,
            hit.doc.cas.as_deref().unwrap_or("-"),
            hit.score,
            hit.doc.id,
        ));
    }
    out.pop();
    out
}

fn format_categories(catalog: &Catalog) -> String {
    let lines: Vec<String> = catalog
        .categories
        .iter()
        .map(|c| {
            format!(
                "{:<14} {:<40} {} products",
                c.slug,
                c.title,
                c.products.len()
            )
        })
        .collect();
    lines.join("\n")
}

fn run_export_prices(catalog: &Catalog, args: cli::ExportPricesArgs) -> Result<String> {
    let csv = pricelist::export(catalog, &HashMap::new());
    match args.output {
        Some(path) => {
            fs::write(&path, &csv).map_err(AppError::Io)?;
            info!("Wrote price list template to {}", path.display());
            Ok(String::new())
        }
        None => Ok(csv),
    }
}

fn run_import_prices(catalog: &Catalog, args: cli::ImportPricesArgs) -> Result<String> {
    let text = fs::read_to_string(&args.file).map_err(AppError::Io)?;
    let report = pricelist::import(&text, catalog, &args.seller)?;

    let mut out = format!(
        "Applied {} offer(s) for seller '{}', skipped {} row(s).",
        report.applied(),
        args.seller,
        report.skipped
    );

    // BTreeMap keeps the per-product output deterministic
    let ordered: BTreeMap<_, _> = report.offers.iter().collect();
    if args.json {
        out.push('\n');
        out.push_str(&serde_json::to_string_pretty(&ordered)?);
    } else {
        let directory = catalog::seller_directory();
        for (product_id, offer) in ordered {
            if let Some(product) = catalog.find_product(product_id) {
                let merged = offers::merged_offers(product, &report.offers, &directory);
                out.push_str(&format!(
                    "\n  {:<20} {} {}  ({} seller(s) on the product page)",
                    product_id,
                    offer.price,
                    offer.currency.as_deref().unwrap_or(""),
                    merged.seller_count
                ));
            }
        }
    }
    Ok(out)
}

/// Map errors to exit codes for scripting
fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<AppError>()
        .map(AppError::exit_code)
        .unwrap_or(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hits_empty() {
        assert_eq!(format_hits(&[]), "No matches.");
    }

    #[test]
    fn test_format_hits_table() {
        let catalog = Catalog::demo();
        let index = SearchIndex::build(&catalog.categories);
        let hits = index.search("ацетон", 3);
        let table = format_hits(&hits);
        assert!(table.starts_with(" 1. [product "));
        assert!(table.contains("Ацетон, ч.д.а."));
        assert!(table.contains("67-64-1"));
    }

    #[test]
    fn test_format_categories_lists_all() {
        let catalog = Catalog::demo();
        let listing = format_categories(&catalog);
        assert_eq!(listing.lines().count(), catalog.categories.len());
        assert!(listing.contains("Лабораторная химия"));
    }

    #[test]
    fn test_exit_code_downcast() {
        let err = anyhow::Error::new(AppError::NotFound("x".to_string()));
        assert_eq!(exit_code(&err), 3);
        let err = anyhow::anyhow!("plain");
        assert_eq!(exit_code(&err), 5);
    }
}
