//! CLI argument definitions
//!
//! Command surface for the catalog search and seller price tooling.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chemsearch")]
#[command(about = "Chemical marketplace catalog search and seller price tooling", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Catalog JSON file (defaults to the embedded demo catalog)
    #[arg(short = 'c', long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Deterministically expand the catalog to N products per category
    #[arg(long, global = true, value_name = "N")]
    pub large: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search products and categories
    Search(SearchArgs),
    /// List catalog categories
    Categories,
    /// Emit the seller price list CSV
    ExportPrices(ExportPricesArgs),
    /// Import a seller price list CSV
    ImportPrices(ImportPricesArgs),
}

/// Search command arguments
#[derive(Parser, Clone, Debug)]
pub struct SearchArgs {
    /// Query text, any script, typos tolerated
    #[arg(short = 'q', long)]
    pub query: String,

    /// Maximum number of results
    #[arg(short = 'l', long, default_value_t = 10)]
    pub limit: usize,

    /// Emit results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Export command arguments
#[derive(Parser, Clone, Debug)]
pub struct ExportPricesArgs {
    /// Write to this file instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Import command arguments
#[derive(Parser, Clone, Debug)]
pub struct ImportPricesArgs {
    /// Price list CSV file
    #[arg(short = 'f', long)]
    pub file: PathBuf,

    /// Seller id applying the price list
    #[arg(short = 's', long)]
    pub seller: String,

    /// Print the resulting offers as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_args() {
        let args = SearchArgs {
            query: "ацетон".to_string(),
            limit: 5,
            json: false,
        };
        assert_eq!(args.query, "ацетон");
        assert_eq!(args.limit, 5);
    }

    #[test]
    fn test_cli_parses_search() {
        let cli = Cli::try_parse_from(["chemsearch", "search", "-q", "67-64-1", "-l", "3"]).unwrap();
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.query, "67-64-1");
                assert_eq!(args.limit, 3);
                assert!(!args.json);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_cli_parses_import_with_globals() {
        let cli = Cli::try_parse_from([
            "chemsearch",
            "import-prices",
            "-f",
            "prices.csv",
            "-s",
            "vialabs",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::ImportPrices(args) => {
                assert_eq!(args.seller, "vialabs");
                assert_eq!(args.file, PathBuf::from("prices.csv"));
            }
            _ => panic!("expected import-prices command"),
        }
    }
}
