//! Error types for the chemsearch CLI and catalog layer
//!
//! The search core itself never fails on user input: malformed, empty or
//! adversarial queries produce ordinary (possibly empty) result lists.
//! Errors here cover catalog loading and price list handling.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog parse failed: {0}")]
    CatalogParse(#[from] serde_json::Error),
    #[error("Price list error: {0}")]
    PriceList(String),
}

impl AppError {
    /// Exit code for the CLI wrapper
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidInput(_) | AppError::PriceList(_) => 1,
            AppError::NotFound(_) => 3,
            AppError::Io(_) | AppError::CatalogParse(_) => 5,
        }
    }
}
