//! Seller price list CSV import/export
//!
//! The exchange format sellers upload and download from the console. The
//! parser tolerates what spreadsheets actually emit: `;` or `,` separators
//! (sniffed from the header), quoted cells with `""` escapes, CRLF line
//! endings, decimal commas in prices, and unknown or missing columns.

use super::offers::{OfferAvailability, PublishState, SellerOffer};
use super::{Catalog, Product, ProductId};
use crate::error::AppError;
use crate::search::translit::normalize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Export column order, fixed so diffs between uploads stay readable
pub const COLUMNS: [&str; 10] = [
    "productId",
    "title",
    "cas",
    "price",
    "currency",
    "pack",
    "qty",
    "leadTime",
    "availability",
    "state",
];

/// One parsed price list row; empty string means the column was absent
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Row {
    pub product_id: String,
    pub title: String,
    pub cas: String,
    pub price: String,
    pub currency: String,
    pub pack: String,
    pub qty: String,
    pub lead_time: String,
    pub availability: String,
    pub state: String,
}

/// Parse CSV text into rows, driven by the header line.
pub fn parse(text: &str) -> Vec<Row> {
    let text = text.replace("\r\n", "\n");
    let mut lines = text.split('\n').filter(|l| !l.is_empty());
    let header_line = match lines.next() {
        Some(line) => line,
        None => return Vec::new(),
    };

    let sep = sniff_separator(header_line);
    let header: Vec<String> = parse_line(header_line, sep)
        .into_iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    lines
        .map(|line| {
            let cells = parse_line(line, sep);
            let mut row = Row::default();
            for (j, name) in header.iter().enumerate() {
                let value = cells.get(j).map(|c| c.trim()).unwrap_or("").to_string();
                match name.as_str() {
                    "productid" => row.product_id = value,
                    "title" => row.title = value,
                    "cas" => row.cas = value,
                    "price" => row.price = value,
                    "currency" => row.currency = value,
                    "pack" => row.pack = value,
                    "qty" => row.qty = value,
                    "leadtime" => row.lead_time = value,
                    "availability" => row.availability = value,
                    "state" => row.state = value,
                    _ => {}
                }
            }
            row
        })
        .collect()
}

fn sniff_separator(header: &str) -> char {
    if header.contains(';') && !header.contains(',') {
        ';'
    } else {
        ','
    }
}

fn parse_line(line: &str, sep: char) -> Vec<String> {
    let mut out = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                cell.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if ch == sep && !in_quotes {
            out.push(std::mem::take(&mut cell));
        } else {
            cell.push(ch);
        }
    }
    out.push(cell);
    out
}

/// Emit rows as CSV in the fixed column order.
pub fn to_csv(rows: &[Row], sep: char) -> String {
    let mut out = vec![COLUMNS.join(&sep.to_string())];
    for r in rows {
        let cells = [
            &r.product_id,
            &r.title,
            &r.cas,
            &r.price,
            &r.currency,
            &r.pack,
            &r.qty,
            &r.lead_time,
            &r.availability,
            &r.state,
        ];
        let line: Vec<String> = cells.iter().map(|c| escape(c)).collect();
        out.push(line.join(&sep.to_string()));
    }
    out.join("\n")
}

fn escape(value: &str) -> String {
    // quoting is triggered by either separator so a re-sniffed parse stays safe
    if value.contains('"') || value.contains(',') || value.contains(';') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Resolve a row to a catalog product: id wins, then CAS, then a
/// normalized-title comparison.
pub fn match_product<'a>(row: &Row, catalog: &'a Catalog) -> Option<&'a Product> {
    if !row.product_id.is_empty() {
        if let Some(p) = catalog.find_product(&row.product_id) {
            return Some(p);
        }
    }
    if !row.cas.is_empty() {
        if let Some(p) = catalog
            .products()
            .map(|(_, p)| p)
            .find(|p| p.cas.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(&row.cas)))
        {
            return Some(p);
        }
    }
    if !row.title.is_empty() {
        let wanted = normalize(&row.title);
        if let Some(p) = catalog
            .products()
            .map(|(_, p)| p)
            .find(|p| normalize(&p.title) == wanted)
        {
            return Some(p);
        }
    }
    None
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub offers: HashMap<ProductId, SellerOffer>,
    /// Rows that matched no product or carried no usable price
    pub skipped: usize,
}

impl ImportReport {
    pub fn applied(&self) -> usize {
        self.offers.len()
    }
}

/// Turn an uploaded price list into per-product seller offers.
pub fn import(text: &str, catalog: &Catalog, seller_id: &str) -> Result<ImportReport, AppError> {
    if seller_id.trim().is_empty() {
        return Err(AppError::InvalidInput("seller id cannot be empty".to_string()));
    }
    if text.trim().is_empty() {
        return Err(AppError::PriceList("price list is empty".to_string()));
    }

    let rows = parse(text);
    let mut report = ImportReport::default();

    for row in &rows {
        let product = match match_product(row, catalog) {
            Some(p) => p,
            None => {
                warn!(
                    title = %row.title,
                    product_id = %row.product_id,
                    "price list row matched no product"
                );
                report.skipped += 1;
                continue;
            }
        };
        let price = match parse_price(&row.price) {
            Some(p) => p,
            None => {
                warn!(product = %product.id, raw = %row.price, "price list row has no usable price");
                report.skipped += 1;
                continue;
            }
        };

        report.offers.insert(
            product.id.clone(),
            SellerOffer {
                seller_id: seller_id.to_string(),
                price,
                currency: opt(&row.currency),
                pack: opt(&row.pack),
                qty: row.qty.trim().parse().ok(),
                lead_time: opt(&row.lead_time),
                availability: parse_availability(&row.availability),
                state: parse_state(&row.state),
            },
        );
    }

    debug!(applied = report.applied(), skipped = report.skipped, "imported price list");
    Ok(report)
}

/// Emit the seller's current price list over the whole catalog: one row per
/// product, offer columns filled where the seller has an override.
pub fn export(catalog: &Catalog, overrides: &HashMap<ProductId, SellerOffer>) -> String {
    let rows: Vec<Row> = catalog
        .products()
        .map(|(_, product)| {
            let mut row = Row {
                product_id: product.id.clone(),
                title: product.title.clone(),
                cas: product.cas.clone().unwrap_or_default(),
                ..Row::default()
            };
            if let Some(offer) = overrides.get(&product.id) {
                row.price = format_price(offer.price);
                row.currency = offer.currency.clone().unwrap_or_default();
                row.pack = offer.pack.clone().unwrap_or_default();
                row.qty = offer.qty.map(|q| q.to_string()).unwrap_or_default();
                row.lead_time = offer.lead_time.clone().unwrap_or_default();
                row.availability = availability_str(offer.availability).to_string();
                row.state = state_str(offer.state).to_string();
            }
            row
        })
        .collect();
    to_csv(&rows, ',')
}

fn opt(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Accepts "1900", "1 900", "1900,50" and "1900.50".
fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    let price: f64 = cleaned.parse().ok()?;
    (price.is_finite() && price > 0.0).then_some(price)
}

fn parse_availability(raw: &str) -> OfferAvailability {
    match raw {
        "preorder" => OfferAvailability::Preorder,
        "out-of-stock" => OfferAvailability::OutOfStock,
        _ => OfferAvailability::InStock,
    }
}

fn parse_state(raw: &str) -> PublishState {
    if raw == "draft" {
        PublishState::Draft
    } else {
        PublishState::Published
    }
}

fn availability_str(a: OfferAvailability) -> &'static str {
    match a {
        OfferAvailability::InStock => "in-stock",
        OfferAvailability::Preorder => "preorder",
        OfferAvailability::OutOfStock => "out-of-stock",
    }
}

fn state_str(s: PublishState) -> &'static str {
    match s {
        PublishState::Draft => "draft",
        PublishState::Published => "published",
    }
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{}", price as i64)
    } else {
        format!("{}", price)
    }
}
