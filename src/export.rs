//! Spreadsheet export of the product catalogue.

use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};
use thiserror::Error;

use crate::domain::product::Product;

/// Byte order mark that makes spreadsheet tools detect UTF-8.
pub const UTF8_BOM: &str = "\u{feff}";

/// Column titles: name, category, cost, price, discount, stock, sold, status.
pub const PRODUCTS_CSV_HEADER: &str =
    "اسم المنتج,الفئة,سعر الشراء,سعر البيع,الخصم,المخزون,المبيعات,الحالة";

pub const STATUS_AVAILABLE: &str = "متاح";
pub const STATUS_UNAVAILABLE: &str = "غير متاح";

/// Errors that can occur while producing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV buffer: {0}")]
    Io(#[from] std::io::Error),
}

/// Wrap a text column in quotes, doubling any embedded quote.
fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Render `products` as a UTF-8 CSV document with a leading BOM.
///
/// Text columns are always quoted, even when they look like numbers;
/// numeric columns are written bare.
pub fn products_csv(products: &[Product]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::with_capacity(64 * (products.len() + 1));
    buffer.extend_from_slice(UTF8_BOM.as_bytes());
    buffer.extend_from_slice(PRODUCTS_CSV_HEADER.as_bytes());
    buffer.push(b'\n');

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(buffer);

    for product in products {
        let status = if product.is_active() {
            STATUS_AVAILABLE
        } else {
            STATUS_UNAVAILABLE
        };
        writer.write_record([
            quoted(&product.name),
            quoted(product.category.as_deref().unwrap_or_default()),
            product.cost_price().to_string(),
            product.price.to_string(),
            product.discount.unwrap_or(0.0).to_string(),
            product.stock.unwrap_or(0).to_string(),
            product.total_sold().to_string(),
            quoted(status),
        ])?;
    }

    writer.into_inner().map_err(|err| ExportError::Io(err.into_error()))
}

/// Download name for an export produced on `date`.
pub fn products_export_file_name(date: NaiveDate) -> String {
    format!("products_{}.csv", date.format("%Y-%m-%d"))
}
