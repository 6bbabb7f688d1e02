// CSV loading for the two source tables.
//
// Unlike a forgiving cleaner, every row here must parse: the first bad row
// aborts the whole load with its 1-based row number.
use crate::error::{DashError, Result};
use crate::types::{PriceRecord, RawPriceRow, RawPurchaseRow, StatePurchase};
use crate::util::{month_abbrev, parse_f64_safe, parse_i32_safe, parse_month_abbrev};
use chrono::NaiveDate;
use csv::{Reader, ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;
use tracing::debug;

pub const PRICE_COLUMNS: [&str; 3] = ["Year", "Month", "Silver_Price_INR_per_kg"];
pub const PURCHASE_COLUMNS: [&str; 2] = ["State", "Silver_Purchased_kg"];

fn builder() -> ReaderBuilder {
    let mut b = ReaderBuilder::new();
    b.flexible(true).trim(Trim::All);
    b
}

fn source_name(path: &Path) -> String {
    path.display().to_string()
}

fn require_columns<R: Read>(rdr: &mut Reader<R>, source: &str, columns: &[&str]) -> Result<()> {
    let headers = rdr
        .headers()
        .map_err(|e| DashError::load(source, e.to_string()))?;
    for col in columns {
        if !headers.iter().any(|h| h == *col) {
            return Err(DashError::schema(source, col));
        }
    }
    Ok(())
}

/// Read the historical price table from any reader. `source` names the input
/// in error messages.
pub fn read_prices<R: Read>(input: R, source: &str) -> Result<Vec<PriceRecord>> {
    let mut rdr = builder().from_reader(input);
    require_columns(&mut rdr, source, &PRICE_COLUMNS)?;

    let mut out = Vec::new();
    for (idx, result) in rdr.deserialize::<RawPriceRow>().enumerate() {
        let row_no = idx + 1;
        let row = result.map_err(|e| DashError::bad_row(source, row_no, e))?;

        let year = parse_i32_safe(row.year.as_deref()).ok_or_else(|| {
            DashError::bad_row(source, row_no, format!("invalid Year {:?}", row.year))
        })?;
        let month = parse_month_abbrev(row.month.as_deref()).ok_or_else(|| {
            DashError::bad_row(source, row_no, format!("invalid Month {:?}", row.month))
        })?;
        let date = NaiveDate::from_ymd_opt(year, month.number_from_month(), 1).ok_or_else(|| {
            DashError::bad_row(
                source,
                row_no,
                format!("cannot build a date from {}-{}", year, month_abbrev(month)),
            )
        })?;
        let price_per_kg = match parse_f64_safe(row.price_per_kg.as_deref()) {
            Some(p) if p.is_finite() && p >= 0.0 => p,
            _ => {
                return Err(DashError::bad_row(
                    source,
                    row_no,
                    format!("invalid Silver_Price_INR_per_kg {:?}", row.price_per_kg),
                ))
            }
        };

        out.push(PriceRecord {
            year,
            month: month_abbrev(month).to_string(),
            price_per_kg,
            date,
        });
    }
    debug!(source, rows = out.len(), "price table loaded");
    Ok(out)
}

pub fn read_prices_file(path: &Path) -> Result<Vec<PriceRecord>> {
    let name = source_name(path);
    let file = std::fs::File::open(path).map_err(|e| DashError::load(&name, e.to_string()))?;
    read_prices(file, &name)
}

/// Read the per-state purchase table from any reader.
pub fn read_purchases<R: Read>(input: R, source: &str) -> Result<Vec<StatePurchase>> {
    let mut rdr = builder().from_reader(input);
    require_columns(&mut rdr, source, &PURCHASE_COLUMNS)?;

    let mut out = Vec::new();
    for (idx, result) in rdr.deserialize::<RawPurchaseRow>().enumerate() {
        let row_no = idx + 1;
        let row = result.map_err(|e| DashError::bad_row(source, row_no, e))?;

        let state = match row.state.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => return Err(DashError::bad_row(source, row_no, "empty State")),
        };
        let purchased_kg = match parse_f64_safe(row.purchased_kg.as_deref()) {
            Some(v) if v.is_finite() && v >= 0.0 => v,
            _ => {
                return Err(DashError::bad_row(
                    source,
                    row_no,
                    format!("invalid Silver_Purchased_kg {:?}", row.purchased_kg),
                ))
            }
        };
        out.push(StatePurchase { state, purchased_kg });
    }
    debug!(source, rows = out.len(), "purchase table loaded");
    Ok(out)
}

pub fn read_purchases_file(path: &Path) -> Result<Vec<StatePurchase>> {
    let name = source_name(path);
    let file = std::fs::File::open(path).map_err(|e| DashError::load(&name, e.to_string()))?;
    read_purchases(file, &name)
}
