// Historical price trend: load, sort by date, bucket, aggregate.
use crate::error::Result;
use crate::loader;
use crate::types::{PriceBucket, PriceRecord, PriceStats, PriceTrend};
use crate::util::average;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Load the price table at `path` and filter it to `bucket`.
///
/// Any unreadable file or unparsable row fails the whole call.
pub fn load_and_filter(path: &Path, bucket: PriceBucket) -> Result<PriceTrend> {
    let records = loader::read_prices_file(path)?;
    let trend = trend_from_records(records, bucket);
    info!(
        path = %path.display(),
        bucket = %bucket,
        rows = trend.series.len(),
        "price trend ready"
    );
    Ok(trend)
}

/// Same as [`load_and_filter`] for an in-memory or streamed source.
pub fn load_and_filter_from<R: Read>(input: R, source: &str, bucket: PriceBucket) -> Result<PriceTrend> {
    let records = loader::read_prices(input, source)?;
    Ok(trend_from_records(records, bucket))
}

pub fn trend_from_records(mut records: Vec<PriceRecord>, bucket: PriceBucket) -> PriceTrend {
    // Stable, so months repeated in the source keep their relative order.
    records.sort_by_key(|r| r.date);
    let series: Vec<PriceRecord> = records
        .into_iter()
        .filter(|r| bucket.contains(r.price_per_kg))
        .collect();
    let stats = price_stats(&series);
    PriceTrend {
        bucket,
        series,
        stats,
    }
}

/// Min/max/mean over the series' prices, `None` when the series is empty.
pub fn price_stats(series: &[PriceRecord]) -> Option<PriceStats> {
    let prices: Vec<f64> = series.iter().map(|r| r.price_per_kg).collect();
    let mean = average(&prices)?;
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(PriceStats {
        min,
        max,
        mean,
        count: prices.len(),
    })
}
