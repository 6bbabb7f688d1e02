use crate::currency::CostQuote;
use crate::geo::MapLayer;
use crate::purchases::top_n;
use crate::types::{
    MapRow, PriceRow, PriceSummary, PriceTrend, Ranking, SalesSummary, StatePurchase,
    StateRankRow, SyntheticSaleRow, SyntheticSeries,
};
use crate::util::{format_int, format_number, format_opt};

pub fn price_rows(trend: &PriceTrend) -> Vec<PriceRow> {
    trend
        .series
        .iter()
        .map(|r| PriceRow {
            date: r.date.format("%Y-%m-%d").to_string(),
            year: r.year,
            month: r.month.clone(),
            price_per_kg: format_number(r.price_per_kg, 2),
        })
        .collect()
}

/// One-line min/max/avg summary in whole rupees.
pub fn price_stats_line(trend: &PriceTrend) -> String {
    match &trend.stats {
        Some(s) => format!(
            "Min Price: ₹{}  Max Price: ₹{}  Avg Price: ₹{}",
            format_number(s.min, 0),
            format_number(s.max, 0),
            format_number(s.mean, 0)
        ),
        None => format!("No prices in range ({})", trend.bucket.label()),
    }
}

/// Rank 1 is the largest purchase; `rows` is expected descending.
pub fn state_rank_rows(rows: &[StatePurchase]) -> Vec<StateRankRow> {
    rows.iter()
        .enumerate()
        .map(|(idx, r)| StateRankRow {
            rank: idx + 1,
            state: r.state.clone(),
            purchased_kg: format!("{} kg", format_number(r.purchased_kg, 0)),
        })
        .collect()
}

/// Full table, largest first, ties in source order.
pub fn ranking_rows(ranking: &Ranking) -> Vec<StateRankRow> {
    state_rank_rows(&top_n(&ranking.all, ranking.all.len()))
}

pub fn synthetic_rows(series: &SyntheticSeries) -> Vec<SyntheticSaleRow> {
    series
        .descending()
        .into_iter()
        .map(|r| SyntheticSaleRow {
            state: r.state.clone(),
            simulated_kg: format!("{} kg", format_number(r.simulated_kg, 2)),
            data_kind: series.label.to_string(),
        })
        .collect()
}

pub fn map_rows(layer: &MapLayer) -> Vec<MapRow> {
    match layer {
        MapLayer::Choropleth(shades) => shades
            .iter()
            .filter(|s| s.purchased_kg > 0.0)
            .map(|s| MapRow {
                state: s.state.clone(),
                purchased_kg: format!("{} kg", format_number(s.purchased_kg, 0)),
                position: "boundary".to_string(),
            })
            .collect(),
        MapLayer::Bubbles(points) => points
            .iter()
            .map(|p| MapRow {
                state: p.state.clone(),
                purchased_kg: format!("{} kg", format_number(p.purchased_kg, 0)),
                position: format!("{:.4}, {:.4}", p.lat, p.lon),
            })
            .collect(),
    }
}

pub fn totals_lines(ranking: &Ranking) -> Vec<String> {
    let t = &ranking.totals;
    vec![
        format!("Total Silver Purchased: {} kg", format_number(t.sum, 0)),
        format!("Average per State: {} kg", format_opt(t.mean, 0)),
        format!(
            "Highest Purchasing State: {}",
            t.max_state.as_deref().unwrap_or("n/a")
        ),
        format!("Number of States: {}", format_int(t.count)),
    ]
}

pub fn quote_lines(q: &CostQuote) -> Vec<String> {
    vec![
        format!(
            "Weight: {} grams ({} kg)",
            format_number(q.weight_g, 2),
            format_number(q.weight_kg, 3)
        ),
        format!("Price per gram: ₹{}", format_number(q.price_per_gram, 2)),
        format!("Total Cost: ₹{}", format_number(q.total_inr, 2)),
        format!("Converted: {} {}", q.currency, format_number(q.converted, 2)),
    ]
}

pub fn generate_price_summary(trend: &PriceTrend) -> PriceSummary {
    PriceSummary {
        bucket: trend.bucket.label().to_string(),
        rows: trend.series.len(),
        min_price: trend.stats.map(|s| s.min),
        max_price: trend.stats.map(|s| s.max),
        avg_price: trend.stats.map(|s| s.mean),
    }
}

pub fn generate_sales_summary(
    ranking: &Ranking,
    series: &SyntheticSeries,
    layer: &MapLayer,
) -> SalesSummary {
    SalesSummary {
        total_purchased_kg: ranking.totals.sum,
        avg_per_state_kg: ranking.totals.mean,
        highest_purchasing_state: ranking.totals.max_state.clone(),
        number_of_states: ranking.totals.count,
        simulated_series_label: series.label,
        simulated_series_seed: series.seed,
        map_layer: layer.kind().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::{quote, ExchangeRates, WeightUnit};
    use crate::geo::BubblePoint;
    use crate::prices::trend_from_records;
    use crate::purchases::rank_records;
    use crate::synthetic::{derive_monthly, SIMULATED_LABEL};
    use crate::types::{PriceBucket, PriceRecord};
    use chrono::NaiveDate;

    fn ranking() -> Ranking {
        rank_records(vec![
            StatePurchase::new("A", 100.0),
            StatePurchase::new("B", 50.0),
            StatePurchase::new("C", 2000.0),
        ])
    }

    #[test]
    fn ranking_rows_are_descending_with_ranks() {
        let rows = ranking_rows(&ranking());
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].state, "C");
        assert_eq!(rows[0].purchased_kg, "2,000 kg");
        assert_eq!(rows[2].state, "B");
    }

    #[test]
    fn totals_lines_mention_max_state() {
        let lines = totals_lines(&ranking());
        assert_eq!(lines[0], "Total Silver Purchased: 2,150 kg");
        assert_eq!(lines[2], "Highest Purchasing State: C");
        assert_eq!(lines[3], "Number of States: 3");
    }

    #[test]
    fn synthetic_rows_are_labelled() {
        let series = derive_monthly(&ranking().top5, 26);
        let rows = synthetic_rows(&series);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.data_kind == SIMULATED_LABEL));
    }

    #[test]
    fn empty_trend_line() {
        let trend = trend_from_records(Vec::new(), PriceBucket::LowTier);
        assert!(price_stats_line(&trend).starts_with("No prices in range"));
        let summary = generate_price_summary(&trend);
        assert_eq!(summary.min_price, None);
        assert_eq!(summary.rows, 0);
    }

    #[test]
    fn price_rows_format_dates() {
        let rec = PriceRecord {
            year: 2024,
            month: "Jul".into(),
            price_per_kg: 81_250.25,
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        };
        let trend = trend_from_records(vec![rec], PriceBucket::All);
        let rows = price_rows(&trend);
        assert_eq!(rows[0].date, "2024-07-01");
        assert_eq!(rows[0].price_per_kg, "81,250.25");
        assert_eq!(price_stats_line(&trend), "Min Price: ₹81,250  Max Price: ₹81,250  Avg Price: ₹81,250");
    }

    #[test]
    fn quote_lines_show_conversion() {
        let q = quote(&ExchangeRates::fixed(), 100.0, WeightUnit::Grams, 83.5, "USD").unwrap();
        let lines = quote_lines(&q);
        assert_eq!(lines[0], "Weight: 100.00 grams (0.100 kg)");
        assert_eq!(lines[3], "Converted: USD 100.00");
    }

    #[test]
    fn quote_lines_keep_totals_beyond_i64() {
        let q = quote(&ExchangeRates::fixed(), 1e12, WeightUnit::Kilograms, 1e5, "USD").unwrap();
        let lines = quote_lines(&q);
        assert_eq!(lines[2], "Total Cost: ₹100,000,000,000,000,000,000.00");
        assert_ne!(lines[2], "Total Cost: ₹0.00");
    }

    #[test]
    fn bubble_map_rows_show_position() {
        let layer = MapLayer::Bubbles(vec![BubblePoint {
            state: "Goa".into(),
            lat: 15.2993,
            lon: 74.124,
            purchased_kg: 12.0,
        }]);
        let rows = map_rows(&layer);
        assert_eq!(rows[0].position, "15.2993, 74.1240");
        let summary = generate_sales_summary(&ranking(), &derive_monthly(&[], 26), &layer);
        assert_eq!(summary.map_layer, "bubbles");
        assert_eq!(summary.highest_purchasing_state.as_deref(), Some("C"));
    }
}
