use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

use crate::error::DashError;

// ---------------------------------------------------------------------------
// Raw CSV rows
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RawPriceRow {
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Month")]
    pub month: Option<String>,
    #[serde(rename = "Silver_Price_INR_per_kg")]
    pub price_per_kg: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawPurchaseRow {
    #[serde(rename = "State")]
    pub state: Option<String>,
    #[serde(rename = "Silver_Purchased_kg")]
    pub purchased_kg: Option<String>,
}

// ---------------------------------------------------------------------------
// Price trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRecord {
    pub year: i32,
    /// Canonical three-letter abbreviation (`Jan` .. `Dec`).
    pub month: String,
    pub price_per_kg: f64,
    /// First day of `(year, month)`.
    pub date: NaiveDate,
}

/// Price range used to filter the historical series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PriceBucket {
    All,
    /// `price <= 20_000`
    LowTier,
    /// `20_000 < price <= 30_000`
    MidTier,
    /// `price > 30_000`
    HighTier,
}

pub const LOW_TIER_MAX: f64 = 20_000.0;
pub const MID_TIER_MAX: f64 = 30_000.0;

impl PriceBucket {
    pub const ALL: [PriceBucket; 4] = [
        PriceBucket::All,
        PriceBucket::LowTier,
        PriceBucket::MidTier,
        PriceBucket::HighTier,
    ];

    /// Map a selector index (the position of the option in the filter list)
    /// to a bucket.
    pub fn from_selector(idx: usize) -> Result<Self, DashError> {
        Self::ALL.get(idx).copied().ok_or_else(|| {
            DashError::Config(format!(
                "price bucket selector {} out of range (expected 0..={})",
                idx,
                Self::ALL.len() - 1
            ))
        })
    }

    pub fn contains(self, price: f64) -> bool {
        match self {
            PriceBucket::All => true,
            PriceBucket::LowTier => price <= LOW_TIER_MAX,
            PriceBucket::MidTier => price > LOW_TIER_MAX && price <= MID_TIER_MAX,
            PriceBucket::HighTier => price > MID_TIER_MAX,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceBucket::All => "All Prices",
            PriceBucket::LowTier => "≤ ₹20,000 per kg",
            PriceBucket::MidTier => "₹20,000 - ₹30,000 per kg",
            PriceBucket::HighTier => "> ₹30,000 per kg",
        }
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriceBucket::All => "all",
            PriceBucket::LowTier => "low",
            PriceBucket::MidTier => "mid",
            PriceBucket::HighTier => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for PriceBucket {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(PriceBucket::All),
            "low" | "low-tier" => Ok(PriceBucket::LowTier),
            "mid" | "mid-tier" => Ok(PriceBucket::MidTier),
            "high" | "high-tier" => Ok(PriceBucket::HighTier),
            other => match other.parse::<usize>() {
                Ok(idx) => PriceBucket::from_selector(idx),
                Err(_) => Err(DashError::Config(format!(
                    "unknown price bucket `{}` (expected all, low, mid or high)",
                    s
                ))),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceTrend {
    pub bucket: PriceBucket,
    /// Sorted ascending by `date`.
    pub series: Vec<PriceRecord>,
    /// `None` when the bucket matched no rows.
    pub stats: Option<PriceStats>,
}

// ---------------------------------------------------------------------------
// Purchases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatePurchase {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Silver_Purchased_kg")]
    pub purchased_kg: f64,
}

impl StatePurchase {
    pub fn new(state: impl Into<String>, purchased_kg: f64) -> Self {
        Self {
            state: state.into(),
            purchased_kg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseTotals {
    pub sum: f64,
    /// `None` for an empty table.
    pub mean: Option<f64>,
    /// First state (in source order) holding the maximum; `None` for an empty table.
    pub max_state: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ranking {
    /// Every row, ascending by `purchased_kg`.
    pub all: Vec<StatePurchase>,
    /// Up to five rows, descending by `purchased_kg`.
    pub top5: Vec<StatePurchase>,
    pub totals: PurchaseTotals,
}

// ---------------------------------------------------------------------------
// Simulated sales
// ---------------------------------------------------------------------------

/// One simulated monthly figure. Not measured data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntheticSale {
    pub state: String,
    pub purchased_kg: f64,
    /// The uniform draw applied to `purchased_kg`.
    pub fraction: f64,
    pub simulated_kg: f64,
}

/// A simulated series, kept apart from real purchase figures so consumers
/// cannot confuse the two.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntheticSeries {
    pub label: &'static str,
    pub seed: u64,
    /// In input order.
    pub rows: Vec<SyntheticSale>,
}

// ---------------------------------------------------------------------------
// Presentation rows
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PriceRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: String,
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "PricePerKg")]
    #[tabled(rename = "PricePerKg")]
    pub price_per_kg: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct StateRankRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "State")]
    #[tabled(rename = "State")]
    pub state: String,
    #[serde(rename = "PurchasedKg")]
    #[tabled(rename = "PurchasedKg")]
    pub purchased_kg: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SyntheticSaleRow {
    #[serde(rename = "State")]
    #[tabled(rename = "State")]
    pub state: String,
    #[serde(rename = "SimulatedSalesKg")]
    #[tabled(rename = "SimulatedSalesKg")]
    pub simulated_kg: String,
    #[serde(rename = "DataKind")]
    #[tabled(rename = "DataKind")]
    pub data_kind: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MapRow {
    #[serde(rename = "State")]
    #[tabled(rename = "State")]
    pub state: String,
    #[serde(rename = "PurchasedKg")]
    #[tabled(rename = "PurchasedKg")]
    pub purchased_kg: String,
    #[serde(rename = "Position")]
    #[tabled(rename = "Position")]
    pub position: String,
}

#[derive(Debug, Serialize)]
pub struct PriceSummary {
    pub bucket: String,
    pub rows: usize,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub avg_price: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SalesSummary {
    pub total_purchased_kg: f64,
    pub avg_per_state_kg: Option<f64>,
    pub highest_purchasing_state: Option<String>,
    pub number_of_states: usize,
    pub simulated_series_label: &'static str,
    pub simulated_series_seed: u64,
    pub map_layer: String,
}

#[derive(Debug, Default, Serialize)]
pub struct SummaryStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prices: Option<PriceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales: Option<SalesSummary>,
}
