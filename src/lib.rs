// Data behind the silver price calculator and the state-wise silver sales
// panels.
//
// Each pipeline is independent and recomputed from its source on every call:
//
// - `prices::load_and_filter`: monthly price series, bucketed, with stats.
// - `purchases::rank`: per-state purchases, ranked, top five, totals.
// - `synthetic::derive_monthly`: seeded, clearly labelled simulated sales.
// - `currency::convert` / `currency::quote`: fixed-rate conversion and
//   the weight × price calculator.
// - `geo::build_map_layer`: boundary choropleth with a centroid fallback.
pub mod config;
pub mod currency;
pub mod error;
pub mod geo;
pub mod loader;
pub mod output;
pub mod panel;
pub mod prices;
pub mod purchases;
pub mod reports;
pub mod synthetic;
pub mod types;
pub mod util;

pub use error::{DashError, Result};
