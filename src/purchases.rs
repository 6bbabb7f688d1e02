// Per-state purchase ranking.
//
// Every source row is kept as its own observation: duplicate state names are
// ranked and counted separately. Only `purchase_index`, used for joining
// against boundary or centroid tables, collapses duplicates (by summing).
use crate::error::Result;
use crate::loader;
use crate::types::{PurchaseTotals, Ranking, StatePurchase};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

pub const TOP_STATES: usize = 5;

pub fn rank(path: &Path) -> Result<Ranking> {
    let rows = loader::read_purchases_file(path)?;
    let ranking = rank_records(rows);
    info!(
        path = %path.display(),
        states = ranking.totals.count,
        total_kg = ranking.totals.sum,
        "purchase ranking ready"
    );
    Ok(ranking)
}

pub fn rank_from<R: Read>(input: R, source: &str) -> Result<Ranking> {
    let rows = loader::read_purchases(input, source)?;
    Ok(rank_records(rows))
}

pub fn rank_records(rows: Vec<StatePurchase>) -> Ranking {
    let totals = totals(&rows);
    let top5 = top_n(&rows, TOP_STATES);
    let mut all = rows;
    all.sort_by(|a, b| cmp_kg(a, b));
    Ranking { all, top5, totals }
}

fn cmp_kg(a: &StatePurchase, b: &StatePurchase) -> Ordering {
    a.purchased_kg
        .partial_cmp(&b.purchased_kg)
        .unwrap_or(Ordering::Equal)
}

/// The `n` rows with the largest `purchased_kg`, descending. Ties keep source
/// order. Returns fewer than `n` rows when the input is shorter.
pub fn top_n(rows: &[StatePurchase], n: usize) -> Vec<StatePurchase> {
    let mut sorted = rows.to_vec();
    // `sort_by` is stable, so equal values stay in source order.
    sorted.sort_by(|a, b| cmp_kg(b, a));
    sorted.truncate(n);
    sorted
}

pub fn totals(rows: &[StatePurchase]) -> PurchaseTotals {
    let count = rows.len();
    let sum: f64 = rows.iter().map(|r| r.purchased_kg).sum();
    let mean = if count == 0 { None } else { Some(sum / count as f64) };

    let mut best: Option<&StatePurchase> = None;
    for r in rows {
        match best {
            Some(b) if r.purchased_kg <= b.purchased_kg => {}
            _ => best = Some(r),
        }
    }

    PurchaseTotals {
        sum,
        mean,
        max_state: best.map(|r| r.state.clone()),
        count,
    }
}

/// State name -> purchased kg, for joins. Duplicate names are summed.
pub fn purchase_index(rows: &[StatePurchase]) -> HashMap<&str, f64> {
    let mut index: HashMap<&str, (f64, usize)> = HashMap::with_capacity(rows.len());
    for r in rows {
        let e = index.entry(r.state.as_str()).or_insert((0.0, 0));
        e.0 += r.purchased_kg;
        e.1 += 1;
    }
    index
        .into_iter()
        .map(|(state, (kg, seen))| {
            if seen > 1 {
                warn!(state, rows = seen, "duplicate state in purchase table, summing values");
            }
            (state, kg)
        })
        .collect()
}
