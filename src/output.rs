use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "csv written");
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    debug!(path = %path.display(), "json written");
    Ok(())
}

/// Markdown table of the first `max_rows` rows, or `(no rows)`.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_table(rows, max_rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StateRankRow;

    fn rows() -> Vec<StateRankRow> {
        vec![
            StateRankRow { rank: 1, state: "Gujarat".into(), purchased_kg: "900 kg".into() },
            StateRankRow { rank: 2, state: "Goa".into(), purchased_kg: "12 kg".into() },
        ]
    }

    #[test]
    fn renders_markdown_preview() {
        let table = render_table(&rows(), 1);
        assert!(table.contains("| Rank"));
        assert!(table.contains("Gujarat"));
        assert!(!table.contains("Goa"));
        assert_eq!(render_table::<StateRankRow>(&[], 5), "(no rows)");
    }

    #[test]
    fn writes_csv_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("ranking.csv");
        write_csv(&csv_path, &rows()).unwrap();
        let text = std::fs::read_to_string(&csv_path).unwrap();
        assert!(text.starts_with("Rank,State,PurchasedKg\n1,Gujarat,900 kg\n"));

        let json_path = dir.path().join("summary.json");
        write_json(&json_path, &serde_json::json!({"count": 2})).unwrap();
        let v: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(v["count"], 2);
    }
}
