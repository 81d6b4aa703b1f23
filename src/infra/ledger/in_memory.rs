// In-memory implementation of LedgerStore.
//
// Backs the unit tests and `LEDGER_BACKEND=memory` local runs. Reads mimic the
// Sheets values API: trailing blank cells and trailing blank rows are dropped,
// blank cells in the middle come back as empty strings.

use crate::core::dates::CalendarDate;
use crate::core::ledger::{CellRange, Column, LedgerLayout, LedgerStore, LedgerStoreError};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// (column index, 1-based row)
type CellKey = (u32, u32);

/// Header written to row 1 of a seeded ledger.
const HEADER: &[&str] = &["Date", "Spent", "Remaining", "Saved"];

/// Clones share the same cells.
#[derive(Clone)]
pub struct InMemoryLedgerStore {
    cells: Arc<DashMap<CellKey, String>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            cells: Arc::new(DashMap::new()),
        }
    }

    /// A ledger with a header row and one row pair per date, starting at row 2.
    pub fn seeded(layout: &LedgerLayout, dates: impl IntoIterator<Item = CalendarDate>) -> Self {
        let store = Self::new();

        let header_columns = std::iter::once(layout.date_column())
            .chain(layout.info_columns().iter().copied());
        for (column, title) in header_columns.zip(HEADER) {
            store.set_cell(column, 1, title);
        }

        for (i, date) in dates.into_iter().enumerate() {
            let row = 2 + 2 * i as u32;
            store.set_cell(
                layout.date_column(),
                row,
                &date.day().format("%m/%d/%Y").to_string(),
            );
        }

        store
    }

    pub fn set_cell(&self, column: Column, row: u32, value: &str) {
        if value.is_empty() {
            self.cells.remove(&(column.index(), row));
        } else {
            self.cells.insert((column.index(), row), value.to_string());
        }
    }

    #[allow(dead_code)]
    pub fn cell(&self, column: Column, row: u32) -> Option<String> {
        self.cells
            .get(&(column.index(), row))
            .map(|entry| entry.value().clone())
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn read_range(&self, range: &CellRange) -> Result<Vec<Vec<String>>, LedgerStoreError> {
        let mut grid: Vec<Vec<String>> = (range.first_row..=range.last_row)
            .map(|row| {
                let mut values: Vec<String> = (range.first_column.index()
                    ..=range.last_column.index())
                    .map(|column| {
                        self.cells
                            .get(&(column, row))
                            .map(|entry| entry.value().clone())
                            .unwrap_or_default()
                    })
                    .collect();

                while values.last().is_some_and(String::is_empty) {
                    values.pop();
                }
                values
            })
            .collect();

        while grid.last().is_some_and(Vec::is_empty) {
            grid.pop();
        }

        Ok(grid)
    }

    async fn write_range(
        &self,
        range: &CellRange,
        values: Vec<Vec<String>>,
    ) -> Result<(), LedgerStoreError> {
        let fits = values.len() <= range.height() as usize
            && values.iter().all(|row| row.len() <= range.width() as usize);
        if !fits {
            return Err(LedgerStoreError::ShapeMismatch {
                range: range.a1(),
                rows: values.len(),
            });
        }

        for (row_offset, row_values) in values.into_iter().enumerate() {
            for (column_offset, value) in row_values.into_iter().enumerate() {
                let column = range.first_column.offset(column_offset as u32);
                self.set_cell(column, range.first_row + row_offset as u32, &value);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn col(letters: &str) -> Column {
        Column::parse(letters).unwrap()
    }

    #[tokio::test]
    async fn test_read_trims_trailing_blanks() {
        let store = InMemoryLedgerStore::new();
        store.set_cell(col("A"), 1, "x");
        store.set_cell(col("C"), 1, "y");
        store.set_cell(col("A"), 3, "z");

        let grid = store
            .read_range(&CellRange::new(col("A"), col("E"), 1, 10))
            .await
            .unwrap();

        assert_eq!(
            grid,
            vec![
                vec!["x".to_string(), String::new(), "y".to_string()],
                vec![],
                vec!["z".to_string()],
            ]
        );
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let store = InMemoryLedgerStore::new();
        let range = CellRange::column(col("G"), 4, 5);
        store
            .write_range(&range, vec![vec!["Taxi".into()], vec!["$9".into()]])
            .await
            .unwrap();

        assert_eq!(store.cell(col("G"), 4).as_deref(), Some("Taxi"));
        assert_eq!(store.cell(col("G"), 5).as_deref(), Some("$9"));
    }

    #[tokio::test]
    async fn test_write_rejects_oversized_values() {
        let store = InMemoryLedgerStore::new();
        let range = CellRange::column(col("G"), 4, 4);
        let err = store
            .write_range(&range, vec![vec!["a".into()], vec!["b".into()]])
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerStoreError::ShapeMismatch { rows: 2, .. }));
    }

    #[test]
    fn test_seeded_layout() {
        let layout = LedgerLayout::default();
        let day = CalendarDate::new(NaiveDate::from_ymd_opt(2019, 3, 3).unwrap());
        let store = InMemoryLedgerStore::seeded(&layout, [day]);

        assert_eq!(store.cell(col("A"), 1).as_deref(), Some("Date"));
        assert_eq!(store.cell(col("D"), 1).as_deref(), Some("Saved"));
        assert_eq!(store.cell(col("A"), 2).as_deref(), Some("03/03/2019"));
        assert_eq!(store.cell(col("A"), 3), None);
    }
}
