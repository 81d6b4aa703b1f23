// Ledger addressing - the business logic that maps days onto spreadsheet cells.
//
// Like the rest of core, this knows nothing about Google Sheets or the voice
// platform. It talks to the sheet only through the LedgerStore trait, so tests
// run it against an in-memory grid.
//
// Every operation is a short sequence of reads followed by at most one write:
// row lookup, then column allocation, then the write. Nothing is cached
// between calls.

use super::ledger_models::{
    BudgetInfo, CellRange, Column, ExpenseEntry, ExpenseRecord, ExpenseSlot, LedgerLayout,
};
use super::ledger_store::{LedgerStore, LedgerStoreError};
use crate::core::dates::CalendarDate;
use chrono_tz::Tz;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("No ledger row for {0}")]
    RowNotFound(CalendarDate),

    #[error("Row {row} has no free expense column")]
    ColumnCapacityExceeded { row: u32 },

    #[error("Ledger store error: {0}")]
    Store(#[from] LedgerStoreError),
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct LedgerService<S: LedgerStore> {
    store: S,
    layout: LedgerLayout,
    tz: Tz,
}

impl<S: LedgerStore> LedgerService<S> {
    pub fn new(store: S, layout: LedgerLayout, tz: Tz) -> Self {
        Self { store, layout, tz }
    }

    #[allow(dead_code)]
    pub fn layout(&self) -> &LedgerLayout {
        &self.layout
    }

    /// Finds the 1-based row whose date cell falls on `date`.
    ///
    /// Scans the date column top to bottom and takes the first match, so the
    /// cost grows with the number of days in the sheet.
    pub async fn find_row(&self, date: CalendarDate) -> Result<u32, LedgerError> {
        let range = self.layout.date_range();
        let cells = self.store.read_range(&range).await?;

        let position = cells.iter().position(|row| {
            row.first()
                .and_then(|cell| CalendarDate::parse_ledger_cell(cell, &self.tz))
                .is_some_and(|cell_date| cell_date == date)
        });

        match position {
            Some(index) => {
                let row = range.first_row + index as u32;
                tracing::debug!(%date, row, "Found ledger row");
                Ok(row)
            }
            None => Err(LedgerError::RowNotFound(date)),
        }
    }

    /// The first available column after the occupied prefix of `row`.
    pub async fn next_available_column(&self, row: u32) -> Result<Column, LedgerError> {
        let range = self.layout.available_range(row, row);
        let cells = self.store.read_range(&range).await?;
        let occupied = cells.first().map(Vec::len).unwrap_or(0);

        self.layout
            .available_columns()
            .get(occupied)
            .copied()
            .ok_or(LedgerError::ColumnCapacityExceeded { row })
    }

    /// Records an expense: item in the date's row, amount directly below.
    ///
    /// Not idempotent. Two identical calls record two expenses. Two
    /// concurrent calls for the same day can both read the same occupancy
    /// and pick the same column; the later write wins.
    pub async fn add_expense(&self, record: &ExpenseRecord) -> Result<ExpenseSlot, LedgerError> {
        let row = self.find_row(record.date).await?;
        let column = self.next_available_column(row).await?;

        let range = CellRange::column(column, row, row + 1);
        self.store
            .write_range(
                &range,
                vec![vec![record.item.clone()], vec![record.amount.clone()]],
            )
            .await?;

        tracing::info!(
            date = %record.date,
            row,
            column = %column,
            "Recorded expense"
        );

        Ok(ExpenseSlot { row, column })
    }

    /// Reads the info cells (spent, remaining, saved) for a day.
    pub async fn budget_info(&self, date: CalendarDate) -> Result<BudgetInfo, LedgerError> {
        let row = self.find_row(date).await?;
        let cells = self.store.read_range(&self.layout.info_range(row)).await?;
        let values = cells.into_iter().next().unwrap_or_default();

        let cell = |i: usize| values.get(i).cloned().unwrap_or_default();
        Ok(BudgetInfo {
            spent: cell(0),
            remaining: cell(1),
            saved: cell(2),
        })
    }

    /// Reads every recorded item/amount pair for a day, left to right.
    pub async fn expenses(&self, date: CalendarDate) -> Result<Vec<ExpenseEntry>, LedgerError> {
        let row = self.find_row(date).await?;
        let cells = self
            .store
            .read_range(&self.layout.available_range(row, row + 1))
            .await?;

        let mut rows = cells.into_iter();
        let items = rows.next().unwrap_or_default();
        let amounts = rows.next().unwrap_or_default();

        let entries = items
            .into_iter()
            .enumerate()
            .filter(|(_, item)| !item.trim().is_empty())
            .map(|(i, item)| ExpenseEntry {
                item,
                amount: amounts.get(i).cloned().unwrap_or_default(),
            })
            .collect();

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::ledger::InMemoryLedgerStore;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn col(letters: &str) -> Column {
        Column::parse(letters).unwrap()
    }

    /// Header in row 1, then March 1st..5th at rows 2, 4, 6, 8, 10.
    fn seeded_store() -> InMemoryLedgerStore {
        let layout = LedgerLayout::default();
        let dates = (1..=5).map(|d| date(2019, 3, d));
        InMemoryLedgerStore::seeded(&layout, dates)
    }

    fn service(store: InMemoryLedgerStore) -> LedgerService<InMemoryLedgerStore> {
        LedgerService::new(store, LedgerLayout::default(), chrono_tz::Etc::GMTPlus5)
    }

    fn record(item: &str, amount: &str, day: CalendarDate) -> ExpenseRecord {
        ExpenseRecord {
            item: item.to_string(),
            amount: amount.to_string(),
            date: day,
        }
    }

    struct FailingStore;

    #[async_trait]
    impl LedgerStore for FailingStore {
        async fn read_range(
            &self,
            _range: &CellRange,
        ) -> Result<Vec<Vec<String>>, LedgerStoreError> {
            Err(LedgerStoreError::Transport("connection reset".to_string()))
        }

        async fn write_range(
            &self,
            _range: &CellRange,
            _values: Vec<Vec<String>>,
        ) -> Result<(), LedgerStoreError> {
            Err(LedgerStoreError::Transport("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn test_find_row() {
        let service = service(seeded_store());
        assert_eq!(service.find_row(date(2019, 3, 1)).await.unwrap(), 2);
        assert_eq!(service.find_row(date(2019, 3, 3)).await.unwrap(), 6);
        assert_eq!(service.find_row(date(2019, 3, 5)).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_find_row_first_match_wins() {
        let store = seeded_store();
        store.set_cell(col("A"), 12, "3/3/2019");
        let service = service(store);
        assert_eq!(service.find_row(date(2019, 3, 3)).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_find_row_missing_date() {
        let service = service(seeded_store());
        let err = service.find_row(date(2019, 4, 1)).await.unwrap_err();
        assert!(matches!(err, LedgerError::RowNotFound(d) if d == date(2019, 4, 1)));
    }

    #[tokio::test]
    async fn test_empty_row_gets_first_available_column() {
        let service = service(seeded_store());
        assert_eq!(service.next_available_column(6).await.unwrap(), col("E"));
    }

    #[tokio::test]
    async fn test_allocation_is_monotonic_and_gap_free() {
        let service = service(seeded_store());
        let day = date(2019, 3, 3);

        let mut seen = Vec::new();
        for n in 0..4 {
            let slot = service
                .add_expense(&record(&format!("item {n}"), "$1.00", day))
                .await
                .unwrap();
            seen.push(slot.column);
        }

        assert_eq!(seen, vec![col("E"), col("F"), col("G"), col("H")]);
        assert_eq!(service.expenses(day).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_add_expense_after_two_occupied_columns() {
        let store = seeded_store();
        store.set_cell(col("E"), 6, "Coffee");
        store.set_cell(col("E"), 7, "$3.00");
        store.set_cell(col("F"), 6, "Lunch");
        store.set_cell(col("F"), 7, "$12.50");
        let service = service(store);

        let slot = service
            .add_expense(&record("Lyft ride", "$8.02", date(2019, 3, 3)))
            .await
            .unwrap();

        assert_eq!(slot, ExpenseSlot { row: 6, column: col("G") });
        let store = &service.store;
        assert_eq!(store.cell(col("G"), 6).as_deref(), Some("Lyft ride"));
        assert_eq!(store.cell(col("G"), 7).as_deref(), Some("$8.02"));
    }

    #[tokio::test]
    async fn test_identical_expenses_are_not_deduplicated() {
        let service = service(seeded_store());
        let day = date(2019, 3, 2);
        let first = service.add_expense(&record("Coffee", "$3", day)).await.unwrap();
        let second = service.add_expense(&record("Coffee", "$3", day)).await.unwrap();
        assert_ne!(first.column, second.column);
    }

    #[tokio::test]
    async fn test_full_row_reports_capacity() {
        let store = seeded_store();
        for column in LedgerLayout::default().available_columns() {
            store.set_cell(*column, 4, "x");
        }
        let service = service(store);

        let err = service
            .add_expense(&record("One more", "$1", date(2019, 3, 2)))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::ColumnCapacityExceeded { row: 4 }));
    }

    #[tokio::test]
    async fn test_budget_info() {
        let store = seeded_store();
        store.set_cell(col("B"), 8, "$20.00");
        store.set_cell(col("C"), 8, "$30.00");
        store.set_cell(col("D"), 8, "$112.40");
        let service = service(store);

        let info = service.budget_info(date(2019, 3, 4)).await.unwrap();
        assert_eq!(
            info,
            BudgetInfo {
                spent: "$20.00".to_string(),
                remaining: "$30.00".to_string(),
                saved: "$112.40".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_budget_info_blank_cells() {
        let service = service(seeded_store());
        let info = service.budget_info(date(2019, 3, 4)).await.unwrap();
        assert_eq!(info, BudgetInfo::default());
    }

    #[tokio::test]
    async fn test_expenses_pairs_items_with_amounts() {
        let store = seeded_store();
        store.set_cell(col("E"), 2, "Coffee");
        store.set_cell(col("E"), 3, "$3.00");
        store.set_cell(col("F"), 2, "Parking");
        let service = service(store);

        let entries = service.expenses(date(2019, 3, 1)).await.unwrap();
        assert_eq!(
            entries,
            vec![
                ExpenseEntry {
                    item: "Coffee".to_string(),
                    amount: "$3.00".to_string(),
                },
                ExpenseEntry {
                    item: "Parking".to_string(),
                    amount: String::new(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_expenses_empty_day() {
        let service = service(seeded_store());
        assert!(service.expenses(date(2019, 3, 5)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failures_propagate() {
        let service = LedgerService::new(
            FailingStore,
            LedgerLayout::default(),
            chrono_tz::Etc::GMTPlus5,
        );
        let err = service.find_row(date(2019, 3, 1)).await.unwrap_err();
        assert!(matches!(err, LedgerError::Store(LedgerStoreError::Transport(_))));
    }
}
