use crate::core::dates::CalendarDate;
use std::fmt;

/// Aggregate cells per day: total spent, remaining budget, cumulative saved.
pub const INFO_COLUMN_COUNT: u32 = 3;

/// Columns reserved for item/amount pairs in each day's row pair.
pub const AVAILABLE_COLUMN_COUNT: u32 = 21;

/// Last row the date column scan will read.
pub const DEFAULT_MAX_ROWS: u32 = 9999;

// ============================================================================
// ADDRESSING
// ============================================================================

/// A spreadsheet column, stored as a zero-based index (`A` = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Column(u32);

impl Column {
    pub fn from_index(index: u32) -> Self {
        Self(index)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    /// Parses spreadsheet letters (`"A"`, `"Y"`, `"AB"`).
    #[allow(dead_code)]
    pub fn parse(letters: &str) -> Option<Self> {
        if letters.is_empty() {
            return None;
        }

        let mut number: u32 = 0;
        for ch in letters.chars() {
            if !ch.is_ascii_alphabetic() {
                return None;
            }
            let digit = ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
            number = number.checked_mul(26)?.checked_add(digit)?;
        }

        Some(Self(number - 1))
    }

    pub fn letters(&self) -> String {
        // Bijective base-26: there is no zero digit.
        let mut n = self.0 + 1;
        let mut letters = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push((b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        letters.iter().rev().collect()
    }

    pub fn offset(&self, by: u32) -> Self {
        Self(self.0 + by)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters())
    }
}

/// A rectangular block of cells with 1-based, inclusive rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub first_column: Column,
    pub last_column: Column,
    pub first_row: u32,
    pub last_row: u32,
}

impl CellRange {
    pub fn new(first_column: Column, last_column: Column, first_row: u32, last_row: u32) -> Self {
        Self {
            first_column,
            last_column,
            first_row,
            last_row,
        }
    }

    /// One column spanning `first_row..=last_row`.
    pub fn column(column: Column, first_row: u32, last_row: u32) -> Self {
        Self::new(column, column, first_row, last_row)
    }

    pub fn width(&self) -> u32 {
        self.last_column.index() - self.first_column.index() + 1
    }

    pub fn height(&self) -> u32 {
        self.last_row - self.first_row + 1
    }

    /// A1 notation without a sheet prefix, e.g. `E5:Y6`.
    pub fn a1(&self) -> String {
        format!(
            "{}{}:{}{}",
            self.first_column, self.first_row, self.last_column, self.last_row
        )
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.a1())
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Where things live in the ledger sheet.
///
/// Each day owns two rows: the date row `r` holds the date, the info cells
/// and expense items; row `r + 1` holds the matching amounts. Info and
/// available columns are contiguous runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerLayout {
    date_column: Column,
    info_columns: Vec<Column>,
    available_columns: Vec<Column>,
    max_rows: u32,
}

impl LedgerLayout {
    pub fn new(
        date_column: Column,
        first_info_column: Column,
        first_available_column: Column,
        available_count: u32,
        max_rows: u32,
    ) -> Self {
        let info_columns = (0..INFO_COLUMN_COUNT)
            .map(|i| first_info_column.offset(i))
            .collect();
        let available_columns = (0..available_count)
            .map(|i| first_available_column.offset(i))
            .collect();

        Self {
            date_column,
            info_columns,
            available_columns,
            max_rows,
        }
    }

    pub fn date_column(&self) -> Column {
        self.date_column
    }

    pub fn info_columns(&self) -> &[Column] {
        &self.info_columns
    }

    pub fn available_columns(&self) -> &[Column] {
        &self.available_columns
    }

    #[allow(dead_code)]
    pub fn max_rows(&self) -> u32 {
        self.max_rows
    }

    /// The whole date column, row 1 through `max_rows`.
    pub fn date_range(&self) -> CellRange {
        CellRange::column(self.date_column, 1, self.max_rows)
    }

    pub fn info_range(&self, row: u32) -> CellRange {
        CellRange::new(
            self.info_columns[0],
            self.info_columns[self.info_columns.len() - 1],
            row,
            row,
        )
    }

    /// Every available column across `first_row..=last_row`.
    pub fn available_range(&self, first_row: u32, last_row: u32) -> CellRange {
        CellRange::new(
            self.available_columns[0],
            self.available_columns[self.available_columns.len() - 1],
            first_row,
            last_row,
        )
    }
}

impl Default for LedgerLayout {
    /// Dates in `A`, info in `B..D`, expenses in `E..Y`.
    fn default() -> Self {
        Self::new(
            Column::from_index(0),
            Column::from_index(1),
            Column::from_index(4),
            AVAILABLE_COLUMN_COUNT,
            DEFAULT_MAX_ROWS,
        )
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// One expense the user asked us to record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRecord {
    pub item: String,
    pub amount: String,
    pub date: CalendarDate,
}

/// Where an expense pair was written: item at `(column, row)`, amount at
/// `(column, row + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseSlot {
    pub row: u32,
    pub column: Column,
}

/// An item/amount pair read back from the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseEntry {
    pub item: String,
    pub amount: String,
}

/// The three info cells for a day, as the sheet renders them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetInfo {
    pub spent: String,
    pub remaining: String,
    pub saved: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(Column::from_index(0).letters(), "A");
        assert_eq!(Column::from_index(24).letters(), "Y");
        assert_eq!(Column::from_index(25).letters(), "Z");
        assert_eq!(Column::from_index(26).letters(), "AA");
        assert_eq!(Column::from_index(701).letters(), "ZZ");
        assert_eq!(Column::from_index(702).letters(), "AAA");
    }

    #[test]
    fn test_column_parse() {
        assert_eq!(Column::parse("A"), Some(Column::from_index(0)));
        assert_eq!(Column::parse("e"), Some(Column::from_index(4)));
        assert_eq!(Column::parse("AB"), Some(Column::from_index(27)));
        assert_eq!(Column::parse(""), None);
        assert_eq!(Column::parse("A1"), None);
    }

    #[test]
    fn test_default_layout() {
        let layout = LedgerLayout::default();
        let available: Vec<String> = layout
            .available_columns()
            .iter()
            .map(Column::letters)
            .collect();

        assert_eq!(layout.date_column().letters(), "A");
        assert_eq!(layout.info_columns().len(), 3);
        assert_eq!(available.len(), 21);
        assert_eq!(available.first().map(String::as_str), Some("E"));
        assert_eq!(available.last().map(String::as_str), Some("Y"));
    }

    #[test]
    fn test_ranges() {
        let layout = LedgerLayout::default();
        assert_eq!(layout.date_range().a1(), "A1:A9999");
        assert_eq!(layout.info_range(5).a1(), "B5:D5");
        assert_eq!(layout.available_range(5, 6).a1(), "E5:Y6");
        assert_eq!(layout.available_range(5, 6).width(), 21);
        assert_eq!(layout.available_range(5, 6).height(), 2);
    }
}
