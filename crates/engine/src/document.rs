use gridsheet_core::CellRange;
use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

/// The value store: an ordered 2-D grid of raw cell values.
///
/// Rows may be ragged in memory; reads treat missing trailing cells as empty,
/// so the document behaves as a rectangle of `col_count()` columns. The
/// document is owned by one editor session and replaced wholesale on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Document {
    rows: Vec<Vec<CellValue>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Build a document from display text; empty strings become empty cells.
    pub fn from_text_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = &'static str>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(CellValue::from_input).collect())
                .collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Value at a coordinate; `Empty` beyond the stored extent.
    pub fn get(&self, row: usize, col: usize) -> CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .cloned()
            .unwrap_or(CellValue::Empty)
    }

    /// Display text at a coordinate; empty string beyond the stored extent.
    pub fn raw(&self, row: usize, col: usize) -> String {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(CellValue::raw_display)
            .unwrap_or_default()
    }

    /// Set a value, growing the grid as needed to contain the coordinate.
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let r = &mut self.rows[row];
        if r.len() <= col {
            r.resize_with(col + 1, CellValue::default);
        }
        r[col] = value;
    }

    pub fn fill(&mut self, range: CellRange, value: &CellValue) {
        for (row, col) in range.iter() {
            self.set(row, col, value.clone());
        }
    }

    /// Clear a range to empty cells without shrinking the grid.
    pub fn clear_range(&mut self, range: CellRange) {
        for (row, col) in range.iter() {
            if let Some(r) = self.rows.get_mut(row) {
                if let Some(cell) = r.get_mut(col) {
                    *cell = CellValue::Empty;
                }
            }
        }
    }

    pub fn insert_row(&mut self, at: usize) {
        let at = at.min(self.rows.len());
        let width = self.col_count();
        self.rows.insert(at, vec![CellValue::Empty; width]);
    }

    pub fn delete_row(&mut self, at: usize) {
        if at < self.rows.len() {
            self.rows.remove(at);
        }
    }

    pub fn insert_col(&mut self, at: usize) {
        for row in &mut self.rows {
            let at = at.min(row.len());
            row.insert(at, CellValue::Empty);
        }
    }

    pub fn delete_col(&mut self, at: usize) {
        for row in &mut self.rows {
            if at < row.len() {
                row.remove(at);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::from_text_rows([["A", "B"], ["1", "2"]])
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let doc = Document::from_rows(vec![
            vec![CellValue::Text("A".to_string())],
            vec![CellValue::Text("C".to_string()), CellValue::Text("D".to_string())],
        ]);
        assert_eq!(doc.col_count(), 2);
        assert_eq!(doc.get(0, 1), CellValue::Empty);
        assert_eq!(doc.raw(0, 1), "");
        assert_eq!(doc.raw(1, 1), "D");
    }

    #[test]
    fn test_get_beyond_extent_is_empty() {
        let doc = sample();
        assert_eq!(doc.get(10, 10), CellValue::Empty);
        assert_eq!(doc.raw(10, 10), "");
    }

    #[test]
    fn test_set_grows_grid() {
        let mut doc = Document::new();
        doc.set(2, 3, CellValue::Text("X".to_string()));
        assert_eq!(doc.row_count(), 3);
        assert_eq!(doc.raw(2, 3), "X");
        assert_eq!(doc.get(0, 0), CellValue::Empty);
    }

    #[test]
    fn test_insert_and_delete_row() {
        let mut doc = sample();
        doc.insert_row(1);
        assert_eq!(doc.row_count(), 3);
        assert_eq!(doc.raw(0, 0), "A");
        assert_eq!(doc.raw(1, 0), "");
        assert_eq!(doc.raw(2, 0), "1");

        doc.delete_row(1);
        assert_eq!(doc.row_count(), 2);
        assert_eq!(doc.raw(1, 0), "1");
    }

    #[test]
    fn test_insert_and_delete_col() {
        let mut doc = sample();
        doc.insert_col(1);
        assert_eq!(doc.raw(0, 0), "A");
        assert_eq!(doc.raw(0, 1), "");
        assert_eq!(doc.raw(0, 2), "B");

        doc.delete_col(1);
        assert_eq!(doc.raw(0, 1), "B");
    }

    #[test]
    fn test_fill_and_clear_range() {
        let mut doc = sample();
        doc.fill(CellRange::new(0, 0, 1, 1), &CellValue::Text("z".to_string()));
        assert_eq!(doc.raw(0, 0), "z");
        assert_eq!(doc.raw(1, 1), "z");

        doc.clear_range(CellRange::new(0, 0, 0, 1));
        assert_eq!(doc.raw(0, 0), "");
        assert_eq!(doc.raw(1, 0), "z");
    }
}
