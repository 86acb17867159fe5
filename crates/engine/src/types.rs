use gridsheet_core::CellRange;
use rustc_hash::FxHashMap;

use crate::cell::CellType;

/// Split a free-text comma-separated options string into stored dropdown
/// options: trimmed, empties dropped. May come back empty, in which case the
/// type command treats the whole thing as a no-op.
pub fn parse_dropdown_options(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sparse per-coordinate logical types. Absence means `Text`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeRegistry {
    cells: FxHashMap<(usize, usize), CellType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a type to every coordinate in the range (bulk, not interpolated).
    ///
    /// A `Dropdown` with no options is a silent no-op: the previous types are
    /// retained and no error is raised. Applying `Text` removes the entries,
    /// since `Text` is the default. Returns whether anything was applied.
    pub fn set_type(&mut self, range: CellRange, ty: CellType) -> bool {
        if let CellType::Dropdown { options } = &ty {
            if options.iter().all(|o| o.trim().is_empty()) {
                return false;
            }
        }

        for (row, col) in range.iter() {
            self.set_single(row, col, ty.clone());
        }
        true
    }

    /// Set one coordinate, applying the same guards as `set_type`.
    pub fn set_single(&mut self, row: usize, col: usize, ty: CellType) {
        if let CellType::Dropdown { options } = &ty {
            if options.iter().all(|o| o.trim().is_empty()) {
                return;
            }
        }
        if ty.is_text() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), ty);
        }
    }

    /// The type currently governing a coordinate; `Text` when unset.
    pub fn effective_type(&self, row: usize, col: usize) -> CellType {
        self.cells.get(&(row, col)).cloned().unwrap_or_default()
    }

    pub fn clear_type(&mut self, range: CellRange) {
        for coord in range.iter() {
            self.cells.remove(&coord);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(usize, usize), &CellType)> {
        self.cells.iter()
    }

    /// Snapshot sorted by coordinate, for deterministic serialization.
    pub fn entries(&self) -> Vec<((usize, usize), CellType)> {
        let mut out: Vec<_> = self.cells.iter().map(|(k, v)| (*k, v.clone())).collect();
        out.sort_by_key(|(coord, _)| *coord);
        out
    }

    pub fn insert_row(&mut self, at: usize) {
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .map(|((row, col), ty)| ((if row >= at { row + 1 } else { row }, col), ty))
            .collect();
    }

    pub fn delete_row(&mut self, at: usize) {
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .filter(|((row, _), _)| *row != at)
            .map(|((row, col), ty)| ((if row > at { row - 1 } else { row }, col), ty))
            .collect();
    }

    pub fn insert_col(&mut self, at: usize) {
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .map(|((row, col), ty)| ((row, if col >= at { col + 1 } else { col }), ty))
            .collect();
    }

    pub fn delete_col(&mut self, at: usize) {
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .filter(|((_, col), _)| *col != at)
            .map(|((row, col), ty)| ((row, if col > at { col - 1 } else { col }), ty))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dropdown_options() {
        assert_eq!(parse_dropdown_options("A, B ,C"), vec!["A", "B", "C"]);
        assert_eq!(parse_dropdown_options(" ,  , "), Vec::<String>::new());
        assert_eq!(parse_dropdown_options(""), Vec::<String>::new());
        // Duplicates are kept as supplied
        assert_eq!(parse_dropdown_options("X,X"), vec!["X", "X"]);
    }

    #[test]
    fn test_default_type_is_text() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.effective_type(3, 7), CellType::Text);
    }

    #[test]
    fn test_bulk_set_over_range() {
        let mut registry = TypeRegistry::new();
        registry.set_type(CellRange::new(0, 0, 1, 1), CellType::Checkbox);
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.effective_type(1, 1), CellType::Checkbox);
        assert_eq!(registry.effective_type(2, 0), CellType::Text);
    }

    #[test]
    fn test_empty_dropdown_is_silent_noop() {
        let mut registry = TypeRegistry::new();
        registry.set_type(CellRange::single(0, 0), CellType::date_default());

        let applied = registry.set_type(
            CellRange::single(0, 0),
            CellType::Dropdown { options: vec![] },
        );
        assert!(!applied);
        // Previous type retained
        assert_eq!(registry.effective_type(0, 0), CellType::date_default());

        let applied = registry.set_type(
            CellRange::single(0, 0),
            CellType::Dropdown { options: vec!["  ".to_string()] },
        );
        assert!(!applied);
        assert_eq!(registry.effective_type(0, 0), CellType::date_default());
    }

    #[test]
    fn test_kinds_are_exclusive() {
        let mut registry = TypeRegistry::new();
        let range = CellRange::single(2, 2);

        registry.set_type(
            range,
            CellType::Numeric { pattern: Some("$0,0.00".to_string()), culture: None },
        );
        registry.set_type(
            range,
            CellType::Dropdown { options: vec!["X".to_string(), "Y".to_string()] },
        );

        // No residual numeric fields: the coordinate holds exactly one kind
        assert_eq!(
            registry.effective_type(2, 2),
            CellType::Dropdown { options: vec!["X".to_string(), "Y".to_string()] }
        );
    }

    #[test]
    fn test_setting_text_removes_entry() {
        let mut registry = TypeRegistry::new();
        registry.set_type(CellRange::single(0, 0), CellType::Checkbox);
        registry.set_type(CellRange::single(0, 0), CellType::Text);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clear_type_range() {
        let mut registry = TypeRegistry::new();
        registry.set_type(CellRange::new(0, 0, 2, 2), CellType::Checkbox);
        registry.clear_type(CellRange::new(0, 0, 1, 2));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.effective_type(2, 1), CellType::Checkbox);
        assert_eq!(registry.effective_type(0, 0), CellType::Text);
    }

    #[test]
    fn test_row_ops_remap_coordinates() {
        let mut registry = TypeRegistry::new();
        registry.set_single(0, 0, CellType::Checkbox);
        registry.set_single(2, 0, CellType::date_default());

        registry.insert_row(1);
        assert_eq!(registry.effective_type(0, 0), CellType::Checkbox);
        assert_eq!(registry.effective_type(3, 0), CellType::date_default());

        registry.delete_row(0);
        assert_eq!(registry.effective_type(0, 0), CellType::Text);
        assert_eq!(registry.effective_type(2, 0), CellType::date_default());
    }

    #[test]
    fn test_col_ops_remap_coordinates() {
        let mut registry = TypeRegistry::new();
        registry.set_single(0, 1, CellType::Checkbox);

        registry.insert_col(0);
        assert_eq!(registry.effective_type(0, 2), CellType::Checkbox);

        registry.delete_col(2);
        assert!(registry.is_empty());
    }
}
