use gridsheet_core::CellRange;
use rustc_hash::FxHashMap;

use crate::cell::{Alignment, CellBorder, CellStyle};

/// Border application mode for a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderApplyMode {
    /// All 4 edges of every cell in the selection
    All,
    /// Only the outer perimeter of the selection
    Outline,
    /// Only internal edges (not the outer perimeter)
    Inside,
    /// Top edge of the selection
    Top,
    /// Bottom edge of the selection
    Bottom,
    /// Left edge of the selection
    Left,
    /// Right edge of the selection
    Right,
    /// Clear all borders from the selection
    Clear,
}

/// Line weight/style parameter for border commands. "Dashed" is a thin dashed
/// rule; there is no thick dashed variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderLine {
    Thin,
    Thick,
    Dashed,
}

impl BorderLine {
    fn to_border(self) -> CellBorder {
        match self {
            BorderLine::Thin => CellBorder::thin("#000000"),
            BorderLine::Thick => CellBorder::thick("#000000"),
            BorderLine::Dashed => CellBorder::dashed("#000000"),
        }
    }
}

/// Sparse per-coordinate visual styles. A coordinate whose style becomes
/// empty is removed from the map, never kept as `{}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleStore {
    cells: FxHashMap<(usize, usize), CellStyle>,
}

impl StyleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&CellStyle> {
        self.cells.get(&(row, col))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(usize, usize), &CellStyle)> {
        self.cells.iter()
    }

    /// Install a whole style for one coordinate (codec import path).
    pub fn set_single(&mut self, row: usize, col: usize, style: CellStyle) {
        if style.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), style);
        }
    }

    fn modify<F: FnMut(&mut CellStyle)>(&mut self, range: CellRange, mut f: F) {
        for (row, col) in range.iter() {
            let style = self.cells.entry((row, col)).or_default();
            f(style);
            if style.is_empty() {
                self.cells.remove(&(row, col));
            }
        }
    }

    pub fn set_bold(&mut self, range: CellRange, value: bool) {
        self.modify(range, |s| s.bold = value);
    }

    pub fn set_italic(&mut self, range: CellRange, value: bool) {
        self.modify(range, |s| s.italic = value);
    }

    pub fn set_underline(&mut self, range: CellRange, value: bool) {
        self.modify(range, |s| s.underline = value);
    }

    /// Uniform toggle: if every cell in the range already has the flag, clear
    /// it everywhere; otherwise set it everywhere.
    pub fn toggle_bold(&mut self, range: CellRange) {
        let target = !self.all(range, |s| s.bold);
        self.set_bold(range, target);
    }

    pub fn toggle_italic(&mut self, range: CellRange) {
        let target = !self.all(range, |s| s.italic);
        self.set_italic(range, target);
    }

    pub fn toggle_underline(&mut self, range: CellRange) {
        let target = !self.all(range, |s| s.underline);
        self.set_underline(range, target);
    }

    fn all<F: Fn(&CellStyle) -> bool>(&self, range: CellRange, f: F) -> bool {
        range.iter().all(|(row, col)| {
            self.cells.get(&(row, col)).map(&f).unwrap_or(false)
        })
    }

    /// Alignments are mutually exclusive: applying one replaces any other
    /// alignment previously set for the coordinate.
    pub fn set_align(&mut self, range: CellRange, align: Alignment) {
        self.modify(range, |s| s.align = Some(align));
    }

    pub fn clear_align(&mut self, range: CellRange) {
        self.modify(range, |s| s.align = None);
    }

    pub fn set_text_color(&mut self, range: CellRange, color: &str) {
        let color = color.to_string();
        self.modify(range, |s| s.color = Some(color.clone()));
    }

    pub fn clear_text_color(&mut self, range: CellRange) {
        self.modify(range, |s| s.color = None);
    }

    pub fn set_background_color(&mut self, range: CellRange, color: &str) {
        let color = color.to_string();
        self.modify(range, |s| s.background_color = Some(color.clone()));
    }

    pub fn clear_background_color(&mut self, range: CellRange) {
        self.modify(range, |s| s.background_color = None);
    }

    pub fn set_font_size(&mut self, range: CellRange, px: f32) {
        self.modify(range, |s| s.font_size_px = Some(px));
    }

    pub fn clear_font_size(&mut self, range: CellRange) {
        self.modify(range, |s| s.font_size_px = None);
    }

    /// Apply one of the selection-level border operations. Idempotent for a
    /// given `(range, mode, line)`.
    pub fn apply_borders(&mut self, range: CellRange, mode: BorderApplyMode, line: BorderLine) {
        let border = line.to_border();
        match mode {
            BorderApplyMode::All => {
                self.modify(range, |s| {
                    s.border_top = Some(border.clone());
                    s.border_right = Some(border.clone());
                    s.border_bottom = Some(border.clone());
                    s.border_left = Some(border.clone());
                });
            }
            BorderApplyMode::Outline => {
                for col in range.start_col..=range.end_col {
                    self.modify(CellRange::single(range.start_row, col), |s| {
                        s.border_top = Some(border.clone());
                    });
                    self.modify(CellRange::single(range.end_row, col), |s| {
                        s.border_bottom = Some(border.clone());
                    });
                }
                for row in range.start_row..=range.end_row {
                    self.modify(CellRange::single(row, range.start_col), |s| {
                        s.border_left = Some(border.clone());
                    });
                    self.modify(CellRange::single(row, range.end_col), |s| {
                        s.border_right = Some(border.clone());
                    });
                }
            }
            BorderApplyMode::Inside => {
                for (row, col) in range.iter() {
                    self.modify(CellRange::single(row, col), |s| {
                        if row < range.end_row {
                            s.border_bottom = Some(border.clone());
                        }
                        if col < range.end_col {
                            s.border_right = Some(border.clone());
                        }
                    });
                }
            }
            BorderApplyMode::Top => {
                for col in range.start_col..=range.end_col {
                    self.modify(CellRange::single(range.start_row, col), |s| {
                        s.border_top = Some(border.clone());
                    });
                }
            }
            BorderApplyMode::Bottom => {
                for col in range.start_col..=range.end_col {
                    self.modify(CellRange::single(range.end_row, col), |s| {
                        s.border_bottom = Some(border.clone());
                    });
                }
            }
            BorderApplyMode::Left => {
                for row in range.start_row..=range.end_row {
                    self.modify(CellRange::single(row, range.start_col), |s| {
                        s.border_left = Some(border.clone());
                    });
                }
            }
            BorderApplyMode::Right => {
                for row in range.start_row..=range.end_row {
                    self.modify(CellRange::single(row, range.end_col), |s| {
                        s.border_right = Some(border.clone());
                    });
                }
            }
            BorderApplyMode::Clear => {
                self.modify(range, |s| {
                    s.border_top = None;
                    s.border_right = None;
                    s.border_bottom = None;
                    s.border_left = None;
                });
            }
        }
    }

    pub fn insert_row(&mut self, at: usize) {
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .map(|((row, col), s)| ((if row >= at { row + 1 } else { row }, col), s))
            .collect();
    }

    pub fn delete_row(&mut self, at: usize) {
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .filter(|((row, _), _)| *row != at)
            .map(|((row, col), s)| ((if row > at { row - 1 } else { row }, col), s))
            .collect();
    }

    pub fn insert_col(&mut self, at: usize) {
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .map(|((row, col), s)| ((row, if col >= at { col + 1 } else { col }), s))
            .collect();
    }

    pub fn delete_col(&mut self, at: usize) {
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .filter(|((_, col), _)| *col != at)
            .map(|((row, col), s)| ((row, if col > at { col - 1 } else { col }), s))
            .collect();
    }
}
