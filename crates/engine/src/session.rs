use gridsheet_core::CellRange;

use crate::cell::{Alignment, CellType, CellValue};
use crate::codec::{DecodeReport, DecodedDocument, DocumentCodec};
use crate::document::Document;
use crate::render::{renderer_for, CellRenderer, GridSurface};
use crate::style::{BorderApplyMode, BorderLine, StyleStore};
use crate::types::{parse_dropdown_options, TypeRegistry};

/// An edit operation the host UI hands to the session.
#[derive(Debug, Clone)]
pub enum Op {
    SetValue { row: usize, col: usize, value: String },
    Paste { row: usize, col: usize, rows: Vec<Vec<String>> },
    Fill { range: CellRange, value: String },
    Cut { range: CellRange },
    InsertRow { at: usize },
    DeleteRow { at: usize },
    InsertCol { at: usize },
    DeleteCol { at: usize },
}

/// One editing session: the document plus its type registry and style store,
/// the unsaved-changes flag, and the staging area for decoded metadata.
///
/// The session is the single mutator; the registry and style store are the
/// durable source of truth for per-cell metadata, and the external grid
/// widget's shadow copy is re-asserted from here whenever it may have reset.
#[derive(Debug, Default)]
pub struct Session {
    document: Document,
    types: TypeRegistry,
    styles: StyleStore,
    dirty: bool,
    pending: Option<TypeRegistry>,
    last_report: Option<DecodeReport>,
    last_load_key: Option<String>,
    selection: Option<CellRange>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn styles(&self) -> &StyleStore {
        &self.styles
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn effective_type(&self, row: usize, col: usize) -> CellType {
        self.types.effective_type(row, col)
    }

    pub fn renderer_for(&self, row: usize, col: usize) -> CellRenderer {
        renderer_for(&self.types.effective_type(row, col))
    }

    /// Display text for a cell: type-aware, presentation only.
    pub fn display_value(&self, row: usize, col: usize) -> String {
        crate::render::display_value(
            &self.document.get(row, col),
            &self.types.effective_type(row, col),
        )
    }

    // ------------------------------------------------------------------
    // Loading and saving
    // ------------------------------------------------------------------

    /// Decode `bytes` with `codec` and replace the whole session state.
    ///
    /// `key` identifies the logical source (e.g. file id + name): a repeated
    /// call with an unchanged key is a no-op returning `Ok(false)`, so an
    /// in-flight or just-completed load is never re-run. A failed decode
    /// leaves the previous state untouched. A successful load discards any
    /// unsaved edits without merging.
    pub fn load(
        &mut self,
        key: &str,
        bytes: &[u8],
        codec: &dyn DocumentCodec,
    ) -> Result<bool, String> {
        if self.last_load_key.as_deref() == Some(key) {
            return Ok(false);
        }
        let decoded = codec.decode(bytes)?;
        self.install(decoded);
        self.last_load_key = Some(key.to_string());
        Ok(true)
    }

    /// Install decoded state wholesale. Never sets the dirty flag.
    pub fn install(&mut self, decoded: DecodedDocument) {
        self.pending = Some(decoded.types.clone());
        self.document = decoded.document;
        self.types = decoded.types;
        self.styles = decoded.styles;
        self.last_report = Some(decoded.report);
        self.dirty = false;
    }

    pub fn last_decode_report(&self) -> Option<&DecodeReport> {
        self.last_report.as_ref()
    }

    /// Push staged metadata into a freshly-initialized grid, exactly once.
    /// Returns whether anything was staged.
    pub fn apply_pending(&mut self, surface: &mut dyn GridSurface) -> bool {
        match self.pending.take() {
            Some(pending) => {
                for (&(row, col), ty) in pending.iter() {
                    surface.set_renderer(row, col, renderer_for(ty));
                }
                true
            }
            None => false,
        }
    }

    /// Re-assert the full registry into the widget. The widget's internal
    /// metadata cache can be reset by its own lifecycle (scroll
    /// virtualization, re-render); the registry wins any disagreement.
    pub fn reassert(&self, surface: &mut dyn GridSurface) {
        for (&(row, col), ty) in self.types.iter() {
            surface.set_renderer(row, col, renderer_for(ty));
        }
    }

    /// Encode the current state and mark the session clean.
    pub fn save(&mut self, codec: &dyn DocumentCodec) -> Result<Vec<u8>, String> {
        let bytes = self.export(codec)?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Encode the current state without touching the dirty flag.
    pub fn export(&self, codec: &dyn DocumentCodec) -> Result<Vec<u8>, String> {
        codec.encode(&self.document, &self.types, &self.styles)
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn select(&mut self, range: CellRange) {
        self.selection = Some(range);
    }

    pub fn deselect(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<CellRange> {
        self.selection
    }

    // ------------------------------------------------------------------
    // Value edits
    // ------------------------------------------------------------------

    pub fn set_value(&mut self, row: usize, col: usize, input: &str) {
        self.document.set(row, col, CellValue::from_input(input));
        self.dirty = true;
    }

    pub fn paste(&mut self, row: usize, col: usize, rows: &[Vec<String>]) {
        for (dr, paste_row) in rows.iter().enumerate() {
            for (dc, value) in paste_row.iter().enumerate() {
                self.document.set(row + dr, col + dc, CellValue::from_input(value));
            }
        }
        self.dirty = true;
    }

    pub fn fill(&mut self, range: CellRange, input: &str) {
        self.document.fill(range, &CellValue::from_input(input));
        self.dirty = true;
    }

    /// Clear a range, returning the removed block as display text.
    pub fn cut(&mut self, range: CellRange) -> Vec<Vec<String>> {
        let block: Vec<Vec<String>> = (range.start_row..=range.end_row)
            .map(|row| {
                (range.start_col..=range.end_col)
                    .map(|col| self.document.raw(row, col))
                    .collect()
            })
            .collect();
        self.document.clear_range(range);
        self.dirty = true;
        block
    }

    pub fn insert_row(&mut self, at: usize) {
        self.document.insert_row(at);
        self.types.insert_row(at);
        self.styles.insert_row(at);
        self.dirty = true;
    }

    pub fn delete_row(&mut self, at: usize) {
        self.document.delete_row(at);
        self.types.delete_row(at);
        self.styles.delete_row(at);
        self.dirty = true;
    }

    pub fn insert_col(&mut self, at: usize) {
        self.document.insert_col(at);
        self.types.insert_col(at);
        self.styles.insert_col(at);
        self.dirty = true;
    }

    pub fn delete_col(&mut self, at: usize) {
        self.document.delete_col(at);
        self.types.delete_col(at);
        self.styles.delete_col(at);
        self.dirty = true;
    }

    /// Apply a batch of edit operations in order.
    pub fn apply_ops(&mut self, ops: &[Op]) {
        for op in ops {
            match op {
                Op::SetValue { row, col, value } => self.set_value(*row, *col, value),
                Op::Paste { row, col, rows } => self.paste(*row, *col, rows),
                Op::Fill { range, value } => self.fill(*range, value),
                Op::Cut { range } => {
                    self.cut(*range);
                }
                Op::InsertRow { at } => self.insert_row(*at),
                Op::DeleteRow { at } => self.delete_row(*at),
                Op::InsertCol { at } => self.insert_col(*at),
                Op::DeleteCol { at } => self.delete_col(*at),
            }
        }
    }

    // ------------------------------------------------------------------
    // Type commands
    // ------------------------------------------------------------------

    pub fn set_type(&mut self, range: CellRange, ty: CellType) {
        if self.types.set_type(range, ty) {
            self.dirty = true;
        }
    }

    /// Set a dropdown from the command's free-text options input. Zero
    /// options after trimming leaves the previous types in place.
    pub fn set_dropdown(&mut self, range: CellRange, raw_options: &str) {
        let options = parse_dropdown_options(raw_options);
        if options.is_empty() {
            return;
        }
        self.set_type(range, CellType::Dropdown { options });
    }

    pub fn clear_type(&mut self, range: CellRange) {
        self.types.clear_type(range);
        self.dirty = true;
    }

    // ------------------------------------------------------------------
    // Style commands
    // ------------------------------------------------------------------

    pub fn set_bold(&mut self, range: CellRange, value: bool) {
        self.styles.set_bold(range, value);
        self.dirty = true;
    }

    pub fn toggle_bold(&mut self, range: CellRange) {
        self.styles.toggle_bold(range);
        self.dirty = true;
    }

    pub fn set_italic(&mut self, range: CellRange, value: bool) {
        self.styles.set_italic(range, value);
        self.dirty = true;
    }

    pub fn toggle_italic(&mut self, range: CellRange) {
        self.styles.toggle_italic(range);
        self.dirty = true;
    }

    pub fn set_underline(&mut self, range: CellRange, value: bool) {
        self.styles.set_underline(range, value);
        self.dirty = true;
    }

    pub fn toggle_underline(&mut self, range: CellRange) {
        self.styles.toggle_underline(range);
        self.dirty = true;
    }

    pub fn set_align(&mut self, range: CellRange, align: Alignment) {
        self.styles.set_align(range, align);
        self.dirty = true;
    }

    pub fn clear_align(&mut self, range: CellRange) {
        self.styles.clear_align(range);
        self.dirty = true;
    }

    pub fn set_text_color(&mut self, range: CellRange, color: &str) {
        self.styles.set_text_color(range, color);
        self.dirty = true;
    }

    pub fn set_background_color(&mut self, range: CellRange, color: &str) {
        self.styles.set_background_color(range, color);
        self.dirty = true;
    }

    pub fn set_font_size(&mut self, range: CellRange, px: f32) {
        self.styles.set_font_size(range, px);
        self.dirty = true;
    }

    pub fn apply_borders(&mut self, range: CellRange, mode: BorderApplyMode, line: BorderLine) {
        self.styles.apply_borders(range, mode, line);
        self.dirty = true;
    }
}
