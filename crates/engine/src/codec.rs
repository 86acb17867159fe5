use crate::document::Document;
use crate::style::StyleStore;
use crate::types::TypeRegistry;

/// What a codec decoded from a byte source.
#[derive(Debug, Default)]
pub struct DecodedDocument {
    pub document: Document,
    pub types: TypeRegistry,
    pub styles: StyleStore,
    pub report: DecodeReport,
}

/// Per-decode statistics for the host's status surface.
#[derive(Debug, Default)]
pub struct DecodeReport {
    pub cells: usize,
    pub types_applied: usize,
    pub styles_applied: usize,
    pub validations_imported: usize,
    pub validations_skipped: usize,
    /// Whether rows/columns/cells were dropped to stay within import limits
    pub truncated: bool,
    /// Actionable warnings (not boilerplate)
    pub warnings: Vec<String>,
}

impl DecodeReport {
    /// Returns a summary message suitable for display
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} cells", self.cells)];
        if self.types_applied > 0 {
            parts.push(format!("{} typed", self.types_applied));
        }
        if self.styles_applied > 0 {
            parts.push(format!("{} styled", self.styles_applied));
        }
        if self.validations_imported > 0 {
            parts.push(format!("{} dropdowns", self.validations_imported));
        }
        if self.truncated {
            parts.push("truncated".to_string());
        }
        parts.join(" · ")
    }

    pub fn has_warnings(&self) -> bool {
        self.truncated || !self.warnings.is_empty()
    }
}

/// A serialization format for the editing core's combined state.
///
/// The session depends only on this interface; concrete codecs (CSV with the
/// metadata sidecar, the XLSX workbook codec) live behind it, so swapping the
/// format library touches nothing else.
pub trait DocumentCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedDocument, String>;

    fn encode(
        &self,
        document: &Document,
        types: &TypeRegistry,
        styles: &StyleStore,
    ) -> Result<Vec<u8>, String>;

    /// MIME type of the payload this codec produces.
    fn content_type(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_summary() {
        let report = DecodeReport {
            cells: 10,
            types_applied: 2,
            validations_imported: 1,
            ..Default::default()
        };
        assert_eq!(report.summary(), "10 cells · 2 typed · 1 dropdowns");
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_report_flags_truncation() {
        let report = DecodeReport { cells: 5, truncated: true, ..Default::default() };
        assert!(report.summary().contains("truncated"));
        assert!(report.has_warnings());
    }
}
