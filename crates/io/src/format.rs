// Codec selection from a filename / content-type hint and a byte sniff

use gridsheet_engine::codec::DocumentCodec;

use crate::csv::CsvCodec;
use crate::xlsx::XlsxCodec;

pub const CSV_MIME: &str = "text/csv";
pub const WORKBOOK_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const WORKBOOK_EXTENSION: &str = ".xlsx";

/// ZIP local-file-header signature; XLSX containers always start with it.
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Workbook,
}

/// Pick a format for an opaque byte source. Workbook wins on the extension,
/// the known MIME type, or the ZIP signature; everything else is CSV.
pub fn detect_format(name: &str, content_type: Option<&str>, bytes: &[u8]) -> FileFormat {
    if name.to_ascii_lowercase().ends_with(WORKBOOK_EXTENSION) {
        return FileFormat::Workbook;
    }
    if content_type.is_some_and(|ct| ct.contains(WORKBOOK_MIME)) {
        return FileFormat::Workbook;
    }
    if bytes.len() >= 4 && bytes[..4] == ZIP_MAGIC {
        return FileFormat::Workbook;
    }
    FileFormat::Csv
}

pub fn codec_for(format: FileFormat) -> Box<dyn DocumentCodec> {
    match format {
        FileFormat::Csv => Box::new(CsvCodec),
        FileFormat::Workbook => Box::new(XlsxCodec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(detect_format("report.XLSX", None, b""), FileFormat::Workbook);
        assert_eq!(detect_format("report.csv", None, b""), FileFormat::Csv);
        assert_eq!(detect_format("report.txt", None, b""), FileFormat::Csv);
    }

    #[test]
    fn test_detect_by_content_type() {
        assert_eq!(
            detect_format("blob", Some(WORKBOOK_MIME), b""),
            FileFormat::Workbook
        );
        assert_eq!(detect_format("blob", Some("text/csv"), b""), FileFormat::Csv);
    }

    #[test]
    fn test_detect_by_zip_signature() {
        assert_eq!(
            detect_format("blob", None, &[0x50, 0x4B, 0x03, 0x04, 0x00]),
            FileFormat::Workbook
        );
        assert_eq!(detect_format("blob", None, b"a,b,c"), FileFormat::Csv);
        assert_eq!(detect_format("blob", None, b"PK"), FileFormat::Csv);
    }

    #[test]
    fn test_codec_content_types() {
        use gridsheet_engine::codec::DocumentCodec as _;
        assert_eq!(codec_for(FileFormat::Csv).content_type(), CSV_MIME);
        assert_eq!(codec_for(FileFormat::Workbook).content_type(), WORKBOOK_MIME);
    }
}
