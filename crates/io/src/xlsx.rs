// Excel workbook import/export for the editing core.
//
// Import reads the first sheet only: values through calamine, then styles,
// number formats, and list validations straight from the ZIP's XML. Export
// builds a fresh single-sheet workbook with rust_xlsxwriter. Neither
// direction is a full-fidelity round trip of Excel; only the state the
// editing core models survives.

use std::io::{Cursor, Read, Seek};

use calamine::{Data, Reader as CalamineReader, Xlsx};
use quick_xml::events::Event;
use quick_xml::Reader;
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatUnderline, Workbook as XlsxWorkbook,
};
use zip::ZipArchive;

use gridsheet_engine::cell::{
    coerce_checkbox, Alignment, BorderStyle, CellBorder, CellStyle, CellType, CellValue,
};
use gridsheet_engine::codec::{DecodedDocument, DocumentCodec};
use gridsheet_engine::document::Document;
use gridsheet_engine::style::StyleStore;
use gridsheet_engine::types::TypeRegistry;

use crate::format::WORKBOOK_MIME;
use crate::xlsx_styles::{is_date_like_format, parse_cell_style_refs, parse_styles_xml};
use crate::xlsx_validation::{dropdown_to_xlsx, parse_list_validations};

/// Import limits. Oversized sheets are truncated with a report warning, not
/// rejected.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub max_rows: usize,
    pub max_cols: usize,
    pub max_cells: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { max_rows: 65_536, max_cols: 256, max_cells: 1_000_000 }
    }
}

/// Export statistics.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub cells: usize,
    pub styled_cells: usize,
    pub validations: usize,
    pub validations_skipped: usize,
    pub warnings: Vec<String>,
}

/// The workbook codec.
pub struct XlsxCodec;

impl DocumentCodec for XlsxCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedDocument, String> {
        import_from_bytes(bytes)
    }

    fn encode(
        &self,
        document: &Document,
        types: &TypeRegistry,
        styles: &StyleStore,
    ) -> Result<Vec<u8>, String> {
        export_to_bytes(document, types, styles).map(|(bytes, _)| bytes)
    }

    fn content_type(&self) -> &'static str {
        WORKBOOK_MIME
    }
}

pub fn import_from_bytes(bytes: &[u8]) -> Result<DecodedDocument, String> {
    import_with_options(bytes, &ImportOptions::default())
}

pub fn import_with_options(
    bytes: &[u8],
    options: &ImportOptions,
) -> Result<DecodedDocument, String> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| format!("Failed to open workbook: {}", e))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first_sheet = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| "Workbook contains no sheets".to_string())?;

    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|e| format!("Failed to read sheet '{}': {}", first_sheet, e))?;

    let mut decoded = DecodedDocument::default();

    let (height, width) = range.get_size();
    if height > options.max_rows || width > options.max_cols {
        decoded.report.truncated = true;
        decoded.report.warnings.push(format!(
            "Sheet '{}' truncated from {}x{} to {}x{}",
            first_sheet,
            height,
            width,
            height.min(options.max_rows),
            width.min(options.max_cols)
        ));
    }

    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut total_cells = 0usize;
    let mut hit_cell_limit = false;

    'rows: for (row_idx, row) in range.rows().enumerate() {
        let target_row = start_row as usize + row_idx;
        if target_row >= options.max_rows {
            break;
        }

        for (col_idx, cell) in row.iter().enumerate() {
            let target_col = start_col as usize + col_idx;
            if target_col >= options.max_cols {
                break;
            }

            if total_cells >= options.max_cells {
                if !hit_cell_limit {
                    hit_cell_limit = true;
                    decoded.report.truncated = true;
                    decoded.report.warnings.push(format!(
                        "Import stopped at {} cells (limit reached)",
                        options.max_cells
                    ));
                }
                break 'rows;
            }

            match cell {
                Data::Empty => {}
                Data::String(s) => {
                    if !s.is_empty() {
                        decoded.document.set(target_row, target_col, CellValue::Text(s.clone()));
                        decoded.report.cells += 1;
                        total_cells += 1;
                    }
                }
                Data::Float(n) => {
                    decoded.document.set(target_row, target_col, CellValue::Number(*n));
                    decoded.report.cells += 1;
                    total_cells += 1;
                }
                Data::Int(n) => {
                    decoded.document.set(target_row, target_col, CellValue::Number(*n as f64));
                    decoded.report.cells += 1;
                    total_cells += 1;
                }
                Data::Bool(b) => {
                    decoded.document.set(target_row, target_col, CellValue::Bool(*b));
                    decoded.types.set_single(target_row, target_col, CellType::Checkbox);
                    decoded.report.cells += 1;
                    decoded.report.types_applied += 1;
                    total_cells += 1;
                }
                Data::Error(e) => {
                    let error_str = format!("#{:?}", e);
                    decoded.document.set(target_row, target_col, CellValue::Text(error_str));
                    decoded.report.cells += 1;
                    total_cells += 1;
                }
                Data::DateTime(dt) => {
                    // Native dates become ISO text tagged with the default
                    // date pattern; the on-sheet format string never refines
                    // the stored pattern beyond it
                    let value = match dt.as_datetime() {
                        Some(datetime) => {
                            let iso = if datetime.time() == chrono::NaiveTime::MIN {
                                datetime.format("%Y-%m-%d").to_string()
                            } else {
                                datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
                            };
                            decoded
                                .types
                                .set_single(target_row, target_col, CellType::date_default());
                            decoded.report.types_applied += 1;
                            CellValue::Text(iso)
                        }
                        None => CellValue::Number(dt.as_f64()),
                    };
                    decoded.document.set(target_row, target_col, value);
                    decoded.report.cells += 1;
                    total_cells += 1;
                }
                Data::DateTimeIso(s) => {
                    decoded.document.set(target_row, target_col, CellValue::Text(s.clone()));
                    decoded.types.set_single(target_row, target_col, CellType::date_default());
                    decoded.report.cells += 1;
                    decoded.report.types_applied += 1;
                    total_cells += 1;
                }
                Data::DurationIso(s) => {
                    decoded.document.set(target_row, target_col, CellValue::Text(s.clone()));
                    decoded.report.cells += 1;
                    total_cells += 1;
                }
            }
        }
    }

    // Styles, number formats and validations come straight from the ZIP; a
    // failure here degrades to an unstyled import rather than failing it
    import_formatting(bytes, options, &mut decoded);

    Ok(decoded)
}

/// Best-effort pass over the ZIP XML for styles, numeric formats and list
/// validations.
fn import_formatting(bytes: &[u8], options: &ImportOptions, decoded: &mut DecodedDocument) {
    let mut archive = match ZipArchive::new(Cursor::new(bytes)) {
        Ok(a) => a,
        Err(e) => {
            decoded.report.warnings.push(format!("Formatting skipped: {}", e));
            return;
        }
    };

    let sheet_path = find_first_worksheet_path(&mut archive)
        .unwrap_or_else(|_| "xl/worksheets/sheet1.xml".to_string());
    let sheet_xml = match read_zip_file(&mut archive, &sheet_path) {
        Ok(xml) => xml,
        Err(e) => {
            decoded.report.warnings.push(format!("Formatting skipped: {}", e));
            return;
        }
    };

    if let Ok(styles_xml) = read_zip_file(&mut archive, "xl/styles.xml") {
        let table = parse_styles_xml(&styles_xml);

        for (row, col, style_id) in parse_cell_style_refs(&sheet_xml) {
            if row >= options.max_rows || col >= options.max_cols {
                continue;
            }
            let Some(resolved) = table.get(style_id) else { continue };

            if !resolved.style.is_empty() {
                decoded.styles.set_single(row, col, resolved.style.clone());
                decoded.report.styles_applied += 1;
            }

            // A non-date number format on a numeric cell becomes a numeric
            // type; date-formatted cells were already typed by the value pass
            if let Some(code) = &resolved.num_fmt {
                if !is_date_like_format(code)
                    && matches!(decoded.document.get(row, col), CellValue::Number(_))
                    && decoded.types.effective_type(row, col).is_text()
                {
                    decoded.types.set_single(
                        row,
                        col,
                        CellType::Numeric {
                            pattern: Some(numeric_pattern_from_xlsx(code)),
                            culture: None,
                        },
                    );
                    decoded.report.types_applied += 1;
                }
            }
        }
    }

    let (validations, skipped) = parse_list_validations(&sheet_xml);
    decoded.report.validations_skipped += skipped;
    for validation in validations {
        let end_row = validation.range.end_row.min(options.max_rows - 1);
        let end_col = validation.range.end_col.min(options.max_cols - 1);
        for row in validation.range.start_row..=end_row {
            for col in validation.range.start_col..=end_col {
                decoded.types.set_single(
                    row,
                    col,
                    CellType::Dropdown { options: validation.options.clone() },
                );
            }
        }
        decoded.report.validations_imported += 1;
    }
}

pub fn export_to_bytes(
    document: &Document,
    types: &TypeRegistry,
    styles: &StyleStore,
) -> Result<(Vec<u8>, ExportReport), String> {
    let mut report = ExportReport::default();
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook.add_worksheet();

    for (row, cells) in document.rows().iter().enumerate() {
        let row32 = row as u32;
        for (col, value) in cells.iter().enumerate() {
            let col16 = col as u16;
            let ty = types.effective_type(row, col);
            let style = styles.get(row, col);
            let format = build_cell_format(style, &ty);
            if format.is_some() {
                report.styled_cells += 1;
            }

            let write_error = |e| format!("Failed to write cell ({}, {}): {}", row, col, e);

            if matches!(ty, CellType::Checkbox) {
                let checked = coerce_checkbox(value);
                match &format {
                    Some(f) => worksheet
                        .write_boolean_with_format(row32, col16, checked, f)
                        .map_err(write_error)?,
                    None => worksheet.write_boolean(row32, col16, checked).map_err(write_error)?,
                };
                report.cells += 1;
                continue;
            }

            match (value, &format) {
                (CellValue::Number(n), Some(f)) => {
                    worksheet.write_number_with_format(row32, col16, *n, f).map_err(write_error)?;
                }
                (CellValue::Number(n), None) => {
                    worksheet.write_number(row32, col16, *n).map_err(write_error)?;
                }
                (CellValue::Bool(b), Some(f)) => {
                    worksheet.write_boolean_with_format(row32, col16, *b, f).map_err(write_error)?;
                }
                (CellValue::Bool(b), None) => {
                    worksheet.write_boolean(row32, col16, *b).map_err(write_error)?;
                }
                (value, Some(f)) => {
                    // Text and empty cells alike: the row is written verbatim
                    worksheet
                        .write_string_with_format(row32, col16, &value.raw_display(), f)
                        .map_err(write_error)?;
                }
                (value, None) => {
                    worksheet
                        .write_string(row32, col16, &value.raw_display())
                        .map_err(write_error)?;
                }
            }
            report.cells += 1;
        }
    }

    // Styled cells outside the document's stored extent still carry formatting
    for (&(row, col), style) in styles.iter() {
        let covered = document
            .rows()
            .get(row)
            .map(|r| col < r.len())
            .unwrap_or(false);
        if covered {
            continue;
        }
        if let Some(format) = build_cell_format(Some(style), &types.effective_type(row, col)) {
            worksheet
                .write_blank(row as u32, col as u16, &format)
                .map_err(|e| format!("Failed to write cell ({}, {}): {}", row, col, e))?;
            report.styled_cells += 1;
        }
    }

    // Dropdowns become list validations; a list the library rejects is
    // skipped, never fatal
    for ((row, col), ty) in types.entries() {
        if let CellType::Dropdown { options } = ty {
            match dropdown_to_xlsx(&options) {
                Ok(dv) => {
                    worksheet
                        .add_data_validation(row as u32, col as u16, row as u32, col as u16, &dv)
                        .map_err(|e| format!("Failed to add validation: {}", e))?;
                    report.validations += 1;
                }
                Err(e) => {
                    report.validations_skipped += 1;
                    report.warnings.push(e);
                }
            }
        }
    }

    let bytes = workbook
        .save_to_buffer()
        .map_err(|e| format!("Failed to build workbook: {}", e))?;

    Ok((bytes, report))
}

/// Translate an internal numeric pattern ("$0,0.00") to the workbook's
/// format-token syntax ("$#,##0.00").
fn numeric_pattern_to_xlsx(pattern: &str) -> String {
    pattern.replace("0,0", "#,##0")
}

/// Inverse mapping for import.
fn numeric_pattern_from_xlsx(code: &str) -> String {
    code.replace("#,##0", "0,0")
}

fn hex_to_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().map(Color::RGB)
}

fn border_to_xlsx(border: &CellBorder) -> FormatBorder {
    match (border.width_px, border.style) {
        (_, BorderStyle::Dashed) => FormatBorder::Dashed,
        (2, _) => FormatBorder::Thick,
        _ => FormatBorder::Thin,
    }
}

/// Build the cell's Format from its style and type; None when the cell needs
/// no format record at all.
fn build_cell_format(style: Option<&CellStyle>, ty: &CellType) -> Option<Format> {
    let num_format = match ty {
        CellType::Numeric { pattern: Some(pattern), .. } => {
            Some(numeric_pattern_to_xlsx(pattern))
        }
        CellType::Date { pattern } => Some(pattern.to_lowercase()),
        _ => None,
    };

    if style.is_none() && num_format.is_none() {
        return None;
    }

    let mut format = Format::new();

    if let Some(style) = style {
        if style.bold {
            format = format.set_bold();
        }
        if style.italic {
            format = format.set_italic();
        }
        if style.underline {
            format = format.set_underline(FormatUnderline::Single);
        }
        if let Some(size) = style.font_size_px {
            format = format.set_font_size(size as f64);
        }
        if let Some(color) = style.color.as_deref().and_then(hex_to_color) {
            format = format.set_font_color(color);
        }
        if let Some(color) = style.background_color.as_deref().and_then(hex_to_color) {
            format = format.set_background_color(color);
        }
        format = match style.align {
            Some(Alignment::Left) => format.set_align(FormatAlign::Left),
            Some(Alignment::Center) => format.set_align(FormatAlign::Center),
            Some(Alignment::Right) => format.set_align(FormatAlign::Right),
            None => format,
        };

        if let Some(border) = &style.border_top {
            format = format.set_border_top(border_to_xlsx(border));
            if let Some(color) = hex_to_color(&border.color) {
                format = format.set_border_top_color(color);
            }
        }
        if let Some(border) = &style.border_right {
            format = format.set_border_right(border_to_xlsx(border));
            if let Some(color) = hex_to_color(&border.color) {
                format = format.set_border_right_color(color);
            }
        }
        if let Some(border) = &style.border_bottom {
            format = format.set_border_bottom(border_to_xlsx(border));
            if let Some(color) = hex_to_color(&border.color) {
                format = format.set_border_bottom_color(color);
            }
        }
        if let Some(border) = &style.border_left {
            format = format.set_border_left(border_to_xlsx(border));
            if let Some(color) = hex_to_color(&border.color) {
                format = format.set_border_left_color(color);
            }
        }
    }

    if let Some(code) = num_format {
        format = format.set_num_format(&code);
    }

    Some(format)
}

// ----------------------------------------------------------------------
// ZIP plumbing
// ----------------------------------------------------------------------

fn read_zip_file<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<String, String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| format!("File '{}' not found in workbook: {}", path, e))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| format!("Failed to read '{}': {}", path, e))?;

    Ok(content)
}

/// Resolve the first sheet's worksheet XML path through workbook.xml and its
/// relationships part.
fn find_first_worksheet_path<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<String, String> {
    let workbook_xml = read_zip_file(archive, "xl/workbook.xml")?;
    let rid = find_first_sheet_rid(&workbook_xml)?;

    let rels_xml = read_zip_file(archive, "xl/_rels/workbook.xml.rels")?;
    let target = find_relationship_target(&rels_xml, &rid)?;

    // Target is relative to xl/ unless rooted
    Ok(match target.strip_prefix('/') {
        Some(rooted) => rooted.to_string(),
        None => format!("xl/{}", target),
    })
}

fn find_first_sheet_rid(workbook_xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(workbook_xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"sheet" =>
            {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"r:id" {
                        return Ok(String::from_utf8_lossy(&attr.value).to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("XML parse error: {}", e)),
            _ => {}
        }
        buf.clear();
    }

    Err("No sheets found in workbook.xml".to_string())
}

fn find_relationship_target(rels_xml: &str, rid: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(rels_xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let mut id = None;
                let mut target = None;

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = Some(String::from_utf8_lossy(&attr.value).to_string()),
                        b"Target" => {
                            target = Some(String::from_utf8_lossy(&attr.value).to_string())
                        }
                        _ => {}
                    }
                }

                if id.as_deref() == Some(rid) {
                    if let Some(t) = target {
                        return Ok(t);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("XML parse error: {}", e)),
            _ => {}
        }
        buf.clear();
    }

    Err(format!("Relationship '{}' not found", rid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsheet_core::CellRange;
    use gridsheet_engine::style::{BorderApplyMode, BorderLine};
    use rust_xlsxwriter::ExcelDateTime;

    #[test]
    fn test_pattern_translation() {
        assert_eq!(numeric_pattern_to_xlsx("$0,0.00"), "$#,##0.00");
        assert_eq!(numeric_pattern_to_xlsx("0,0"), "#,##0");
        assert_eq!(numeric_pattern_to_xlsx("0.00"), "0.00");

        assert_eq!(numeric_pattern_from_xlsx("$#,##0.00"), "$0,0.00");
        assert_eq!(numeric_pattern_from_xlsx("#,##0"), "0,0");
        assert_eq!(numeric_pattern_from_xlsx("0%"), "0%");
    }

    #[test]
    fn test_malformed_bytes_fail_cleanly() {
        let result = import_from_bytes(b"this is not a workbook");
        assert!(result.is_err());
    }

    #[test]
    fn test_workbook_round_trip() {
        // Mixed checkbox, dropdown, numeric and styled cells survive an
        // in-memory export/import cycle
        let document = Document::from_rows(vec![vec![
            CellValue::Bool(true),
            CellValue::Text("Open".to_string()),
            CellValue::Number(1234.5),
            CellValue::Text("Title".to_string()),
        ]]);

        let mut types = TypeRegistry::new();
        types.set_single(0, 0, CellType::Checkbox);
        types.set_single(
            0,
            1,
            CellType::Dropdown { options: vec!["Open".to_string(), "Closed".to_string()] },
        );
        types.set_single(
            0,
            2,
            CellType::Numeric { pattern: Some("$0,0.00".to_string()), culture: None },
        );

        let mut styles = StyleStore::new();
        styles.set_bold(CellRange::single(0, 3), true);
        styles.set_align(CellRange::single(0, 3), Alignment::Center);

        let (bytes, report) = export_to_bytes(&document, &types, &styles).unwrap();
        assert_eq!(report.validations, 1);

        let decoded = import_from_bytes(&bytes).unwrap();

        // Boolean value came back as a checkbox cell
        assert_eq!(decoded.document.get(0, 0), CellValue::Bool(true));
        assert_eq!(decoded.types.effective_type(0, 0), CellType::Checkbox);

        // Dropdown options survived the validation round trip
        assert_eq!(
            decoded.types.effective_type(0, 1),
            CellType::Dropdown { options: vec!["Open".to_string(), "Closed".to_string()] }
        );

        // Numeric pattern translated out and back
        assert_eq!(decoded.document.get(0, 2), CellValue::Number(1234.5));
        assert_eq!(
            decoded.types.effective_type(0, 2),
            CellType::Numeric { pattern: Some("$0,0.00".to_string()), culture: None }
        );

        // Bold + centered style flags restored
        let style = decoded.styles.get(0, 3).expect("styled cell");
        assert!(style.bold);
        assert_eq!(style.align, Some(Alignment::Center));
    }

    #[test]
    fn test_border_round_trip_including_dashed() {
        let document = Document::from_text_rows([["x"]]);
        let types = TypeRegistry::new();
        let mut styles = StyleStore::new();
        styles.apply_borders(CellRange::single(0, 0), BorderApplyMode::Top, BorderLine::Thick);
        styles.apply_borders(CellRange::single(0, 0), BorderApplyMode::Left, BorderLine::Dashed);

        let (bytes, _) = export_to_bytes(&document, &types, &styles).unwrap();
        let decoded = import_from_bytes(&bytes).unwrap();

        let style = decoded.styles.get(0, 0).expect("bordered cell");
        let top = style.border_top.as_ref().unwrap();
        assert_eq!(top.width_px, 2);
        assert_eq!(top.style, BorderStyle::Solid);

        let left = style.border_left.as_ref().unwrap();
        assert_eq!(left.width_px, 1);
        assert_eq!(left.style, BorderStyle::Dashed);

        assert!(style.border_bottom.is_none());
        assert!(style.border_right.is_none());
    }

    #[test]
    fn test_native_date_imports_as_iso_with_date_type() {
        let mut workbook = XlsxWorkbook::new();
        let worksheet = workbook.add_worksheet();
        let date = ExcelDateTime::from_ymd(2024, 1, 15).unwrap();
        let format = Format::new().set_num_format("mm/dd/yyyy");
        worksheet.write_datetime_with_format(0, 0, &date, &format).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let decoded = import_from_bytes(&bytes).unwrap();
        assert_eq!(decoded.document.get(0, 0), CellValue::Text("2024-01-15".to_string()));
        assert_eq!(decoded.types.effective_type(0, 0), CellType::date_default());
    }

    #[test]
    fn test_checkbox_coercion_on_export() {
        // Text values under a checkbox type coerce through the permissive
        // heuristic; everything unrecognized exports as unchecked
        let document = Document::from_text_rows([["yes", "x", "0", "nope"]]);
        let mut types = TypeRegistry::new();
        for col in 0..4 {
            types.set_single(0, col, CellType::Checkbox);
        }

        let (bytes, _) = export_to_bytes(&document, &types, &StyleStore::new()).unwrap();
        let decoded = import_from_bytes(&bytes).unwrap();

        assert_eq!(decoded.document.get(0, 0), CellValue::Bool(true));
        assert_eq!(decoded.document.get(0, 1), CellValue::Bool(true));
        assert_eq!(decoded.document.get(0, 2), CellValue::Bool(false));
        assert_eq!(decoded.document.get(0, 3), CellValue::Bool(false));
    }

    #[test]
    fn test_row_truncation_with_warning() {
        let document = Document::from_text_rows([["a"], ["b"], ["c"]]);
        let (bytes, _) =
            export_to_bytes(&document, &TypeRegistry::new(), &StyleStore::new()).unwrap();

        let options = ImportOptions { max_rows: 2, ..Default::default() };
        let decoded = import_with_options(&bytes, &options).unwrap();

        assert!(decoded.report.truncated);
        assert!(!decoded.report.warnings.is_empty());
        assert_eq!(decoded.document.row_count(), 2);
    }

    #[test]
    fn test_styled_cell_outside_document_extent() {
        let document = Document::from_text_rows([["a"]]);
        let mut styles = StyleStore::new();
        styles.set_bold(CellRange::single(2, 2), true);

        let (bytes, _) = export_to_bytes(&document, &TypeRegistry::new(), &styles).unwrap();
        let decoded = import_from_bytes(&bytes).unwrap();

        assert!(decoded.styles.get(2, 2).expect("blank styled cell").bold);
        assert_eq!(decoded.document.get(2, 2), CellValue::Empty);
    }
}
