//! XLSX data-validation support for dropdown cells.
//!
//! Import reads `<dataValidation type="list">` elements whose formula is a
//! quoted literal comma-list (`"A,B,C"`) and turns them into dropdown types;
//! every other validation shape (range/named-range lists, numeric, date,
//! custom) is counted and ignored. Export goes the other way through
//! rust_xlsxwriter, which handles the comma-join and quote escaping.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;
use rust_xlsxwriter::DataValidation;

use gridsheet_core::{parse_range_ref, CellRange};

/// A list validation parsed from worksheet XML.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedListValidation {
    pub range: CellRange,
    pub options: Vec<String>,
}

/// Convert dropdown options to an Excel list validation.
pub fn dropdown_to_xlsx(options: &[String]) -> Result<DataValidation, String> {
    let refs: Vec<&str> = options.iter().map(|s| s.as_str()).collect();
    DataValidation::new()
        .allow_list_strings(&refs)
        .map_err(|e| format!("Failed to build list validation: {}", e))
}

/// Parse `<dataValidation>` elements from worksheet XML.
///
/// Returns the imported list validations and the count of validations that
/// were skipped as unsupported.
pub fn parse_list_validations(xml: &str) -> (Vec<ImportedListValidation>, usize) {
    let mut validations = Vec::new();
    let mut skipped = 0usize;

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut in_validation = false;
    let mut attrs: HashMap<String, String> = HashMap::new();
    let mut formula1: Option<String> = None;
    let mut in_formula1 = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"dataValidation" => {
                in_validation = true;
                formula1 = None;
                attrs = e
                    .attributes()
                    .flatten()
                    .map(|a| {
                        (
                            String::from_utf8_lossy(a.key.as_ref()).to_string(),
                            String::from_utf8_lossy(&a.value).to_string(),
                        )
                    })
                    .collect();
            }
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"dataValidation" => {
                // Self-closing: no formula, nothing to import
                skipped += 1;
            }
            Ok(Event::Start(ref e)) if in_validation && e.name().as_ref() == b"formula1" => {
                in_formula1 = true;
            }
            Ok(Event::Text(ref e)) if in_formula1 => {
                formula1 = Some(e.unescape().unwrap_or_default().to_string());
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"formula1" => {
                in_formula1 = false;
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"dataValidation" => {
                in_validation = false;

                let is_list = attrs.get("type").map(|t| t == "list").unwrap_or(false);
                let options = formula1.as_deref().and_then(parse_list_options);

                match (is_list, options, attrs.get("sqref")) {
                    (true, Some(options), Some(sqref)) => {
                        let ranges = parse_sqref(sqref);
                        if ranges.is_empty() {
                            skipped += 1;
                        }
                        for range in ranges {
                            validations.push(ImportedListValidation {
                                range,
                                options: options.clone(),
                            });
                        }
                    }
                    _ => skipped += 1,
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    (validations, skipped)
}

/// Parse a quoted literal comma-list formula (`"A,B,C"`) into trimmed,
/// non-empty options. Range references and anything else yield None.
fn parse_list_options(formula1: &str) -> Option<Vec<String>> {
    let formula1 = formula1.trim();

    if formula1.len() < 2 || !formula1.starts_with('"') || !formula1.ends_with('"') {
        return None;
    }

    let inner = &formula1[1..formula1.len() - 1];
    let options: Vec<String> = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if options.is_empty() {
        None
    } else {
        Some(options)
    }
}

/// Parse an sqref attribute into ranges. sqref can hold several
/// space-separated references: "A1:A10 C1:C10".
fn parse_sqref(sqref: &str) -> Vec<CellRange> {
    sqref.split_whitespace().filter_map(parse_range_ref).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_options_inline() {
        assert_eq!(
            parse_list_options("\"Yes,No,Maybe\""),
            Some(vec!["Yes".to_string(), "No".to_string(), "Maybe".to_string()])
        );
        // Entries are trimmed, empties dropped
        assert_eq!(
            parse_list_options("\" A , ,B \""),
            Some(vec!["A".to_string(), "B".to_string()])
        );
    }

    #[test]
    fn test_parse_list_options_rejects_non_literals() {
        assert_eq!(parse_list_options("$A$1:$A$10"), None);
        assert_eq!(parse_list_options("StatusOptions"), None);
        assert_eq!(parse_list_options("\"\""), None);
        assert_eq!(parse_list_options("\" , \""), None);
        assert_eq!(parse_list_options(""), None);
    }

    #[test]
    fn test_parse_sqref() {
        assert_eq!(parse_sqref("A1"), vec![CellRange::single(0, 0)]);
        assert_eq!(
            parse_sqref("A1:A10 C1:C10"),
            vec![CellRange::new(0, 0, 9, 0), CellRange::new(0, 2, 9, 2)]
        );
        assert!(parse_sqref("").is_empty());
    }

    #[test]
    fn test_parse_validations_from_xml() {
        let xml = r#"<worksheet><sheetData/>
          <dataValidations count="3">
            <dataValidation type="list" allowBlank="1" sqref="B2:B4">
              <formula1>"Open, In Progress, Closed"</formula1>
            </dataValidation>
            <dataValidation type="list" sqref="C1">
              <formula1>$A$1:$A$10</formula1>
            </dataValidation>
            <dataValidation type="whole" operator="between" sqref="D1">
              <formula1>1</formula1><formula2>10</formula2>
            </dataValidation>
          </dataValidations>
        </worksheet>"#;

        let (validations, skipped) = parse_list_validations(xml);
        assert_eq!(validations.len(), 1);
        assert_eq!(validations[0].range, CellRange::new(1, 1, 3, 1));
        assert_eq!(validations[0].options, vec!["Open", "In Progress", "Closed"]);
        // Range-sourced list and numeric validation are both ignored
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_multi_sqref_fans_out() {
        let xml = r#"<worksheet>
          <dataValidation type="list" sqref="A1 B5">
            <formula1>"X,Y"</formula1>
          </dataValidation>
        </worksheet>"#;
        let (validations, skipped) = parse_list_validations(xml);
        assert_eq!(validations.len(), 2);
        assert_eq!(validations[0].range, CellRange::single(0, 0));
        assert_eq!(validations[1].range, CellRange::single(4, 1));
        assert_eq!(skipped, 0);
    }
}
