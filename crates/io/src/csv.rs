// CSV import/export with the embedded type-metadata sidecar

use std::collections::BTreeMap;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use gridsheet_engine::cell::{CellType, CellValue};
use gridsheet_engine::codec::{DecodedDocument, DocumentCodec};
use gridsheet_engine::document::Document;
use gridsheet_engine::style::StyleStore;
use gridsheet_engine::types::TypeRegistry;

use crate::format::CSV_MIME;

/// Literal prefix of the metadata marker line. A payload whose first line
/// starts with this carries base64 JSON type metadata; anything else is plain
/// CSV. Must be reproduced exactly for interoperability.
pub const METADATA_PREFIX: &str = "##GRIDMETA=";

/// Wire shape of the marker-line payload: `{"cells": {"<row>-<col>": {...}}}`
#[derive(Serialize, Deserialize)]
struct MetadataHeader {
    cells: BTreeMap<String, CellType>,
}

/// The CSV codec. Styles do not survive this format; only values and the
/// type registry round-trip.
pub struct CsvCodec;

impl DocumentCodec for CsvCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedDocument, String> {
        let text = text_from_bytes(bytes);
        Ok(decode(&text))
    }

    fn encode(
        &self,
        document: &Document,
        types: &TypeRegistry,
        _styles: &StyleStore,
    ) -> Result<Vec<u8>, String> {
        Ok(encode(document, types).into_bytes())
    }

    fn content_type(&self) -> &'static str {
        CSV_MIME
    }
}

/// Decode raw bytes to text, falling back to Windows-1252 when the input is
/// not valid UTF-8 (common for Excel-exported CSVs).
pub fn text_from_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

pub fn import(path: &Path) -> Result<DecodedDocument, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    CsvCodec.decode(&bytes)
}

pub fn export(
    document: &Document,
    types: &TypeRegistry,
    path: &Path,
) -> Result<(), String> {
    std::fs::write(path, encode(document, types)).map_err(|e| e.to_string())
}

/// Serialize document + registry. A non-empty registry yields a marker line
/// before the CSV body; an empty one yields plain CSV.
pub fn encode(document: &Document, types: &TypeRegistry) -> String {
    let mut out = String::new();

    if !types.is_empty() {
        let cells: BTreeMap<String, CellType> = types
            .entries()
            .into_iter()
            .map(|((row, col), ty)| (format!("{}-{}", row, col), ty))
            .collect();
        let header = MetadataHeader { cells };
        // BTreeMap keys make this deterministic; the shape is fixed, so
        // serialization cannot fail
        let json = serde_json::to_vec(&header).unwrap_or_default();
        out.push_str(METADATA_PREFIX);
        out.push_str(&BASE64.encode(json));
        out.push('\n');
    }

    let body: Vec<String> = document
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|value| quote_field(&value.raw_display()))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();
    out.push_str(&body.join("\n"));

    out
}

/// Parse CSV text into a document and type registry.
///
/// A corrupt marker line (bad base64, bad JSON, missing `cells`) is discarded
/// silently and treated as an ordinary data line; the caller never sees an
/// error for it.
pub fn decode(text: &str) -> DecodedDocument {
    let mut decoded = DecodedDocument::default();

    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let mut body_start = 0;
    if let Some(first) = lines.first() {
        if first.starts_with(METADATA_PREFIX) {
            if let Some(types) = parse_metadata_line(first) {
                decoded.types = types;
                body_start = 1;
            }
        }
    }

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    let body_blank = lines[body_start..].iter().all(|line| line.trim().is_empty());
    if !body_blank {
        for line in &lines[body_start..] {
            let fields: Vec<&str> = line.split(',').map(unquote_field).collect();
            if fields.iter().all(|f| f.is_empty()) {
                continue;
            }
            decoded.report.cells += fields.iter().filter(|f| !f.is_empty()).count();
            rows.push(fields.into_iter().map(CellValue::from_input).collect());
        }
    }

    // Empty input yields the starter document, not an empty grid
    decoded.document = if rows.is_empty() {
        starter_document()
    } else {
        Document::from_rows(rows)
    };
    decoded.report.types_applied = decoded.types.len();

    decoded
}

/// The built-in placeholder shown when there is nothing to decode.
pub fn starter_document() -> Document {
    Document::from_text_rows([["Column 1", "Column 2"], ["", ""]])
}

fn parse_metadata_line(line: &str) -> Option<TypeRegistry> {
    let payload = line.strip_prefix(METADATA_PREFIX)?;
    let json = BASE64.decode(payload.trim()).ok()?;
    let header: MetadataHeader = serde_json::from_slice(&json).ok()?;

    let mut types = TypeRegistry::new();
    for (key, ty) in header.cells {
        if let Some((row, col)) = parse_coord_key(&key) {
            types.set_single(row, col, ty);
        }
    }
    Some(types)
}

fn parse_coord_key(key: &str) -> Option<(usize, usize)> {
    let (row, col) = key.split_once('-')?;
    Some((row.parse().ok()?, col.parse().ok()?))
}

/// Quote a field for output when it contains a comma, quote, or newline;
/// internal quotes are doubled.
fn quote_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Strip one layer of surrounding quotes. Deliberately NOT the inverse of
/// `quote_field`: doubled internal quotes are left as-is, and fields are
/// split on every comma before this runs. Downstream behavior depends on the
/// asymmetry, so it stays.
fn unquote_field(field: &str) -> &str {
    if field.len() >= 2 && field.starts_with('"') && field.ends_with('"') {
        &field[1..field.len() - 1]
    } else {
        field
    }
}
