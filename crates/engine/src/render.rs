use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::cell::{CellType, CellValue};

/// How the external grid widget should render a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRenderer {
    Text,
    Checkbox,
}

/// The widget boundary. The widget's own per-cell metadata cache is not
/// authoritative; the session pushes renderer assignments through this trait
/// whenever the widget may have reset (initial load, re-render, scroll
/// virtualization).
pub trait GridSurface {
    fn set_renderer(&mut self, row: usize, col: usize, renderer: CellRenderer);
}

pub fn renderer_for(ty: &CellType) -> CellRenderer {
    match ty {
        CellType::Checkbox => CellRenderer::Checkbox,
        _ => CellRenderer::Text,
    }
}

/// Display text for a cell given its effective type. Presentation only: the
/// stored value is never mutated by this step.
pub fn display_value(value: &CellValue, ty: &CellType) -> String {
    match ty {
        CellType::Date { .. } => format_date_display(value),
        _ => value.raw_display(),
    }
}

/// Format a stored date-cell value as MM/DD/YYYY for display.
///
/// Accepts an already-formatted MM/DD/YYYY string (passed through), a numeric
/// epoch-milliseconds value, or a parseable date/datetime string. Anything
/// else falls back to the raw stringified value.
pub fn format_date_display(value: &CellValue) -> String {
    let raw = value.raw_display();

    if is_mdy_formatted(&raw) {
        return raw;
    }

    if let CellValue::Number(n) = value {
        if let Some(dt) = DateTime::from_timestamp_millis(*n as i64) {
            return dt.format("%m/%d/%Y").to_string();
        }
        return raw;
    }

    if let Some(formatted) = parse_date_text(&raw) {
        return formatted;
    }

    raw
}

/// Exact MM/DD/YYYY shape: ten chars, digits with slashes at 2 and 5.
fn is_mdy_formatted(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes[2] == b'/'
        && bytes[5] == b'/'
        && bytes.iter().enumerate().all(|(i, b)| {
            if i == 2 || i == 5 { *b == b'/' } else { b.is_ascii_digit() }
        })
}

fn parse_date_text(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.format("%m/%d/%Y").to_string());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.format("%m/%d/%Y").to_string());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.format("%m/%d/%Y").to_string());
    }

    // Epoch-like numeric text
    if let Ok(n) = s.parse::<i64>() {
        if let Some(dt) = DateTime::from_timestamp_millis(n) {
            return Some(dt.format("%m/%d/%Y").to_string());
        }
    }

    None
}
