use serde::{Deserialize, Serialize};

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Border line style
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
}

/// A single border edge: 1px or 2px, solid or dashed, CSS hex color.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CellBorder {
    pub width_px: u8,
    pub style: BorderStyle,
    pub color: String,
}

impl CellBorder {
    pub fn thin(color: &str) -> Self {
        Self { width_px: 1, style: BorderStyle::Solid, color: color.to_string() }
    }

    pub fn thick(color: &str) -> Self {
        Self { width_px: 2, style: BorderStyle::Solid, color: color.to_string() }
    }

    pub fn dashed(color: &str) -> Self {
        Self { width_px: 1, style: BorderStyle::Dashed, color: color.to_string() }
    }
}

/// Default pattern stored for date-typed cells.
pub const DEFAULT_DATE_PATTERN: &str = "MM/DD/YYYY";

/// The logical type governing a cell coordinate.
///
/// A coordinate carries exactly one kind at a time: assigning a new kind
/// replaces whatever parameters the previous kind stored. Absence from the
/// registry means `Text`.
///
/// Serialized internally tagged (`{"kind":"dropdown","options":[...]}`), which
/// is the wire shape of the CSV metadata header.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CellType {
    #[default]
    Text,
    Numeric {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        culture: Option<String>,
    },
    Date {
        pattern: String,
    },
    Dropdown {
        options: Vec<String>,
    },
    Checkbox,
}

impl CellType {
    pub fn date_default() -> Self {
        CellType::Date { pattern: DEFAULT_DATE_PATTERN.to_string() }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, CellType::Text)
    }
}

/// Visual attributes for one cell, independent of the cell's value and
/// logical type. A style equal to `Default` is considered empty and is never
/// retained in the style store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CellStyle {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size_px: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_top: Option<CellBorder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_right: Option<CellBorder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<CellBorder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_left: Option<CellBorder>,
}

impl CellStyle {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A raw cell value.
///
/// User edits always land as `Text` (or `Empty`) with no coercion: whatever
/// was typed is what is stored and round-tripped. `Number` and `Bool` are
/// produced by the workbook codec, which reads typed scalars.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn from_input(input: &str) -> Self {
        if input.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(input.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The stored value as display text, with no type-aware formatting.
    pub fn raw_display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Bool(b) => (if *b { "true" } else { "false" }).to_string(),
        }
    }
}

/// Coerce a raw value to a boolean for checkbox cells.
///
/// Permissive on purpose: "true" (any case), "1", "yes", "y" and "x" all read
/// as checked; any other text, zero, and empty read as unchecked.
pub fn coerce_checkbox(value: &CellValue) -> bool {
    match value {
        CellValue::Bool(b) => *b,
        CellValue::Number(n) => *n != 0.0,
        CellValue::Text(s) => {
            let t = s.trim().to_ascii_lowercase();
            matches!(t.as_str(), "true" | "1" | "yes" | "y" | "x")
        }
        CellValue::Empty => false,
    }
}
