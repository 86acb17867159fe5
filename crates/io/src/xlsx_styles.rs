//! XLSX style parsing: per-cell formatting from styles.xml plus the style IDs
//! referenced by worksheet XML. Only the subset of formatting the style store
//! models is read; everything else in styles.xml is ignored.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use gridsheet_engine::cell::{Alignment, BorderStyle, CellBorder, CellStyle};

/// A cellXfs entry resolved against the font/fill/border component tables.
#[derive(Debug, Clone, Default)]
pub struct ResolvedStyle {
    pub style: CellStyle,
    /// Number format code attached to the xf, if any (custom or built-in)
    pub num_fmt: Option<String>,
}

/// Parsed style table from styles.xml — indexed by cellXfs position.
#[derive(Debug, Default)]
pub struct StyleTable {
    pub styles: Vec<ResolvedStyle>,
}

impl StyleTable {
    pub fn get(&self, id: usize) -> Option<&ResolvedStyle> {
        self.styles.get(id)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
struct ParsedFont {
    bold: bool,
    italic: bool,
    underline: bool,
    size: Option<f32>,
    color: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct ParsedBorder {
    top: Option<CellBorder>,
    right: Option<CellBorder>,
    bottom: Option<CellBorder>,
    left: Option<CellBorder>,
}

/// Convert an rgb attribute value to a CSS hex color. An 8-hex ARGB value
/// drops its alpha prefix; a 6-hex RGB value is used as-is; anything else
/// (indexed, theme, malformed) yields no color.
pub fn parse_color_value(rgb: &str) -> Option<String> {
    let hex = rgb.trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        8 => Some(format!("#{}", hex[2..].to_ascii_uppercase())),
        6 => Some(format!("#{}", hex.to_ascii_uppercase())),
        _ => None,
    }
}

fn attr_map(e: &BytesStart) -> HashMap<String, String> {
    e.attributes()
        .flatten()
        .map(|a| {
            (
                String::from_utf8_lossy(a.key.as_ref()).to_string(),
                String::from_utf8_lossy(&a.value).to_string(),
            )
        })
        .collect()
}

/// Parse styles.xml content into a StyleTable.
pub fn parse_styles_xml(xml: &str) -> StyleTable {
    let num_fmts = parse_num_fmts(xml);
    let fonts = parse_fonts(xml);
    let fills = parse_fills(xml);
    let borders = parse_borders(xml);
    let styles = parse_cell_xfs(xml, &num_fmts, &fonts, &fills, &borders);
    StyleTable { styles }
}

/// Number format codes for the built-in ids worth treating as numeric
/// patterns. Date/time builtins are deliberately absent: typed date cells
/// come from the value parser, not the style table.
fn builtin_num_fmt_code(id: u32) -> Option<&'static str> {
    Some(match id {
        1 => "0",
        2 => "0.00",
        3 | 37 | 38 => "#,##0",
        4 | 39 | 40 => "#,##0.00",
        9 => "0%",
        10 => "0.00%",
        44 => "$#,##0.00",
        _ => return None,
    })
}

/// Whether a format code renders dates or times (day/year/hour tokens outside
/// brackets and string literals).
pub fn is_date_like_format(code: &str) -> bool {
    let mut in_bracket = false;
    let mut in_literal = false;
    for c in code.chars() {
        match c {
            '[' if !in_literal => in_bracket = true,
            ']' if !in_literal => in_bracket = false,
            '"' => in_literal = !in_literal,
            'd' | 'D' | 'y' | 'Y' | 'h' | 'H' if !in_bracket && !in_literal => return true,
            _ => {}
        }
    }
    false
}

/// Parse <numFmts> → custom formatId → formatCode
fn parse_num_fmts(xml: &str) -> HashMap<u32, String> {
    let mut map = HashMap::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut in_num_fmts = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"numFmts" => in_num_fmts = true,
            Ok(Event::End(ref e)) if e.name().as_ref() == b"numFmts" => in_num_fmts = false,
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if in_num_fmts && e.name().as_ref() == b"numFmt" =>
            {
                let attrs = attr_map(e);
                if let (Some(id), Some(code)) = (
                    attrs.get("numFmtId").and_then(|v| v.parse().ok()),
                    attrs.get("formatCode"),
                ) {
                    map.insert(id, code.clone());
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    map
}

/// Parse <fonts> → per-font bold/italic/underline/size/color
fn parse_fonts(xml: &str) -> Vec<ParsedFont> {
    let mut fonts: Vec<ParsedFont> = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut in_fonts = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"fonts" => in_fonts = true,
            Ok(Event::End(ref e)) if e.name().as_ref() == b"fonts" => in_fonts = false,
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) if in_fonts => {
                match e.name().as_ref() {
                    b"font" => fonts.push(ParsedFont::default()),
                    b"b" => {
                        if let Some(font) = fonts.last_mut() {
                            font.bold = true;
                        }
                    }
                    b"i" => {
                        if let Some(font) = fonts.last_mut() {
                            font.italic = true;
                        }
                    }
                    b"u" => {
                        if let Some(font) = fonts.last_mut() {
                            font.underline = true;
                        }
                    }
                    b"sz" => {
                        if let Some(font) = fonts.last_mut() {
                            font.size = attr_map(e).get("val").and_then(|v| v.parse().ok());
                        }
                    }
                    b"color" => {
                        if let Some(font) = fonts.last_mut() {
                            font.color =
                                attr_map(e).get("rgb").and_then(|v| parse_color_value(v));
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    fonts
}

/// Parse <fills> → foreground color when a solid pattern fill exists
fn parse_fills(xml: &str) -> Vec<Option<String>> {
    let mut fills: Vec<Option<String>> = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut in_fills = false;
    let mut solid = false;
    let mut fg: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"fills" => in_fills = true,
            Ok(Event::End(ref e)) if e.name().as_ref() == b"fills" => in_fills = false,
            Ok(Event::Start(ref e)) if in_fills && e.name().as_ref() == b"fill" => {
                solid = false;
                fg = None;
            }
            Ok(Event::End(ref e)) if in_fills && e.name().as_ref() == b"fill" => {
                fills.push(if solid { fg.take() } else { None });
            }
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if in_fills && e.name().as_ref() == b"patternFill" =>
            {
                solid = attr_map(e).get("patternType").map(|t| t == "solid").unwrap_or(false);
            }
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if in_fills && e.name().as_ref() == b"fgColor" =>
            {
                fg = attr_map(e).get("rgb").and_then(|v| parse_color_value(v));
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    fills
}

/// Map an edge style attribute to a border: 2px for "thick", dashed rule for
/// "dashed", a thin solid rule for everything else.
fn edge_border(style: &str) -> CellBorder {
    CellBorder {
        width_px: if style == "thick" { 2 } else { 1 },
        style: if style == "dashed" { BorderStyle::Dashed } else { BorderStyle::Solid },
        color: "#000000".to_string(),
    }
}

/// Parse <borders> → per-border edge set
fn parse_borders(xml: &str) -> Vec<ParsedBorder> {
    #[derive(Clone, Copy, PartialEq)]
    enum Edge {
        Top,
        Right,
        Bottom,
        Left,
    }

    let mut borders: Vec<ParsedBorder> = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut in_borders = false;
    let mut current: Option<ParsedBorder> = None;
    let mut current_edge: Option<Edge> = None;

    loop {
        let event = reader.read_event_into(&mut buf);
        match event {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"borders" => in_borders = true,
            Ok(Event::End(ref e)) if e.name().as_ref() == b"borders" => in_borders = false,
            Ok(Event::Start(ref e)) if in_borders && e.name().as_ref() == b"border" => {
                current = Some(ParsedBorder::default());
            }
            Ok(Event::Empty(ref e)) if in_borders && e.name().as_ref() == b"border" => {
                borders.push(ParsedBorder::default());
            }
            Ok(Event::End(ref e)) if in_borders && e.name().as_ref() == b"border" => {
                if let Some(border) = current.take() {
                    borders.push(border);
                }
            }
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) if current.is_some() => {
                let edge = match e.name().as_ref() {
                    b"top" => Some(Edge::Top),
                    b"right" => Some(Edge::Right),
                    b"bottom" => Some(Edge::Bottom),
                    b"left" => Some(Edge::Left),
                    b"color" => None,
                    _ => None,
                };

                if let Some(edge) = edge {
                    let is_empty_elem = matches!(event, Ok(Event::Empty(_)));
                    if let Some(style) = attr_map(e).get("style") {
                        if style != "none" {
                            let parsed = edge_border(style);
                            if let Some(border) = current.as_mut() {
                                match edge {
                                    Edge::Top => border.top = Some(parsed),
                                    Edge::Right => border.right = Some(parsed),
                                    Edge::Bottom => border.bottom = Some(parsed),
                                    Edge::Left => border.left = Some(parsed),
                                }
                            }
                            if !is_empty_elem {
                                current_edge = Some(edge);
                            }
                        }
                    }
                } else if e.name().as_ref() == b"color" {
                    // Color child of an open edge element
                    if let (Some(edge), Some(border)) = (current_edge, current.as_mut()) {
                        if let Some(color) =
                            attr_map(e).get("rgb").and_then(|v| parse_color_value(v))
                        {
                            let slot = match edge {
                                Edge::Top => &mut border.top,
                                Edge::Right => &mut border.right,
                                Edge::Bottom => &mut border.bottom,
                                Edge::Left => &mut border.left,
                            };
                            if let Some(b) = slot.as_mut() {
                                b.color = color;
                            }
                        }
                    }
                }
            }
            Ok(Event::End(ref e))
                if matches!(e.name().as_ref(), b"top" | b"right" | b"bottom" | b"left") =>
            {
                current_edge = None;
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    borders
}

/// Parse <cellXfs>, resolving each <xf> against the component tables.
fn parse_cell_xfs(
    xml: &str,
    num_fmts: &HashMap<u32, String>,
    fonts: &[ParsedFont],
    fills: &[Option<String>],
    borders: &[ParsedBorder],
) -> Vec<ResolvedStyle> {
    let mut styles: Vec<ResolvedStyle> = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut in_cell_xfs = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"cellXfs" => in_cell_xfs = true,
            Ok(Event::End(ref e)) if e.name().as_ref() == b"cellXfs" => in_cell_xfs = false,
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if in_cell_xfs && e.name().as_ref() == b"xf" =>
            {
                let attrs = attr_map(e);
                let id = |key: &str| attrs.get(key).and_then(|v| v.parse::<usize>().ok());

                let mut resolved = ResolvedStyle::default();

                if let Some(font) = id("fontId").and_then(|i| fonts.get(i)) {
                    resolved.style.bold = font.bold;
                    resolved.style.italic = font.italic;
                    resolved.style.underline = font.underline;
                    resolved.style.font_size_px = font.size;
                    resolved.style.color = font.color.clone();
                }
                if let Some(fill) = id("fillId").and_then(|i| fills.get(i)) {
                    resolved.style.background_color = fill.clone();
                }
                if let Some(border) = id("borderId").and_then(|i| borders.get(i)) {
                    resolved.style.border_top = border.top.clone();
                    resolved.style.border_right = border.right.clone();
                    resolved.style.border_bottom = border.bottom.clone();
                    resolved.style.border_left = border.left.clone();
                }
                if let Some(fmt_id) = attrs.get("numFmtId").and_then(|v| v.parse::<u32>().ok()) {
                    resolved.num_fmt = num_fmts
                        .get(&fmt_id)
                        .cloned()
                        .or_else(|| builtin_num_fmt_code(fmt_id).map(str::to_string));
                }

                styles.push(resolved);
            }
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if in_cell_xfs && e.name().as_ref() == b"alignment" =>
            {
                if let Some(last) = styles.last_mut() {
                    last.style.align = match attr_map(e).get("horizontal").map(String::as_str) {
                        Some("left") => Some(Alignment::Left),
                        Some("center") => Some(Alignment::Center),
                        Some("right") => Some(Alignment::Right),
                        _ => None,
                    };
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    styles
}

/// Extract `(row, col, style_id)` for every cell in a worksheet XML that
/// carries a style reference.
pub fn parse_cell_style_refs(xml: &str) -> Vec<(usize, usize, usize)> {
    let mut refs = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) if e.name().as_ref() == b"c" => {
                let attrs = attr_map(e);
                let coord = attrs.get("r").and_then(|r| gridsheet_core::parse_cell_ref(r));
                let style_id = attrs.get("s").and_then(|s| s.parse::<usize>().ok());
                if let (Some((row, col)), Some(id)) = (coord, style_id) {
                    refs.push((row, col, id));
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES_XML: &str = r#"<?xml version="1.0"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <numFmts count="1">
    <numFmt numFmtId="164" formatCode="$#,##0.00"/>
  </numFmts>
  <fonts count="3">
    <font><sz val="11"/><color theme="1"/><name val="Calibri"/></font>
    <font><b/><i/><sz val="14"/><color rgb="FFFF0000"/></font>
    <font><u/><color rgb="112233"/></font>
  </fonts>
  <fills count="3">
    <fill><patternFill patternType="none"/></fill>
    <fill><patternFill patternType="gray125"/></fill>
    <fill><patternFill patternType="solid"><fgColor rgb="FFCCDDEE"/><bgColor indexed="64"/></patternFill></fill>
  </fills>
  <borders count="2">
    <border><left/><right/><top/><bottom/><diagonal/></border>
    <border>
      <left style="thin"><color rgb="FF0000FF"/></left>
      <right style="dashed"/>
      <top style="thick"><color rgb="FF000000"/></top>
      <bottom/>
    </border>
  </borders>
  <cellXfs count="4">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
    <xf numFmtId="0" fontId="1" fillId="2" borderId="0" applyFont="1" applyFill="1">
      <alignment horizontal="center"/>
    </xf>
    <xf numFmtId="164" fontId="0" fillId="0" borderId="0" applyNumberFormat="1"/>
    <xf numFmtId="0" fontId="2" fillId="0" borderId="1" applyBorder="1"/>
  </cellXfs>
</styleSheet>"#;

    #[test]
    fn test_color_value_rules() {
        // 8-hex ARGB drops the alpha prefix
        assert_eq!(parse_color_value("FFAABBCC"), Some("#AABBCC".to_string()));
        // 6-hex RGB passes through
        assert_eq!(parse_color_value("aabbcc"), Some("#AABBCC".to_string()));
        // Anything else yields no color, never a black default
        assert_eq!(parse_color_value("auto"), None);
        assert_eq!(parse_color_value("FFF"), None);
        assert_eq!(parse_color_value(""), None);
    }

    #[test]
    fn test_parse_font_and_fill() {
        let table = parse_styles_xml(STYLES_XML);
        assert_eq!(table.len(), 4);

        let styled = &table.get(1).unwrap().style;
        assert!(styled.bold);
        assert!(styled.italic);
        assert!(!styled.underline);
        assert_eq!(styled.font_size_px, Some(14.0));
        assert_eq!(styled.color.as_deref(), Some("#FF0000"));
        assert_eq!(styled.background_color.as_deref(), Some("#CCDDEE"));
        assert_eq!(styled.align, Some(Alignment::Center));

        // Theme colors yield no color at all
        let default = &table.get(0).unwrap().style;
        assert!(default.color.is_none());
        assert!(default.background_color.is_none());
        assert!(default.is_empty());
    }

    #[test]
    fn test_parse_borders() {
        let table = parse_styles_xml(STYLES_XML);
        let style = &table.get(3).unwrap().style;

        let left = style.border_left.as_ref().unwrap();
        assert_eq!(left.width_px, 1);
        assert_eq!(left.style, BorderStyle::Solid);
        assert_eq!(left.color, "#0000FF");

        let right = style.border_right.as_ref().unwrap();
        assert_eq!(right.style, BorderStyle::Dashed);
        assert_eq!(right.width_px, 1);

        let top = style.border_top.as_ref().unwrap();
        assert_eq!(top.width_px, 2);
        assert_eq!(top.style, BorderStyle::Solid);

        assert!(style.border_bottom.is_none());

        // Underline came through from the font
        assert!(style.underline);
        assert_eq!(style.color.as_deref(), Some("#112233"));
    }

    #[test]
    fn test_num_fmt_resolution() {
        let table = parse_styles_xml(STYLES_XML);
        assert_eq!(table.get(0).unwrap().num_fmt, None);
        assert_eq!(table.get(2).unwrap().num_fmt.as_deref(), Some("$#,##0.00"));
    }

    #[test]
    fn test_date_like_format_detection() {
        assert!(is_date_like_format("mm/dd/yyyy"));
        assert!(is_date_like_format("h:mm:ss"));
        assert!(!is_date_like_format("$#,##0.00"));
        assert!(!is_date_like_format("0.00%"));
        // Bracketed sections and literals don't count
        assert!(!is_date_like_format("[Red]#,##0"));
        assert!(!is_date_like_format("#,##0\" dollars\""));
    }

    #[test]
    fn test_cell_style_refs() {
        let xml = r#"<worksheet><sheetData>
            <row r="1"><c r="A1" s="1" t="s"><v>0</v></c><c r="B1"><v>5</v></c></row>
            <row r="2"><c r="B2" s="3"/></row>
        </sheetData></worksheet>"#;
        let refs = parse_cell_style_refs(xml);
        assert_eq!(refs, vec![(0, 0, 1), (1, 1, 3)]);
    }
}
