//! First-column fill colours of the first worksheet
//!
//! calamine only exposes cell values, so the fills are read straight from the
//! package: `xl/styles.xml` gives `cellXfs[s].fillId → fills[fillId].fgColor`,
//! and the worksheet XML gives the style index `s` of every `A` cell.

use std::collections::HashMap;
use std::io::{BufReader, Cursor, Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use zip::ZipArchive;

use crate::error::{StoresError, StoresResult};

/// Row index (0-based) → ARGB fill of the row's first cell
pub type RowFills = HashMap<u32, String>;

/// Read the fills of column A of the first worksheet
pub fn read_first_column_fills(bytes: &[u8]) -> StoresResult<RowFills> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| StoresError::Parse(format!("Not an xlsx package: {}", e)))?;

    let Some(sheet_path) = first_sheet_path(&mut archive)? else {
        return Ok(RowFills::new());
    };
    let styles = read_styles(&mut archive)?;

    let file = match archive.by_name(&sheet_path) {
        Ok(f) => f,
        Err(_) => return Err(StoresError::Parse(format!("Missing part: {}", sheet_path))),
    };
    read_sheet_fills(file, &styles)
}

/// Resolved style table: xf index → fill colour (if the fill has one)
#[derive(Debug, Default)]
struct StyleFills {
    fills: Vec<Option<String>>,
    xf_fill_ids: Vec<usize>,
}

impl StyleFills {
    fn color_for_xf(&self, xf: usize) -> Option<&str> {
        let fill_id = *self.xf_fill_ids.get(xf)?;
        self.fills.get(fill_id)?.as_deref()
    }
}

fn xml_error(part: &str, e: quick_xml::Error) -> StoresError {
    StoresError::Parse(format!("Malformed {}: {}", part, e))
}

fn attr_value(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.to_string()))
}

/// Normalise `rgb` attribute values to upper-case ARGB
fn normalize_argb(rgb: &str) -> Option<String> {
    let hex = rgb.trim_start_matches('#').to_ascii_uppercase();
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        8 => Some(hex),
        6 => Some(format!("FF{}", hex)),
        _ => None,
    }
}

/// Path of the first `<sheet>` listed in workbook.xml, resolved through its rels
fn first_sheet_path<R: Read + Seek>(archive: &mut ZipArchive<R>) -> StoresResult<Option<String>> {
    let first_rid = {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| StoresError::Parse("Missing part: xl/workbook.xml".to_string()))?;
        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rid = None;
        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"sheet" =>
                {
                    rid = attr_value(&e, b"r:id");
                    break;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error("xl/workbook.xml", e)),
                _ => {}
            }
            buf.clear();
        }
        rid
    };

    let Some(first_rid) = first_rid else {
        return Ok(None);
    };

    let file = archive
        .by_name("xl/_rels/workbook.xml.rels")
        .map_err(|_| StoresError::Parse("Missing part: xl/_rels/workbook.xml.rels".to_string()))?;
    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if attr_value(&e, b"Id").as_deref() == Some(first_rid.as_str()) {
                    let Some(target) = attr_value(&e, b"Target") else {
                        return Ok(None);
                    };
                    // Targets are relative to xl/ unless absolute
                    let path = match target.strip_prefix('/') {
                        Some(absolute) => absolute.to_string(),
                        None => format!("xl/{}", target),
                    };
                    return Ok(Some(path));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error("xl/_rels/workbook.xml.rels", e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(None)
}

fn read_styles<R: Read + Seek>(archive: &mut ZipArchive<R>) -> StoresResult<StyleFills> {
    let file = match archive.by_name("xl/styles.xml") {
        Ok(f) => f,
        Err(_) => return Ok(StyleFills::default()),
    };

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut styles = StyleFills::default();
    let mut buf = Vec::new();
    let mut in_fills = false;
    let mut in_fill = false;
    let mut in_cell_xfs = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"fills" => in_fills = true,
                b"fill" if in_fills => {
                    in_fill = true;
                    styles.fills.push(None);
                }
                b"cellXfs" => in_cell_xfs = true,
                b"xf" if in_cell_xfs => styles.xf_fill_ids.push(fill_id_of(&e)),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"fill" if in_fills => styles.fills.push(None),
                b"fgColor" if in_fill => {
                    if let Some(slot) = styles.fills.last_mut() {
                        *slot = attr_value(&e, b"rgb").and_then(|rgb| normalize_argb(&rgb));
                    }
                }
                b"xf" if in_cell_xfs => styles.xf_fill_ids.push(fill_id_of(&e)),
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"fills" => in_fills = false,
                b"fill" => in_fill = false,
                b"cellXfs" => in_cell_xfs = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error("xl/styles.xml", e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(styles)
}

fn fill_id_of(e: &BytesStart<'_>) -> usize {
    attr_value(e, b"fillId")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Split an `A1` reference into 0-based (row, col)
fn parse_cell_ref(reference: &str) -> Option<(u32, u32)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() {
        return None;
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        col = col
            .checked_mul(26)?
            .checked_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1)?;
    }
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}

fn read_sheet_fills<R: Read>(file: R, styles: &StyleFills) -> StoresResult<RowFills> {
    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut fills = RowFills::new();
    let mut buf = Vec::new();
    // Positions for writers that omit r attributes
    let mut next_row: u32 = 0;
    let mut current_row: u32 = 0;
    let mut next_col: u32 = 0;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = attr_value(&e, b"r")
                        .and_then(|r| r.parse::<u32>().ok())
                        .and_then(|r| r.checked_sub(1))
                        .unwrap_or(next_row);
                    next_row = current_row + 1;
                    next_col = 0;
                }
                b"c" => {
                    let (row, col) = attr_value(&e, b"r")
                        .and_then(|r| parse_cell_ref(&r))
                        .unwrap_or((current_row, next_col));
                    next_col = col + 1;

                    if col == 0 {
                        let color = attr_value(&e, b"s")
                            .and_then(|s| s.parse::<usize>().ok())
                            .and_then(|xf| styles.color_for_xf(xf));
                        if let Some(color) = color {
                            fills.insert(row, color.to_string());
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error("worksheet", e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(fills)
}
