use quick_xml::events::Event;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

use super::xml;
use super::{SheetError, SheetTable, MAX_COLUMNS, MAX_ROWS};

const WORKBOOK: &str = "xl/workbook.xml";
const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS: &str = "xl/sharedStrings.xml";
const DEFAULT_SHEET: &str = "xl/worksheets/sheet1.xml";

/// Cell value kinds that need different decoding (`t` attribute of `<c>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Number,
    SharedString,
    InlineString,
    Boolean,
    Error,
}

impl CellKind {
    fn from_attribute(t: Option<&str>) -> Self {
        match t {
            Some("s") => CellKind::SharedString,
            Some("inlineStr") | Some("str") => CellKind::InlineString,
            Some("b") => CellKind::Boolean,
            Some("e") => CellKind::Error,
            _ => CellKind::Number,
        }
    }
}

/// Reads the first worksheet of an `.xlsx` file held in memory.
pub fn read_first_sheet(bytes: &[u8]) -> Result<SheetTable, SheetError> {
    let mut zip = ZipArchive::new(Cursor::new(bytes))?;

    let sheet_path = first_sheet_path(&mut zip)?;
    let shared_strings = match read_part(&mut zip, SHARED_STRINGS)? {
        Some(part) => parse_shared_strings(&part)?,
        None => Vec::new(),
    };
    let sheet = read_part(&mut zip, &sheet_path)?.ok_or(SheetError::MissingPart(sheet_path))?;

    let grid = parse_worksheet(&sheet, &shared_strings)?;
    SheetTable::from_grid(grid)
}

/// Reads a whole zip entry, matching the name case-insensitively.
fn read_part<R: Read + Seek>(zip: &mut ZipArchive<R>, name: &str) -> Result<Option<Vec<u8>>, SheetError> {
    let pattern = name.replace('\\', "/");
    let Some(path) = zip
        .file_names()
        .find(|file_name| pattern.eq_ignore_ascii_case(file_name))
        .map(str::to_owned)
    else {
        return Ok(None);
    };

    let mut file = zip.by_name(&path)?;
    let mut buffer = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
    file.read_to_end(&mut buffer)?;
    Ok(Some(buffer))
}

/// Resolves the zip path of the first sheet listed in the workbook.
fn first_sheet_path<R: Read + Seek>(zip: &mut ZipArchive<R>) -> Result<String, SheetError> {
    let (Some(workbook), Some(rels)) = (read_part(zip, WORKBOOK)?, read_part(zip, WORKBOOK_RELS)?) else {
        return Ok(DEFAULT_SHEET.to_string());
    };

    let relationships = parse_relationships(&rels)?;
    let first_id = parse_first_sheet_id(&workbook)?;
    Ok(first_id
        .and_then(|id| relationships.get(&id).cloned())
        .unwrap_or_else(|| DEFAULT_SHEET.to_string()))
}

fn parse_first_sheet_id(workbook: &[u8]) -> Result<Option<String>, SheetError> {
    let mut reader = xml::reader(workbook);
    loop {
        match reader.read_event()? {
            Event::Eof => return Ok(None),
            Event::Start(event) if event.local_name().as_ref() == b"sheet" => {
                return xml::local_attribute(&event, b"id");
            }
            _ => {}
        }
    }
}

fn parse_relationships(rels: &[u8]) -> Result<HashMap<String, String>, SheetError> {
    let mut reader = xml::reader(rels);
    let mut relationships = HashMap::new();
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(event) if event.local_name().as_ref() == b"Relationship" => {
                let id = xml::attribute(&event, "Id")?;
                let kind = xml::attribute(&event, "Type")?;
                let target = xml::attribute(&event, "Target")?;
                // Only worksheet relationships matter here
                if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                    if let Some((id, target)) = id.zip(target) {
                        relationships.insert(id, to_zip_path(&target));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(relationships)
}

/// Relationship targets are relative to `xl/` unless absolute.
fn to_zip_path(target: &str) -> String {
    if let Some(stripped) = target.strip_prefix('/') {
        stripped.to_string()
    } else if target.starts_with("xl/") {
        target.to_string()
    } else {
        format!("xl/{target}")
    }
}

fn parse_shared_strings(part: &[u8]) -> Result<Vec<String>, SheetError> {
    let mut reader = xml::reader(part);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut is_text = false;
    let mut is_phonetic = false;
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Eof if depth > 0 => return Err(SheetError::Truncated),
            Event::Eof => break,
            Event::Start(event) => {
                depth += 1;
                match event.local_name().as_ref() {
                    b"si" => current.clear(),
                    b"rPh" => is_phonetic = true,
                    b"t" if !is_phonetic => is_text = true,
                    _ => {}
                }
            }
            Event::End(event) => {
                depth = depth.saturating_sub(1);
                match event.local_name().as_ref() {
                    b"si" => strings.push(std::mem::take(&mut current)),
                    b"rPh" => is_phonetic = false,
                    b"t" => is_text = false,
                    _ => {}
                }
            }
            Event::Text(text) if is_text => current.push_str(&text.xml_content()?),
            Event::CData(text) if is_text => current.push_str(&text.xml_content()?),
            Event::GeneralRef(reference) if is_text => xml::push_reference(&mut current, &reference)?,
            _ => {}
        }
    }
    Ok(strings)
}

/// Parses `<sheetData>` into a dense grid indexed by (row, col).
fn parse_worksheet(part: &[u8], shared_strings: &[String]) -> Result<Vec<Vec<String>>, SheetError> {
    let mut reader = xml::reader(part);
    let mut grid: Vec<Vec<String>> = Vec::new();

    let mut next_row = 0usize;
    let mut row = 0usize;
    let mut next_col = 0usize;
    let mut cell: Option<(usize, usize, CellKind)> = None;
    let mut value = String::new();
    let mut is_value = false;
    let mut is_inline = false;
    let mut is_phonetic = false;
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Eof if depth > 0 => return Err(SheetError::Truncated),
            Event::Eof => break,
            Event::Start(event) => {
                depth += 1;
                match event.local_name().as_ref() {
                    b"row" => {
                        row = match xml::attribute(&event, "r")? {
                            Some(number) => row_index(&number)?.unwrap_or(next_row),
                            None => next_row,
                        };
                        next_col = 0;
                    }
                    b"c" => {
                        let position = match xml::attribute(&event, "r")? {
                            Some(reference) => reference_to_index(&reference)?,
                            None => None,
                        };
                        let (r, c) = position.unwrap_or((row, next_col));
                        if r >= MAX_ROWS || c >= MAX_COLUMNS {
                            return Err(SheetError::OutOfRange(format!("R{}C{}", r + 1, c + 1)));
                        }
                        let kind = CellKind::from_attribute(xml::attribute(&event, "t")?.as_deref());
                        cell = Some((r, c, kind));
                        value.clear();
                    }
                    b"v" if cell.is_some() => is_value = true,
                    b"is" if cell.is_some() => is_inline = true,
                    b"rPh" => is_phonetic = true,
                    b"t" if is_inline && !is_phonetic => is_value = true,
                    _ => {}
                }
            }
            Event::End(event) => {
                depth = depth.saturating_sub(1);
                match event.local_name().as_ref() {
                    b"v" | b"t" => is_value = false,
                    b"is" => is_inline = false,
                    b"rPh" => is_phonetic = false,
                    b"c" => {
                        if let Some((r, c, kind)) = cell.take() {
                            let text = resolve_value(kind, &value, shared_strings)?;
                            if !text.is_empty() {
                                put(&mut grid, r, c, text);
                            }
                            row = r;
                            next_col = c + 1;
                        }
                    }
                    b"row" => next_row = row + 1,
                    _ => {}
                }
            }
            Event::Text(text) if is_value => value.push_str(&text.xml_content()?),
            Event::CData(text) if is_value => value.push_str(&text.xml_content()?),
            Event::GeneralRef(reference) if is_value => xml::push_reference(&mut value, &reference)?,
            _ => {}
        }
    }

    Ok(grid)
}

fn resolve_value(kind: CellKind, raw: &str, shared_strings: &[String]) -> Result<String, SheetError> {
    Ok(match kind {
        CellKind::SharedString => {
            let index = raw.trim();
            index
                .parse::<usize>()
                .ok()
                .and_then(|i| shared_strings.get(i))
                .cloned()
                .ok_or_else(|| SheetError::SharedString(index.to_string()))?
        }
        CellKind::InlineString => raw.to_string(),
        CellKind::Boolean => match raw.trim() {
            "1" => "TRUE".to_string(),
            _ => "FALSE".to_string(),
        },
        CellKind::Error => String::new(),
        CellKind::Number => numeric_text(raw),
    })
}

/// Renders a numeric cell the way a user sees an integer code.
///
/// Writers store large integers as `4.600123456789E+12`; expand those back to
/// digits when the value is integral and exactly representable.
fn numeric_text(raw: &str) -> String {
    let raw = raw.trim();
    if !raw.contains(['E', 'e']) {
        return raw.to_string();
    }
    match raw.parse::<f64>() {
        Ok(number) if number.is_finite() && number.fract() == 0.0 && number.abs() < 1e15 => {
            format!("{number:.0}")
        }
        _ => raw.to_string(),
    }
}

fn put(grid: &mut Vec<Vec<String>>, row: usize, col: usize, text: String) {
    if grid.len() <= row {
        grid.resize_with(row + 1, Vec::new);
    }
    let cells = &mut grid[row];
    if cells.len() <= col {
        cells.resize_with(col + 1, String::new);
    }
    cells[col] = text;
}

/// Parses a 1-based row number into a zero-based index.
///
/// Text that is not a plain number is ignored (`None`); numbers past the last
/// addressable row are an error.
fn row_index(number: &str) -> Result<Option<usize>, SheetError> {
    let number = number.trim();
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    let out_of_range = || SheetError::OutOfRange(number.to_string());
    let row = number.parse::<usize>().map_err(|_| out_of_range())?;
    if row > MAX_ROWS {
        return Err(out_of_range());
    }
    Ok(row.checked_sub(1))
}

/// Converts an A1-style reference into zero-based (row, col).
///
/// Malformed references give `None` so the cell falls back to its running
/// position; references past `XFD1048576` are an error.
fn reference_to_index(reference: &str) -> Result<Option<(usize, usize)>, SheetError> {
    let Some(split) = reference.find(|c: char| c.is_ascii_digit()) else {
        return Ok(None);
    };
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Ok(None);
    }

    let out_of_range = || SheetError::OutOfRange(reference.to_string());
    let mut col = 0usize;
    for letter in letters.bytes() {
        let digit = usize::from(letter.to_ascii_uppercase() - b'A') + 1;
        col = col
            .checked_mul(26)
            .and_then(|col| col.checked_add(digit))
            .filter(|col| *col <= MAX_COLUMNS)
            .ok_or_else(out_of_range)?;
    }

    Ok(row_index(digits)?.map(|row| (row, col - 1)))
}
