//! Small helpers over quick-xml for SpreadsheetML parts

use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesRef, BytesStart};
use quick_xml::Reader;

use super::SheetError;

/// Creates a reader configured for spreadsheet parts.
///
/// Empty elements are expanded so `<c r="A1"/>` produces Start + End events
/// and the parsers only have to handle one shape. Mismatched end tags are an
/// error.
pub(super) fn reader(xml: &[u8]) -> Reader<&[u8]> {
    let mut reader = Reader::from_reader(xml);
    let config = reader.config_mut();
    config.check_comments = false;
    config.check_end_names = true;
    config.expand_empty_elements = true;
    config.trim_text(false);
    reader
}

/// Gets the unescaped value of an attribute, if present.
pub(super) fn attribute(event: &BytesStart<'_>, name: &str) -> Result<Option<String>, SheetError> {
    match event.try_get_attribute(name)? {
        Some(attribute) => Ok(Some(attribute.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

/// Gets an attribute by local name, ignoring its namespace prefix (`r:id` → `id`).
pub(super) fn local_attribute(event: &BytesStart<'_>, local: &[u8]) -> Result<Option<String>, SheetError> {
    for result in event.attributes() {
        let attribute = result?;
        if attribute.key.local_name().as_ref() == local {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Appends an entity or character reference (`&amp;`, `&#1040;`, `&#x41;`).
pub(super) fn push_reference(text: &mut String, reference: &BytesRef<'_>) -> Result<(), SheetError> {
    let raw = reference.xml_content()?;
    if let Some(number) = raw.strip_prefix('#') {
        let code = match number.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => number.parse::<u32>(),
        }
        .map_err(|_| SheetError::Entity(raw.to_string()))?;
        if let Some(character) = char::from_u32(code) {
            text.push(character);
        }
    } else if let Some(entity) = resolve_xml_entity(&raw) {
        text.push_str(entity);
    } else {
        return Err(SheetError::Entity(raw.to_string()));
    }
    Ok(())
}
