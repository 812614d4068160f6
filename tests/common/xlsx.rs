//! Minimal `.xlsx` writer for fixtures
//!
//! Produces the parts Excel itself writes for a one-sheet workbook: content
//! types, workbook + relationships, shared strings and the worksheet.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

#[derive(Debug, Clone)]
pub enum Cell {
    /// Shared string (`t="s"`)
    Text(String),
    /// Inline string (`t="inlineStr"`)
    Inline(String),
    /// Number cell, raw value as Excel stores it
    Number(String),
    Empty,
}

impl Cell {
    pub fn text(s: &str) -> Self {
        Cell::Text(s.to_string())
    }

    pub fn inline(s: &str) -> Self {
        Cell::Inline(s.to_string())
    }

    pub fn number(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Number(s.to_string())
        }
    }
}

#[derive(Debug, Default)]
pub struct XlsxBuilder {
    rows: Vec<Vec<Cell>>,
    sheet_path: Option<String>,
    raw_sheet: Option<String>,
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn column_name(mut index: usize) -> String {
    let mut name = String::new();
    loop {
        name.insert(0, (b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name
}

impl XlsxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&mut self, cells: Vec<Cell>) -> &mut Self {
        self.rows.push(cells);
        self
    }

    /// Store the worksheet under a non-default name to exercise the
    /// workbook relationship lookup.
    pub fn sheet_path(&mut self, path: &str) -> &mut Self {
        self.sheet_path = Some(path.to_string());
        self
    }

    /// Use `xml` verbatim as the worksheet part instead of the generated rows.
    pub fn raw_sheet(&mut self, xml: &str) -> &mut Self {
        self.raw_sheet = Some(xml.to_string());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let sheet_path = self.sheet_path.clone().unwrap_or_else(|| "worksheets/sheet1.xml".to_string());

        let mut shared: Vec<String> = Vec::new();
        let mut sheet_rows = String::new();
        for (r, cells) in self.rows.iter().enumerate() {
            sheet_rows.push_str(&format!("<row r=\"{}\">", r + 1));
            for (c, cell) in cells.iter().enumerate() {
                let reference = format!("{}{}", column_name(c), r + 1);
                match cell {
                    Cell::Text(s) => {
                        shared.push(s.clone());
                        sheet_rows.push_str(&format!(
                            "<c r=\"{}\" t=\"s\"><v>{}</v></c>",
                            reference,
                            shared.len() - 1
                        ));
                    }
                    Cell::Inline(s) => sheet_rows.push_str(&format!(
                        "<c r=\"{}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                        reference,
                        escape(s)
                    )),
                    Cell::Number(v) => sheet_rows.push_str(&format!("<c r=\"{}\"><v>{}</v></c>", reference, v)),
                    Cell::Empty => {}
                }
            }
            sheet_rows.push_str("</row>");
        }

        let shared_xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <sst xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" count=\"{0}\" uniqueCount=\"{0}\">{1}</sst>",
            shared.len(),
            shared
                .iter()
                .map(|s| format!("<si><t xml:space=\"preserve\">{}</t></si>", escape(s)))
                .collect::<String>()
        );

        let sheet_xml = self.raw_sheet.clone().unwrap_or_else(|| {
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
                 <worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\"><sheetData>{}</sheetData></worksheet>",
                sheet_rows
            )
        });

        let content_types = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
             <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
             <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
             <Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>\
             <Override PartName=\"/xl/{}\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>\
             </Types>",
            sheet_path
        );

        let root_rels = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
             <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"xl/workbook.xml\"/>\
             </Relationships>";

        let workbook = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
             xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\
             <sheets><sheet name=\"Планограмма\" sheetId=\"1\" r:id=\"rId1\"/></sheets></workbook>";

        let workbook_rels = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
             <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"{}\"/>\
             <Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings\" Target=\"sharedStrings.xml\"/>\
             </Relationships>",
            sheet_path
        );

        let parts: Vec<(String, String)> = vec![
            ("[Content_Types].xml".to_string(), content_types),
            ("_rels/.rels".to_string(), root_rels.to_string()),
            ("xl/workbook.xml".to_string(), workbook.to_string()),
            ("xl/_rels/workbook.xml.rels".to_string(), workbook_rels),
            ("xl/sharedStrings.xml".to_string(), shared_xml),
            (format!("xl/{}", sheet_path), sheet_xml),
        ];

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, body) in parts {
            writer.start_file(name, options).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }
}
