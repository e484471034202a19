//! Hyperlink-target extraction from xlsx internals.
//!
//! calamine exposes cell values but not the hyperlink relationships an xlsx
//! carries, and the link column is defined by the cell's embedded hyperlink,
//! not its displayed text. So the container is opened a second time as a zip
//! archive and the first worksheet's `<hyperlinks>` block is resolved against
//! its relationship part.

use std::collections::HashMap;
use std::io::{Read, Seek};

use anyhow::{anyhow, bail, Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

/// External hyperlink targets of the first sheet, keyed by zero-based
/// `(row, col)` cell coordinates.
///
/// A workbook without any hyperlink parts yields an empty map; internal
/// (location-only) links are ignored.
pub fn sheet_hyperlinks<R: Read + Seek>(reader: R) -> Result<HashMap<(u32, u32), String>> {
    let mut archive = ZipArchive::new(reader).context("failed to open workbook archive")?;

    let sheet_part = first_sheet_part(&mut archive)?;
    let sheet_xml = read_part(&mut archive, &sheet_part)?
        .ok_or_else(|| anyhow!("worksheet part {sheet_part} missing from archive"))?;

    let refs = hyperlink_refs(&sheet_xml)?;
    if refs.is_empty() {
        return Ok(HashMap::new());
    }

    let targets = match read_part(&mut archive, &rels_path_for(&sheet_part))? {
        Some(rels_xml) => external_targets(&rels_xml)?,
        None => HashMap::new(),
    };

    let mut links = HashMap::new();
    for (cell_ref, rel_id) in refs {
        let Some(rel_id) = rel_id else {
            continue; // location-only link, no relationship
        };
        let Some(target) = targets.get(&rel_id) else {
            continue;
        };
        if let Some(pos) = parse_cell_ref(&cell_ref) {
            links.insert(pos, target.clone());
        }
    }
    Ok(links)
}

/// Parse an A1-style cell reference into zero-based `(row, col)`. A range
/// reference (`C2:C2`) resolves to its first cell.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let cell_ref = cell_ref.split(':').next()?;
    let split = cell_ref.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cell_ref.split_at(split);
    if letters.is_empty() {
        return None;
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }

    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}

/// Archive path of the first sheet, resolved through the workbook's
/// relationship part (sheet order in `workbook.xml` is the display order).
fn first_sheet_part<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String> {
    let workbook_xml = read_part(archive, "xl/workbook.xml")?
        .ok_or_else(|| anyhow!("xl/workbook.xml missing from archive"))?;

    let mut first_rel_id = None;
    visit_elements(&workbook_xml, |e| {
        if first_rel_id.is_none() && e.local_name().as_ref() == b"sheet" {
            first_rel_id = attr_value(e, "id");
        }
        Ok(())
    })?;
    let rel_id = first_rel_id.ok_or_else(|| anyhow!("workbook contains no sheets"))?;

    let rels_xml = read_part(archive, "xl/_rels/workbook.xml.rels")?
        .ok_or_else(|| anyhow!("workbook relationship part missing from archive"))?;

    let mut part = None;
    visit_elements(&rels_xml, |e| {
        if e.local_name().as_ref() == b"Relationship" && attr_value(e, "Id").as_deref() == Some(rel_id.as_str()) {
            part = attr_value(e, "Target");
        }
        Ok(())
    })?;

    match part {
        Some(target) => Ok(resolve_target(&target)),
        None => bail!("no relationship found for sheet {rel_id}"),
    }
}

/// `(cell ref, relationship id)` pairs from a worksheet's `<hyperlinks>`
/// block. The id is absent for internal links.
fn hyperlink_refs(sheet_xml: &str) -> Result<Vec<(String, Option<String>)>> {
    let mut refs = Vec::new();
    visit_elements(sheet_xml, |e| {
        if e.local_name().as_ref() == b"hyperlink" {
            if let Some(cell_ref) = attr_value(e, "ref") {
                refs.push((cell_ref, attr_value(e, "id")));
            }
        }
        Ok(())
    })?;
    Ok(refs)
}

/// Relationship id → target for the external hyperlink relationships of a
/// sheet's `.rels` part.
fn external_targets(rels_xml: &str) -> Result<HashMap<String, String>> {
    let mut targets = HashMap::new();
    visit_elements(rels_xml, |e| {
        if e.local_name().as_ref() != b"Relationship" {
            return Ok(());
        }
        let is_hyperlink = attr_value(e, "Type")
            .map(|t| t.ends_with("/hyperlink"))
            .unwrap_or(false);
        if !is_hyperlink {
            return Ok(());
        }
        if let (Some(id), Some(target)) = (attr_value(e, "Id"), attr_value(e, "Target")) {
            targets.insert(id, target);
        }
        Ok(())
    })?;
    Ok(targets)
}

/// Walk every element of an XML document (start and empty tags alike).
fn visit_elements(xml: &str, mut visit: impl FnMut(&BytesStart) -> Result<()>) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => visit(&e)?,
            Ok(Event::Empty(e)) => visit(&e)?,
            Ok(Event::Eof) => return Ok(()),
            Err(e) => {
                return Err(anyhow!(
                    "XML parse error at position {}: {}",
                    reader.buffer_position(),
                    e
                ));
            }
            _ => {}
        }
    }
}

/// Attribute lookup tolerant of namespace prefixes (`r:id` matches `id`).
fn attr_value(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        let key = attr.key.as_ref();
        let matches = key == name.as_bytes()
            || key
                .rsplit(|&b| b == b':')
                .next()
                .map(|local| local == name.as_bytes())
                .unwrap_or(false);
        if matches {
            // `Attribute::unescape_value()` is compiled out when quick-xml's
            // `encoding` feature is enabled (calamine force-enables it, and
            // Cargo unifies the feature across the graph). The reader-based
            // variant is the available equivalent; xlsx parts are UTF-8, so a
            // fresh UTF-8 reader yields identical decoding.
            let reader = Reader::from_str("");
            return attr
                .decode_and_unescape_value(&reader)
                .ok()
                .map(|v| v.into_owned());
        }
    }
    None
}

/// Worksheet targets are relative to `xl/`; tolerate absolute forms too.
fn resolve_target(target: &str) -> String {
    if let Some(stripped) = target.strip_prefix('/') {
        stripped.to_string()
    } else {
        format!("xl/{target}")
    }
}

fn rels_path_for(sheet_part: &str) -> String {
    match sheet_part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{sheet_part}.rels"),
    }
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("failed to read archive part {name}")),
    };
    let mut content = String::new();
    file.read_to_string(&mut content)
        .with_context(|| format!("archive part {name} is not valid UTF-8"))?;
    Ok(Some(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const WORKBOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
          xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="Links" sheetId="1" r:id="rId1"/>
    <sheet name="Other" sheetId="2" r:id="rId2"/>
  </sheets>
</workbook>"#;

    const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
</Relationships>"#;

    const SHEET_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
           xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheetData/>
  <hyperlinks>
    <hyperlink ref="C2" r:id="rId1"/>
    <hyperlink ref="C3" r:id="rId2"/>
    <hyperlink ref="C4" location="Other!A1"/>
  </hyperlinks>
</worksheet>"#;

    const SHEET_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/first" TargetMode="External"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/second" TargetMode="External"/>
</Relationships>"#;

    fn build_archive(parts: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, content) in parts {
            writer.start_file(name.to_string(), options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn test_external_links_resolved() {
        let archive = build_archive(&[
            ("xl/workbook.xml", WORKBOOK_XML),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/worksheets/sheet1.xml", SHEET_XML),
            ("xl/worksheets/_rels/sheet1.xml.rels", SHEET_RELS),
        ]);

        let links = sheet_hyperlinks(archive).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[&(1, 2)], "https://example.com/first");
        assert_eq!(links[&(2, 2)], "https://example.com/second");
        // location-only link on C4 is not an external target
        assert!(!links.contains_key(&(3, 2)));
    }

    #[test]
    fn test_workbook_without_hyperlinks() {
        let bare_sheet = r#"<worksheet><sheetData/></worksheet>"#;
        let archive = build_archive(&[
            ("xl/workbook.xml", WORKBOOK_XML),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/worksheets/sheet1.xml", bare_sheet),
        ]);

        let links = sheet_hyperlinks(archive).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_missing_sheet_rels_yields_no_links() {
        let archive = build_archive(&[
            ("xl/workbook.xml", WORKBOOK_XML),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/worksheets/sheet1.xml", SHEET_XML),
        ]);

        let links = sheet_hyperlinks(archive).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_first_sheet_is_used() {
        let other_sheet = r#"<worksheet>
  <hyperlinks><hyperlink ref="A1" r:id="rId1"/></hyperlinks>
</worksheet>"#;
        let other_rels = r#"<Relationships>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/wrong-sheet" TargetMode="External"/>
</Relationships>"#;
        let bare_sheet = r#"<worksheet><sheetData/></worksheet>"#;

        let archive = build_archive(&[
            ("xl/workbook.xml", WORKBOOK_XML),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/worksheets/sheet1.xml", bare_sheet),
            ("xl/worksheets/sheet2.xml", other_sheet),
            ("xl/worksheets/_rels/sheet2.xml.rels", other_rels),
        ]);

        let links = sheet_hyperlinks(archive).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_cell_ref_parsing() {
        assert_eq!(parse_cell_ref("A1"), Some((0, 0)));
        assert_eq!(parse_cell_ref("C2"), Some((1, 2)));
        assert_eq!(parse_cell_ref("Z10"), Some((9, 25)));
        assert_eq!(parse_cell_ref("AA3"), Some((2, 26)));
        assert_eq!(parse_cell_ref("AB12"), Some((11, 27)));
        assert_eq!(parse_cell_ref("C2:C2"), Some((1, 2)));
    }

    #[test]
    fn test_cell_ref_rejections() {
        assert_eq!(parse_cell_ref(""), None);
        assert_eq!(parse_cell_ref("12"), None);
        assert_eq!(parse_cell_ref("AB"), None);
        assert_eq!(parse_cell_ref("A0"), None);
    }
}
