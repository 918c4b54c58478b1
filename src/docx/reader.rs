//! Mapping package parts onto the document model.

use std::collections::{HashMap, HashSet};

use super::package::{self, Relationship, REL_FOOTER, REL_HEADER};
use super::xml::{self, Element, Node};
use crate::detect;
use crate::error::{Error, Result};
use crate::model::{
    Alignment, Block, Document, HeaderFooter, InlineContent, Package, Paragraph, ParagraphStyle,
    RowContent, RunObject, Section, Table, TableCell, TableContent, TableRow, TextRun, TextStyle,
};

/// Read a DOCX package into a document.
pub fn read_document(data: &[u8]) -> Result<Document> {
    if !detect::is_docx_bytes(data) {
        return Err(Error::UnknownFormat);
    }

    let package = package::read_package(data)?;
    let main_part = package.main_part.clone();
    let main_data = package
        .get(&main_part)
        .ok_or_else(|| Error::MissingPart(main_part.clone()))?;

    let root = xml::parse(&main_part, main_data)?;
    let body = root
        .find("body")
        .ok_or_else(|| Error::xml(&main_part, "document has no body"))?;

    let rels_part = package::rels_part_for(&main_part);
    let rels = match package.get(&rels_part) {
        Some(data) => package::read_relationships(&rels_part, data, package::part_dir(&main_part))?,
        None => HashMap::new(),
    };

    let body_blocks = read_blocks(body);
    let sections = read_sections(body, &rels, &package)?;

    log::debug!(
        "Read {}: {} body blocks, {} sections",
        main_part,
        body_blocks.len(),
        sections.len()
    );

    Ok(Document {
        body: body_blocks,
        sections,
        package: Some(package),
    })
}

/// Map the children of a block container (body, cell, header, footer).
fn read_blocks(container: &Element) -> Vec<Block> {
    let mut blocks = Vec::new();
    for node in &container.children {
        match node {
            Node::Element(e) => match e.local_name() {
                "p" => blocks.push(Block::Paragraph(read_paragraph(e))),
                "tbl" => blocks.push(Block::Table(read_table(e))),
                _ => blocks.push(Block::Raw { xml: e.to_xml() }),
            },
            Node::Raw(raw) => blocks.push(Block::Raw { xml: raw.clone() }),
            Node::Text(_) => {}
        }
    }
    blocks
}

fn read_paragraph(p: &Element) -> Paragraph {
    let mut paragraph = Paragraph::new();
    paragraph.attributes = p.attrs.clone();
    for node in &p.children {
        match node {
            Node::Element(e) => match e.local_name() {
                "pPr" => paragraph.style = read_paragraph_style(e),
                "r" => paragraph.add_run(read_run(e)),
                _ => paragraph.content.push(InlineContent::Raw { xml: e.to_xml() }),
            },
            Node::Raw(raw) => paragraph.content.push(InlineContent::Raw { xml: raw.clone() }),
            Node::Text(_) => {}
        }
    }
    paragraph.source = Some(p.to_xml());
    paragraph
}

fn read_paragraph_style(ppr: &Element) -> ParagraphStyle {
    ParagraphStyle {
        style_id: ppr
            .child("pStyle")
            .and_then(|s| s.attr("val"))
            .map(str::to_string),
        alignment: ppr
            .child("jc")
            .and_then(|jc| jc.attr("val"))
            .map(Alignment::from_jc)
            .unwrap_or_default(),
        properties: Some(ppr.to_xml()),
    }
}

fn read_run(r: &Element) -> TextRun {
    let mut run = TextRun::default();
    for node in &r.children {
        let Node::Element(e) = node else {
            if let Node::Raw(raw) = node {
                run.objects.push(RunObject::new(run.text.len(), raw.clone()));
            }
            continue;
        };
        match e.local_name() {
            "rPr" => run.style = read_text_style(e),
            "t" => run.text.push_str(&e.text()),
            "tab" => run.text.push('\t'),
            "cr" => run.text.push('\n'),
            "br" if !matches!(e.attr("type"), Some("page") | Some("column")) => {
                run.text.push('\n')
            }
            _ => run.objects.push(RunObject::new(run.text.len(), e.to_xml())),
        }
    }
    run
}

fn read_text_style(rpr: &Element) -> TextStyle {
    TextStyle {
        bold: toggle(rpr, "b"),
        italic: toggle(rpr, "i"),
        underline: rpr
            .child("u")
            .map(|u| u.attr("val") != Some("none"))
            .unwrap_or(false),
        font_name: rpr
            .child("rFonts")
            .and_then(|f| f.attr("ascii").or_else(|| f.attr("hAnsi")))
            .map(str::to_string),
        font_size: rpr
            .child("sz")
            .and_then(|sz| sz.attr("val"))
            .and_then(|v| v.parse::<f32>().ok())
            .map(|half_points| half_points / 2.0),
        color: rpr
            .child("color")
            .and_then(|c| c.attr("val"))
            .filter(|v| *v != "auto")
            .map(str::to_string),
        properties: Some(rpr.to_xml()),
    }
}

/// On/off properties: present means on unless the value says otherwise.
fn toggle(rpr: &Element, name: &str) -> bool {
    match rpr.child(name) {
        Some(e) => !matches!(e.attr("val"), Some("0") | Some("false") | Some("off")),
        None => false,
    }
}

/// Table properties and grid lead the table; everything else between rows
/// stays where it was.
fn read_table(tbl: &Element) -> Table {
    let mut table = Table::new();
    let mut properties = String::new();
    for node in &tbl.children {
        match node {
            Node::Element(e) => match e.local_name() {
                "tr" => table.add_row(read_row(e)),
                "tblPr" | "tblGrid" => e.write_to(&mut properties),
                _ => table.content.push(TableContent::Raw { xml: e.to_xml() }),
            },
            Node::Raw(raw) => table.content.push(TableContent::Raw { xml: raw.clone() }),
            Node::Text(_) => {}
        }
    }
    table.properties = non_empty(properties);
    table
}

fn read_row(tr: &Element) -> TableRow {
    let mut row = TableRow {
        attributes: tr.attrs.clone(),
        ..Default::default()
    };
    let mut properties = String::new();
    for node in &tr.children {
        match node {
            Node::Element(e) => match e.local_name() {
                "tc" => row.content.push(RowContent::Cell(read_cell(e))),
                "tblPrEx" | "trPr" => e.write_to(&mut properties),
                _ => row.content.push(RowContent::Raw { xml: e.to_xml() }),
            },
            Node::Raw(raw) => row.content.push(RowContent::Raw { xml: raw.clone() }),
            Node::Text(_) => {}
        }
    }
    row.properties = non_empty(properties);
    row
}

fn read_cell(tc: &Element) -> TableCell {
    let mut cell = TableCell::empty();
    for node in &tc.children {
        match node {
            Node::Element(e) => match e.local_name() {
                "tcPr" => cell.properties = Some(e.to_xml()),
                "p" => cell.content.push(Block::Paragraph(read_paragraph(e))),
                // Nested tables stay opaque.
                _ => cell.content.push(Block::Raw { xml: e.to_xml() }),
            },
            Node::Raw(raw) => cell.content.push(Block::Raw { xml: raw.clone() }),
            Node::Text(_) => {}
        }
    }
    cell
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

/// Collect sections in document order: section properties inside body
/// paragraphs first, then the trailing one of the body.
fn read_sections(
    body: &Element,
    rels: &HashMap<String, Relationship>,
    package: &Package,
) -> Result<Vec<Section>> {
    let mut section_props: Vec<&Element> = Vec::new();
    for e in body.elements() {
        match e.local_name() {
            "p" => {
                if let Some(sect) = e.child("pPr").and_then(|ppr| ppr.child("sectPr")) {
                    section_props.push(sect);
                }
            }
            "sectPr" => section_props.push(e),
            _ => {}
        }
    }

    let mut owned = HashSet::new();
    let mut sections = Vec::with_capacity(section_props.len());
    for sect in section_props {
        let header = read_reference(sect, "headerReference", REL_HEADER, rels, package, &mut owned)?;
        let footer = read_reference(sect, "footerReference", REL_FOOTER, rels, package, &mut owned)?;
        sections.push(Section { header, footer });
    }
    Ok(sections)
}

/// Resolve the default header or footer reference of a section.
fn read_reference(
    sect: &Element,
    reference: &str,
    kind: &str,
    rels: &HashMap<String, Relationship>,
    package: &Package,
    owned: &mut HashSet<String>,
) -> Result<Option<HeaderFooter>> {
    let Some(id) = sect
        .elements()
        .filter(|e| e.local_name() == reference)
        .find(|e| e.attr("type").unwrap_or("default") == "default")
        .and_then(|e| e.attr("id"))
    else {
        return Ok(None);
    };

    let Some(rel) = rels.get(id).filter(|rel| rel.kind == kind) else {
        log::warn!("Skipping {} with unknown relationship {}", reference, id);
        return Ok(None);
    };
    if !owned.insert(rel.target.clone()) {
        return Ok(None);
    }
    let Some(data) = package.get(&rel.target) else {
        log::warn!("Skipping {}: part {} is missing", reference, rel.target);
        return Ok(None);
    };

    let root = xml::parse(&rel.target, data)?;
    Ok(Some(HeaderFooter {
        part_name: rel.target.clone(),
        content: read_blocks(&root),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(xml_text: &str) -> Element {
        xml::parse("test.xml", xml_text.as_bytes()).unwrap()
    }

    #[test]
    fn test_read_paragraph_runs() {
        let p = element(
            r#"<w:p><w:pPr><w:pStyle w:val="Title"/><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:b/><w:sz w:val="28"/></w:rPr><w:t>Claim </w:t></w:r><w:proofErr w:type="spellStart"/><w:r><w:t>[CLAIM</w:t></w:r><w:r><w:t>_NO]</w:t><w:tab/><w:t>x</w:t><w:br/><w:t>y</w:t></w:r></w:p>"#,
        );
        let paragraph = read_paragraph(&p);

        assert_eq!(paragraph.plain_text(), "Claim [CLAIM_NO]\tx\ny");
        assert_eq!(paragraph.run_count(), 3);
        assert_eq!(paragraph.content.len(), 4);
        assert_eq!(paragraph.style.style_id.as_deref(), Some("Title"));
        assert_eq!(paragraph.style.alignment, Alignment::Center);

        assert_eq!(paragraph.source.as_deref(), Some(p.to_xml().as_str()));

        let first = paragraph.runs().next().unwrap();
        assert!(first.style.bold);
        assert_eq!(first.style.font_size, Some(14.0));
        assert!(first.style.properties.as_deref().unwrap().starts_with("<w:rPr>"));
    }

    #[test]
    fn test_read_run_objects() {
        let r = element(
            r#"<w:r><w:br w:type="page"/><w:drawing><wp:inline/></w:drawing><w:t>after</w:t></w:r>"#,
        );
        let run = read_run(&r);
        assert_eq!(run.text, "after");
        assert_eq!(run.objects.len(), 2);
        assert_eq!(run.objects[0], RunObject::new(0, r#"<w:br w:type="page"/>"#));
        assert_eq!(run.objects[1].offset, 0);
    }

    #[test]
    fn test_read_run_objects_between_text() {
        let r = element(
            r#"<w:r><w:t>End of page one</w:t><w:br w:type="page"/><w:t>Page two</w:t><w:sym w:char="F0FC"/></w:r>"#,
        );
        let run = read_run(&r);
        assert_eq!(run.text, "End of page onePage two");
        assert_eq!(run.objects[0].offset, 15);
        assert_eq!(run.objects[1].offset, run.text.len());
    }

    #[test]
    fn test_toggle_values() {
        let rpr = element(r#"<w:rPr><w:b w:val="0"/><w:i/><w:u w:val="none"/></w:rPr>"#);
        let style = read_text_style(&rpr);
        assert!(!style.bold);
        assert!(style.italic);
        assert!(!style.underline);
    }

    #[test]
    fn test_read_table() {
        let tbl = element(
            r#"<w:tbl><w:tblPr><w:tblW w:w="0"/></w:tblPr><w:tblGrid><w:gridCol/></w:tblGrid><w:tr><w:trPr/><w:tc><w:tcPr/><w:p><w:r><w:t>[A]</w:t></w:r></w:p><w:tbl><w:tr/></w:tbl><w:p/></w:tc></w:tr></w:tbl>"#,
        );
        let table = read_table(&tbl);

        assert_eq!(table.row_count(), 1);
        assert_eq!(
            table.properties.as_deref(),
            Some(r#"<w:tblPr><w:tblW w:w="0"/></w:tblPr><w:tblGrid><w:gridCol/></w:tblGrid>"#)
        );
        assert_eq!(table.rows().next().unwrap().properties.as_deref(), Some("<w:trPr/>"));

        let cell = table.cell(0, 0).unwrap();
        assert_eq!(cell.properties.as_deref(), Some("<w:tcPr/>"));
        assert_eq!(cell.content.len(), 3);
        assert!(matches!(cell.content[1], Block::Raw { .. }));
        assert_eq!(cell.paragraphs().count(), 2);
        assert_eq!(cell.plain_text(), "[A]\n");
    }

    #[test]
    fn test_read_table_keeps_markup_order() {
        let tbl = element(
            r#"<w:tbl><w:tblPr/><w:tr w:rsidR="00AB12CD"><w:trPr/><w:tc><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc><w:sdt><w:sdtContent><w:tc><w:p><w:r><w:t>B</w:t></w:r></w:p></w:tc></w:sdtContent></w:sdt><w:tc><w:p><w:r><w:t>C</w:t></w:r></w:p></w:tc></w:tr><w:bookmarkEnd w:id="0"/></w:tbl>"#,
        );
        let table = read_table(&tbl);

        assert_eq!(table.properties.as_deref(), Some("<w:tblPr/>"));
        assert_eq!(table.content.len(), 2);
        assert!(matches!(&table.content[1], TableContent::Raw { xml } if xml == r#"<w:bookmarkEnd w:id="0"/>"#));

        let row = table.rows().next().unwrap();
        assert_eq!(row.attributes, vec![("w:rsidR".to_string(), "00AB12CD".to_string())]);
        assert_eq!(row.content.len(), 3);
        assert!(matches!(row.content[0], RowContent::Cell(_)));
        assert!(matches!(&row.content[1], RowContent::Raw { xml } if xml.starts_with("<w:sdt>")));
        assert_eq!(row.cell_count(), 2);
        assert_eq!(row.plain_text(), "A\tC");
        assert!(row.cells().all(|cell| cell.properties.is_none()));
    }

    #[test]
    fn test_read_blocks_keeps_unknown_markup() {
        let body = element(
            r#"<w:body>
  <w:p><w:r><w:t>one</w:t></w:r></w:p>
  <w:sdt><w:sdtContent/></w:sdt>
  <w:sectPr/>
</w:body>"#,
        );
        let blocks = read_blocks(&body);
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].is_paragraph());
        assert_eq!(
            blocks[1],
            Block::Raw {
                xml: "<w:sdt><w:sdtContent/></w:sdt>".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_non_zip() {
        let err = read_document(b"%PDF-1.7 not a docx").unwrap_err();
        assert!(matches!(err, Error::UnknownFormat));
        assert_eq!(err.kind(), crate::error::ErrorKind::Load);
    }

    #[test]
    fn test_broken_zip() {
        let err = read_document(b"PK\x03\x04 truncated").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Load);
    }
}
