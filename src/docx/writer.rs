//! Rendering the document model back into a DOCX package.

use std::collections::HashMap;

use super::package::{
    self, DEFAULT_MAIN_PART, PACKAGE_RELS, REL_FOOTER, REL_HEADER, REL_OFFICE_DOCUMENT,
};
use quick_xml::escape::escape;

use super::xml::{self, Element, Node, DECLARATION};
use crate::error::{Error, Result};
use crate::model::{
    Alignment, Block, Document, HeaderFooter, InlineContent, Package, Paragraph, ParagraphStyle,
    RowContent, RunPiece, Section, Table, TableCell, TableContent, TableRow, TextRun, TextStyle,
};

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_HEADER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
const CT_FOOTER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";

/// Letter size with one-inch margins, in twentieths of a point.
const PAGE_SETUP: &str = r#"<w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/>"#;

/// Where rendered blocks are going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Back into the package they were read from: properties the source
    /// did not have stay absent.
    Loaded,
    /// Into a new package: tables and cells get default properties.
    New,
}

/// Write a document as DOCX bytes.
///
/// A document read from a package is written over that package; a
/// document built in code gets a new minimal package.
pub fn write_document(doc: &Document) -> Result<Vec<u8>> {
    match &doc.package {
        Some(package) => write_into_package(doc, package),
        None => write_new_package(doc),
    }
}

fn write_into_package(doc: &Document, package: &Package) -> Result<Vec<u8>> {
    let mut rendered: HashMap<&str, Vec<u8>> = HashMap::new();

    let main = package
        .get(&package.main_part)
        .ok_or_else(|| Error::Consistency(format!("main part {} is gone", package.main_part)))?;
    let mut root = xml::parse(&package.main_part, main)?;
    let body = root
        .find_mut("body")
        .ok_or_else(|| Error::xml(&package.main_part, "document has no body"))?;
    body.children = vec![Node::Raw(render_blocks(&doc.body, Mode::Loaded))];
    rendered.insert(package.main_part.as_str(), xml::to_part(&root));

    for (index, section) in doc.sections.iter().enumerate() {
        for (what, part) in [("header", &section.header), ("footer", &section.footer)] {
            let Some(part) = part else { continue };
            if part.part_name.is_empty() {
                return Err(Error::Consistency(format!(
                    "{} of section {} has no part in the source package",
                    what,
                    index + 1
                )));
            }
            let data = package.get(&part.part_name).ok_or_else(|| {
                Error::Consistency(format!(
                    "{} part {} of section {} is missing from the package",
                    what,
                    part.part_name,
                    index + 1
                ))
            })?;
            let mut root = xml::parse(&part.part_name, data)?;
            root.children = vec![Node::Raw(render_blocks(&part.content, Mode::Loaded))];
            rendered.insert(part.part_name.as_str(), xml::to_part(&root));
        }
    }

    log::debug!("Re-rendered {} parts", rendered.len());

    package::write_package(package.entries.iter().map(|entry| {
        let data = rendered
            .get(entry.name.as_str())
            .map(Vec::as_slice)
            .unwrap_or(entry.data.as_slice());
        (entry.name.as_str(), data)
    }))
}

/// Header and footer parts of a document built in code.
struct NewPart<'a> {
    name: String,
    rel_id: String,
    root: &'static str,
    content: &'a HeaderFooter,
}

fn write_new_package(doc: &Document) -> Result<Vec<u8>> {
    let mut parts: Vec<NewPart<'_>> = Vec::new();
    let mut section_refs: Vec<String> = Vec::with_capacity(doc.sections.len());
    let (mut headers, mut footers) = (0, 0);

    for section in &doc.sections {
        let mut refs = String::new();
        let Section { header, footer } = section;
        if let Some(header) = header {
            headers += 1;
            let rel_id = format!("rId{}", parts.len() + 1);
            refs.push_str(&format!(
                r#"<w:headerReference w:type="default" r:id="{}"/>"#,
                rel_id
            ));
            parts.push(NewPart {
                name: format!("word/header{}.xml", headers),
                rel_id,
                root: "w:hdr",
                content: header,
            });
        }
        if let Some(footer) = footer {
            footers += 1;
            let rel_id = format!("rId{}", parts.len() + 1);
            refs.push_str(&format!(
                r#"<w:footerReference w:type="default" r:id="{}"/>"#,
                rel_id
            ));
            parts.push(NewPart {
                name: format!("word/footer{}.xml", footers),
                rel_id,
                root: "w:ftr",
                content: footer,
            });
        }
        section_refs.push(refs);
    }

    let mut body = render_blocks(&doc.body, Mode::New);
    if let Some((last, rest)) = section_refs.split_last() {
        for refs in rest {
            body.push_str(&format!(
                "<w:p><w:pPr><w:sectPr>{}<w:type w:val=\"nextPage\"/>{}</w:sectPr></w:pPr></w:p>",
                refs, PAGE_SETUP
            ));
        }
        body.push_str(&format!("<w:sectPr>{}{}</w:sectPr>", last, PAGE_SETUP));
    } else {
        body.push_str(&format!("<w:sectPr>{}</w:sectPr>", PAGE_SETUP));
    }

    let document = part_xml(&format!(
        r#"<w:document xmlns:w="{}" xmlns:r="{}"><w:body>{}</w:body></w:document>"#,
        NS_W, NS_R, body
    ));

    let mut overrides = format!(
        r#"<Override PartName="/{}" ContentType="{}"/>"#,
        DEFAULT_MAIN_PART, CT_DOCUMENT
    );
    let mut document_rels = String::new();
    let mut part_files: Vec<(String, Vec<u8>)> = Vec::with_capacity(parts.len());
    for part in &parts {
        let (kind, content_type) = if part.root == "w:hdr" {
            (REL_HEADER, CT_HEADER)
        } else {
            (REL_FOOTER, CT_FOOTER)
        };
        overrides.push_str(&format!(
            r#"<Override PartName="/{}" ContentType="{}"/>"#,
            part.name, content_type
        ));
        let target = part.name.trim_start_matches("word/");
        document_rels.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            part.rel_id, kind, target
        ));
        part_files.push((
            part.name.clone(),
            part_xml(&format!(
                r#"<{root} xmlns:w="{}" xmlns:r="{}">{}</{root}>"#,
                NS_W,
                NS_R,
                render_blocks(&part.content.content, Mode::New),
                root = part.root
            )),
        ));
    }

    let content_types = part_xml(&format!(
        r#"<Types xmlns="{}"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>{}</Types>"#,
        NS_CONTENT_TYPES, overrides
    ));
    let package_rels = part_xml(&format!(
        r#"<Relationships xmlns="{}"><Relationship Id="rId1" Type="{}" Target="{}"/></Relationships>"#,
        NS_PACKAGE_RELS, REL_OFFICE_DOCUMENT, DEFAULT_MAIN_PART
    ));
    let document_rels = part_xml(&format!(
        r#"<Relationships xmlns="{}">{}</Relationships>"#,
        NS_PACKAGE_RELS, document_rels
    ));
    let document_rels_name = package::rels_part_for(DEFAULT_MAIN_PART);

    let mut entries: Vec<(&str, &[u8])> = vec![
        ("[Content_Types].xml", content_types.as_slice()),
        (PACKAGE_RELS, package_rels.as_slice()),
        (DEFAULT_MAIN_PART, document.as_slice()),
        (document_rels_name.as_str(), document_rels.as_slice()),
    ];
    entries.extend(part_files.iter().map(|(n, d)| (n.as_str(), d.as_slice())));

    package::write_package(entries)
}

fn part_xml(root: &str) -> Vec<u8> {
    let mut out = String::from(DECLARATION);
    out.push_str("\r\n");
    out.push_str(root);
    out.into_bytes()
}

/// Render blocks as a WordprocessingML fragment.
pub(crate) fn render_blocks(blocks: &[Block], mode: Mode) -> String {
    let mut out = String::new();
    for block in blocks {
        write_block(block, mode, &mut out);
    }
    out
}

fn write_block(block: &Block, mode: Mode, out: &mut String) {
    match block {
        Block::Paragraph(p) => write_paragraph(p, out),
        Block::Table(t) => write_table(t, mode, out),
        Block::Raw { xml } => out.push_str(xml),
    }
}

fn open_tag(name: &str, attributes: &[(String, String)], out: &mut String) {
    out.push('<');
    out.push_str(name);
    for (key, value) in attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }
    out.push('>');
}

fn write_paragraph(paragraph: &Paragraph, out: &mut String) {
    // Paragraphs nobody edited go back as they were read.
    if let Some(source) = &paragraph.source {
        out.push_str(source);
        return;
    }
    open_tag("w:p", &paragraph.attributes, out);
    write_paragraph_style(&paragraph.style, out);
    for item in &paragraph.content {
        match item {
            InlineContent::Text(run) => write_run(run, out),
            InlineContent::Raw { xml } => out.push_str(xml),
        }
    }
    out.push_str("</w:p>");
}

fn write_paragraph_style(style: &ParagraphStyle, out: &mut String) {
    if let Some(properties) = &style.properties {
        out.push_str(properties);
        return;
    }
    if style.style_id.is_none() && style.alignment == Alignment::Left {
        return;
    }
    let mut ppr = Element::new("w:pPr");
    if let Some(id) = &style.style_id {
        ppr.children.push(val("w:pStyle", id));
    }
    if style.alignment != Alignment::Left {
        ppr.children.push(val("w:jc", style.alignment.as_jc()));
    }
    ppr.write_to(out);
}

fn write_run(run: &TextRun, out: &mut String) {
    // Runs emptied by substitution are dropped.
    if run.text.is_empty() && run.objects.is_empty() {
        return;
    }
    out.push_str("<w:r>");
    write_text_style(&run.style, out);
    for piece in run.pieces() {
        match piece {
            RunPiece::Text(text) => write_text(text, out),
            RunPiece::Object(xml) => out.push_str(xml),
        }
    }
    out.push_str("</w:r>");
}

fn write_text(text: &str, out: &mut String) {
    let mut piece = String::new();
    for ch in text.chars() {
        match ch {
            '\t' => {
                flush_text(&mut piece, out);
                out.push_str("<w:tab/>");
            }
            '\n' => {
                flush_text(&mut piece, out);
                out.push_str("<w:br/>");
            }
            '\r' => {}
            c => piece.push(c),
        }
    }
    flush_text(&mut piece, out);
}

fn flush_text(piece: &mut String, out: &mut String) {
    if piece.is_empty() {
        return;
    }
    let mut t = Element::new("w:t");
    t.attrs.push(("xml:space".to_string(), "preserve".to_string()));
    t.children.push(Node::Text(std::mem::take(piece)));
    t.write_to(out);
}

fn write_text_style(style: &TextStyle, out: &mut String) {
    if let Some(properties) = &style.properties {
        out.push_str(properties);
        return;
    }
    if !style.has_styling() {
        return;
    }
    let mut rpr = Element::new("w:rPr");
    if let Some(font) = &style.font_name {
        let mut fonts = Element::new("w:rFonts");
        fonts.attrs.push(("w:ascii".to_string(), font.clone()));
        fonts.attrs.push(("w:hAnsi".to_string(), font.clone()));
        rpr.children.push(Node::Element(fonts));
    }
    if style.bold {
        rpr.children.push(Node::Element(Element::new("w:b")));
    }
    if style.italic {
        rpr.children.push(Node::Element(Element::new("w:i")));
    }
    if let Some(color) = &style.color {
        rpr.children.push(val("w:color", color));
    }
    if let Some(size) = style.font_size {
        let half_points = (size * 2.0).round() as u32;
        rpr.children.push(val("w:sz", &half_points.to_string()));
    }
    if style.underline {
        rpr.children.push(val("w:u", "single"));
    }
    rpr.write_to(out);
}

fn write_table(table: &Table, mode: Mode, out: &mut String) {
    out.push_str("<w:tbl>");
    match &table.properties {
        Some(properties) => out.push_str(properties),
        None if mode == Mode::Loaded => {}
        None => {
            out.push_str(
                r#"<w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="0" w:type="auto"/></w:tblPr>"#,
            );
            out.push_str("<w:tblGrid>");
            for _ in 0..table.column_count() {
                out.push_str(r#"<w:gridCol w:w="2000"/>"#);
            }
            out.push_str("</w:tblGrid>");
        }
    }
    for item in &table.content {
        match item {
            TableContent::Row(row) => write_row(row, mode, out),
            TableContent::Raw { xml } => out.push_str(xml),
        }
    }
    out.push_str("</w:tbl>");
}

fn write_row(row: &TableRow, mode: Mode, out: &mut String) {
    open_tag("w:tr", &row.attributes, out);
    if let Some(properties) = &row.properties {
        out.push_str(properties);
    }
    for item in &row.content {
        match item {
            RowContent::Cell(cell) => write_cell(cell, mode, out),
            RowContent::Raw { xml } => out.push_str(xml),
        }
    }
    out.push_str("</w:tr>");
}

fn write_cell(cell: &TableCell, mode: Mode, out: &mut String) {
    out.push_str("<w:tc>");
    match &cell.properties {
        Some(properties) => out.push_str(properties),
        None if mode == Mode::Loaded => {}
        None => out.push_str(r#"<w:tcPr><w:tcW w:w="0" w:type="auto"/></w:tcPr>"#),
    }
    for block in &cell.content {
        write_block(block, mode, out);
    }
    // A cell must end with a paragraph.
    if !matches!(cell.content.last(), Some(Block::Paragraph(_))) {
        out.push_str("<w:p/>");
    }
    out.push_str("</w:tc>");
}

fn val(name: &str, value: &str) -> Node {
    let mut e = Element::new(name);
    e.attrs.push(("w:val".to_string(), value.to_string()));
    Node::Element(e)
}
