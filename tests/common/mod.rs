//! Shared fixtures: DOCX packages built in memory the way Word lays them out.

#![allow(dead_code)]

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/header1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml"/><Override PartName="/word/header2.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml"/><Override PartName="/word/footer1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/></Types>"#;

pub const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

pub const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/><Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/><Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header2.xml"/><Relationship Id="rId6" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/claims" TargetMode="External"/></Relationships>"#;

/// Two sections. The first paragraph splits `{{Claimant Name}}` over two
/// runs with different formatting; the second section reuses footer1.
pub const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"><w:body><w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Insurance Claim Form</w:t></w:r></w:p><w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Claimant: {{Claimant </w:t></w:r><w:r><w:rPr><w:i/></w:rPr><w:t>Name}}</w:t></w:r></w:p><w:p><w:r><w:t>Untouched </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>bold</w:t></w:r><w:r><w:t xml:space="preserve"> text</w:t></w:r></w:p><w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/></w:tblPr><w:tblGrid><w:gridCol w:w="4000"/><w:gridCol w:w="4000"/></w:tblGrid><w:tr><w:tc><w:p><w:r><w:t>Policy</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>[POLICY_NO]</w:t></w:r></w:p></w:tc></w:tr><w:tr><w:tc><w:p><w:r><w:t>Date</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>{ACCIDENT_DATE}</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p><w:r><w:drawing><wp:inline><wp:extent cx="100" cy="100"/></wp:inline></w:drawing></w:r></w:p><w:p><w:hyperlink r:id="rId6"><w:r><w:t>{{Hidden}}</w:t></w:r></w:hyperlink></w:p><w:p><w:pPr><w:sectPr><w:headerReference w:type="default" r:id="rId3"/><w:footerReference w:type="default" r:id="rId4"/><w:pgSz w:w="12240" w:h="15840"/></w:sectPr></w:pPr></w:p><w:p><w:r><w:t>Estimate: {{DamageEstimate}}</w:t></w:r></w:p><w:sectPr><w:headerReference w:type="default" r:id="rId5"/><w:footerReference w:type="default" r:id="rId4"/><w:pgSz w:w="12240" w:h="15840"/></w:sectPr></w:body></w:document>"#;

pub const HEADER1: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:p><w:r><w:t>{{Insurer}}</w:t></w:r></w:p></w:hdr>"#;

pub const HEADER2: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:tbl><w:tr><w:tc><w:p><w:r><w:t>Claim [CLAIM_ID]</w:t></w:r></w:p></w:tc></w:tr></w:tbl></w:hdr>"#;

pub const FOOTER1: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:ftr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:p><w:r><w:t>Adjuster: {ADJUSTER}</w:t></w:r></w:p></w:ftr>"#;

pub const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style></w:styles>"#;

pub const IMAGE: &[u8] = b"\x89PNG\r\n\x1a\nnot really an image";

/// Placeholders of [`claim_form`], sorted.
pub const CLAIM_FORM_FIELDS: [&str; 7] = [
    "ACCIDENT_DATE",
    "ADJUSTER",
    "CLAIM_ID",
    "Claimant Name",
    "DamageEstimate",
    "Insurer",
    "POLICY_NO",
];

/// Paragraph without placeholders whose run has a page break between two
/// pieces of text.
pub const PAGE_BREAK_PARAGRAPH: &str = r#"<w:p w14:paraId="1A2B3C4D" w:rsidR="00AB12CD"><w:pPr><w:pStyle w:val="Body"/></w:pPr><w:r><w:rPr><w:i/></w:rPr><w:t>End of page one</w:t><w:br w:type="page"/><w:t>Page two</w:t></w:r></w:p>"#;

/// Paragraph with a symbol between the text and a placeholder.
pub const SYMBOL_PARAGRAPH: &str = r#"<w:p><w:r><w:t xml:space="preserve">Ref </w:t><w:sym w:font="Wingdings" w:char="F0FC"/><w:t xml:space="preserve"> {CLAIM_ID} ok</w:t></w:r></w:p>"#;

/// Row without placeholders: the middle cell sits in a content control and
/// no cell has properties.
pub const CONTROL_ROW: &str = r#"<w:tr w:rsidR="00AB12CD"><w:trPr><w:cantSplit/></w:trPr><w:tc><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc><w:sdt><w:sdtPr><w:alias w:val="Cell B"/></w:sdtPr><w:sdtContent><w:tc><w:p><w:r><w:t>B</w:t></w:r></w:p></w:tc></w:sdtContent></w:sdt><w:tc><w:p><w:r><w:t>C</w:t></w:r></w:p></w:tc></w:tr>"#;

/// Row holding `[POLICY_NO]`, between a bookmark start and end.
pub const POLICY_ROW: &str = r#"<w:bookmarkStart w:id="0" w:name="policy"/><w:tr><w:tc><w:p><w:r><w:t>[POLICY_NO]</w:t></w:r></w:p></w:tc></w:tr><w:bookmarkEnd w:id="0"/>"#;

/// Body of [`layout_form`].
pub fn layout_body() -> String {
    [
        "<w:p><w:r><w:t>[NAME]</w:t></w:r></w:p>",
        PAGE_BREAK_PARAGRAPH,
        SYMBOL_PARAGRAPH,
        r#"<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/></w:tblPr><w:tblGrid><w:gridCol w:w="3000"/><w:gridCol w:w="3000"/><w:gridCol w:w="3000"/></w:tblGrid>"#,
        CONTROL_ROW,
        POLICY_ROW,
        "</w:tbl>",
        r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr>"#,
    ]
    .concat()
}

/// A form whose layout mixes objects into runs and markup into tables.
pub fn layout_form() -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml"><w:body>{}</w:body></w:document>"#,
        layout_body()
    );
    build_package(&[
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS.as_bytes()),
        ("word/document.xml", document.as_bytes()),
    ])
}

/// Zip the given entries in order.
pub fn build_package(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A Word-style claim form with headers, a shared footer, styles and media.
pub fn claim_form() -> Vec<u8> {
    build_package(&[
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS.as_bytes()),
        ("word/document.xml", DOCUMENT.as_bytes()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.as_bytes()),
        ("word/styles.xml", STYLES.as_bytes()),
        ("word/header1.xml", HEADER1.as_bytes()),
        ("word/header2.xml", HEADER2.as_bytes()),
        ("word/footer1.xml", FOOTER1.as_bytes()),
        ("word/media/image1.png", IMAGE),
    ])
}

/// A package whose only paragraph has no placeholders.
pub fn plain_form() -> Vec<u8> {
    let document = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>Nothing to fill here.</w:t></w:r></w:p></w:body></w:document>"#;
    build_package(&[
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS.as_bytes()),
        ("word/document.xml", document.as_bytes()),
    ])
}

/// Read one entry of a zip archive.
pub fn read_entry(package: &[u8], name: &str) -> Option<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(package)).ok()?;
    let mut file = archive.by_name(name).ok()?;
    let mut data = Vec::new();
    file.read_to_end(&mut data).ok()?;
    Some(data)
}

/// Read one entry of a zip archive as text.
pub fn read_text_entry(package: &[u8], name: &str) -> String {
    let data = read_entry(package, name).unwrap_or_default();
    String::from_utf8(data).unwrap()
}
