//! Zip container and relationship handling.

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::xml;
use crate::error::{Error, Result};
use crate::model::{Package, PackageEntry};

pub(crate) const PACKAGE_RELS: &str = "_rels/.rels";
pub(crate) const DEFAULT_MAIN_PART: &str = "word/document.xml";

pub(crate) const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub(crate) const REL_HEADER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
pub(crate) const REL_FOOTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";

/// Read every file entry of a zip archive, in archive order.
pub(crate) fn read_package(data: &[u8]) -> Result<Package> {
    let mut archive =
        ZipArchive::new(Cursor::new(data)).map_err(|e| Error::Zip(e.to_string()))?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)?;
        entries.push(PackageEntry {
            name: file.name().to_string(),
            data: bytes,
        });
    }

    let mut package = Package {
        entries,
        main_part: String::new(),
    };
    package.main_part = find_main_part(&package)?;
    Ok(package)
}

/// Locate the main document part through the package relationships.
fn find_main_part(package: &Package) -> Result<String> {
    let main = match package.get(PACKAGE_RELS) {
        Some(data) => read_relationships(PACKAGE_RELS, data, "")?
            .into_values()
            .find(|rel| rel.kind == REL_OFFICE_DOCUMENT)
            .map(|rel| rel.target),
        None => None,
    };
    let main = main.unwrap_or_else(|| DEFAULT_MAIN_PART.to_string());

    if package.get(&main).is_none() {
        return Err(Error::MissingPart(main));
    }
    Ok(main)
}

/// One relationship with its target resolved to a package part name.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Relationship {
    pub kind: String,
    pub target: String,
}

/// Relationships of a part, keyed by id. External targets are skipped.
pub(crate) fn read_relationships(
    rels_part: &str,
    data: &[u8],
    base_dir: &str,
) -> Result<HashMap<String, Relationship>> {
    let root = xml::parse(rels_part, data)?;
    let mut rels = HashMap::new();

    for rel in root.elements().filter(|e| e.local_name() == "Relationship") {
        if rel.attr("TargetMode") == Some("External") {
            continue;
        }
        let (Some(id), Some(kind), Some(target)) =
            (rel.attr("Id"), rel.attr("Type"), rel.attr("Target"))
        else {
            continue;
        };
        rels.insert(
            id.to_string(),
            Relationship {
                kind: kind.to_string(),
                target: resolve_target(base_dir, target),
            },
        );
    }
    Ok(rels)
}

/// Name of the relationships part belonging to `part`.
pub(crate) fn rels_part_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Directory of a part name ("word/document.xml" -> "word").
pub(crate) fn part_dir(part: &str) -> &str {
    part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Resolve a relationship target against the directory of its source part.
pub(crate) fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Write entries into a new zip archive.
///
/// Media is stored as is; everything else is deflated.
pub(crate) fn write_package<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a [u8])>,
) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, data) in entries {
        let options = if name.starts_with("word/media/") {
            stored
        } else {
            deflated
        };
        writer.start_file(name, options)?;
        writer.write_all(data)?;
    }

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/>
</Relationships>"#;

    #[test]
    fn test_read_relationships() {
        let rels = read_relationships("word/_rels/document.xml.rels", RELS.as_bytes(), "word")
            .unwrap();

        assert_eq!(rels.len(), 2);
        assert_eq!(rels["rId1"].target, "word/header1.xml");
        assert_eq!(rels["rId1"].kind, REL_HEADER);
        assert_eq!(rels["rId3"].target, "media/image1.png");
        assert!(!rels.contains_key("rId2"));
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("word", "footer2.xml"), "word/footer2.xml");
        assert_eq!(resolve_target("word", "/word/document.xml"), "word/document.xml");
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
        assert_eq!(resolve_target("word/sub", "./../x.xml"), "word/x.xml");
    }

    #[test]
    fn test_rels_part_for() {
        assert_eq!(rels_part_for("word/document.xml"), "word/_rels/document.xml.rels");
        assert_eq!(rels_part_for("document.xml"), "_rels/document.xml.rels");
        assert_eq!(part_dir("word/document.xml"), "word");
    }

    #[test]
    fn test_write_then_read_package() {
        let bytes = write_package([
            ("[Content_Types].xml", b"<Types/>".as_slice()),
            ("word/document.xml", b"<w:document/>".as_slice()),
            ("word/media/image1.png", b"\x89PNG".as_slice()),
        ])
        .unwrap();

        let package = read_package(&bytes).unwrap();
        assert_eq!(package.main_part, DEFAULT_MAIN_PART);
        assert_eq!(package.entries.len(), 3);
        assert_eq!(package.get("word/media/image1.png"), Some(b"\x89PNG".as_slice()));
    }

    #[test]
    fn test_missing_main_part() {
        let bytes = write_package([("[Content_Types].xml", b"<Types/>".as_slice())]).unwrap();
        let err = read_package(&bytes).unwrap_err();
        assert!(matches!(err, Error::MissingPart(ref p) if p == "word/document.xml"));
    }
}
