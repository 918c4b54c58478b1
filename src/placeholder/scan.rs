//! Placeholder scanning.

use super::grammar::{self, Syntax};
use crate::model::Document;
use crate::walk::{self, Region};
use serde::Serialize;
use std::collections::BTreeSet;

/// One placeholder occurrence found by [`scan_locations`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    /// Field name
    pub name: String,
    /// Syntax it was written in
    pub syntax: Syntax,
    /// Where it was found
    pub region: Region,
}

/// Find every placeholder name in the document.
///
/// The result is deduplicated and sorted. An empty result means the
/// document has nothing to fill.
pub fn find_placeholders(doc: &Document) -> Vec<String> {
    let mut names = BTreeSet::new();
    for (_, paragraph) in walk::paragraphs(doc) {
        let text = paragraph.plain_text();
        for (_, name) in grammar::captures(&text) {
            if !names.contains(name) {
                names.insert(name.to_string());
            }
        }
    }
    log::debug!("Found {} placeholders", names.len());
    names.into_iter().collect()
}

/// Placeholder names in a piece of plain text, sorted and deduplicated.
pub fn placeholders_in_text(text: &str) -> Vec<String> {
    grammar::captures(text)
        .map(|(_, name)| name.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Every placeholder occurrence in walk order.
///
/// Within a paragraph, occurrences are grouped by syntax in priority order.
pub fn scan_locations(doc: &Document) -> Vec<Occurrence> {
    let mut found = Vec::new();
    for (region, paragraph) in walk::paragraphs(doc) {
        let text = paragraph.plain_text();
        found.extend(grammar::captures(&text).map(|(syntax, name)| Occurrence {
            name: name.to_string(),
            syntax,
            region,
        }));
    }
    found
}
