//! Placeholder substitution.
//!
//! Fields are applied one at a time. For each field every walked paragraph
//! is checked for the field's token in priority order (double-brace, then
//! bracket, then single-brace) and only the first syntax found is replaced.
//! A paragraph that gets rewritten has its whole text collapsed into its
//! first run, so the first run's formatting wins for that paragraph.
//! Paragraphs without a match keep their runs untouched.
//!
//! Substitution is a single pass per field: a value that happens to contain
//! another field's token is not rescanned.

use super::grammar::{self, Syntax};
use crate::extract::FieldValues;
use crate::model::{Document, Paragraph};
use crate::walk;

/// Replace placeholders with values, in place.
///
/// Returns the same document for chaining.
pub fn replace_placeholders<'a>(doc: &'a mut Document, values: &FieldValues) -> &'a mut Document {
    substitute(doc, values);
    doc
}

/// Replace placeholders with values and return the number of paragraph
/// rewrites performed.
pub fn substitute(doc: &mut Document, values: &FieldValues) -> usize {
    let mut rewrites = 0;
    for (name, value) in values.iter() {
        let mut hits = 0;
        for (region, paragraph) in walk::paragraphs_mut(doc) {
            if let Some(syntax) = replace_in_paragraph(paragraph, name, value) {
                log::debug!("Replaced {} in {}", syntax.token(name), region);
                hits += 1;
            }
        }
        if hits == 0 {
            log::debug!("No occurrence of {} in document", name);
        }
        rewrites += hits;
    }
    log::debug!("Substitution rewrote {} paragraphs", rewrites);
    rewrites
}

/// Replace one field in one paragraph.
///
/// Every occurrence of the first matching token is replaced. Returns the
/// syntax that matched, or `None` when the paragraph was left untouched.
pub fn replace_in_paragraph(paragraph: &mut Paragraph, name: &str, value: &str) -> Option<Syntax> {
    let text = paragraph.plain_text();
    let (syntax, token) = grammar::first_matching(&text, name)?;
    paragraph.set_text(text.replace(&token, value));
    Some(syntax)
}
