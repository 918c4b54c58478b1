//! Placeholder grammar, scanning and substitution.
//!
//! Three syntaxes are recognized: `{{Name}}`, `[NAME]` and `{NAME}`. A
//! placeholder is identified by its field name alone; names are compared
//! exactly, with no case folding between syntaxes.

mod grammar;
mod scan;
mod substitute;

pub use grammar::{captures, first_matching, syntax_examples, Syntax};
pub use scan::{find_placeholders, placeholders_in_text, scan_locations, Occurrence};
pub use substitute::{replace_in_paragraph, replace_placeholders, substitute};
