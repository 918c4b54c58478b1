//! Document-level types.

use super::{Paragraph, Table};
use serde::{Deserialize, Serialize};

/// A word-processing document: body blocks plus per-section headers and
/// footers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Body content in document order
    pub body: Vec<Block>,

    /// Sections in document order
    pub sections: Vec<Section>,

    /// The package this document was read from
    #[serde(skip)]
    pub(crate) package: Option<Package>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block to the body.
    pub fn add_block(&mut self, block: Block) {
        self.body.push(block);
    }

    /// Add a paragraph to the body.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.body.push(Block::Paragraph(paragraph));
    }

    /// Add a table to the body.
    pub fn add_table(&mut self, table: Table) {
        self.body.push(Block::Table(table));
    }

    /// Add a section.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Body paragraphs (not those inside tables).
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Body tables.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Check if the document was read from a package.
    pub fn has_package(&self) -> bool {
        self.package.is_some()
    }

    /// Check if the body is empty.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Plain text of the body, one line per paragraph.
    pub fn plain_text(&self) -> String {
        self.body
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(p) => Some(p.plain_text()),
                Block::Table(t) => Some(t.plain_text()),
                Block::Raw { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A content block in the body, a cell, or a header/footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),

    /// A table
    Table(Table),

    /// Markup the model does not interpret, kept verbatim
    Raw {
        /// XML fragment
        xml: String,
    },
}

impl Block {
    /// Check if this block is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Block::Paragraph(_))
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table(_))
    }
}

/// A document section with its own default header and footer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Default header, if the section defines one
    pub header: Option<HeaderFooter>,

    /// Default footer, if the section defines one
    pub footer: Option<HeaderFooter>,
}

impl Section {
    /// Create a section without header or footer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header and return self.
    pub fn with_header(mut self, header: HeaderFooter) -> Self {
        self.header = Some(header);
        self
    }

    /// Set the footer and return self.
    pub fn with_footer(mut self, footer: HeaderFooter) -> Self {
        self.footer = Some(footer);
        self
    }
}

/// Content of a header or footer part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderFooter {
    /// Package part holding this content (e.g., "word/header1.xml");
    /// empty for content built in code
    pub part_name: String,

    /// Blocks in the part
    pub content: Vec<Block>,
}

impl HeaderFooter {
    /// Create header/footer content from paragraphs.
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            part_name: String::new(),
            content: paragraphs.into_iter().map(Block::Paragraph).collect(),
        }
    }

    /// Create header/footer content from a single line of text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(vec![Paragraph::with_text(text)])
    }

    /// Iterate over the top-level paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.content.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }
}

/// The raw entries of the package a document was read from.
#[derive(Debug, Clone, Default)]
pub(crate) struct Package {
    /// Entries in archive order
    pub entries: Vec<PackageEntry>,

    /// Name of the main document part
    pub main_part: String,
}

impl Package {
    /// Get an entry's bytes by name.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.data.as_slice())
    }
}

/// One file inside a package.
#[derive(Debug, Clone)]
pub(crate) struct PackageEntry {
    pub name: String,
    pub data: Vec<u8>,
}
