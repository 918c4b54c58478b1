//! Paragraph and run-level types.

use serde::{Deserialize, Serialize};

/// A paragraph: an ordered sequence of runs plus opaque inline markup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Inline content in document order
    pub content: Vec<InlineContent>,

    /// Paragraph style
    pub style: ParagraphStyle,

    /// Attributes of the original `w:p` element
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,

    /// Markup the paragraph was read from.
    ///
    /// While set, the writer emits it instead of rendering the paragraph.
    /// The editing methods clear it; clear it yourself after changing
    /// `content` or `style` directly.
    #[serde(skip)]
    pub source: Option<String>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with one plain run.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_text(text);
        p
    }

    /// Create a paragraph from a sequence of runs.
    pub fn from_runs(runs: impl IntoIterator<Item = TextRun>) -> Self {
        Self {
            content: runs.into_iter().map(InlineContent::Text).collect(),
            ..Default::default()
        }
    }

    /// Add plain text as a new run.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.add_run(TextRun::new(text));
    }

    /// Add a styled text run.
    pub fn add_run(&mut self, run: TextRun) {
        self.source = None;
        self.content.push(InlineContent::Text(run));
    }

    /// Iterate over the text runs.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.content.iter().filter_map(|c| match c {
            InlineContent::Text(run) => Some(run),
            InlineContent::Raw { .. } => None,
        })
    }

    /// Iterate mutably over the text runs.
    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut TextRun> {
        self.source = None;
        self.content.iter_mut().filter_map(|c| match c {
            InlineContent::Text(run) => Some(run),
            InlineContent::Raw { .. } => None,
        })
    }

    /// Number of text runs.
    pub fn run_count(&self) -> usize {
        self.runs().count()
    }

    /// Concatenated text of all runs. This is the view placeholders are
    /// matched against.
    pub fn plain_text(&self) -> String {
        self.runs().map(|run| run.text.as_str()).collect()
    }

    /// Replace the paragraph text, collapsing it into the first run.
    ///
    /// Every run is emptied and the whole `text` is written into the first
    /// one, which keeps its style; a new run is appended when the paragraph
    /// has none. Opaque inline markup and run objects are left in place.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        let mut runs = self.runs_mut();
        match runs.next() {
            Some(first) => {
                first.text = text;
                for run in runs {
                    run.text.clear();
                }
            }
            None => {
                drop(runs);
                self.add_text(text);
            }
        }
    }

    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.plain_text().trim().is_empty()
    }
}

/// Inline content within a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineContent {
    /// A text run with styling
    Text(TextRun),

    /// Markup the model does not interpret (bookmarks, hyperlinks,
    /// proofing marks, fields), kept verbatim
    Raw {
        /// XML fragment
        xml: String,
    },
}

/// A run of text with consistent formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content (`\t` for tabs, `\n` for line breaks)
    pub text: String,

    /// Run formatting
    pub style: TextStyle,

    /// Non-text run children (drawings, page breaks, symbols, field
    /// characters), kept verbatim in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<RunObject>,
}

/// Markup inside a run, anchored at a position of the run text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunObject {
    /// Byte offset into [`TextRun::text`] the object follows
    pub offset: usize,

    /// XML fragment
    pub xml: String,
}

impl RunObject {
    /// Create an object anchored at `offset`.
    pub fn new(offset: usize, xml: impl Into<String>) -> Self {
        Self {
            offset,
            xml: xml.into(),
        }
    }
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::styled(
            text,
            TextStyle {
                bold: true,
                ..Default::default()
            },
        )
    }

    /// Create an italic text run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self::styled(
            text,
            TextStyle {
                italic: true,
                ..Default::default()
            },
        )
    }

    /// Create a run with an explicit style.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
            objects: Vec::new(),
        }
    }

    /// Check if this run has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Split the run into text pieces and objects, in document order.
    ///
    /// Offsets past the end of the text (after the text shrank) anchor at
    /// the end; offsets inside a character anchor before it.
    pub fn pieces(&self) -> Vec<RunPiece<'_>> {
        let mut pieces = Vec::with_capacity(self.objects.len() * 2 + 1);
        let mut pos = 0;
        for object in &self.objects {
            let at = floor_char_boundary(&self.text, object.offset.max(pos));
            if at > pos {
                pieces.push(RunPiece::Text(&self.text[pos..at]));
            }
            pieces.push(RunPiece::Object(&object.xml));
            pos = at;
        }
        if pos < self.text.len() {
            pieces.push(RunPiece::Text(&self.text[pos..]));
        }
        pieces
    }
}

/// A piece of a run as returned by [`TextRun::pieces`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPiece<'a> {
    /// Text
    Text(&'a str),
    /// Object markup
    Object(&'a str),
}

fn floor_char_boundary(text: &str, offset: usize) -> usize {
    if offset >= text.len() {
        return text.len();
    }
    (0..=offset)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0)
}

/// Run formatting.
///
/// The flags are read from the run properties for inspection. When
/// `properties` holds the original `w:rPr` markup it is written back as is;
/// otherwise the flags are used to build new run properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,

    /// Font name
    pub font_name: Option<String>,

    /// Font size in points
    pub font_size: Option<f32>,

    /// Text color (hex, e.g., "FF0000")
    pub color: Option<String>,

    /// Original run properties markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,
}

impl TextStyle {
    /// Check if any formatting is applied.
    pub fn has_styling(&self) -> bool {
        self.bold
            || self.italic
            || self.underline
            || self.font_name.is_some()
            || self.font_size.is_some()
            || self.color.is_some()
            || self.properties.is_some()
    }
}

/// Paragraph formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Named style (e.g., "Heading1")
    pub style_id: Option<String>,

    /// Text alignment
    pub alignment: Alignment,

    /// Original paragraph properties markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

impl Alignment {
    /// Parse a `w:jc` value.
    pub fn from_jc(value: &str) -> Self {
        match value {
            "center" => Alignment::Center,
            "right" | "end" => Alignment::Right,
            "both" | "distribute" => Alignment::Justify,
            _ => Alignment::Left,
        }
    }

    /// The `w:jc` value for this alignment.
    pub fn as_jc(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}
