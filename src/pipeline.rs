//! The fill pipeline: template and reports in, filled document out.
//!
//! A run has four steps:
//!
//! 1. load the template and scan it (a template without placeholders stops
//!    the run here);
//! 2. extract source text from the reports;
//! 3. extract field values, with exactly one call to the field extractor;
//! 4. substitute the values and serialize the document.
//!
//! Any failure aborts the run and no output is produced.

use std::path::Path;

use chrono::{DateTime, Local};

use crate::error::{Error, Result};
use crate::extract::{FieldExtractor, FieldValues, OpenRouterExtractor, OpenRouterOptions};
use crate::report::{self, PdfTextExtractor, ReportOptions, ReportSource, TextExtractor};
use crate::template::Template;

/// Default output file name prefix.
pub const DEFAULT_FILE_PREFIX: &str = "filled_insurance_form";

/// Options for a pipeline run.
#[derive(Debug, Clone)]
pub struct FillOptions {
    /// How reports are read
    pub report: ReportOptions,

    /// Output file name prefix
    pub file_prefix: String,
}

impl FillOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set report options.
    pub fn with_report_options(mut self, report: ReportOptions) -> Self {
        self.report = report;
        self
    }

    /// Keep going when a report cannot be read.
    pub fn lenient(mut self) -> Self {
        self.report = self.report.lenient();
        self
    }

    /// Set the output file name prefix.
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            report: ReportOptions::default(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct FillRequest {
    /// Template DOCX bytes
    pub template: Vec<u8>,
    /// Reports to read, in order
    pub reports: Vec<ReportSource>,
    /// Run options
    pub options: FillOptions,
}

impl FillRequest {
    /// Create a request with default options.
    pub fn new(template: Vec<u8>, reports: Vec<ReportSource>) -> Self {
        Self {
            template,
            reports,
            options: FillOptions::default(),
        }
    }

    /// Set run options.
    pub fn with_options(mut self, options: FillOptions) -> Self {
        self.options = options;
        self
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct FilledDocument {
    /// Filled DOCX bytes
    pub bytes: Vec<u8>,
    /// Suggested file name
    pub file_name: String,
    /// Placeholders found in the template
    pub placeholders: Vec<String>,
    /// Values substituted
    pub values: FieldValues,
    /// Length of the combined source text, in characters
    pub source_chars: usize,
}

impl FilledDocument {
    /// Write the document into `dir` under its suggested file name.
    pub fn save_in<P: AsRef<Path>>(&self, dir: P) -> Result<std::path::PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// A pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Load the template and scan it
    LoadTemplate,
    /// Extract text from the reports
    ExtractText,
    /// Extract field values from the text
    ExtractFields,
    /// Substitute values and serialize
    FillTemplate,
}

impl Step {
    /// All steps in order.
    pub const ALL: [Step; 4] = [
        Step::LoadTemplate,
        Step::ExtractText,
        Step::ExtractFields,
        Step::FillTemplate,
    ];

    /// One-based position of this step.
    pub fn number(&self) -> usize {
        match self {
            Step::LoadTemplate => 1,
            Step::ExtractText => 2,
            Step::ExtractFields => 3,
            Step::FillTemplate => 4,
        }
    }

    /// Short description for progress output.
    pub fn description(&self) -> &'static str {
        match self {
            Step::LoadTemplate => "Loading template",
            Step::ExtractText => "Extracting text from reports",
            Step::ExtractFields => "Extracting field values",
            Step::FillTemplate => "Filling template",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}/{}] {}", self.number(), Step::ALL.len(), self.description())
    }
}

/// Hooks called while a run progresses.
///
/// All methods do nothing by default.
pub trait PipelineObserver {
    /// A step is starting.
    fn on_step(&mut self, step: Step) {
        let _ = step;
    }

    /// The template was scanned.
    fn on_placeholders(&mut self, placeholders: &[String]) {
        let _ = placeholders;
    }

    /// Source text is ready.
    fn on_source_text(&mut self, text: &str) {
        let _ = text;
    }

    /// Field values are ready.
    fn on_values(&mut self, values: &FieldValues) {
        let _ = values;
    }

    /// The run finished.
    fn on_complete(&mut self, output: &FilledDocument) {
        let _ = output;
    }
}

/// Observer that logs every event. [`Pipeline::run`] uses it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn on_step(&mut self, step: Step) {
        log::info!("{}", step);
    }

    fn on_placeholders(&mut self, placeholders: &[String]) {
        log::info!("Found {} placeholders: {}", placeholders.len(), placeholders.join(", "));
    }

    fn on_source_text(&mut self, text: &str) {
        log::info!("Source text: {} characters", text.chars().count());
    }

    fn on_values(&mut self, values: &FieldValues) {
        log::info!("Extracted {} values ({} found)", values.len(), values.found_count());
    }

    fn on_complete(&mut self, output: &FilledDocument) {
        log::info!("Produced {} ({} bytes)", output.file_name, output.bytes.len());
    }
}

/// Runs fill requests against a text extractor and a field extractor.
pub struct Pipeline {
    text_extractor: Box<dyn TextExtractor>,
    field_extractor: Box<dyn FieldExtractor>,
}

impl Pipeline {
    /// Create a pipeline from its two collaborators.
    pub fn new(
        text_extractor: impl TextExtractor + 'static,
        field_extractor: impl FieldExtractor + 'static,
    ) -> Self {
        Self {
            text_extractor: Box::new(text_extractor),
            field_extractor: Box::new(field_extractor),
        }
    }

    /// Pipeline reading PDF reports and extracting fields through OpenRouter.
    pub fn openrouter(api_key: impl Into<String>, options: OpenRouterOptions) -> Result<Self> {
        Ok(Self::new(
            PdfTextExtractor::new(),
            OpenRouterExtractor::with_options(api_key, options)?,
        ))
    }

    /// Run a request.
    pub fn run(&self, request: &FillRequest) -> Result<FilledDocument> {
        self.run_with_observer(request, &mut LogObserver)
    }

    /// Run a request, reporting progress to `observer`.
    pub fn run_with_observer(
        &self,
        request: &FillRequest,
        observer: &mut dyn PipelineObserver,
    ) -> Result<FilledDocument> {
        observer.on_step(Step::LoadTemplate);
        if request.reports.is_empty() {
            return Err(Error::InvalidInput("at least one report is required".to_string()));
        }
        let mut template = Template::from_bytes(&request.template)?;
        observer.on_placeholders(template.placeholders());
        let placeholders = template.require_placeholders()?.to_vec();

        observer.on_step(Step::ExtractText);
        let source_text = report::combined_text(
            self.text_extractor.as_ref(),
            &request.reports,
            &request.options.report,
        )?;
        observer.on_source_text(&source_text);
        log::debug!("Combined text of {} reports", request.reports.len());

        observer.on_step(Step::ExtractFields);
        let values = self.field_extractor.extract(&placeholders, &source_text)?;
        let missing = values.missing(&placeholders);
        if !missing.is_empty() {
            log::warn!("Extractor returned no value for {}", missing.join(", "));
        }
        let values = values.complete_for(&placeholders);
        observer.on_values(&values);

        observer.on_step(Step::FillTemplate);
        template.fill(&values)?;
        let bytes = template.to_bytes()?;

        let output = FilledDocument {
            bytes,
            file_name: output_file_name(&request.options.file_prefix, Local::now()),
            placeholders,
            values,
            source_chars: source_text.chars().count(),
        };
        observer.on_complete(&output);
        Ok(output)
    }
}

/// Output file name: `<prefix>_<YYYYmmdd_HHMMSS>.docx`.
pub fn output_file_name(prefix: &str, timestamp: DateTime<Local>) -> String {
    format!("{}_{}.docx", prefix, timestamp.format("%Y%m%d_%H%M%S"))
}
