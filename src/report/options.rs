//! Report reading options.

/// Options for turning reports into source text.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Whether to read several reports in parallel
    pub parallel: bool,

    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,
}

impl ReportOptions {
    /// Create new report options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (a failed report becomes an error line in the text).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable or disable NFC normalization.
    pub fn with_normalize_unicode(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            parallel: true,
            normalize_unicode: true,
        }
    }
}

/// Error handling mode while reading reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any unreadable report
    #[default]
    Strict,
    /// Keep going; the report's text becomes `Error: <message>`
    Lenient,
}
