//! formfill CLI - fill Word templates from PDF reports

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use formfill::extract::DEFAULT_MODEL;
use formfill::report::{self, report_info};
use formfill::{
    detect_format_from_path, FieldExtractor, FieldValues, FillOptions, FillRequest,
    FilledDocument, Format, LogObserver, OpenRouterExtractor, OpenRouterOptions, PdfTextExtractor,
    Pipeline, PipelineObserver, PresetExtractor, ReportOptions, ReportSource, Step, Template,
};

#[derive(Parser)]
#[command(name = "formfill")]
#[command(version)]
#[command(about = "Fill Word form templates with values from PDF reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill a template from one or more reports
    Fill {
        /// Template DOCX file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Report PDF files
        #[arg(value_name = "REPORT", required = true)]
        reports: Vec<PathBuf>,

        /// Output file or directory (current directory if not specified)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// OpenRouter API key
        #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Model to use
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,

        /// Request timeout in seconds
        #[arg(long, default_value = "60")]
        timeout: u64,

        /// Keep going when a report cannot be read
        #[arg(long)]
        lenient: bool,

        /// Take field values from a JSON file instead of the API
        #[arg(long, value_name = "FILE")]
        values_json: Option<PathBuf>,

        /// Output file name prefix
        #[arg(long, default_value = formfill::pipeline::DEFAULT_FILE_PREFIX)]
        prefix: String,
    },

    /// List the placeholders of a template
    Scan {
        /// Template DOCX file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Output JSON
        #[arg(long)]
        json: bool,

        /// Show where each placeholder occurs
        #[arg(long)]
        locations: bool,
    },

    /// Show template or report information
    Info {
        /// Template DOCX or report PDF
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the combined text of reports
    Text {
        /// Report PDF files
        #[arg(value_name = "REPORT", required = true)]
        reports: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Keep going when a report cannot be read
        #[arg(long)]
        lenient: bool,
    },

    /// Check that the API key is accepted
    CheckKey {
        /// OpenRouter API key
        #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Model to use
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fill {
            template,
            reports,
            output,
            api_key,
            model,
            timeout,
            lenient,
            values_json,
            prefix,
        } => {
            let options = OpenRouterOptions::new()
                .with_model(model)
                .with_timeout(Duration::from_secs(timeout));
            cmd_fill(FillArgs {
                template: &template,
                reports: &reports,
                output: output.as_deref(),
                api_key: api_key.as_deref(),
                openrouter: options,
                lenient,
                values_json: values_json.as_deref(),
                prefix,
            })
        }
        Commands::Scan {
            template,
            json,
            locations,
        } => cmd_scan(&template, json, locations),
        Commands::Info { input } => cmd_info(&input),
        Commands::Text {
            reports,
            output,
            lenient,
        } => cmd_text(&reports, output.as_deref(), lenient),
        Commands::CheckKey { api_key, model } => cmd_check_key(api_key.as_deref(), model),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        if let Some(e) = e.downcast_ref::<formfill::Error>() {
            eprintln!("{}: {}", "Kind".dimmed(), e.kind());
        }
        std::process::exit(1);
    }
}

struct FillArgs<'a> {
    template: &'a Path,
    reports: &'a [PathBuf],
    output: Option<&'a Path>,
    api_key: Option<&'a str>,
    openrouter: OpenRouterOptions,
    lenient: bool,
    values_json: Option<&'a Path>,
    prefix: String,
}

/// Drives a progress bar from pipeline events and logs them.
struct ProgressObserver {
    pb: ProgressBar,
    log: LogObserver,
}

impl ProgressObserver {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let pb = ProgressBar::new(Step::ALL.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
                .progress_chars("#>-"),
        );
        Ok(Self {
            pb,
            log: LogObserver,
        })
    }
}

impl PipelineObserver for ProgressObserver {
    fn on_step(&mut self, step: Step) {
        self.log.on_step(step);
        self.pb.set_position(step.number() as u64 - 1);
        self.pb.set_message(format!("{}...", step.description()));
    }

    fn on_placeholders(&mut self, placeholders: &[String]) {
        self.log.on_placeholders(placeholders);
        self.pb.println(format!(
            "  {} {} placeholders",
            "Found".green(),
            placeholders.len()
        ));
    }

    fn on_source_text(&mut self, text: &str) {
        self.log.on_source_text(text);
        self.pb.println(format!(
            "  {} {} characters of report text",
            "Read".green(),
            text.chars().count()
        ));
    }

    fn on_values(&mut self, values: &FieldValues) {
        self.log.on_values(values);
        self.pb.println(format!(
            "  {} {} of {} fields",
            "Extracted".green(),
            values.found_count(),
            values.len()
        ));
    }

    fn on_complete(&mut self, output: &FilledDocument) {
        self.log.on_complete(output);
        self.pb.set_position(Step::ALL.len() as u64);
        self.pb.finish_with_message("Done!");
    }
}

fn cmd_fill(args: FillArgs<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let field_extractor: Box<dyn FieldExtractor> = match args.values_json {
        Some(path) => Box::new(PresetExtractor::from_json(&fs::read_to_string(path)?)?),
        None => {
            let key = args
                .api_key
                .ok_or("an API key is required (--api-key or OPENROUTER_API_KEY)")?;
            Box::new(OpenRouterExtractor::with_options(key, args.openrouter)?)
        }
    };
    let pipeline = Pipeline::new(PdfTextExtractor::new(), field_extractor);

    let reports = args
        .reports
        .iter()
        .map(ReportSource::from_path)
        .collect::<formfill::Result<Vec<_>>>()?;
    let mut options = FillOptions::new().with_file_prefix(args.prefix);
    if args.lenient {
        options = options.lenient();
    }
    let request = FillRequest::new(fs::read(args.template)?, reports).with_options(options);

    let mut observer = ProgressObserver::new()?;
    let result = pipeline.run_with_observer(&request, &mut observer);
    if result.is_err() {
        observer.pb.abandon();
    }
    let output = result?;

    let path = write_output(&output, args.output)?;

    println!("\n{}", "Field values:".green().bold());
    let count = output.values.len();
    for (i, (name, value)) in output.values.iter().enumerate() {
        let branch = if i + 1 == count { "└─" } else { "├─" };
        let value = if value == formfill::NOT_FOUND {
            value.yellow().to_string()
        } else {
            value.to_string()
        };
        println!("  {} {}: {}", branch.dimmed(), name.bold(), value);
    }
    println!("\n{} {}", "Saved to".green(), path.display());

    Ok(())
}

/// Write the filled document to `output`, a file or an existing directory.
fn write_output(
    output: &FilledDocument,
    target: Option<&Path>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match target {
        Some(path) if path.is_dir() => Ok(output.save_in(path)?),
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &output.bytes)?;
            Ok(path.to_path_buf())
        }
        None => Ok(output.save_in(".")?),
    }
}

fn cmd_scan(template: &Path, json: bool, locations: bool) -> Result<(), Box<dyn std::error::Error>> {
    let template = Template::open(template)?;

    if json {
        let value = if locations {
            serde_json::to_string_pretty(&template.locations())?
        } else {
            serde_json::to_string_pretty(template.placeholders())?
        };
        println!("{}", value);
        return Ok(());
    }

    if template.placeholders().is_empty() {
        println!("{}", "No placeholders found".yellow());
        println!(
            "  {} {}",
            "Use".dimmed(),
            formfill::placeholder::syntax_examples()
        );
        return Ok(());
    }

    if locations {
        for occurrence in template.locations() {
            println!(
                "{} {} {}",
                occurrence.name.bold(),
                format!("({})", occurrence.syntax.token(&occurrence.name)).dimmed(),
                occurrence.region
            );
        }
    } else {
        for name in template.placeholders() {
            println!("{}", name);
        }
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match detect_format_from_path(input)? {
        Format::Docx => template_info(input),
        Format::Pdf { .. } => pdf_info(input),
    }
}

fn template_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let info = Template::open(input)?.info();

    println!("{}", "Template Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: DOCX", "Format".bold());
    println!("{}: {}", "Paragraphs".bold(), info.paragraph_count);
    println!("{}: {}", "Tables".bold(), info.table_count);
    println!("{}: {}", "Sections".bold(), info.section_count);
    println!("{}: {}", "Regions".bold(), info.region_count);

    println!();
    println!("{}", "Placeholders".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    if info.placeholders.is_empty() {
        println!("{}", "None".yellow());
    }
    for name in &info.placeholders {
        println!("  {}", name);
    }

    Ok(())
}

fn pdf_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let info = report_info(&fs::read(input)?)?;

    println!("{}", "Report Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), info.version);
    println!("{}: {}", "Pages".bold(), info.page_count);
    println!("{}: {} bytes", "Size".bold(), info.size_bytes);

    if let Some(ref title) = info.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = info.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref producer) = info.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = info.created {
        println!("{}: {}", "Created".bold(), created);
    }

    Ok(())
}

fn cmd_text(
    reports: &[PathBuf],
    output: Option<&Path>,
    lenient: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let sources = reports
        .iter()
        .map(ReportSource::from_path)
        .collect::<formfill::Result<Vec<_>>>()?;
    let mut options = ReportOptions::new();
    if lenient {
        options = options.lenient();
    }

    let text = report::combined_text(&PdfTextExtractor::new(), &sources, &options)?;

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn cmd_check_key(api_key: Option<&str>, model: String) -> Result<(), Box<dyn std::error::Error>> {
    let key = api_key.ok_or("an API key is required (--api-key or OPENROUTER_API_KEY)")?;
    let extractor =
        OpenRouterExtractor::with_options(key, OpenRouterOptions::new().with_model(model))?;

    println!("{}", "Checking API key...".cyan());
    if extractor.validate_key() {
        println!("{}", "API key is valid".green().bold());
        Ok(())
    } else {
        Err("API key was rejected or the service is unreachable".into())
    }
}

fn cmd_version() {
    println!("{} {}", "formfill".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Word template filling from PDF reports");
    println!();
    println!("License: MIT");
}
