// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::{Path, PathBuf};

use translate_html::app_config::{Config, LogLevel};
use translate_html::content_hash::HashRegistry;
use translate_html::file_utils::FileManager;
use translate_html::html::HtmlDocument;
use translate_html::tasks::{
    ExportTask, ImportTask, MissingContentHandling, TEMPLATE_EXTENSION, TaskOutput, TranslateTask, run_task,
};
use translate_html::template::PreserveAnnotations;
use translate_html::translator::TranslatorKind;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for PreserveAnnotations to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliPreserveAnnotations {
    None,
    Standard,
    Normalize,
    All,
}

impl From<CliPreserveAnnotations> for PreserveAnnotations {
    fn from(cli_mode: CliPreserveAnnotations) -> Self {
        match cli_mode {
            CliPreserveAnnotations::None => PreserveAnnotations::None,
            CliPreserveAnnotations::Standard => PreserveAnnotations::Standard,
            CliPreserveAnnotations::Normalize => PreserveAnnotations::Normalize,
            CliPreserveAnnotations::All => PreserveAnnotations::All,
        }
    }
}

/// CLI Wrapper for MissingContentHandling to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMissingContent {
    Error,
    Warn,
    Ignore,
}

impl From<CliMissingContent> for MissingContentHandling {
    fn from(cli_mode: CliMissingContent) -> Self {
        match cli_mode {
            CliMissingContent::Error => MissingContentHandling::Error,
            CliMissingContent::Warn => MissingContentHandling::Warn,
            CliMissingContent::Ignore => MissingContentHandling::Ignore,
        }
    }
}

/// CLI Wrapper for TranslatorKind to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTranslator {
    None,
    Pseudo,
}

impl From<CliTranslator> for TranslatorKind {
    fn from(cli_translator: CliTranslator) -> Self {
        match cli_translator {
            CliTranslator::None => TranslatorKind::None,
            CliTranslator::Pseudo => TranslatorKind::Pseudo,
        }
    }
}

/// Options shared by every subcommand
#[derive(Args, Debug)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "translate-html.json", global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

/// Options shared by the subcommands processing templates
#[derive(Args, Debug)]
struct TemplateArgs {
    /// Template or content files, or directories searched for .html files
    #[arg(value_name = "INPUT_PATH", required = true)]
    input_paths: Vec<PathBuf>,

    /// Path that template paths in content files are relative to
    /// (default: the input directory)
    #[arg(short, long)]
    base_path: Option<PathBuf>,

    /// Directory to write the rewritten templates to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Overwrite the input files with the rewritten templates
    #[arg(long, conflicts_with = "output_dir")]
    in_place: bool,

    /// Prefix ids in content files with the path of the file
    #[arg(long)]
    prefix_ids: bool,

    /// How annotations are left in the rewritten templates
    #[arg(short, long, value_enum)]
    preserve_annotations: Option<CliPreserveAnnotations>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    templates: TemplateArgs,

    /// Export file to write
    #[arg(short, long)]
    export_file: Option<PathBuf>,

    /// Add to the existing export file instead of replacing it
    #[arg(short, long)]
    update: bool,

    /// Rewrite contents with normalized whitespace
    #[arg(long)]
    normalize_content: bool,

    /// Replace contents with their ids, optionally inside a pattern such as '{{*}}'
    #[arg(long, num_args = 0..=1, default_missing_value = "*", value_name = "PATTERN")]
    replace_with_ids: Option<String>,

    /// Also export contents that have an explicit id
    #[arg(long)]
    export_for_id: bool,
}

#[derive(Parser, Debug)]
struct ImportArgs {
    #[command(flatten)]
    templates: TemplateArgs,

    /// Import files to read, searched in order
    #[arg(short, long = "import-file", required = true)]
    import_files: Vec<PathBuf>,

    /// What to do when content is missing from the import files
    #[arg(short, long, value_enum)]
    missing_content: Option<CliMissingContent>,
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Export file to translate
    #[arg(value_name = "EXPORT_FILE")]
    input: PathBuf,

    /// Import file to write
    #[arg(value_name = "IMPORT_FILE")]
    output: PathBuf,

    /// Content translator to use
    #[arg(short, long, value_enum)]
    translator: Option<CliTranslator>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export annotated content from templates into an export file
    Export(ExportArgs),

    /// Import translated content from import files into templates
    Import(ImportArgs),

    /// Translate an export file into an import file
    Translate(TranslateArgs),

    /// Generate shell completions for translate-html
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// translate-html - Localization of annotated HTML templates
#[derive(Parser, Debug)]
#[command(name = "translate-html")]
#[command(version)]
#[command(about = "Localization of annotated HTML templates")]
#[command(long_about = "translate-html exports annotated content from HTML templates, and imports translated content back into them.

EXAMPLES:
    translate-html export src/ -e export.json                         # Export content
    translate-html export src/ -e export.json -o dist/ -p standard    # Also write cleaned templates
    translate-html translate export.json import.json -t pseudo        # Pseudo-translate
    translate-html import src/ -i import.json -o dist/                # Write localized templates
    translate-html import src/ -i import.json --in-place              # Localize templates in place
    translate-html completions bash > translate-html.bash             # Generate bash completions

CONFIGURATION:
    Configuration is stored in translate-html.json by default. You can specify a
    different config file with --config-path. If the config file doesn't exist, a
    default one will be created automatically.")]
struct CommandLineOptions {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour code and label for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, label) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", colour, now, label, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; the max level is lowered once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "translate-html", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.common)?;

    match cli.command {
        Commands::Export(args) => run_export(config, args),
        Commands::Import(args) => run_import(config, args),
        Commands::Translate(args) => run_translate(config, args),
        Commands::Completions { .. } => Ok(()),
    }
}

fn load_config(options: &CommonArgs) -> Result<Config> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.into());
    }

    let mut config = Config::load_or_create(&options.config_path)?;

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.into());

    Ok(config)
}

/// Collects the template files and the base path their content is scoped by
fn collect_templates(args: &TemplateArgs, configured_base: Option<PathBuf>) -> Result<(Vec<PathBuf>, PathBuf)> {
    let files = FileManager::collect_files(&args.input_paths, TEMPLATE_EXTENSION)?;

    let base = match (&args.base_path, configured_base) {
        (Some(base), _) => base.clone(),
        (None, Some(base)) => base,
        (None, None) => match args.input_paths.as_slice() {
            [single] if FileManager::dir_exists(single) => single.clone(),
            _ => PathBuf::new(),
        },
    };

    if files.is_empty() {
        return Err(anyhow!("No template files found in {:?}", args.input_paths));
    }

    info!("Found {} template file(s)", files.len());
    Ok((files, base))
}

fn task_output<'a>(args: &'a TemplateArgs, base: &'a Path) -> TaskOutput<'a> {
    match &args.output_dir {
        Some(dir) => TaskOutput::Directory { base, dir: dir.as_path() },
        None if args.in_place => TaskOutput::InPlace,
        None => TaskOutput::Discard,
    }
}

fn run_export(config: Config, args: ExportArgs) -> Result<()> {
    let mut task_config = config.export.clone();

    if let Some(path) = args.export_file {
        task_config.export_file_path = Some(path);
    }
    if let Some(mode) = args.templates.preserve_annotations {
        task_config.preserve_annotations = mode.into();
    }
    if let Some(pattern) = args.replace_with_ids {
        task_config.replace_with_ids = Some(pattern);
    }
    task_config.update_export_file |= args.update;
    task_config.normalize_content |= args.normalize_content;
    task_config.export_for_id |= args.export_for_id;
    task_config.prefix_ids_in_content_files |= args.templates.prefix_ids;

    let (files, base) = collect_templates(&args.templates, task_config.base_file_path.clone())?;
    task_config.base_file_path = Some(base.clone());

    let parser = config.template_parser::<HtmlDocument>(HashRegistry::new())?;
    let mut task = ExportTask::new(task_config, parser)?;

    run_task(&mut task, &files, task_output(&args.templates, &base))
}

fn run_import(config: Config, args: ImportArgs) -> Result<()> {
    let mut task_config = config.import.clone();

    task_config.import_file_paths = args.import_files;
    if let Some(mode) = args.templates.preserve_annotations {
        task_config.preserve_annotations = mode.into();
    }
    if let Some(mode) = args.missing_content {
        task_config.missing_content_handling = mode.into();
    }
    task_config.prefix_ids_in_content_files |= args.templates.prefix_ids;

    let (files, base) = collect_templates(&args.templates, task_config.base_file_path.clone())?;
    task_config.base_file_path = Some(base.clone());

    let parser = config.template_parser::<HtmlDocument>(HashRegistry::new())?;
    let mut task = ImportTask::new(task_config, parser)?;

    if args.templates.output_dir.is_none() && !args.templates.in_place {
        log::warn!("Neither --output-dir nor --in-place specified, localized templates will not be written");
    }

    run_task(&mut task, &files, task_output(&args.templates, &base))?;
    info!("Imported content into {} template file(s)", files.len());

    Ok(())
}

fn run_translate(mut config: Config, args: TranslateArgs) -> Result<()> {
    if let Some(translator) = args.translator {
        config.translate.translator = translator.into();
    }

    let translator = config.content_translator()?;
    let task = TranslateTask::new(config.translate.clone(), translator);

    task.run(&args.input, &args.output)?;
    Ok(())
}
