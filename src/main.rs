// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use autotrans::app_config::{self, Config, TranslationProvider};
use autotrans::app_controller::{Controller, ProgressListener};
use autotrans::export::{ExportOptions, export_report};
use autotrans::file_utils::FileManager;
use autotrans::translation::{SourceContent, TranslationMode};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Gemini,
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Gemini => TranslationProvider::Gemini,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
        }
    }
}

/// CLI Wrapper for TranslationMode to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTranslationMode {
    /// Title, description and subtitles
    All,
    /// Title and description only
    Metadata,
    /// Subtitles only
    Subtitles,
}

impl From<CliTranslationMode> for TranslationMode {
    fn from(cli_mode: CliTranslationMode) -> Self {
        match cli_mode {
            CliTranslationMode::All => TranslationMode::All,
            CliTranslationMode::Metadata => TranslationMode::MetadataOnly,
            CliTranslationMode::Subtitles => TranslationMode::SubtitlesOnly,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Source content flags shared by `translate` and `detect`
#[derive(clap::Args, Debug)]
struct ContentArgs {
    /// Video title
    #[arg(long)]
    title: Option<String>,

    /// Video description
    #[arg(long, conflicts_with = "description_file")]
    description: Option<String>,

    /// Read the video description from a file
    #[arg(long, value_name = "FILE")]
    description_file: Option<PathBuf>,

    /// SRT subtitle file to translate
    #[arg(long, value_name = "FILE")]
    subtitles: Option<PathBuf>,

    /// What to translate
    #[arg(long, value_enum)]
    mode: Option<CliTranslationMode>,
}

/// Provider flags shared by `translate` and `detect`
#[derive(clap::Args, Debug)]
struct ProviderArgs {
    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the provider
    #[arg(long, env = "AUTOTRANS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[derive(clap::Args, Debug)]
struct TranslateArgs {
    #[command(flatten)]
    content: ContentArgs,

    #[command(flatten)]
    provider: ProviderArgs,

    /// Target languages: comma-separated ordinals, names or "NN. Name" entries
    #[arg(short, long, value_delimiter = ',', required_unless_present = "all_languages")]
    languages: Vec<String>,

    /// Translate into every catalog language
    #[arg(long, conflicts_with = "languages")]
    all_languages: bool,

    /// Directory receiving the exported files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Do not write the subtitle zip archive
    #[arg(long)]
    no_zip: bool,

    /// Do not write the metadata sheet
    #[arg(long)]
    no_sheet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate title, description and subtitles into the selected languages
    Translate(TranslateArgs),

    /// Detect the source language only
    Detect {
        #[command(flatten)]
        content: ContentArgs,

        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// List the numbered language catalog
    Languages,

    /// Test the connection to the translation provider
    Check {
        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Generate shell completions for autotrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// autotrans - YouTube title, description and subtitle translation with AI
#[derive(Parser, Debug)]
#[command(name = "autotrans")]
#[command(version)]
#[command(about = "AI-powered YouTube metadata and subtitle translation tool")]
#[command(long_about = "autotrans detects the language of a video's title, description and subtitles,
then translates them into every selected language with a language model.

EXAMPLES:
    autotrans languages                                          # Show the numbered catalog
    autotrans translate --title \"Hello\" --subtitles en.srt -l 1,5  # Translate into two languages
    autotrans translate --title \"Hello\" --mode metadata --all-languages
    autotrans detect --title \"안녕하세요\"                          # Only detect the source language
    autotrans check -p ollama                                    # Test the provider connection
    autotrans completions bash > autotrans.bash                 # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    gemini    - Google Gemini API (default: gemini-2.0-flash, requires API key)
    openai    - OpenAI API or compatible server (requires API key)
    anthropic - Anthropic Claude API (requires API key)
    ollama    - Local Ollama server (default: llama3.2:3b)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
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
        // The instance level stays at Trace; filtering happens through set_max_level
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => ("", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
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
            let (emoji, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(cmd_log_level) = &cli.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "autotrans", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;
    match &cli.log_level {
        Some(log_level) => config.log_level = log_level.clone().into(),
        None => log::set_max_level(level_filter(&config.log_level)),
    }

    match cli.command {
        Commands::Translate(args) => run_translate(config, args).await,
        Commands::Detect { content, provider } => run_detect(config, content, provider).await,
        Commands::Languages => {
            config.validate().context("Configuration validation failed")?;
            let controller = Controller::with_config(config)?;
            for entry in controller.catalog().entries() {
                println!("{}", entry);
            }
            Ok(())
        },
        Commands::Check { provider } => run_check(config, provider).await,
        Commands::Completions { .. } => Ok(()),
    }
}

fn apply_provider_overrides(config: &mut Config, args: &ProviderArgs) {
    if let Some(provider) = &args.provider {
        config.translation.provider = provider.clone().into();
    }

    let provider_config = config.translation.active_provider_config_mut();
    if let Some(model) = &args.model {
        provider_config.model = model.clone();
    }
    if let Some(api_key) = &args.api_key {
        provider_config.api_key = api_key.clone();
    }
}

fn load_content(args: &ContentArgs) -> Result<SourceContent> {
    let description = match (&args.description, &args.description_file) {
        (Some(description), _) => description.clone(),
        (None, Some(path)) => FileManager::read_to_string(path)?,
        (None, None) => String::new(),
    };
    let subtitles = match &args.subtitles {
        Some(path) => FileManager::read_to_string(path)?,
        None => String::new(),
    };

    Ok(SourceContent::new(args.title.clone().unwrap_or_default(), description, subtitles))
}

fn resolve_mode(config: &Config, args: &ContentArgs) -> TranslationMode {
    args.mode.map(TranslationMode::from).unwrap_or(config.translation.common.default_mode)
}

async fn run_translate(mut config: Config, args: TranslateArgs) -> Result<()> {
    apply_provider_overrides(&mut config, &args.provider);
    if let Some(output_dir) = &args.output_dir {
        config.export.output_dir = output_dir.to_string_lossy().to_string();
    }
    config.validate().context("Configuration validation failed")?;

    let content = load_content(&args.content)?;
    let mode = resolve_mode(&config, &args.content);

    let controller = Controller::with_config(config.clone())?;
    let selection = if args.all_languages {
        controller.catalog().select_all()
    } else {
        controller.catalog().select(&args.languages)?
    };

    let listener = ProgressListener::new();
    let report = controller.run(&content, mode, &selection, &listener).await;
    listener.finish();
    let report = report?;

    let mut options = ExportOptions::from_config(&config.export);
    options.force_overwrite = args.force_overwrite;
    options.write_zip = !args.no_zip && mode.includes_subtitles();
    options.write_sheet = !args.no_sheet && mode.includes_metadata();

    let summary = export_report(&report, &options)?;

    info!(
        "Translated {} of {} languages in {:.1}s",
        report.success_count(),
        report.results.len(),
        report.elapsed().as_secs_f64()
    );
    for (language, result) in report.results.iter() {
        if let Some(error) = result.error() {
            warn!("{} failed: {}", language, error);
        }
    }
    if let Some(path) = &summary.zip_path {
        info!("Subtitle archive: {:?}", path);
    }
    if let Some(path) = &summary.sheet_path {
        info!("Metadata sheet: {:?}", path);
    }
    if let Some(path) = &summary.report_path {
        info!("Run report: {:?}", path);
    }

    Ok(())
}

async fn run_check(mut config: Config, provider_args: ProviderArgs) -> Result<()> {
    apply_provider_overrides(&mut config, &provider_args);
    config.validate().context("Configuration validation failed")?;

    let provider = config.translation.provider.display_name().to_string();
    let model = config.translation.get_model();
    let controller = Controller::with_config(config)?;
    controller.test_connection().await
        .with_context(|| format!("Connection test failed for {} ({})", provider, model))?;

    info!("{} is reachable with model {}", provider, model);
    Ok(())
}

async fn run_detect(mut config: Config, content_args: ContentArgs, provider_args: ProviderArgs) -> Result<()> {
    apply_provider_overrides(&mut config, &provider_args);
    config.validate().context("Configuration validation failed")?;

    let content = load_content(&content_args)?;
    let mode = resolve_mode(&config, &content_args);
    let exclusion_match = config.catalog.exclusion_match;

    let controller = Controller::with_config(config)?;
    let detected = controller.detect(&content, mode).await?;

    match controller.catalog().resolve_detected(&detected, exclusion_match) {
        Some(entry) => println!("{} ({})", detected, entry),
        None => println!("{}", detected),
    }

    Ok(())
}
