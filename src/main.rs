// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use yomi::analyzer::command::AnalyzerBackend;
use yomi::app_config::{self, Config, OutputFormat};
use yomi::app_controller::{Controller, RunOutcome};
use yomi::file_utils::FileManager;

/// CLI Wrapper for AnalyzerBackend to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliBackend {
    Sudachi,
    Mecab,
}

impl From<CliBackend> for AnalyzerBackend {
    fn from(cli_backend: CliBackend) -> Self {
        match cli_backend {
            CliBackend::Sudachi => AnalyzerBackend::Sudachi,
            CliBackend::Mecab => AnalyzerBackend::Mecab,
        }
    }
}

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliFormat {
    Tsv,
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(cli_format: CliFormat) -> Self {
        match cli_format {
            CliFormat::Tsv => OutputFormat::Tsv,
            CliFormat::Json => OutputFormat::Json,
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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for yomi
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// yomi - katakana readings for Japanese text
///
/// Reads lines of Japanese text and writes, for every line, the line itself,
/// its katakana reading and a word-by-word breakdown of the reading.
#[derive(Parser, Debug)]
#[command(name = "yomi")]
#[command(version)]
#[command(about = "Katakana readings and reading breakdowns for Japanese text")]
#[command(long_about = "yomi reads lines of Japanese text and writes one row per line:
the original line, its katakana reading, and a word-by-word breakdown such as
東京(トウキョウ) / に / 行く(イク). Words without a dictionary reading are marked (?).

EXAMPLES:
    yomi index.txt                      # Writes index.yomi.tsv next to the input
    yomi -o readings.tsv index.txt      # Explicit output file
    yomi -f /books/indexes/             # Every .txt file in a directory, overwriting
    pbpaste | yomi                      # stdin to stdout
    yomi -b mecab --format json a.txt   # MeCab backend, JSON output
    yomi completions bash > yomi.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

ANALYZERS:
    sudachi - SudachiPy command line (default: sudachipy -m A -a)
    mecab   - MeCab with an IPADIC-compatible dictionary (default: mecab)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input text file or directory; omit or use '-' to read stdin
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output file (single file or stdin input only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Analyzer backend
    #[arg(short, long, value_enum)]
    backend: Option<CliBackend>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<CliFormat>,

    /// Analyze bracketed asides instead of removing them
    #[arg(long)]
    keep_parentheticals: bool,

    /// Keep trailing reference arrows and page numbers
    #[arg(long)]
    keep_trailing_noise: bool,

    /// Number of analyzer processes to run at the same time
    #[arg(short = 'j', long)]
    jobs: Option<usize>,
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

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level.max(log::max_level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "yomi", &mut std::io::stdout());
        return Ok(());
    }

    run_annotate(cli).await
}

fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let config_path = Path::new(&options.config_path);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", options.config_path);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    // Override config with CLI options if provided
    if let Some(backend) = &options.backend {
        let backend: AnalyzerBackend = backend.clone().into();
        if backend != config.analyzer.backend {
            // A custom command line belongs to the configured backend
            config.analyzer.command.clear();
            config.analyzer.args.clear();
        }
        config.analyzer.backend = backend;
    }

    if let Some(format) = &options.format {
        config.output.format = format.clone().into();
    }

    if let Some(jobs) = options.jobs {
        config.analyzer.concurrent_batches = jobs;
    }

    if options.keep_parentheticals {
        config.normalization.strip_parentheticals = false;
    }

    if options.keep_trailing_noise {
        config.normalization.strip_trailing_noise = false;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run_annotate(options: CommandLineOptions) -> Result<()> {
    // If log level is set via command line, apply it before loading the config
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;
    controller.check_analyzer()?;

    let input_path = options
        .input_path
        .clone()
        .filter(|path| path.as_os_str() != "-");

    match input_path {
        None => run_stdin(&controller, options.output.as_deref(), options.force_overwrite).await,
        Some(path) if path.is_dir() => {
            if options.output.is_some() {
                return Err(anyhow!("--output cannot be used with a directory input"));
            }
            let summary = controller.run_folder(path, options.force_overwrite).await?;
            if summary.failed > 0 {
                return Err(anyhow!("{} file(s) failed", summary.failed));
            }
            Ok(())
        }
        Some(path) if path.is_file() => {
            let output_path = match &options.output {
                Some(output) => output.clone(),
                None => {
                    let output_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
                    controller.output_path_for(&path, &output_dir)
                }
            };
            if controller.run(path, output_path, options.force_overwrite).await? == RunOutcome::Empty {
                info!("Nothing written.");
            }
            Ok(())
        }
        Some(path) => Err(anyhow!("Input path does not exist: {:?}", path)),
    }
}

async fn run_stdin(controller: &Controller, output: Option<&Path>, force_overwrite: bool) -> Result<()> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read standard input")?;

    let Some(rendered) = controller.run_text(&text).await? else {
        return Ok(());
    };

    match output {
        Some(path) => {
            if path.exists() && !force_overwrite {
                warn!("Output file already exists: {:?}. Use -f to force overwrite.", path);
                return Ok(());
            }
            FileManager::write_to_file(path, &rendered)?;
            info!("Success: {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", rendered)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
