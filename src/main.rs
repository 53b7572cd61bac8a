//! CLI entry point for treescribe

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use treescribe::output::print_lines;
use treescribe::tree::{ScanEvent, ScanPhase};
use treescribe::{
    BackgroundScanner, ExportFormat, ExportOptions, Exporter, FilterConfig, ScanOptions,
    ScanOutcome, Settings, TextSkin, logging,
};

/// Settings document used when `--config` is not given.
const DEFAULT_CONFIG: &str = "treescribe.json";

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").is_ok_and(|t| t == "dumb") {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Txt,
    Html,
    Json,
    Xml,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Txt => ExportFormat::Text,
            FormatArg::Html => ExportFormat::Html,
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Xml => ExportFormat::Xml,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleArg {
    /// Four spaces per level
    Plain,
    /// "- " before each entry
    Dashed,
    /// "• " before each entry
    Bullets,
    /// Folder and file icons
    Icons,
    /// "▸" for directories, "→" for files
    Arrows,
    /// Box-drawing guides
    Tree,
}

impl From<StyleArg> for TextSkin {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Plain => TextSkin::Plain,
            StyleArg::Dashed => TextSkin::Dashed,
            StyleArg::Bullets => TextSkin::Bullets,
            StyleArg::Icons => TextSkin::Icons,
            StyleArg::Arrows => TextSkin::Arrows,
            StyleArg::Tree => TextSkin::Tree,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "treescribe")]
#[command(about = "Filter a directory tree and export it as text, HTML, JSON or XML")]
#[command(version)]
struct Cli {
    /// Settings document holding the active rules and presets
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use a saved preset instead of the active rules
    #[arg(long, global = true, value_name = "NAME")]
    preset: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(subcommand)]
    command: Command,
}

/// Rule overrides applied on top of the loaded settings.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Exclude directories with this exact name (repeatable)
    #[arg(long = "exclude-dir", global = true, value_name = "NAME")]
    exclude_dir: Vec<String>,

    /// Exclude directories whose name matches this regex (repeatable)
    #[arg(long = "exclude-dir-regex", global = true, value_name = "REGEX")]
    exclude_dir_regex: Vec<String>,

    /// Exclude files with this name, case-insensitive (repeatable)
    #[arg(long = "exclude-file", global = true, value_name = "NAME")]
    exclude_file: Vec<String>,

    /// Exclude files whose name matches this regex (repeatable)
    #[arg(long = "exclude-file-regex", global = true, value_name = "REGEX")]
    exclude_file_regex: Vec<String>,

    /// Include files with this extension (repeatable)
    #[arg(long = "ext", global = true, value_name = "EXT")]
    ext: Vec<String>,

    /// Include files whose name matches this regex (repeatable)
    #[arg(long = "include-regex", global = true, value_name = "REGEX")]
    include_regex: Vec<String>,

    /// Minimum file size. Use suffixes: K, M, G (e.g., 5M for 5MB)
    #[arg(long = "min-size", global = true, value_name = "SIZE")]
    min_size: Option<String>,

    /// Maximum file size. Use suffixes: K, M, G
    #[arg(long = "max-size", global = true, value_name = "SIZE")]
    max_size: Option<String>,

    /// Only show files modified more recently than DURATION ago
    /// Duration format: 30s, 5m, 1h, 7d, 2w, 3M, 1y
    #[arg(long = "newer", global = true, value_name = "DURATION")]
    newer: Option<String>,

    /// Only show files modified longer than DURATION ago
    #[arg(long = "older", global = true, value_name = "DURATION")]
    older: Option<String>,

    /// Start from an empty rule set instead of the settings document
    #[arg(long = "no-defaults", global = true, conflicts_with = "preset")]
    no_defaults: bool,
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Descend only N levels deep
    #[arg(short = 'L', long = "level")]
    level: Option<usize>,

    /// List directories only
    #[arg(short = 'd', long = "dirs-only")]
    dirs_only: bool,

    /// List everything, ignoring every rule
    #[arg(long = "no-filters")]
    no_filters: bool,
}

impl ScanArgs {
    fn options(&self) -> ScanOptions {
        ScanOptions {
            include_files: !self.dirs_only,
            max_depth: self.level,
            apply_filters: !self.no_filters,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the filtered tree to a file
    Export {
        /// Directory to export
        path: PathBuf,

        /// Output file; its extension is corrected to match the format
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        #[arg(long, value_enum, default_value = "txt")]
        format: FormatArg,

        /// Indentation style for text and HTML
        #[arg(long, value_enum, default_value = "plain")]
        style: StyleArg,

        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Print the first lines of a text export
    Preview {
        /// Directory to preview
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Maximum number of lines
        #[arg(short = 'n', long = "max-items", default_value = "100")]
        max_items: usize,

        #[arg(long, value_enum, default_value = "plain")]
        style: StyleArg,

        #[command(flatten)]
        scan: ScanArgs,

        /// Control color output: auto, always, never
        #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
        color: ColorMode,
    },
    /// Scan in the background, printing each directory as it is read
    Scan {
        #[arg(default_value = ".")]
        path: PathBuf,

        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Manage saved filter presets
    #[command(subcommand)]
    Presets(PresetCommand),
}

#[derive(Subcommand, Debug)]
enum PresetCommand {
    /// List saved presets
    List,
    /// Save the active rules (with overrides) under NAME
    Save { name: String },
    /// Delete a preset
    Delete { name: String },
}

/// Parse a duration string like "1h", "7d", "2w" into a Duration.
/// Uses the humantime crate (s, m, h, d, w, M, y and their long forms).
fn parse_duration_string(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim()).map_err(|e| e.to_string())
}

/// Parse a file size string like "5M", "100K", "1G" into bytes.
/// Supports suffixes: K/KB (1024), M/MB (1024^2), G/GB (1024^3)
/// Without suffix, interprets as bytes.
fn parse_file_size(s: &str) -> Result<u64, String> {
    let s = s.trim().to_uppercase();
    let (num_str, multiplier) = if let Some(n) = s.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('G') {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('M') {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('K') {
        (n, 1024)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", num_str))?;

    num.checked_mul(multiplier)
        .ok_or_else(|| format!("size too large: {}", s))
}

/// Point in time `duration` ago.
fn ago(flag: &str, s: &str) -> Result<DateTime<Utc>, String> {
    let duration =
        parse_duration_string(s).map_err(|e| format!("invalid {} duration '{}': {}", flag, s, e))?;
    SystemTime::now()
        .checked_sub(duration)
        .map(DateTime::<Utc>::from)
        .ok_or_else(|| format!("invalid {} duration '{}': too far in the past", flag, s))
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
}

/// Active rules: settings document, then preset, then command-line overrides.
fn resolve_filter(cli: &Cli, settings: &mut Settings) -> Result<FilterConfig, String> {
    if let Some(name) = &cli.preset {
        settings.apply_preset(name).map_err(|e| e.to_string())?;
    }

    let args = &cli.filters;
    let mut filter = if args.no_defaults {
        FilterConfig::empty()
    } else {
        settings.filter.clone()
    };

    for name in &args.exclude_dir {
        filter.add_excluded_dir(name);
    }
    for name in &args.exclude_file {
        filter.add_excluded_file(name);
    }
    for ext in &args.ext {
        filter.add_included_extension(ext);
    }
    for pattern in &args.exclude_dir_regex {
        filter
            .add_excluded_dir_pattern(pattern)
            .map_err(|e| e.to_string())?;
    }
    for pattern in &args.exclude_file_regex {
        filter
            .add_excluded_file_pattern(pattern)
            .map_err(|e| e.to_string())?;
    }
    for pattern in &args.include_regex {
        filter
            .add_included_file_pattern(pattern)
            .map_err(|e| e.to_string())?;
    }

    if args.min_size.is_some() || args.max_size.is_some() {
        let (min, max) = filter.size_bounds();
        let min = match &args.min_size {
            Some(s) => parse_file_size(s).map_err(|e| format!("invalid --min-size '{}': {}", s, e))?,
            None => min,
        };
        let max = match &args.max_size {
            Some(s) => Some(
                parse_file_size(s).map_err(|e| format!("invalid --max-size '{}': {}", s, e))?,
            ),
            None => max,
        };
        filter.set_size_filters(min, max).map_err(|e| e.to_string())?;
    }

    if args.newer.is_some() || args.older.is_some() {
        let (min, max) = filter.modified_bounds();
        let min = match &args.newer {
            Some(s) => Some(ago("--newer", s)?),
            None => min,
        };
        let max = match &args.older {
            Some(s) => Some(ago("--older", s)?),
            None => max,
        };
        filter
            .set_modified_filters(min, max)
            .map_err(|e| e.to_string())?;
    }

    Ok(filter)
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("treescribe: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = config_path(cli);
    let mut settings = Settings::load_or_default(&config);

    if let Command::Presets(command) = &cli.command {
        return run_presets(cli, command, &config, settings);
    }

    let filter = resolve_filter(cli, &mut settings)?;

    match &cli.command {
        Command::Export {
            path,
            output,
            format,
            style,
            scan,
        } => {
            let options =
                ExportOptions::new((*format).into(), (*style).into()).with_scan(scan.options());
            let report = Exporter::new(filter).export(path, output, &options);
            if report.success {
                println!("{}", report.message);
                Ok(())
            } else {
                Err(report.message)
            }
        }
        Command::Preview {
            path,
            max_items,
            style,
            scan,
            color,
        } => {
            let options =
                ExportOptions::new(ExportFormat::Text, (*style).into()).with_scan(scan.options());
            let lines = Exporter::new(filter)
                .generate_preview(path, *max_items, &options)
                .map_err(|e| e.to_string())?;
            print_lines(&lines, should_use_color(*color))
                .map_err(|e| format!("error writing output: {}", e))
        }
        Command::Scan { path, scan } => run_scan(path, filter, scan.options()),
        Command::Presets(_) => Ok(()),
    }
}

fn run_presets(
    cli: &Cli,
    command: &PresetCommand,
    config: &Path,
    mut settings: Settings,
) -> Result<(), String> {
    match command {
        PresetCommand::List => {
            for name in settings.presets.names() {
                println!("{}", name);
            }
            Ok(())
        }
        PresetCommand::Save { name } => {
            let filter = resolve_filter(cli, &mut settings.clone())?;
            let replaced = settings.presets.save(name, &filter);
            settings.save(config).map_err(|e| e.to_string())?;
            let verb = if replaced { "Updated" } else { "Saved" };
            println!("{} preset '{}' in '{}'.", verb, name, config.display());
            Ok(())
        }
        PresetCommand::Delete { name } => {
            if !settings.presets.delete(name) {
                return Err(format!("unknown preset '{}'", name));
            }
            settings.save(config).map_err(|e| e.to_string())?;
            println!("Deleted preset '{}'.", name);
            Ok(())
        }
    }
}

fn run_scan(root: &Path, filter: FilterConfig, options: ScanOptions) -> Result<(), String> {
    let handle = BackgroundScanner::new(filter, options)
        .spawn(root)
        .map_err(|e| format!("cannot start scan: {}", e))?;

    let (mut dirs, mut files) = (0usize, 0usize);
    for event in handle.events().iter() {
        match event {
            ScanEvent::DirectoryScanned { path, children } => {
                let rel = path.strip_prefix(root).unwrap_or(path.as_path());
                if rel.as_os_str().is_empty() {
                    println!("{}/", root.display());
                } else {
                    println!("{}/", rel.display());
                }
                for child in &children {
                    let suffix = if child.is_dir { "/" } else { "" };
                    println!("    {}{}", child.name, suffix);
                    if child.is_dir {
                        dirs += 1;
                    } else {
                        files += 1;
                    }
                }
            }
            ScanEvent::DirectoryError { path, message } => {
                eprintln!("treescribe: cannot read '{}': {}", path.display(), message);
            }
            ScanEvent::Progress(progress) => {
                eprint!("\r{:>3}% {}", progress.percent, progress.phase);
                if progress.phase == ScanPhase::Completed {
                    eprintln!();
                }
            }
            ScanEvent::Status(phase) => tracing::debug!("scan {}", phase),
            ScanEvent::Completed | ScanEvent::Cancelled | ScanEvent::Failed(_) => {}
        }
    }

    let outcome = handle.join();
    tracing::debug!("scan {}", outcome.phase());
    match outcome {
        ScanOutcome::Completed => {
            eprintln!("{} directories, {} files", dirs, files);
            Ok(())
        }
        ScanOutcome::Cancelled => Err(format!("scan {}", ScanPhase::Cancelled)),
        ScanOutcome::Failed(message) => Err(message),
    }
}
