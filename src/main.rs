//! CLI entry point for the app profile analysis.
//!
//! Provides subcommands for cleaning a single catalog export, inspecting it,
//! computing frequency tables and grouped averages, and producing a full
//! report across both platforms.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use app_profiles::analyzers::analyzer::{
    analyze, average_section, frequency_section, load_and_clean,
};
use app_profiles::analyzers::utility::NumericFormat;
use app_profiles::cleaner::duplicate_names;
use app_profiles::explore::explore;
use app_profiles::loader::load_dataset;
use app_profiles::output::{
    print_averages, print_frequencies, print_pretty, to_json, write_records, write_rows,
};
use app_profiles::settings::Settings;
use app_profiles::{Platform, Role, Schema};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "app_profiles")]
#[command(about = "Find profitable free app profiles in Google Play and App Store exports", long_about = None)]
struct Cli {
    /// Optional JSON file overriding cleaning parameters
    #[arg(short, long, global = true, env = "APP_PROFILES_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the cleaning pipeline for one platform
    Clean {
        #[arg(value_enum)]
        platform: Platform,

        /// Catalog CSV (falls back to GOOGLE_PLAY_CSV / APP_STORE_CSV)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write the cleaned rows to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Frequency table of one column of the cleaned data
    Freq {
        #[arg(value_enum)]
        platform: Platform,

        #[arg(value_enum)]
        role: Role,

        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write the table to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Average of a numeric column per category of the cleaned data
    Averages {
        #[arg(value_enum)]
        platform: Platform,

        /// Column to group by
        #[arg(value_enum)]
        group: Role,

        /// Numeric column to average
        #[arg(value_enum)]
        value: Role,

        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write the averages to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List app names that appear more than once in the raw export
    Duplicates {
        #[arg(value_enum)]
        platform: Platform,

        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Number of example names to show
        #[arg(short, long, default_value_t = 15)]
        limit: usize,
    },
    /// Print a window of rows and the table shape
    Explore {
        #[arg(value_enum)]
        platform: Platform,

        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(long, default_value_t = 0)]
        start: usize,

        #[arg(long, default_value_t = 3)]
        end: usize,

        /// Explore the cleaned rows instead of the raw export
        #[arg(long, default_value_t = false)]
        cleaned: bool,
    },
    /// Full analysis of both exports as JSON
    Report {
        #[arg(long, env = "GOOGLE_PLAY_CSV")]
        google_play: PathBuf,

        #[arg(long, env = "APP_STORE_CSV")]
        app_store: PathBuf,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/app_profiles.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("app_profiles.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    match cli.command {
        Commands::Clean {
            platform,
            input,
            output,
        } => {
            let input = resolve_input(platform, input)?;
            let cleaned = load_and_clean(platform, &input, &settings)?;
            print_pretty(&cleaned.report);
            println!("{}", to_json(&cleaned.report)?);

            if let Some(output) = output {
                write_records(&output, &cleaned.header, &cleaned.rows)
                    .with_context(|| format!("writing {}", output.display()))?;
                info!(path = %output.display(), rows = cleaned.rows.len(), "Cleaned rows written");
            }
        }
        Commands::Freq {
            platform,
            role,
            input,
            output,
        } => {
            let input = resolve_input(platform, input)?;
            let cleaned = load_and_clean(platform, &input, &settings)?;
            let section = frequency_section(&cleaned, role)?;

            print_frequencies(&section.entries);
            if let Some(output) = output {
                write_rows(&output, &section.entries)?;
            }
        }
        Commands::Averages {
            platform,
            group,
            value,
            input,
            output,
        } => {
            let input = resolve_input(platform, input)?;
            let cleaned = load_and_clean(platform, &input, &settings)?;
            let format = if value == Role::Installs {
                NumericFormat::Installs
            } else {
                NumericFormat::Plain
            };
            let section = average_section(&cleaned, group, value, format)?;

            print_averages(&section.groups);
            if let Some(top) = &section.top {
                info!(group = %top.group, mean = top.mean, "Highest average");
            }
            if let Some(output) = output {
                write_rows(&output, &section.groups)?;
            }
        }
        Commands::Duplicates {
            platform,
            input,
            limit,
        } => {
            let input = resolve_input(platform, input)?;
            let dataset = load_dataset(&input)?;
            let schema = Schema::bind(&dataset.header, &settings.profile(platform))?;
            let summary = duplicate_names(&dataset.rows, schema.index(Role::Name)?);

            info!(duplicates = summary.duplicate_count, "Number of duplicate apps");
            let examples: Vec<&str> = summary
                .names
                .iter()
                .take(limit)
                .map(String::as_str)
                .collect();
            info!(examples = ?examples, "Examples of duplicate apps");
        }
        Commands::Explore {
            platform,
            input,
            start,
            end,
            cleaned,
        } => {
            let input = resolve_input(platform, input)?;
            let rows = if cleaned {
                load_and_clean(platform, &input, &settings)?.rows
            } else {
                load_dataset(&input)?.rows
            };

            let view = explore(&rows, start, end);
            for row in view.rows {
                println!("{:?}\n", row.fields());
            }
            println!("Number of rows: {}", view.row_count);
            println!("Number of columns: {}", view.column_count);
        }
        Commands::Report {
            google_play,
            app_store,
            output,
        } => {
            let inputs = [
                (Platform::GooglePlay, google_play.as_path()),
                (Platform::AppStore, app_store.as_path()),
            ];
            let report = analyze(&inputs, &settings)?;
            let json = to_json(&report)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), "Report written");
                }
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}

/// Uses the explicit input path, or the platform's environment variable.
fn resolve_input(platform: Platform, input: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = input {
        return Ok(path);
    }

    let var = match platform {
        Platform::GooglePlay => "GOOGLE_PLAY_CSV",
        Platform::AppStore => "APP_STORE_CSV",
    };

    match std::env::var(var) {
        Ok(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => bail!("no input given for {platform}: pass --input or set {var}"),
    }
}
