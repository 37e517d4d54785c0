use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use anyhow::Context;
use ascension_core::pipeline::DEFAULT_LISTING_URL;
use ascension_core::{
    CoercionPolicy, Dataset, FetchConfig, FileSource, GroupKey, HttpSource, JsonConfig, JsonFormatter, Metric,
    Pipeline, PipelineConfig, PipelineReport, coerce, fetch_file, fetch_stdin, read_csv, summarize, write_csv,
    write_leveled_csv, write_summary_csv,
};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: csv, json", s)),
        }
    }
}

/// Value substituted for non-numeric stats, or rejection of the row
#[derive(Debug, Clone, Copy, PartialEq)]
enum PolicyArg {
    Reject,
    Zero,
}

impl FromStr for PolicyArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "zero" => Ok(Self::Zero),
            _ => Err(format!("Invalid policy: {}. Valid options: reject, zero", s)),
        }
    }
}

impl From<PolicyArg> for CoercionPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Reject => CoercionPolicy::RejectRow,
            PolicyArg::Zero => CoercionPolicy::Default(0.0),
        }
    }
}

/// Scrape character ascension stats into a semicolon-separated dataset
#[derive(Parser, Debug)]
#[command(name = "ascension")]
#[command(version)]
#[command(about = "Scrape character ascension stats into a flat dataset", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract every listed character and write the long-form dataset
    Scrape(ScrapeArgs),

    /// Reduce a dataset file to one row per character at its final level
    Leveled {
        /// Dataset file, or "-" for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format (csv, json)
        #[arg(short, long, default_value = "csv", value_name = "FORMAT")]
        format: OutputFormat,
    },

    /// Group the leveled view and aggregate one stat
    Summary {
        /// Dataset file, or "-" for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Column to group on (repeatable)
        #[arg(long = "by", value_name = "KEY", required = true)]
        by: Vec<GroupKey>,

        /// Stat to average, or "quantity" to count rows
        #[arg(long, default_value = "quantity", value_name = "METRIC")]
        metric: Metric,

        /// Handling of non-numeric stats (reject, zero)
        #[arg(long, default_value = "reject", value_name = "POLICY")]
        policy: PolicyArg,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct ScrapeArgs {
    /// Category listing URL
    #[arg(long, value_name = "URL", conflicts_with = "dir")]
    url: Option<String>,

    /// Read a saved mirror from this directory instead of the web
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Listing file inside the mirror directory
    #[arg(long, default_value = "listing.html", value_name = "FILE")]
    listing: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (csv, json)
    #[arg(short, long, default_value = "csv", value_name = "FORMAT")]
    format: OutputFormat,

    /// JSON file overriding layout selectors and excluded names
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn emit(output: Option<PathBuf>, content: String) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(&path, content).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

fn read_dataset(input: &str) -> anyhow::Result<Dataset> {
    let text = if input == "-" {
        fetch_stdin().context("Failed to read from stdin")?
    } else {
        fetch_file(input).with_context(|| format!("Failed to read file: {}", input))?
    };
    read_csv(text.as_bytes()).with_context(|| format!("Failed to parse dataset: {}", input))
}

fn render_dataset(dataset: &Dataset, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            write_csv(dataset, &mut buf).context("Failed to write CSV")?;
            Ok(String::from_utf8(buf)?)
        }
        OutputFormat::Json => JsonFormatter::new(JsonConfig { pretty: true })
            .dataset(dataset)
            .context("Failed to write JSON"),
    }
}

async fn scrape(verbose: bool, args: ScrapeArgs) -> anyhow::Result<()> {
    let ScrapeArgs { url, dir, listing, output, format, config, timeout, user_agent } = args;
    let fetch = FetchConfig { timeout, user_agent: user_agent.unwrap_or_else(|| FetchConfig::default().user_agent) };

    let config = match config {
        Some(path) => PipelineConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let pipeline = Pipeline::new(config).context("Invalid page layout")?;

    let started = Instant::now();
    let report: PipelineReport = match dir {
        Some(dir) => {
            if verbose {
                echo::print_step(1, 2, &format!("Reading mirror {}", dir.display().bright_white()));
            }
            let mut source = FileSource::new(dir, listing);
            pipeline.run(&mut source).await.context("Extraction aborted")?
        }
        None => {
            let url = url.unwrap_or_else(|| DEFAULT_LISTING_URL.to_string());
            if verbose {
                echo::print_step(1, 2, &format!("Fetching from {}", url.bright_white().underline()));
            }
            let mut source = HttpSource::new(&url, fetch).context("Invalid listing URL")?;
            pipeline.run(&mut source).await.context("Extraction aborted")?
        }
    };

    echo::print_info(&format!(
        "{} of {} entities extracted",
        report.records.len(),
        report.visited
    ));
    echo::print_skip_tally(&report.tally());
    if report.records.is_empty() {
        echo::print_warning("No records extracted; the dataset has a header only");
    }

    let dataset = report.dataset();
    let content = render_dataset(&dataset, format)?;

    if verbose {
        echo::print_step(2, 2, "Writing output");
        eprintln!("  {} {}", "Rows:".dimmed(), dataset.len().to_string().bright_white());
        eprintln!("  {} {}", "Size:".dimmed(), echo::format_size(content.len()).bright_white());
        echo::print_timing("Elapsed", started.elapsed());
        eprintln!();
    }

    emit(output, content)
}

fn leveled(input: &str, output: Option<PathBuf>, format: OutputFormat) -> anyhow::Result<()> {
    let dataset = read_dataset(input)?;
    let rows = dataset.leveled().context("Dataset has no consistent final level")?;

    let content = match format {
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            write_leveled_csv(&rows, &mut buf).context("Failed to write CSV")?;
            String::from_utf8(buf)?
        }
        OutputFormat::Json => JsonFormatter::new(JsonConfig { pretty: true })
            .leveled(&rows)
            .context("Failed to write JSON")?,
    };

    emit(output, content)
}

fn summary(
    input: &str, by: &[GroupKey], metric: Metric, policy: PolicyArg, output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let dataset = read_dataset(input)?;
    let rows = dataset.leveled().context("Dataset has no consistent final level")?;
    let outcome = coerce(&rows, policy.into());
    for name in &outcome.rejected {
        echo::print_warning(&format!("{} has non-numeric stats and was left out", name));
    }

    let groups = summarize(&outcome.rows, by, metric);

    let mut buf = Vec::new();
    write_summary_csv(&groups, by, metric, &mut buf).context("Failed to write summary")?;
    let content = String::from_utf8(buf)?;

    emit(output, content)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    match args.command {
        Command::Scrape(scrape_args) => scrape(args.verbose, scrape_args).await,
        Command::Leveled { input, output, format } => leveled(&input, output, format),
        Command::Summary { input, by, metric, policy, output } => summary(&input, &by, metric, policy, output),
    }
}
