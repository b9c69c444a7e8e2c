use std::io::{self, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use photos_by_size_core::{ReportOptions, SizeAccounting};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "photos-by-size", version, about = "List media assets largest first, with their total size")]
struct Cli {
    /// Photo library directory, .zip export or .json asset catalog
    source: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Do not print progress lines
    #[arg(short, long)]
    quiet: bool,

    /// Leave assets of unknown size out of the total and count them separately
    #[arg(long)]
    exclude_unknown: bool,

    /// Exit with an error when access to the source is denied
    #[arg(long)]
    strict_auth: bool,

    /// Seconds to wait for the authorization answer (default: no limit)
    #[arg(long, value_name = "SECS")]
    auth_timeout: Option<u64>,

    /// Log to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);
    let t_total = std::time::Instant::now();

    let options = ReportOptions {
        source: cli.source,
        accounting: if cli.exclude_unknown {
            SizeAccounting::ExcludeUnknown
        } else {
            SizeAccounting::Sentinel
        },
        strict_auth: cli.strict_auth,
        auth_timeout_secs: cli.auth_timeout,
    };

    let show_progress = !cli.quiet && cli.format == Format::Text;
    let progress = move |stage: &str, current: u64, total: u64, _message: &str| {
        if !show_progress {
            return;
        }
        match stage {
            "start" => println!("collecting sizes on {} assets...", total),
            "collect" => println!("{}...", current),
            "done" => {
                println!("{}...", total);
                println!("... done");
            }
            _ => {}
        }
    };

    let report = photos_by_size_core::run(&options, &progress)?;

    let mut out = io::stdout().lock();
    match cli.format {
        Format::Text => report.write_text(&mut out)?,
        Format::Json => report.write_json(&mut out)?,
    }
    out.flush()?;

    tracing::info!(
        "{} assets, {} bytes in {:.2}s",
        report.records.len(),
        report.total_bytes,
        t_total.elapsed().as_secs_f64()
    );
    Ok(())
}
