use anyhow::{Context, Result};
use iotd_wallpaper::config::Config;
use iotd_wallpaper::desktop::SystemDesktop;
use iotd_wallpaper::http::HttpFetcher;
use iotd_wallpaper::pipeline::{self, RunOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: iotd-wallpaper [OPTIONS]

Fetch the latest image from the configured RSS feed, caption it, and set it
as the desktop background.

Options:
  -c, --config <FILE>   config file (default: ./config.toml if present)
  -i, --input <FILE>    use a local image instead of downloading
  -o, --output <FILE>   where to write the PNG (overrides output.path)
      --cache           keep the unmodified image in output.cache_dir
      --no-set          write the file but do not change the background
  -v, --verbose         debug logging
  -h, --help            print this help";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    options: RunOptions,
    verbose: bool,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-c" | "--config" => parsed.config = Some(required_value(&arg, iter.next())?),
            "-i" | "--input" => parsed.options.input = Some(required_value(&arg, iter.next())?),
            "-o" | "--output" => parsed.options.output = Some(required_value(&arg, iter.next())?),
            "--cache" => parsed.options.cache_original = true,
            "--no-set" => parsed.options.skip_background = true,
            "-v" | "--verbose" => parsed.verbose = true,
            "-h" | "--help" => parsed.help = true,
            other => anyhow::bail!("unknown argument: {}", other),
        }
    }
    Ok(parsed)
}

fn required_value(flag: &str, value: Option<String>) -> Result<PathBuf> {
    match value {
        Some(v) if !v.starts_with('-') => Ok(PathBuf::from(v)),
        _ => anyhow::bail!("{} requires a value", flag),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "iotd_wallpaper=debug" } else { "iotd_wallpaper=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {:#}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };
    if args.help {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load_or_default(args.config.as_deref())?;
    let fetcher = HttpFetcher::new(&config.feed).context("failed to build HTTP client")?;

    let report = pipeline::run(&config, &args.options, &fetcher, &SystemDesktop).await?;

    if let Some(title) = &report.item.title {
        println!("  {}", title);
    }
    println!(
        "  {}x{} -> {}x{}  {}",
        report.original.0,
        report.original.1,
        report.written.0,
        report.written.1,
        report.output_path.display()
    );
    if let Some(cached) = &report.cached_path {
        println!("  original cached at {}", cached.display());
    }
    if report.background_set {
        println!("  desktop background updated");
    }
    Ok(())
}
