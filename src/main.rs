use std::fs;
use std::io::{self, Read, Write};
#[cfg(feature = "fetch")]
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};

use proxyconv::{Converter, FormatRegistry, Settings};

/// Convert proxy subscriptions between share-link, Clash, sing-box and Loon formats
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input format: txt, clash-meta, clash-premium, sing-box or subscribe-url
    #[arg(short, long, value_name = "FORMAT")]
    from: String,

    /// Output format: txt, clash-meta, clash-premium, sing-box or loon
    #[arg(short, long, value_name = "FORMAT")]
    to: String,

    /// Input file, `-` for stdin
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    input: String,

    /// Output file, stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Path to a TOML or YAML settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        Ok(content)
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read input file {}", path))
    }
}

fn build_registry(settings: &Settings) -> Result<FormatRegistry> {
    let registry = FormatRegistry::with_settings(settings)?;

    #[cfg(feature = "fetch")]
    let registry = {
        let fetcher = proxyconv::HttpFetcher::with_timeout_secs(settings.fetch_timeout_secs)?;
        registry.with_fetcher(Arc::new(fetcher))?
    };

    Ok(registry)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::load(path).with_context(|| format!("Failed to load settings from {}", path))?,
        None => Settings::default(),
    };

    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or(settings.log_level.as_str()));

    let registry = build_registry(&settings)?;
    let input = read_input(&args.input)?;

    let result = Converter::new(&registry)
        .convert(&input, &args.from, &args.to)
        .with_context(|| format!("Failed to convert {} to {}", args.from, args.to))?;

    match &args.output {
        Some(path) => {
            fs::write(path, &result.output).with_context(|| format!("Failed to write {}", path))?;
            info!("Wrote {} proxies to {}", result.kept, path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(result.output.as_bytes())?;
            if !result.output.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }

    for (proxy_type, count) in &result.dropped {
        warn!("Dropped {} {} proxies not supported by {}", count, proxy_type, args.to);
    }
    if !result.unsupported.is_empty() {
        warn!("Unsupported link schemes: {}", result.unsupported.join(", "));
    }
    eprintln!(
        "kept {}, dropped {}, unsupported {}",
        result.kept,
        result.total_dropped(),
        result.unsupported.len()
    );
    Ok(())
}
