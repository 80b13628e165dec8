mod aggregate;
mod error;
mod fetch;
mod model;
mod parser;
mod settings;
mod toc;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use fetch::HttpSource;
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "mikrotik_props",
    about = "Collect RouterOS property definitions from the MikroTik wiki into one JSON file"
)]
struct Cli {
    /// File to write the JSON array to
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    info!(root = %settings.root_url, toc = %settings.toc_path, "Starting property scrape");

    let source = HttpSource::new(&settings)?;
    let output = aggregate::run(&source, &settings)?;

    // Serialize fully before touching the file so a failed run leaves nothing behind.
    let json = if settings.pretty {
        serde_json::to_vec_pretty(&output.properties)?
    } else {
        serde_json::to_vec(&output.properties)?
    };
    std::fs::write(&cli.output, json)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    println!("{}", output.stats.summary(t0.elapsed()));
    println!("Wrote {}", cli.output.display());
    Ok(())
}
