//! chatcanon - normalize a chat-capture export
//!
//! Reads one JSON record per line (`sender`, `message`, `type`, `chat_time`)
//! and writes one normalized message per line to stdout. Logs go to stderr.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use chatcanon::{ChatCanonConfig, LoggingYamlConfig, Pipeline, RawRecord};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chatcanon", about = "Normalize chat-capture records into canonical messages")]
struct Cli {
    /// YAML config file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON-lines input file. Reads stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Never fetch merged histories over the network.
    #[arg(long)]
    offline: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ChatCanonConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ChatCanonConfig::default(),
    };
    if cli.offline {
        config.fetch.enabled = false;
    }

    init_logging(&config.logging);

    let pipeline = Pipeline::from_config(&config)?;

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening input {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin().lock())),
    };
    let records = read_records(reader)?;
    let total = records.len();

    let messages = pipeline.ingest_batch(records);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for message in &messages {
        serde_json::to_writer(&mut out, message)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    tracing::info!(records = total, "normalize_complete");
    Ok(())
}

/// Parses every non-blank line; malformed lines are logged and skipped.
fn read_records(reader: impl BufRead) -> anyhow::Result<Vec<RawRecord>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.context("reading input")?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<RawRecord>(&line) {
            Ok(record) => records.push(record),
            Err(err) => tracing::warn!(line = index + 1, error = %err, "skipping_malformed_record"),
        }
    }
    Ok(records)
}

fn init_logging(cfg: &LoggingYamlConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);
    if cfg.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
