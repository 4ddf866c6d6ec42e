//! `folio`: command-line client for the folio server.
//!
//! # Usage
//!
//! ```text
//! folio submit contract.pdf --subject-id 12345678-9 --date 2024-05-01 \
//!   --document-type contrato --product vida --ticket-ref OPS-1
//! folio batch documents.toml
//! folio --config ~/.config/folio/config.toml batch documents.toml
//! ```

mod client;
mod manifest;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::ApiClient;
use manifest::{Entry, Manifest};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:3000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "folio", about = "Submit documents to a folio server")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the folio server (default: http://localhost:3000).
  #[arg(long)]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Store a single PDF (or PNG, if the server embeds images).
  Submit {
    file:          PathBuf,
    #[arg(long)]
    subject_id:    String,
    #[arg(long)]
    date:          String,
    #[arg(long)]
    document_type: String,
    #[arg(long)]
    product:       String,
    #[arg(long)]
    ticket_ref:    String,
  },
  /// Store every document listed in a TOML manifest, in order.
  Batch { manifest: PathBuf },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flag overrides config file, which overrides the default.
  let url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string());
  let client = ApiClient::new(url)?;

  match args.command {
    Command::Submit {
      file,
      subject_id,
      date,
      document_type,
      product,
      ticket_ref,
    } => {
      let entry = Entry {
        file,
        subject_id,
        date,
        document_type,
        product,
        ticket_ref,
      };
      let stored = client.generate_one(&entry.to_request()?).await?;
      tracing::debug!(message = %stored.message, "stored");
      println!("{}", stored.file_path);
    }
    Command::Batch { manifest } => {
      let manifest = Manifest::load(&manifest)?;
      let requests = manifest
        .documents
        .iter()
        .map(Entry::to_request)
        .collect::<Result<Vec<_>>>()?;
      for stored in client.generate_many(&requests).await? {
        println!("{}", stored.file_path);
      }
    }
  }

  Ok(())
}
