//! Command-line interface for cardex.
//!
//! The CLI is the only place that touches the filesystem; everything it
//! reads is handed to the core as in-memory strings.

use crate::models::{BusinessCard, Submission};
use crate::{ExportOptions, ExportService, IngestFormat, IngestOptions, IngestService};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Cardex - business card record ingestion and export.
#[derive(Debug, Parser)]
#[command(name = "cardex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Ingest a submission payload and print the outcome as JSON.
    Ingest {
        /// Payload file (.xml, .csv, or a .json submission document).
        file: PathBuf,

        /// Payload format: xml, csv, qr, or direct.
        ///
        /// Defaults to detection from the file extension; QR payload
        /// files must name the format explicitly.
        #[arg(short, long, env = "CARDEX_FORMAT")]
        format: Option<String>,

        /// Decoded photo size cap in bytes.
        #[arg(long, default_value_t = crate::MAX_PHOTO_BYTES)]
        max_photo_bytes: usize,

        /// Write the outcome here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a JSON card store as XML or CSV.
    Export {
        /// JSON file holding an array of stored cards.
        store: PathBuf,

        /// Output format: xml or csv.
        #[arg(short, long, default_value = "xml")]
        format: String,

        /// Omit the store-assigned identifier from the output.
        #[arg(long)]
        no_id: bool,

        /// Write the export here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Runs the parsed CLI command.
///
/// # Errors
///
/// Returns an error if file I/O fails or the core rejects the input.
pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Ingest {
            file,
            format,
            max_photo_bytes,
            output,
        } => cmd_ingest(&file, format.as_deref(), max_photo_bytes, output.as_deref()),
        Commands::Export {
            store,
            format,
            no_id,
            output,
        } => cmd_export(&store, &format, no_id, output.as_deref()),
    }
}

fn cmd_ingest(
    file: &Path,
    format: Option<&str>,
    max_photo_bytes: usize,
    output: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    let format = match format {
        Some(name) => name.parse::<IngestFormat>()?,
        None => IngestFormat::from_path(file)?,
    };
    let text = fs::read_to_string(file)
        .with_context(|| format!("reading payload file {}", file.display()))?;

    let submission = match format {
        IngestFormat::Xml => Submission {
            xml_payload: Some(text),
            ..Default::default()
        },
        IngestFormat::Csv => Submission {
            csv_payload: Some(text),
            ..Default::default()
        },
        IngestFormat::Qr => Submission {
            qr_payload: Some(text),
            ..Default::default()
        },
        IngestFormat::Direct => {
            serde_json::from_str(&text).context("parsing submission document")?
        },
    };

    let options = IngestOptions::default().with_max_photo_bytes(max_photo_bytes);
    let outcome = IngestService::with_options(&options).ingest(&submission)?;

    for failure in &outcome.failures {
        tracing::warn!(%failure, "record skipped");
    }

    let rendered = serde_json::to_string_pretty(&outcome)?;
    write_output(&rendered, output)?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_export(
    store: &Path,
    format: &str,
    no_id: bool,
    output: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    let text = fs::read_to_string(store)
        .with_context(|| format!("reading card store {}", store.display()))?;
    let cards: Vec<BusinessCard> = serde_json::from_str(&text).context("parsing card store")?;

    let options = ExportOptions::default()
        .with_format(format.parse()?)
        .with_include_id(!no_id);
    let rendered = ExportService::new().export_to_string(&cards, &options)?;

    write_output(&rendered, output)?;
    Ok(ExitCode::SUCCESS)
}

fn write_output(rendered: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("writing output to {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}
