//! Main entry point for the runpck CLI application.
//!
//! This binary lists and extracts PCK archives from the local filesystem
//! or from remote HTTP URLs.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use runpck::cli::skips_failed_entry;
use runpck::pck::{companion_path, default_output_dir, output_path};
use runpck::{Cli, PckEntry, PckExtractor, ReadAt, open_archive};

/// Application entry point.
///
/// Opens the archive (and its companion for extended archives) and
/// dispatches to listing or extraction.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let extension = cli.extension.clone().or_else(|| companion_path(&cli.file));
    if let Some(ref ext) = extension {
        info!("Extended archive, reading {} first", ext);
    }

    let archive = open_archive(&cli.file, extension.as_deref())
        .await
        .with_context(|| format!("failed to open {}", cli.file))?;

    let trailer = archive.archive().trailer;
    info!("PCK version: {}", trailer.version);
    info!("PCK entry count: {}", trailer.entry_count);
    info!("PCK FAT offset: {:08X}", trailer.fat_offset);

    process_pck(&archive, &cli).await?;

    // Display network transfer statistics for HTTP sources
    if cli.is_http_url() && !cli.is_quiet() {
        let transferred = archive.space().transferred_bytes();
        eprintln!("\nTotal bytes transferred: {}", format_size(transferred));
    }

    Ok(())
}

/// Install the stderr `tracing` subscriber; `RUST_LOG` overrides the CLI verbosity.
fn init_logging(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Process an opened archive based on CLI options.
///
/// - List mode (`-l` or `-v`): display archive contents
/// - Extract mode: extract entries matching the filters
///
/// Entries whose data fails to inflate are reported and skipped; any other
/// error stops the run.
async fn process_pck(archive: &PckExtractor, cli: &Cli) -> Result<()> {
    if cli.list || cli.verbose {
        list_files(archive, cli.verbose);
        return Ok(());
    }

    let files_to_extract: Vec<_> = archive
        .entries()
        .iter()
        .filter(|e| cli.selects(&e.normalized_name()))
        .collect();

    let root = cli
        .extract_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_dir(&cli.file));

    let multiple_files = cli.pipe && files_to_extract.len() > 1;
    let mut failed = 0usize;
    for entry in files_to_extract {
        match extract_file(archive, entry, &root, cli, multiple_files).await {
            Ok(()) => {}
            Err(e) if skips_failed_entry(&e) => {
                error!("{}: {}", entry.normalized_name(), e);
                failed += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to extract {}", entry.name));
            }
        }
    }

    if failed > 0 {
        error!("{} entries could not be decompressed", failed);
    }

    Ok(())
}

/// List entries in the archive.
///
/// - Simple format (`-l`): normalized names, one per line
/// - Verbose format (`-v`): sizes, compression ratio and data offset
fn list_files(archive: &PckExtractor, verbose: bool) {
    let entries = archive.entries();

    if verbose {
        println!(
            "{:>10}  {:>10}  {:>5}  {:>16}  Name",
            "Length", "Size", "Cmpr", "Offset"
        );
        println!("{}", "-".repeat(70));
    }

    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;

    for entry in entries {
        if verbose {
            println!(
                "{:>10}  {:>10}  {}  {:016X}  {}",
                entry.uncompressed_size,
                entry.compressed_size,
                ratio(entry.compressed_size as u64, entry.uncompressed_size as u64),
                entry.data_offset,
                entry.normalized_name()
            );
            total_uncompressed += entry.uncompressed_size as u64;
            total_compressed += entry.compressed_size as u64;
        } else {
            println!("{}", entry.normalized_name());
        }
    }

    if verbose {
        println!("{}", "-".repeat(70));
        println!(
            "{:>10}  {:>10}  {}  {:>16}  {} files",
            total_uncompressed,
            total_compressed,
            ratio(total_compressed, total_uncompressed),
            "",
            entries.len()
        );
    }
}

/// Percentage saved by compression, right-aligned to five columns.
fn ratio(compressed: u64, uncompressed: u64) -> String {
    if uncompressed > 0 && compressed <= uncompressed {
        format!("{:>4}%", 100 - (compressed * 100 / uncompressed))
    } else {
        "  0%".to_string()
    }
}

/// Extract a single entry from the archive.
///
/// Handles pipe mode (`-p`), junk paths (`-j`) and the overwrite
/// options (`-n`, `-o`).
async fn extract_file(
    archive: &PckExtractor,
    entry: &PckEntry,
    root: &std::path::Path,
    cli: &Cli,
    show_filename: bool,
) -> runpck::Result<()> {
    if cli.pipe {
        if show_filename {
            use tokio::io::AsyncWriteExt;
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(format!("--- {} ---\n", entry.normalized_name()).as_bytes())
                .await?;
        }
        return archive.extract_to_stdout(entry).await;
    }

    let Some(output_path) = output_path(root, entry, cli.junk_paths) else {
        warn!("Skipping: {:?} (no usable path in entry name)", entry.name);
        return Ok(());
    };

    if output_path.exists() {
        if cli.never_overwrite {
            if !cli.is_quiet() {
                eprintln!("Skipping: {} (file exists)", output_path.display());
            }
            return Ok(());
        }

        if !cli.overwrite {
            if !cli.is_quiet() {
                eprintln!("Skipping: {} (use -o to overwrite)", output_path.display());
            }
            return Ok(());
        }
    }

    if !cli.is_quiet() {
        println!("  extracting: {}", entry.normalized_name());
    }

    archive.extract_to_file(entry, &output_path).await
}

/// Format a byte size into a human-readable string.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
