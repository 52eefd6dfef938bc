//! `chunkvault` - command-line front end for a backup repository.
//!
//! # Usage
//!
//! ```text
//! chunkvault ingest notes.txt                 # store one file, print its revision
//! chunkvault restore 12 notes.txt.restored    # write revision 12 to a file
//! chunkvault snapshot ~/documents --note daily
//! chunkvault history notes.txt
//! chunkvault snapshots
//! chunkvault stats
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chunkvault::{ChunkConfig, Repository, RepositoryConfig, RevisionId};

#[derive(Parser)]
#[command(
    name = "chunkvault",
    version,
    about = "Deduplicating content-addressed backups"
)]
struct Cli {
    /// Repository database file.
    #[arg(long, global = true, env = "CHUNKVAULT_DB", default_value = "db.chunkvault")]
    db: PathBuf,

    /// Working-buffer capacity, which is also the maximum chunk size.
    ///
    /// Must stay the same for the life of a repository.
    #[arg(long, global = true, default_value_t = chunkvault::DEFAULT_BUFFER_CAPACITY)]
    buffer_capacity: usize,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store one file in a snapshot of its own.
    Ingest {
        /// File to store.
        file: PathBuf,
    },

    /// Write a stored revision to a file.
    Restore {
        /// Revision id printed by `ingest` or `history`.
        revision: RevisionId,
        /// Destination file, created or truncated.
        dest: PathBuf,
    },

    /// Store every file under a directory in one snapshot.
    Snapshot {
        /// Directory to walk.
        dir: PathBuf,
        /// Note recorded with the snapshot.
        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// List the revisions of a file.
    History {
        /// Path as it was given when ingested.
        file: String,
    },

    /// List committed snapshots.
    Snapshots,

    /// Show repository totals.
    Stats,
}

fn setup_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(&cli.log_level);

    let config = RepositoryConfig::default()
        .with_chunk_config(ChunkConfig::new(cli.buffer_capacity).context("bad --buffer-capacity")?);
    let mut repo = Repository::open(&cli.db, config)
        .with_context(|| format!("failed to open {}", cli.db.display()))?;

    match cli.command {
        Commands::Ingest { file } => {
            let revision = repo
                .ingest_file(&file)
                .with_context(|| format!("failed to ingest {}", file.display()))?;
            println!("{revision}");
        }
        Commands::Restore { revision, dest } => {
            let written = repo
                .restore_to_path(revision, &dest)
                .with_context(|| format!("failed to restore revision {revision}"))?;
            println!("{written} bytes written to {}", dest.display());
        }
        Commands::Snapshot { dir, note } => {
            let summary = repo
                .snapshot_tree(&dir, &note)
                .with_context(|| format!("failed to snapshot {}", dir.display()))?;
            for rev in &summary.revisions {
                let state = if rev.reused { "unchanged" } else { "stored" };
                println!("{:>8}  {:<9}  {}", rev.revision, state, rev.path);
            }
            println!(
                "snapshot {}: {} files, {} new contents",
                summary.id,
                summary.revisions.len(),
                summary.new_contents()
            );
        }
        Commands::History { file } => {
            for rev in repo.history(&file)? {
                println!(
                    "{:>8}  {}  snapshot {}  {}",
                    rev.id,
                    rev.time.format("%Y-%m-%d %H:%M:%S"),
                    rev.snapshot,
                    rev.content_hash
                );
            }
        }
        Commands::Snapshots => {
            for snap in repo.snapshots()? {
                println!(
                    "{:>6}  {}  {:>5} files  {}",
                    snap.id,
                    snap.time.format("%Y-%m-%d %H:%M:%S"),
                    snap.revisions,
                    snap.note
                );
            }
        }
        Commands::Stats => {
            let stats = repo.stats()?;
            println!("chunks:       {}", stats.chunks);
            println!("stored bytes: {}", stats.stored_bytes);
            println!("contents:     {}", stats.contents);
            println!("files:        {}", stats.files);
            println!("snapshots:    {}", stats.snapshots);
            println!("revisions:    {}", stats.revisions);
        }
    }
    Ok(())
}
