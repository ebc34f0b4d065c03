pub mod branch;
pub mod history;
pub mod init;
pub mod sources;
pub mod status;
pub mod summary;
pub mod watch;

use clap::{Parser, Subcommand};

use crate::aggregate::Aggregator;
use crate::cache::SummaryCache;
use crate::settings::Settings;
use crate::summary::SummaryBuilder;

pub(crate) type Service = SummaryCache<SummaryBuilder<Aggregator>>;

/// The summary pipeline wired from settings: roster, source roots,
/// abbreviation overrides, and cache lifetime.
pub(crate) fn service(settings: &Settings) -> Service {
    let aggregator = Aggregator::new(settings.source_roots(), settings.resolver());
    let builder = SummaryBuilder::new(settings.roster(), aggregator);
    SummaryCache::new(builder, settings.cache_ttl_secs)
}

#[derive(Parser)]
#[command(
    name = "branchwatch",
    about = "Show how fresh each branch's exported data is, per data source."
)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write settings and create the per-source folders.
    Init {
        /// Root folder holding the extracts (default: ~/Documents/branchwatch)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Roster file with a BRANCH column (relative to the data dir)
        #[arg(long)]
        roster: Option<String>,
    },
    /// Show configuration and which source folders exist.
    Status,
    /// List the data sources and their filename conventions.
    Sources,
    /// Show the freshness summary for every branch.
    Summary {
        /// Recompute even if a cached table is still fresh
        #[arg(long)]
        refresh: bool,
        /// Output format: text, csv, json
        #[arg(long, default_value = "text")]
        format: String,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<String>,
        /// Record the table in the snapshot database
        #[arg(long)]
        save: bool,
    },
    /// Show per-source detail for one branch.
    Branch {
        /// Branch name as it appears in the roster
        name: String,
        /// Limit to one source: TRNM, SVACC, LNACC, GL, AGING, TB
        #[arg(long)]
        source: Option<String>,
    },
    /// Keep a summary open and refresh it on demand.
    Watch,
    /// List saved snapshots.
    History {
        /// Show saved cells for one branch
        #[arg(long)]
        branch: Option<String>,
        /// Number of snapshots to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}
