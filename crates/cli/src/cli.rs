use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Maintenance disclosure and fuel analytics over a fleet snapshot.
///
/// Reads plain JSON/YAML inputs, prints the derived view as JSON on stdout.
/// Logs go to stderr (`RUST_LOG=info` for more).
#[derive(Parser, Debug)]
#[command(name = "fleetops", version)]
pub struct CliArgs {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive the full per-equipment view from a snapshot file
    Snapshot {
        /// Snapshot JSON: equipment, records, plans, optional template and referenceDate
        #[arg(long)]
        input: PathBuf,

        /// Template YAML; wins over a template embedded in the snapshot (default: embedded, then TEMPLATE_PATH)
        #[arg(long)]
        template: Option<PathBuf>,

        /// Reference date for the weekly window (default: snapshot value, then today)
        #[arg(long)]
        reference_date: Option<NaiveDate>,

        /// Guaranteed-visibility floor in hours (overrides DISCLOSURE_FLOOR_HOURS)
        #[arg(long)]
        floor: Option<i64>,

        /// Compute equipment one after another instead of on the thread pool
        #[arg(long)]
        sequential: bool,
    },

    /// Visible maintenance offsets for a single plan
    Visible {
        /// Template YAML (default: TEMPLATE_PATH from config)
        #[arg(long)]
        template: Option<PathBuf>,

        /// Hour-meter reading at the start of the plan epoch
        #[arg(long)]
        baseline: i64,

        /// Completion JSON: either {"<activity>-<hour>": bool} or a list of entries
        #[arg(long)]
        completion: Option<PathBuf>,

        /// Guaranteed-visibility floor in hours
        #[arg(long)]
        floor: Option<i64>,
    },

    /// Compile a template file and report problems
    ValidateTemplate {
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// Print the resolved configuration
    Config,
}
