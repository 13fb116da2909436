mod cli;
mod input;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use tracing::{error, info, warn};

use fleetops_compute::{disclose, DisclosurePolicy, FacadeSettings, SchedulingFacade};
use fleetops_core::config::{load_dotenv, Config};
use fleetops_core::{load_template, CompletionState, FleetError, MaintenanceTemplate};

use crate::cli::{CliArgs, Command};

fn main() -> Result<()> {
    // Logs on stderr; stdout is reserved for JSON output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    let args = CliArgs::parse();

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.compute.resolved_worker_threads())
        .build_global()
        .context("failed to build worker thread pool")?;

    match args.command {
        Command::Snapshot {
            input,
            template,
            reference_date,
            floor,
            sequential,
        } => {
            let mut file = crate::input::load_snapshot(&input)?;
            let template =
                resolve_snapshot_template(template.as_deref(), file.template.take(), &config)?;
            let reference_date = reference_date
                .or(file.reference_date)
                .unwrap_or_else(|| Utc::now().date_naive());

            let mut settings = FacadeSettings::from(&config);
            if let Some(floor) = floor {
                settings.policy.floor_hours = floor;
            }
            if sequential {
                settings.parallel = false;
            }

            let fleet = file.into_input(template, reference_date);
            let snapshot = SchedulingFacade::new(settings)
                .snapshot(&fleet)
                .map_err(report_configuration)?;
            print_json(&snapshot, args.pretty)
        }

        Command::Visible {
            template,
            baseline,
            completion,
            floor,
        } => {
            let template = load_configured_template(template.as_deref(), &config)?;
            let state = match completion {
                Some(path) => input::load_completion(&path)?,
                None => CompletionState::new(),
            };
            let mut policy = DisclosurePolicy::from(&config.disclosure);
            if let Some(floor) = floor {
                policy.floor_hours = floor;
            }

            let disclosure =
                disclose(&template, &state, baseline, &policy).map_err(report_configuration)?;
            print_json(&disclosure, args.pretty)
        }

        Command::ValidateTemplate { template } => {
            let template = load_configured_template(template.as_deref(), &config)?;
            info!(template = %template.id, "template is valid");
            print_json(
                &serde_json::json!({
                    "id": template.id,
                    "name": template.name,
                    "dueOffsets": template.due_offsets,
                    "activities": template.activities.iter().map(|a| &a.id).collect::<Vec<_>>(),
                    "valid": true,
                }),
                args.pretty,
            )
        }

        Command::Config => print_json(&config.summary(), args.pretty),
    }
}

/// Load the template from the flag, falling back to the configured path.
fn load_configured_template(flag: Option<&Path>, config: &Config) -> Result<MaintenanceTemplate> {
    let path: PathBuf = flag
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.templates.path.clone());
    load_template(&path)
        .map_err(report_configuration)
        .with_context(|| format!("failed to load template '{}'", path.display()))
}

/// Template for `snapshot`: the `--template` flag, then the template embedded
/// in the snapshot file, then the configured path.
fn resolve_snapshot_template(
    flag: Option<&Path>,
    embedded: Option<MaintenanceTemplate>,
    config: &Config,
) -> Result<MaintenanceTemplate> {
    match (flag, embedded) {
        (Some(path), Some(embedded)) => {
            warn!(
                path = %path.display(),
                embedded = %embedded.id,
                "--template overrides the template embedded in the snapshot"
            );
            load_configured_template(Some(path), config)
        }
        (None, Some(embedded)) => Ok(embedded),
        (flag, None) => load_configured_template(flag, config),
    }
}

/// Log configuration problems distinctly from ordinary failures.
fn report_configuration(err: FleetError) -> FleetError {
    if err.is_configuration() {
        error!(error = %err, "configuration error: fix the maintenance template");
    }
    err
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
