use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::equipment::Hours;

/// Default guaranteed-visibility floor: every offset at or below it is shown.
pub const DEFAULT_FLOOR_HOURS: Hours = 600;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_i64(profile: &str, key: &str, default: i64) -> i64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(profile, key).as_deref() {
        Some("1") | Some("true") | Some("yes") => true,
        Some("0") | Some("false") | Some("no") => false,
        _ => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub disclosure: DisclosureConfig,
    pub templates: TemplateConfig,
    pub compute: ComputeConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `FLEETOPS_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("FLEETOPS_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            disclosure: DisclosureConfig::from_env_profiled(p),
            templates: TemplateConfig::from_env_profiled(p),
            compute: ComputeConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  disclosure:  floor_hours={}", self.disclosure.floor_hours);
        tracing::info!("  templates:   path={}", self.templates.path.display());
        tracing::info!(
            "  compute:     parallel={}, worker_threads={}",
            self.compute.parallel,
            self.compute.worker_threads
        );
    }

    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "disclosure": { "floor_hours": self.disclosure.floor_hours },
            "templates": { "path": self.templates.path },
            "compute": {
                "parallel": self.compute.parallel,
                "worker_threads": self.compute.worker_threads,
                "resolved_worker_threads": self.compute.resolved_worker_threads(),
            },
        })
    }
}

// ── Disclosure ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisclosureConfig {
    /// Offsets at or below this are always visible.
    pub floor_hours: Hours,
}

impl DisclosureConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            floor_hours: profiled_env_i64(p, "DISCLOSURE_FLOOR_HOURS", DEFAULT_FLOOR_HOURS),
        }
    }
}

impl Default for DisclosureConfig {
    fn default() -> Self {
        Self {
            floor_hours: DEFAULT_FLOOR_HOURS,
        }
    }
}

// ── Templates ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub path: PathBuf,
}

impl TemplateConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            path: PathBuf::from(profiled_env_or(
                p,
                "TEMPLATE_PATH",
                "data/templates/maintenance-template.yml",
            )),
        }
    }
}

// ── Compute ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeConfig {
    /// Fan per-equipment work out over the rayon pool.
    pub parallel: bool,
    /// Number of worker threads. 0 = available parallelism.
    pub worker_threads: usize,
}

impl ComputeConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            parallel: profiled_env_bool(p, "COMPUTE_PARALLEL", true),
            worker_threads: profiled_env_usize(p, "COMPUTE_WORKER_THREADS", 0),
        }
    }

    /// Resolve worker thread count (0 means use available parallelism).
    pub fn resolved_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            self.worker_threads
        }
    }
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            worker_threads: 0,
        }
    }
}
