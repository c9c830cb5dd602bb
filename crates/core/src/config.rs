use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

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

/// Source of raw config values. The process environment in production,
/// a closure over a map in tests.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Read a profiled value: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_opt(lookup: Lookup<'_>, profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = lookup(&prefixed) {
            return Some(v);
        }
    }
    lookup(key)
}

fn profiled_parse<T: FromStr>(lookup: Lookup<'_>, profile: &str, key: &str, default: T) -> T {
    profiled_opt(lookup, profile, key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub scheduler: SchedulerConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `TASKLIST_PROFILE`. When set (e.g. `BENCH`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("TASKLIST_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        Self::from_lookup(profile, &env_opt)
    }

    fn from_lookup(profile: &str, lookup: Lookup<'_>) -> Self {
        let p = profile.to_uppercase();
        Self {
            scheduler: SchedulerConfig::from_lookup(&p, lookup),
            profile: p,
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scheduler.validate()
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        let s = &self.scheduler;
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  scheduler:   priority_max_weight={}, bucket_count={}, policy={}",
            s.priority_max_weight,
            s.bucket_count,
            s.priority_policy
        );
        match s.seed {
            Some(seed) => tracing::info!("  random:      seed={}", seed),
            None => tracing::info!("  random:      seed=(entropy)"),
        }
    }

    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "scheduler": {
                "priority_max_weight": self.scheduler.priority_max_weight,
                "random_bucket_weight": self.scheduler.random_bucket_weight(),
                "bucket_count": self.scheduler.bucket_count,
                "seed": self.scheduler.seed,
                "priority_policy": self.scheduler.priority_policy.to_string(),
            },
        })
    }
}

// ── Priority policy ───────────────────────────────────────────

/// What to do with an enqueue priority outside [0, 10].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityPolicy {
    #[default]
    Reject,
    Clamp,
}

impl fmt::Display for PriorityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityPolicy::Reject => f.write_str("reject"),
            PriorityPolicy::Clamp => f.write_str("clamp"),
        }
    }
}

impl FromStr for PriorityPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(PriorityPolicy::Reject),
            "clamp" => Ok(PriorityPolicy::Clamp),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

// ── Scheduler ─────────────────────────────────────────────────

pub const DEFAULT_PRIORITY_MAX_WEIGHT: u32 = 60;
pub const DEFAULT_BUCKET_COUNT: u8 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Percent of dequeues that run the priority-max scan. The rest draw a
    /// random bucket.
    pub priority_max_weight: u32,
    /// Buckets are drawn uniformly from `0..bucket_count`.
    pub bucket_count: u8,
    /// Fixed seed for reproducible runs. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub priority_policy: PriorityPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            priority_max_weight: DEFAULT_PRIORITY_MAX_WEIGHT,
            bucket_count: DEFAULT_BUCKET_COUNT,
            seed: None,
            priority_policy: PriorityPolicy::Reject,
        }
    }
}

impl SchedulerConfig {
    fn from_lookup(p: &str, lookup: Lookup<'_>) -> Self {
        let priority_policy = match profiled_opt(lookup, p, "SCHED_PRIORITY_POLICY") {
            Some(raw) => raw.parse::<PriorityPolicy>().unwrap_or_else(|e: ConfigError| {
                tracing::warn!(error = %e, "falling back to reject policy");
                PriorityPolicy::Reject
            }),
            None => PriorityPolicy::Reject,
        };
        Self {
            priority_max_weight: profiled_parse(
                lookup,
                p,
                "SCHED_PRIORITY_MAX_WEIGHT",
                DEFAULT_PRIORITY_MAX_WEIGHT,
            ),
            bucket_count: profiled_parse(lookup, p, "SCHED_BUCKET_COUNT", DEFAULT_BUCKET_COUNT),
            seed: profiled_opt(lookup, p, "SCHED_SEED").and_then(|v| v.trim().parse().ok()),
            priority_policy,
        }
    }

    pub fn random_bucket_weight(&self) -> u32 {
        100u32.saturating_sub(self.priority_max_weight)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.priority_max_weight > 100 {
            return Err(ConfigError::Invalid {
                key: "SCHED_PRIORITY_MAX_WEIGHT",
                reason: format!("{} is not a percentage", self.priority_max_weight),
            });
        }
        // Buckets map onto priorities 0..=10, so more than 11 can never match.
        if self.bucket_count == 0 || self.bucket_count > 11 {
            return Err(ConfigError::Invalid {
                key: "SCHED_BUCKET_COUNT",
                reason: format!("{} is outside 1..=11", self.bucket_count),
            });
        }
        Ok(())
    }
}
