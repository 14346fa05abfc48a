//! Configuration for ingestion sessions

use chemlog_domain::MergePolicy;
use serde::{Deserialize, Serialize};

/// How a log is divided into jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobSplit {
    /// Treat the whole log as a single job
    Whole,
    /// Cut after each program-specific normal-termination line
    #[default]
    ByTerminator,
}

impl JobSplit {
    /// Parse a strategy from its name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "whole" => Some(JobSplit::Whole),
            "by-terminator" | "jobs" => Some(JobSplit::ByTerminator),
            _ => None,
        }
    }
}

/// Configuration for an ingestion session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// How writes to already-present properties are resolved
    #[serde(default)]
    pub merge_policy: MergePolicy,

    /// How the log is divided into jobs
    #[serde(default)]
    pub job_split: JobSplit,

    /// Maximum log size accepted (bytes)
    #[serde(default = "default_max_log_bytes")]
    pub max_log_bytes: usize,
}

fn default_max_log_bytes() -> usize {
    512 * 1024 * 1024
}

impl IngestConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_log_bytes == 0 {
            return Err("max_log_bytes must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Single-job preset: whole log is one job, first value wins
    pub fn single_job() -> Self {
        Self {
            merge_policy: MergePolicy::KeepFirst,
            job_split: JobSplit::Whole,
            max_log_bytes: default_max_log_bytes(),
        }
    }

    /// Trajectory preset: one job per terminated step, per-step sequences accumulate
    pub fn trajectory() -> Self {
        Self {
            merge_policy: MergePolicy::Accumulate,
            job_split: JobSplit::ByTerminator,
            max_log_bytes: default_max_log_bytes(),
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for IngestConfig {
    /// Split on job terminators, keep the first value written per property
    fn default() -> Self {
        Self {
            merge_policy: MergePolicy::KeepFirst,
            job_split: JobSplit::ByTerminator,
            max_log_bytes: default_max_log_bytes(),
        }
    }
}
