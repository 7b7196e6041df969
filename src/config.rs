//! Runtime settings.
//!
//! Loaded from an optional JSON file, then overridden by environment
//! variables:
//!
//! ```json
//! {
//!   "data_dir": "data",
//!   "grade_policy": "strict",
//!   "low_attendance_threshold": 75,
//!   "log_file_path": "logs/academic_aggregator.log"
//! }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::analyzers::aggregate::GradePolicy;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub grade_policy: GradePolicy,
    /// Overall attendance below this percent raises the low-attendance warning.
    pub low_attendance_threshold: u8,
    pub log_file_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            grade_policy: GradePolicy::Strict,
            low_attendance_threshold: 75,
            log_file_path: PathBuf::from("logs/academic_aggregator.log"),
        }
    }
}

impl Settings {
    /// Loads settings from a JSON file at `path`. Missing keys keep their defaults.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{path}'"))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{path}'"))?;
        settings.validated()
    }

    /// Applies `ACADEMIC_DATA_DIR`, `ACADEMIC_GRADE_POLICY`,
    /// `ACADEMIC_ATTENDANCE_THRESHOLD` and `LOG_FILE_PATH` on top of `self`.
    pub fn with_env(self) -> Result<Self> {
        self.with_vars(|key| std::env::var(key).ok())
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(dir) = var("ACADEMIC_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(policy) = var("ACADEMIC_GRADE_POLICY") {
            self.grade_policy = policy.parse().context("ACADEMIC_GRADE_POLICY")?;
        }
        if let Some(threshold) = var("ACADEMIC_ATTENDANCE_THRESHOLD") {
            self.low_attendance_threshold = threshold
                .trim()
                .parse()
                .with_context(|| {
                    format!("ACADEMIC_ATTENDANCE_THRESHOLD '{threshold}' is not a percent")
                })?;
        }
        if let Some(path) = var("LOG_FILE_PATH") {
            self.log_file_path = PathBuf::from(path);
        }
        self.validated()
    }

    fn validated(self) -> Result<Self> {
        anyhow::ensure!(
            self.low_attendance_threshold <= 100,
            "low_attendance_threshold must be at most 100, got {}",
            self.low_attendance_threshold
        );
        Ok(self)
    }
}
