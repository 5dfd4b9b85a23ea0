use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::converters::ConversionStats;
use crate::error::{IoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Success,
    Failed,
}

/// Machine-readable outcome of one conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub status: JobStatus,
    pub stats: Option<ConversionStats>,
    pub message: String,
    pub finished_at: DateTime<Utc>,
}

impl ConversionReport {
    pub fn success(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        stats: ConversionStats,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            status: JobStatus::Success,
            stats: Some(stats),
            message: "conversion completed".to_string(),
            finished_at: Utc::now(),
        }
    }

    pub fn failed(input: impl Into<PathBuf>, output: impl Into<PathBuf>, err: &IoError) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            status: JobStatus::Failed,
            stats: None,
            message: err.to_string(),
            finished_at: Utc::now(),
        }
    }
}

pub fn write_report(path: impl AsRef<Path>, report: &ConversionReport) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let bytes = serde_json::to_vec_pretty(report)?;
    fs::write(path, bytes)?;
    Ok(())
}

pub fn load_report(path: impl AsRef<Path>) -> Result<ConversionReport> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
