use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;
use crate::models::{SignalColor, TrackId, Violation};
use crate::pipeline::RunSummary;

/// JSON summary of one run, written at the end when requested
#[derive(Debug, Clone, Serialize)]
pub struct ViolationReport {
    pub run_id: Uuid,
    pub generated_at: String,
    pub frames_processed: u64,
    pub final_signal: SignalColor,
    pub violator_count: usize,
    pub violators: Vec<TrackId>,
    pub violations: Vec<Violation>,
}

impl ViolationReport {
    pub fn from_summary(summary: &RunSummary) -> Result<Self> {
        let generated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .context("Failed to format report timestamp")?;

        Ok(Self {
            run_id: Uuid::new_v4(),
            generated_at,
            frames_processed: summary.frames_processed,
            final_signal: summary.final_signal,
            violator_count: summary.violators.len(),
            violators: summary.violators.clone(),
            violations: summary.violations.clone(),
        })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create report {}", path.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        Ok(())
    }
}
