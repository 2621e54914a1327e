use std::{fs, path::Path};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    core::{batch::Report, constraint::MAX_CONSTRAINT_SCORE, evaluation::Evaluation},
    prelude::*,
};

/// Batch report enriched with the run metadata and the derived run metrics.
#[must_use]
#[derive(Serialize)]
pub struct RunReport {
    #[serde(flatten)]
    pub report: Report,

    pub model: String,

    /// ISO-8601 UTC timestamp.
    pub generated_at: String,

    pub tokens: Option<u64>,
    pub cost_usd: Option<f64>,
    pub runtime_sec: Option<f64>,

    #[serde(flatten)]
    pub metrics: RunMetrics,
}

impl RunReport {
    pub fn new(
        report: Report,
        model: String,
        generated_at: DateTime<Utc>,
        metadata: Option<GeneratorTotals>,
    ) -> Self {
        let metadata = metadata.unwrap_or_default();
        let metrics = RunMetrics::from_results(&report.results);
        Self {
            report,
            model,
            generated_at: format_timestamp(generated_at),
            tokens: metadata.tokens_total,
            cost_usd: metadata.cost_usd_total,
            runtime_sec: metadata.runtime_sec,
            metrics,
        }
    }

    /// Write the report as pretty-printed JSON, creating the parent directories.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn write(&self, path: &Path) -> Result {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create `{}`", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents).with_context(|| format!("failed to write `{}`", path.display()))?;
        info!("written");
        Ok(())
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct RunMetrics {
    /// Share of the results without an error.
    pub valid_rate: f64,

    /// Share of the valid results that passed every constraint.
    pub constraint_success_rate: f64,

    pub valid_cases: usize,
    pub total_cases: usize,
}

impl RunMetrics {
    pub fn from_results(results: &[Evaluation]) -> Self {
        let valid = results.iter().filter_map(Evaluation::breakdown).collect::<Vec<_>>();
        #[allow(clippy::float_cmp)]
        let n_compliant = valid
            .iter()
            .filter(|breakdown| breakdown.constraint_score == MAX_CONSTRAINT_SCORE)
            .count();
        Self {
            valid_rate: ratio(valid.len(), results.len()),
            constraint_success_rate: ratio(n_compliant, valid.len()),
            valid_cases: valid.len(),
            total_cases: results.len(),
        }
    }
}

#[expect(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        (numerator as f64 / denominator as f64 * 10_000.0).round() / 10_000.0
    }
}

/// Run totals recorded by the plan generator.
#[derive(Default, Deserialize)]
pub struct GeneratorTotals {
    pub tokens_total: Option<u64>,
    pub cost_usd_total: Option<f64>,
    pub runtime_sec: Option<f64>,
}

#[derive(Deserialize)]
struct GeneratorMetadata {
    totals: GeneratorTotals,
}

impl GeneratorTotals {
    /// Read the totals from the generator metadata file, if it exists.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            warn!("metadata file does not exist");
            return Ok(None);
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        Ok(Some(Self::parse(&contents)?))
    }

    fn parse(contents: &str) -> Result<Self> {
        let metadata: GeneratorMetadata =
            serde_json::from_str(contents).context("failed to parse the generator metadata")?;
        Ok(metadata.totals)
    }
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}
