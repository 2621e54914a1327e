use std::{fs, io::ErrorKind, path::Path};

use chrono::{DateTime, Utc};
use itertools::Itertools;

use crate::{prelude::*, report::format_timestamp};

pub const HEADER: &str = "model,avg_score,last_run";

/// Insert or replace the model row, keeping the other rows in place.
#[must_use]
pub fn upsert(existing: Option<&str>, model: &str, score: f64, now: DateTime<Utc>) -> String {
    let row = format!("{model},{score:.2},{}", format_timestamp(now));

    let mut lines = existing.unwrap_or_default().lines();
    let rows = match lines.next() {
        Some(header) if header.starts_with("model,avg_score") => {
            lines.filter(|line| !line.trim().is_empty()).collect_vec()
        }
        _ => Vec::new(),
    };

    let mut is_found = false;
    let mut rows = rows
        .into_iter()
        .map(|line| {
            if line.trim().split(',').next() == Some(model) {
                is_found = true;
                row.clone()
            } else {
                line.to_owned()
            }
        })
        .collect_vec();
    if !is_found {
        rows.push(row);
    }

    let mut contents = String::from(HEADER);
    contents.push('\n');
    for row in rows {
        contents.push_str(&row);
        contents.push('\n');
    }
    contents
}

/// Upsert the model score in the leaderboard file.
#[instrument(skip_all, fields(path = %path.display(), model = model))]
pub fn update(path: &Path, model: &str, score: f64) -> Result {
    let existing = match fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(error) if error.kind() == ErrorKind::NotFound => None,
        Err(error) => {
            return Err(error).with_context(|| format!("failed to read `{}`", path.display()));
        }
    };
    let contents = upsert(existing.as_deref(), model, score, Utc::now());
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write `{}`", path.display()))?;
    info!(score, "leaderboard updated");
    Ok(())
}
