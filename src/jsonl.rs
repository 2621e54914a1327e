use std::{fs, path::Path};

use serde_json::Value;

use crate::prelude::*;

/// Load one JSON record per non-blank line.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<Vec<Value>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read `{}`", path.display()))?;
    let records = parse(&contents).with_context(|| format!("failed to parse `{}`", path.display()))?;
    info!(n_records = records.len(), "loaded");
    Ok(records)
}

fn parse(contents: &str) -> Result<Vec<Value>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).with_context(|| format!("invalid JSON on line {}", index + 1))
        })
        .collect()
}
