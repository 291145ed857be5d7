use std::path::Path;

use anyhow::{Context, Result};

use rowsift::{collect_results, write_csv, Extractor};

use super::open_source;
use super::output::{open_output, write_text};
use crate::OutputFormat;

/// Plain-line mode: data row text only.
pub async fn cmd_lines(extractor: &Extractor, input: &Path, output: Option<&Path>) -> Result<()> {
    let mut source = open_source(input).await?;
    let lines = extractor
        .lines(source.as_mut())
        .await
        .with_context(|| format!("failed to extract rows from {}", input.display()))?;

    let mut body = lines.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    write_text(&body, output)
}

/// Structured mode: every record with its context.
pub async fn cmd_rows(
    extractor: &Extractor,
    input: &Path,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let mut source = open_source(input).await?;
    let records = extractor
        .run(source.as_mut())
        .await
        .with_context(|| format!("failed to extract rows from {}", input.display()))?;

    let body = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&records)? + "\n",
        OutputFormat::Jsonl => records
            .iter()
            .map(|r| serde_json::to_string(r).map(|s| s + "\n"))
            .collect::<Result<String, _>>()?,
    };
    write_text(&body, output)
}

/// Competitor results as CSV.
pub async fn cmd_results(extractor: &Extractor, input: &Path, output: Option<&Path>) -> Result<()> {
    let mut source = open_source(input).await?;
    let records = extractor
        .run(source.as_mut())
        .await
        .with_context(|| format!("failed to extract rows from {}", input.display()))?;

    let results = collect_results(&records);
    if results.is_empty() {
        tracing::warn!(input = %input.display(), "no competitor results found");
    }

    let writer = open_output(output)?;
    write_csv(writer, &results).context("failed to write CSV")?;
    if let Some(path) = output {
        eprintln!("💾 Saved {} results to {}", results.len(), path.display());
    }
    Ok(())
}
