//! Competitor results from classified data rows.
//!
//! Stage-results rows read
//! `rank points time hit_factor stage_points stage_percentage number name`,
//! e.g. `1 71 8.27 8.5852 75.0000 100.00 118 Wan, Chun Yin`. Rows that
//! don't fit that shape fall back to a looser token scan.

use std::io::Write;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classify::OutputRecord;
use crate::error::Result;

static ROW_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(\d+)\s+(\d+)\s+(\d+(?:\.\d{1,2})?)\s+(\d+\.\d{4})\s+(\d+\.\d{4})\s+(\d+(?:\.\d{1,2})?)\s+(\d+)\s+(.+?)\s*$",
    )
    .unwrap()
});

static NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").unwrap());
static TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+(?:\.\d{1,2})?$").unwrap());
static DIGITS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Stage number used when the stage label has none.
pub const DEFAULT_STAGE: &str = "1";

/// One competitor's result on one stage. Column order is the CSV order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorResult {
    pub competitor_number: String,
    pub competitor_name: String,
    pub stage: String,
    pub division: String,
    pub points: String,
    pub time: String,
    pub hit_factor: String,
    pub stage_points: String,
    pub stage_percentage: String,
}

/// Parse a data row.
///
/// Returns `None` when the line has no all-digit token to use as the
/// competitor number.
pub fn parse_result_line(line: &str, section: &str, stage: &str) -> Option<CompetitorResult> {
    let stage = stage_number(stage);
    let division = section.trim().to_string();

    if let Some(caps) = ROW_REGEX.captures(line) {
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str()).trim().to_string();
        return Some(CompetitorResult {
            competitor_number: group(7),
            competitor_name: group(8),
            stage,
            division,
            points: group(2),
            time: group(3),
            hit_factor: group(4),
            stage_points: group(5),
            stage_percentage: group(6),
        });
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let idx = tokens
        .iter()
        .rposition(|t| !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()))?;
    let token_if = |i: usize, re: &Regex| {
        tokens
            .get(i)
            .filter(|t| re.is_match(t))
            .map(ToString::to_string)
            .unwrap_or_default()
    };

    Some(CompetitorResult {
        competitor_number: tokens[idx].to_string(),
        competitor_name: tokens[idx + 1..].join(" "),
        stage,
        division,
        points: token_if(1, &NUMBER_REGEX),
        time: token_if(2, &TIME_REGEX),
        ..CompetitorResult::default()
    })
}

/// First digit run in a stage label, or [`DEFAULT_STAGE`].
pub fn stage_number(label: &str) -> String {
    DIGITS_REGEX
        .find(label)
        .map_or_else(|| DEFAULT_STAGE.to_string(), |m| m.as_str().to_string())
}

/// Parse every data row in `records`, skipping rows that don't parse.
pub fn collect_results(records: &[OutputRecord]) -> Vec<CompetitorResult> {
    let results: Vec<CompetitorResult> = records
        .iter()
        .filter_map(|record| match record {
            OutputRecord::DataRow {
                line,
                section,
                stage,
                ..
            } => parse_result_line(line, section, stage),
            OutputRecord::ContextUpdate { .. } => None,
        })
        .collect();
    tracing::debug!(results = results.len(), "parsed competitor results");
    results
}

/// Write results as CSV with a header row.
pub fn write_csv<W: Write>(writer: W, results: &[CompetitorResult]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if results.is_empty() {
        wtr.write_record([
            "competitor_number",
            "competitor_name",
            "stage",
            "division",
            "points",
            "time",
            "hit_factor",
            "stage_points",
            "stage_percentage",
        ])?;
    }
    for result in results {
        wtr.serialize(result)?;
    }
    wtr.flush()?;
    Ok(())
}
