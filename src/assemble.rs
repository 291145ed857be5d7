//! Line reconstruction from positioned fragments.
//!
//! Page-description formats place text by absolute position with no
//! logical grouping, so visual lines are rebuilt from geometry alone:
//!
//! 1. Bucket fragments by `round(y / line_pitch)`.
//! 2. Order buckets top-to-bottom (y descending, bottom-up origin).
//! 3. Order fragments in a bucket left-to-right (x ascending).
//! 4. Join with single spaces, collapse whitespace runs, trim.
//! 5. Drop lines that end up empty.
//!
//! With the default pitch of 1.0 a bucket is the nearest integer `y`,
//! which absorbs sub-unit baseline jitter (superscripts, mixed fonts) but
//! merges distinct lines closer than one unit apart.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};
use crate::fragment::Fragment;

/// Default vertical tolerance for "same line", in page units.
pub const DEFAULT_LINE_PITCH: f64 = 1.0;

/// A reconstructed visual line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledLine {
    pub page: usize,
    pub y_bucket: i64,
    pub text: String,
}

/// Tunables for line bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Bucket height. Fragments whose `y / line_pitch` round to the same
    /// integer share a line.
    pub line_pitch: f64,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            line_pitch: DEFAULT_LINE_PITCH,
        }
    }
}

impl AssemblyConfig {
    pub fn with_line_pitch(line_pitch: f64) -> Result<Self> {
        let config = Self { line_pitch };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.line_pitch.is_finite() && self.line_pitch > 0.0 {
            Ok(())
        } else {
            Err(ExtractError::Config(format!(
                "line_pitch must be a positive number, got {}",
                self.line_pitch
            )))
        }
    }

    /// Line key for a baseline. Halves round up, so `-0.5` and `0.5`
    /// land in buckets 0 and 1.
    pub fn bucket(&self, y: f64) -> i64 {
        let y = finite_or_zero(y);
        (y / self.line_pitch + 0.5).floor() as i64
    }
}

/// Reconstruct the ordered lines of one page.
///
/// `fragments` must all belong to the same page; order is irrelevant.
/// Lines come out with strictly decreasing `y_bucket` and never empty.
pub fn assemble_page(fragments: &[Fragment], config: &AssemblyConfig) -> Vec<AssembledLine> {
    let Some(page) = fragments.first().map(|f| f.page) else {
        return Vec::new();
    };

    let mut buckets: BTreeMap<i64, Vec<&Fragment>> = BTreeMap::new();
    for frag in fragments {
        if !frag.x.is_finite() || !frag.y.is_finite() {
            tracing::warn!(page, text = %frag.text, "fragment without usable coordinates, placing at origin");
        }
        buckets.entry(config.bucket(frag.y)).or_default().push(frag);
    }

    let lines: Vec<AssembledLine> = buckets
        .into_iter()
        .rev()
        .filter_map(|(y_bucket, mut row)| {
            // Stable, so equal x keeps source order
            row.sort_by(|a, b| finite_or_zero(a.x).total_cmp(&finite_or_zero(b.x)));
            let joined = row
                .iter()
                .map(|f| f.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let text = normalize_whitespace(&joined);
            (!text.is_empty()).then_some(AssembledLine {
                page,
                y_bucket,
                text,
            })
        })
        .collect();

    tracing::debug!(page, fragments = fragments.len(), lines = lines.len(), "assembled page");
    lines
}

/// Collapse every whitespace run to one space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
