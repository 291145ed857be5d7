//! Row classification with running section/stage context.
//!
//! Headers and data share one top-to-bottom text stream, so each assembled
//! line is checked against the rule table in order. Header rules come
//! before discard rules: a header swallowed as noise would lose its
//! boundary, and one emitted as data would carry stale context.

use serde::{Deserialize, Serialize};

use crate::assemble::AssembledLine;
use crate::rules::{RuleAction, RuleSet};

/// The running (section, stage) pair for one extraction run.
///
/// Carries across pages. Empty until the first header of each kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationContext {
    pub current_section: String,
    pub current_stage: String,
}

/// Which part of the context a header updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    Section,
    Stage,
}

/// A classified line that survived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputRecord {
    ContextUpdate {
        kind: ContextKind,
        value: String,
        page: usize,
    },
    DataRow {
        line: String,
        section: String,
        stage: String,
        page: usize,
    },
}

impl OutputRecord {
    /// Line text for data rows, `None` for context updates.
    pub fn data_line(&self) -> Option<&str> {
        match self {
            Self::DataRow { line, .. } => Some(line),
            Self::ContextUpdate { .. } => None,
        }
    }

    pub fn page(&self) -> usize {
        match self {
            Self::ContextUpdate { page, .. } | Self::DataRow { page, .. } => *page,
        }
    }
}

/// Applies a [`RuleSet`] to assembled lines.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    rules: RuleSet,
}

impl Classifier {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Classify one line, updating `ctx` on section and stage headers.
    ///
    /// Returns `None` for discarded lines.
    pub fn classify(
        &self,
        line: &AssembledLine,
        ctx: &mut ClassificationContext,
    ) -> Option<OutputRecord> {
        let Some((rule, label)) = self.rules.first_match(&line.text) else {
            return Some(OutputRecord::DataRow {
                line: line.text.clone(),
                section: ctx.current_section.clone(),
                stage: ctx.current_stage.clone(),
                page: line.page,
            });
        };

        let kind = match rule.action {
            RuleAction::Discard => {
                tracing::trace!(rule = %rule.name, line = %line.text, "discarded");
                return None;
            }
            RuleAction::Section => {
                ctx.current_section.clone_from(&label);
                ContextKind::Section
            }
            RuleAction::Stage => {
                ctx.current_stage.clone_from(&label);
                ContextKind::Stage
            }
        };

        tracing::debug!(rule = %rule.name, value = %label, page = line.page, "context update");
        Some(OutputRecord::ContextUpdate {
            kind,
            value: label,
            page: line.page,
        })
    }
}
