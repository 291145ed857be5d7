//! Page-ordered extraction runs.
//!
//! # Pipeline
//!
//! ```text
//! source.fetch_page(1..=N) → assemble_page → Classifier::classify → records
//! ```
//!
//! Pages are requested strictly in ascending order and each page is fully
//! classified before the next is requested, since headers on one page
//! govern rows on the following ones.

use std::ops::ControlFlow;

use crate::assemble::{assemble_page, AssemblyConfig};
use crate::classify::{ClassificationContext, Classifier, OutputRecord};
use crate::config::ExtractConfig;
use crate::error::Result;
use crate::fragment::FragmentSource;

/// Assembler settings plus a classifier, reusable across runs.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    assembly: AssemblyConfig,
    classifier: Classifier,
}

impl Extractor {
    pub fn new(assembly: AssemblyConfig, classifier: Classifier) -> Self {
        Self {
            assembly,
            classifier,
        }
    }

    pub fn from_config(config: &ExtractConfig) -> Result<Self> {
        config.assembly.validate()?;
        Ok(Self::new(config.assembly, config.classifier()?))
    }

    /// Structured mode: every record, context updates included.
    pub async fn run(&self, source: &mut dyn FragmentSource) -> Result<Vec<OutputRecord>> {
        let mut records = Vec::new();
        self.run_with(source, |record| {
            records.push(record);
            ControlFlow::Continue(())
        })
        .await?;
        Ok(records)
    }

    /// Plain-line mode: data row text only, in order.
    pub async fn lines(&self, source: &mut dyn FragmentSource) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        self.run_with(source, |record| {
            if let OutputRecord::DataRow { line, .. } = record {
                lines.push(line);
            }
            ControlFlow::Continue(())
        })
        .await?;
        Ok(lines)
    }

    /// Stream records to `sink` as pages complete.
    ///
    /// Returning [`ControlFlow::Break`] stops the run after the current
    /// page; no further pages are requested. Returns the number of pages
    /// processed.
    pub async fn run_with<F>(&self, source: &mut dyn FragmentSource, mut sink: F) -> Result<usize>
    where
        F: FnMut(OutputRecord) -> ControlFlow<()>,
    {
        let page_count = source.page_count();
        let mut ctx = ClassificationContext::default();
        let mut emitted = 0usize;

        for page in 1..=page_count {
            let fragments = source.fetch_page(page).await?;
            let lines = assemble_page(&fragments, &self.assembly);

            let mut stop = false;
            for line in &lines {
                if let Some(record) = self.classifier.classify(line, &mut ctx) {
                    emitted += 1;
                    stop |= sink(record).is_break();
                }
            }

            if stop {
                tracing::info!(page, page_count, records = emitted, "run stopped by consumer");
                return Ok(page);
            }
        }

        tracing::info!(pages = page_count, records = emitted, "extraction complete");
        Ok(page_count)
    }
}

/// Flatten records to plain data lines, dropping context updates.
pub fn plain_lines(records: &[OutputRecord]) -> Vec<&str> {
    records.iter().filter_map(OutputRecord::data_line).collect()
}
