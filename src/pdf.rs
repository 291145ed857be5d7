//! PDF fragment source backed by `pdfium-render`.
//!
//! Each pdfium text segment becomes one [`Fragment`] positioned at the
//! segment's bottom-left corner, in PDF points with a bottom-up origin.
//! pdfium handles are not `Send`, so the whole document is read on a
//! blocking thread when the source is opened.

use std::path::Path;

use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use pdfium_render::prelude::*;

use crate::error::{ExtractError, Result};
use crate::fragment::{Fragment, FragmentSource, MemorySource};

/// Fragments read from a PDF file.
#[derive(Debug)]
pub struct PdfSource {
    inner: MemorySource,
}

impl PdfSource {
    /// Load every page's text segments.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let display = path.display().to_string();
        let pages = tokio::task::spawn_blocking(move || extract_fragments(&path))
            .await
            .map_err(|e| ExtractError::SourceUnavailable(format!("{display}: {e}")))?
            .map_err(|e| ExtractError::SourceUnavailable(format!("{display}: {e:#}")))?;
        tracing::debug!(path = %display, pages = pages.len(), "loaded PDF fragments");
        Ok(Self {
            inner: MemorySource::new(pages),
        })
    }
}

#[async_trait]
impl FragmentSource for PdfSource {
    fn page_count(&self) -> usize {
        self.inner.page_count()
    }

    async fn fetch_page(&mut self, page: usize) -> Result<Vec<Fragment>> {
        self.inner.fetch_page(page).await
    }
}

/// Extract positioned text segments, one list per page.
#[allow(deprecated)] // PdfRect field access deprecated in 0.8.28, removed in 0.9.0
fn extract_fragments(path: &Path) -> AnyResult<Vec<Vec<Fragment>>> {
    let pdfium = Pdfium::default();
    let doc = pdfium
        .load_pdf_from_file(path, None)
        .context("Failed to parse PDF")?;
    let mut pages = Vec::with_capacity(doc.pages().len() as usize);

    for (page_idx, page) in doc.pages().iter().enumerate() {
        let text = page.text().context("Failed to extract text from page")?;
        let fragments = text
            .segments()
            .iter()
            .map(|segment| {
                let rect = segment.bounds();
                Fragment {
                    text: segment.text(),
                    x: f64::from(rect.left.value),
                    y: f64::from(rect.bottom.value),
                    page: page_idx + 1,
                }
            })
            .collect();
        pages.push(fragments);
    }

    Ok(pages)
}
