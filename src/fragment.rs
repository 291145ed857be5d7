//! Positioned text fragments and the sources that supply them.
//!
//! A [`FragmentSource`] hands out the fragments of one page at a time.
//! Fragments within a page carry no ordering; the assembler imposes it.
//!
//! # Example
//!
//! ```rust
//! use rowsift::fragment::{Fragment, FragmentSource, MemorySource};
//!
//! # tokio_test::block_on(async {
//! let mut source = MemorySource::new(vec![vec![Fragment::new("Stage 1", 10.0, 700.0)]]);
//! assert_eq!(source.page_count(), 1);
//! let page = source.fetch_page(1).await.unwrap();
//! assert_eq!(page[0].page, 1);
//! # });
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ExtractError, Result};

/// A span of text placed at a page position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    /// Left edge. Increases left to right.
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub x: f64,
    /// Baseline. Increases bottom to top.
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub y: f64,
    /// Page index (1-based).
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: usize,
}

/// Highest page number accepted from a flat dump. pdfium addresses pages
/// with a `u16`, so no real document goes past it.
pub const MAX_PAGE: usize = u16::MAX as usize;

/// Numbers (or numeric strings) as-is; `null` and anything else as `0.0`.
///
/// Renderers write `NaN` coordinates as `null`, and one bad fragment must
/// not sink the whole dump.
fn lenient_coordinate<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let coord = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(coord.unwrap_or_else(|| {
        tracing::warn!(%value, "unusable fragment coordinate, using 0");
        0.0
    }))
}

fn lenient_page<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0))
}

impl Fragment {
    /// Fragment on page 1.
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            page: 1,
        }
    }

    #[must_use]
    pub fn on_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }
}

/// Supplies the fragments of a loaded document, one page per request.
///
/// Callers request pages in ascending order starting at 1. A failed fetch
/// is fatal to the run.
#[async_trait]
pub trait FragmentSource: Send {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Fragments for `page` (1-based), in no particular order.
    async fn fetch_page(&mut self, page: usize) -> Result<Vec<Fragment>>;
}

/// In-memory pages, already split.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<Vec<Fragment>>,
}

impl MemorySource {
    /// Build from page-ordered fragment lists. Page numbers on the
    /// fragments are overwritten with their list position.
    pub fn new(pages: Vec<Vec<Fragment>>) -> Self {
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(idx, page)| {
                page.into_iter()
                    .map(|frag| frag.on_page(idx + 1))
                    .collect()
            })
            .collect();
        Self { pages }
    }

    /// Build from a flat list, splitting on each fragment's `page` field.
    ///
    /// Page 0 is treated as page 1. Pages with no fragments between the
    /// first and the highest page number are kept as empty pages. Page
    /// numbers above [`MAX_PAGE`] are rejected.
    pub fn from_flat(fragments: Vec<Fragment>) -> Result<Self> {
        if let Some(frag) = fragments.iter().find(|f| f.page > MAX_PAGE) {
            return Err(ExtractError::SourceUnavailable(format!(
                "fragment '{}' claims page {}, above the {MAX_PAGE} page limit",
                frag.text, frag.page
            )));
        }

        let mut grouped: BTreeMap<usize, Vec<Fragment>> = BTreeMap::new();
        for frag in fragments {
            let page = frag.page.max(1);
            grouped.entry(page).or_default().push(frag.on_page(page));
        }

        let count = grouped.keys().next_back().copied().unwrap_or(0);
        let mut pages = vec![Vec::new(); count];
        for (page, frags) in grouped {
            pages[page - 1] = frags;
        }
        Ok(Self { pages })
    }
}

#[async_trait]
impl FragmentSource for MemorySource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    async fn fetch_page(&mut self, page: usize) -> Result<Vec<Fragment>> {
        let count = self.pages.len();
        if page == 0 || page > count {
            return Err(ExtractError::PageOutOfRange { page, count });
        }
        Ok(std::mem::take(&mut self.pages[page - 1]))
    }
}

/// On-disk layout of a fragment dump.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FragmentDump {
    /// `[{ "text": .., "x": .., "y": .., "page": .. }, ...]`
    Flat(Vec<Fragment>),
    /// `{ "pages": [[{ "text": .., "x": .., "y": .. }, ...], ...] }`
    Paged { pages: Vec<Vec<Fragment>> },
}

/// Fragments read from a JSON dump produced by an external renderer.
#[derive(Debug)]
pub struct JsonSource {
    inner: MemorySource,
}

impl JsonSource {
    /// Load and parse the dump. A missing or unparseable file means the
    /// source is unavailable.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExtractError::SourceUnavailable(format!("failed to read {}: {e}", path.display()))
        })?;
        let inner = Self::parse(&content).map_err(|e| {
            ExtractError::SourceUnavailable(format!("invalid fragment JSON in {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), pages = inner.page_count(), "loaded fragment dump");
        Ok(Self { inner })
    }

    fn parse(content: &str) -> Result<MemorySource> {
        let dump: FragmentDump = serde_json::from_str(content)?;
        Ok(match dump {
            FragmentDump::Flat(fragments) => MemorySource::from_flat(fragments)?,
            FragmentDump::Paged { pages } => MemorySource::new(pages),
        })
    }
}

#[async_trait]
impl FragmentSource for JsonSource {
    fn page_count(&self) -> usize {
        self.inner.page_count()
    }

    async fn fetch_page(&mut self, page: usize) -> Result<Vec<Fragment>> {
        self.inner.fetch_page(page).await
    }
}
