//! `rowsift` - rebuild and classify text rows from positioned page fragments
//!
//! Fixed-layout result sheets (per-stage match results and similar) carry
//! text only as positioned fragments. This crate rebuilds the visual lines
//! of each page and sorts them into section headers, stage headers,
//! legends and data rows, attaching the running section/stage to every row.
//!
//! # Modules
//!
//! - [`assemble`]: fragments → ordered lines, one page at a time
//! - [`classify`]: lines → [`OutputRecord`]s with running context
//! - [`rules`]: the pattern table driving classification
//! - [`pipeline`]: page-ordered runs over a [`FragmentSource`]
//! - [`results`]: data rows → competitor results / CSV
//!
//! # Example
//!
//! ```rust
//! use rowsift::{Extractor, Fragment, MemorySource, OutputRecord};
//!
//! # tokio_test::block_on(async {
//! let mut source = MemorySource::new(vec![vec![
//!     Fragment::new("Stage 2", 10.0, 700.0),
//!     Fragment::new("1 John Smith 95.5 12.30s", 10.0, 680.0),
//! ]]);
//! let records = Extractor::default().run(&mut source).await.unwrap();
//! assert!(matches!(&records[1], OutputRecord::DataRow { stage, .. } if stage == "Stage 2"));
//! # });
//! ```

pub mod assemble;
pub mod classify;
pub mod config;
pub mod error;
pub mod fragment;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod pipeline;
pub mod results;
pub mod rules;

pub use assemble::{assemble_page, normalize_whitespace, AssembledLine, AssemblyConfig};
pub use classify::{ClassificationContext, Classifier, ContextKind, OutputRecord};
pub use config::ExtractConfig;
pub use error::{ExtractError, Result};
pub use fragment::{Fragment, FragmentSource, JsonSource, MemorySource};
#[cfg(feature = "pdf")]
pub use pdf::PdfSource;
pub use pipeline::{plain_lines, Extractor};
pub use results::{collect_results, parse_result_line, write_csv, CompetitorResult};
pub use rules::{RuleAction, RuleSet, RuleSpec, SHORT_HEADER_MAX_LEN};

/// Version of rowsift
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
