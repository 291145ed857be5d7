mod extract;
mod output;

use std::path::Path;

use anyhow::{Context, Result};

use rowsift::{AssemblyConfig, ExtractConfig, Extractor, FragmentSource, JsonSource};

pub use extract::{cmd_lines, cmd_results, cmd_rows};

/// Build the extractor from the config file plus CLI overrides.
pub fn build_extractor(config_path: Option<&Path>, line_pitch: Option<f64>) -> Result<Extractor> {
    let mut config = match config_path {
        Some(path) => ExtractConfig::from_path(path)?,
        None => ExtractConfig::load_default()?,
    };
    if let Some(pitch) = line_pitch {
        config.assembly = AssemblyConfig::with_line_pitch(pitch)?;
    }
    Extractor::from_config(&config).context("invalid extraction config")
}

/// Open the fragment source for `input`, picked by file extension.
pub async fn open_source(input: &Path) -> Result<Box<dyn FragmentSource>> {
    let is_pdf = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        return open_pdf(input).await;
    }

    let source = JsonSource::open(input)?;
    Ok(Box::new(source))
}

#[cfg(feature = "pdf")]
async fn open_pdf(input: &Path) -> Result<Box<dyn FragmentSource>> {
    let source = rowsift::PdfSource::open(input).await?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "pdf"))]
#[allow(clippy::unused_async)]
async fn open_pdf(input: &Path) -> Result<Box<dyn FragmentSource>> {
    anyhow::bail!(
        "{}: PDF input needs rowsift built with `--features pdf`; pass a JSON fragment dump instead",
        input.display()
    )
}
