use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// File if given, otherwise stdout.
pub fn open_output(output_file: Option<&Path>) -> Result<Box<dyn Write>> {
    match output_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

pub fn write_text(body: &str, output_file: Option<&Path>) -> Result<()> {
    let mut out = open_output(output_file)?;
    out.write_all(body.as_bytes())?;
    out.flush()?;

    if let Some(path) = output_file {
        eprintln!("💾 Saved {} bytes to {}", body.len(), path.display());
    }
    Ok(())
}
