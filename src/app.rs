use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use image::{ImageFormat, ImageReader};

use crate::annotate::{annotate, StrokeStyle};
use crate::cli::Cli;
use crate::detection::{detect_symbols, DetectHints, SymbolDetector};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Decode, detect, outline and save one image
///
/// Corner lines for each outlined symbol go to `out` when verbose. Returns
/// the path of the written PNG. Nothing is written if any symbol is malformed.
pub fn process(cli: &Cli, detector: &dyn SymbolDetector, out: &mut dyn Write) -> Result<PathBuf> {
    // Format comes from the file content, not its extension
    let img = ImageReader::open(&cli.file)
        .with_context(|| format!("Failed to open input file: {:?}", cli.file))?
        .with_guessed_format()
        .with_context(|| format!("Failed to read input file: {:?}", cli.file))?
        .decode()
        .with_context(|| format!("Failed to decode image: {:?}", cli.file))?;

    log::debug!("Loaded image: {:?} ({}x{})", cli.file, img.width(), img.height());

    let symbols = detect_symbols(&img, detector, &DetectHints::default())?;
    let annotation = annotate(&img.to_rgba8(), &symbols, &StrokeStyle::default());

    if cli.verbose {
        for outline in &annotation.outlines {
            writeln!(out, "{}", outline.quad).context("Failed to write symbol corners")?;
        }
    }

    let (image, outlines) = annotation.into_result()?;

    let output_path = cli.output_path();
    image
        .save_with_format(&output_path, ImageFormat::Png)
        .with_context(|| format!("Failed to save output: {:?}", output_path))?;

    log::debug!("Saved {} outline(s) to {:?}", outlines.len(), output_path);
    Ok(output_path)
}

/// Run [`process`] and report any failure on `err`; returns the exit status
pub fn run(
    cli: &Cli,
    detector: &dyn SymbolDetector,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> u8 {
    match process(cli, detector, out) {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            let _ = if cli.verbose {
                writeln!(err, "{:?}", e)
            } else {
                writeln!(err, "{}", e)
            };
            EXIT_FAILURE
        }
    }
}
