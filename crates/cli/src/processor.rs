//! OCR processing of completed scans
//!
//! For every ready image:
//! 1. Run the OCR command to produce `<outbox>/<stem>.pdf`
//! 2. Move the image itself to `<outbox>/<file_name>`

use crate::config::OcrConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};
use watcher::CompletionHandler;

/// Where a processed scan ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedScan {
    pub image: PathBuf,
    pub pdf: PathBuf,
}

/// Completion handler that OCRs images into searchable PDFs
pub struct OcrProcessor {
    /// Destination for PDFs and moved images
    outbox: PathBuf,

    ocr: OcrConfig,
}

impl OcrProcessor {
    pub fn new(outbox: impl Into<PathBuf>, ocr: OcrConfig) -> Self {
        Self {
            outbox: outbox.into(),
            ocr,
        }
    }

    /// OCR `path` into the outbox and move it there
    pub fn process(&self, path: &Path) -> Result<ProcessedScan> {
        let file_name = path
            .file_name()
            .with_context(|| format!("No file name in {}", path.display()))?;

        let image = self.outbox.join(file_name);
        let output_base = image.with_extension("");
        let pdf = image.with_extension("pdf");

        self.run_ocr(path, &output_base)?;
        if !pdf.is_file() {
            anyhow::bail!(
                "OCR command '{}' did not produce {}",
                self.ocr.command,
                pdf.display()
            );
        }

        move_file(path, &image)?;

        Ok(ProcessedScan { image, pdf })
    }

    fn run_ocr(&self, input: &Path, output_base: &Path) -> Result<()> {
        let mut command = Command::new(&self.ocr.command);
        command.arg(input).arg(output_base);
        if let Some(ref language) = self.ocr.language {
            command.arg("-l").arg(language);
        }
        command.args(&self.ocr.extra_args).arg("pdf");

        debug!("Running {:?}", command);

        let output = command
            .output()
            .with_context(|| format!("Failed to run OCR command '{}'", self.ocr.command))?;

        if !output.status.success() {
            anyhow::bail!(
                "OCR command '{}' failed ({}): {}",
                self.ocr.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(())
    }
}

impl CompletionHandler for OcrProcessor {
    fn on_ready(&mut self, path: &Path) -> Result<()> {
        info!("Processing {}", path.display());
        let scan = self.process(path)?;
        info!("Wrote {} and moved image to {}", scan.pdf.display(), scan.image.display());
        Ok(())
    }
}

/// Rename, falling back to copy + remove across filesystems
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    fs::copy(from, to)
        .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
    fs::remove_file(from).with_context(|| format!("Failed to remove {}", from.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_move_file_renames() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let from = temp_dir.path().join("a.jpg");
        let to = temp_dir.path().join("b.jpg");
        fs::write(&from, b"jpeg")?;

        move_file(&from, &to)?;

        assert!(!from.exists());
        assert_eq!(fs::read(&to)?, b"jpeg");
        Ok(())
    }

    #[test]
    fn test_move_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = move_file(
            &temp_dir.path().join("missing.jpg"),
            &temp_dir.path().join("out.jpg"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_ocr_command_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let image = temp_dir.path().join("scan.jpg");
        fs::write(&image, b"jpeg").unwrap();

        let processor = OcrProcessor::new(
            temp_dir.path().join("out"),
            OcrConfig {
                command: "autoscan-no-such-ocr-binary".to_string(),
                ..OcrConfig::default()
            },
        );

        let err = processor.process(&image).unwrap_err();
        assert!(err.to_string().contains("Failed to run OCR command"));
        // Source image is left in place when OCR fails
        assert!(image.exists());
    }

    #[test]
    fn test_path_without_file_name_is_an_error() {
        let processor = OcrProcessor::new("/tmp", OcrConfig::default());
        assert!(processor.process(Path::new("/")).is_err());
    }
}
