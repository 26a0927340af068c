//! Stand-in OCR executables
//!
//! Real tesseract isn't available in CI, so tests install tiny shell scripts
//! that honour the same `<image> <output_base> ... pdf` calling convention.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

fn install_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write OCR script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make OCR script executable");
    path
}

/// Writes `<output_base>.pdf` containing every argument it was given
pub fn fake_ocr(dir: &Path) -> PathBuf {
    install_script(dir, "fake-ocr", r#"printf '%s\n' "$@" > "$2.pdf""#)
}

/// Prints to stderr and exits non-zero without producing anything
pub fn failing_ocr(dir: &Path) -> PathBuf {
    install_script(dir, "failing-ocr", "echo 'cannot read image' >&2\nexit 3")
}
