//! Common utilities for integration tests

#![allow(dead_code)]

pub mod cli;
pub mod ocr;

// Re-export commonly used items
pub use cli::{AutoscanCommand, CommandResult};
pub use ocr::{failing_ocr, fake_ocr};
