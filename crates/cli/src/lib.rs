//! Autoscan: OCR every JPEG written into a folder

pub mod config;
pub mod daemon;
pub mod logging;
pub mod processor;
