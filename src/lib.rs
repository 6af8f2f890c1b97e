pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod ingest;
pub mod updater;
pub mod workbook;
