//! Batch ETL pipeline for song metadata and play event logs.
//!
//! Reads two roots of newline-delimited JSON files, reshapes the records
//! into a five-table star schema and loads them into a SQLite database,
//! committing once per input file.

pub mod config;
pub mod discovery;
pub mod pipeline;
pub mod records;
pub mod transform;
pub mod warehouse;

// Re-export commonly used types for convenience
pub use records::MalformedRecord;
pub use warehouse::Warehouse;
