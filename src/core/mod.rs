// LogLens - core/mod.rs
//
// Core business logic layer: parsing, ingestion, filtering, rendering.
// Must NOT depend on: app, platform, or any network/filesystem I/O.

pub mod export;
pub mod filter;
pub mod ingest;
pub mod model;
pub mod parser;
pub mod pattern;
pub mod report;
