//! Ingestion and export orchestration services.

pub mod export;
pub mod ingest;
