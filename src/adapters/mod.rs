// Adapters layer: concrete implementations for external systems (files, http, export).

pub mod export;
pub mod gemini;
pub mod ingest;
pub mod storage;
