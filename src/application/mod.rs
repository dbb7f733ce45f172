//! Application layer containing the ingest/query orchestration.
//!
//! This module defines the `ReceiptProcessor` which acts as the primary entry point
//! for scoring receipts and reading their points back. It generates identifiers,
//! runs the scoring rules, and hands the finished record to a `ReceiptStore`.

pub mod processor;
