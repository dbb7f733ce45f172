use super::receipt::{ReceiptId, StoredReceipt};
use crate::error::Result;
use async_trait::async_trait;

/// Durable association of receipt identifiers with receipts and their scores.
///
/// `put` is all-or-nothing: the header, score, items and their links become
/// visible together or not at all. Readers never observe a partial record.
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    /// Persists a new receipt. Fails with `AlreadyExists` if the id is taken.
    async fn put(&self, receipt: StoredReceipt) -> Result<()>;
    async fn get_points(&self, id: &ReceiptId) -> Result<Option<i64>>;
    async fn get(&self, id: &ReceiptId) -> Result<Option<StoredReceipt>>;
    async fn exists(&self, id: &ReceiptId) -> Result<bool>;
}

pub type ReceiptStoreBox = Box<dyn ReceiptStore>;
