use crate::domain::ports::ReceiptStore;
use crate::domain::receipt::{ReceiptId, StoredReceipt};
use crate::error::{ReceiptError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory receipt store.
///
/// Uses `Arc<RwLock<HashMap<ReceiptId, StoredReceipt>>>` to allow shared concurrent access.
/// Each record is fully built before the write lock is taken and inserted in a
/// single step, so readers see either the whole receipt or nothing.
#[derive(Default, Clone)]
pub struct InMemoryReceiptStore {
    receipts: Arc<RwLock<HashMap<ReceiptId, StoredReceipt>>>,
}

impl InMemoryReceiptStore {
    /// Creates a new, empty in-memory receipt store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.receipts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.receipts.read().await.is_empty()
    }
}

#[async_trait]
impl ReceiptStore for InMemoryReceiptStore {
    async fn put(&self, receipt: StoredReceipt) -> Result<()> {
        let mut receipts = self.receipts.write().await;
        match receipts.entry(receipt.id.clone()) {
            Entry::Occupied(entry) => Err(ReceiptError::AlreadyExists(entry.key().to_string())),
            Entry::Vacant(entry) => {
                entry.insert(receipt);
                Ok(())
            }
        }
    }

    async fn get_points(&self, id: &ReceiptId) -> Result<Option<i64>> {
        let receipts = self.receipts.read().await;
        Ok(receipts.get(id).map(|stored| stored.points))
    }

    async fn get(&self, id: &ReceiptId) -> Result<Option<StoredReceipt>> {
        let receipts = self.receipts.read().await;
        Ok(receipts.get(id).cloned())
    }

    async fn exists(&self, id: &ReceiptId) -> Result<bool> {
        let receipts = self.receipts.read().await;
        Ok(receipts.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::receipt::{Item, Receipt};

    fn stored(id: &str, points: i64, items: usize) -> StoredReceipt {
        StoredReceipt {
            id: ReceiptId::from(id),
            receipt: Receipt {
                retailer: "Target".to_string(),
                purchase_date: "2022-01-01".to_string(),
                purchase_time: "13:01".to_string(),
                items: (0..items)
                    .map(|i| Item::new(format!("item {i}"), "1.00"))
                    .collect(),
                total: format!("{items}.00"),
            },
            points,
        }
    }

    #[tokio::test]
    async fn test_in_memory_put_and_get() {
        let store = InMemoryReceiptStore::new();
        let receipt = stored("r1", 28, 3);
        assert!(store.is_empty().await);

        store.put(receipt.clone()).await.unwrap();

        assert!(!store.is_empty().await);
        assert_eq!(store.len().await, 1);

        assert_eq!(store.get_points(&"r1".into()).await.unwrap(), Some(28));
        assert_eq!(store.get(&"r1".into()).await.unwrap(), Some(receipt));
        assert!(store.exists(&"r1".into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_in_memory_unknown_id() {
        let store = InMemoryReceiptStore::new();

        assert_eq!(store.get_points(&"missing".into()).await.unwrap(), None);
        assert_eq!(store.get_points(&"missing".into()).await.unwrap(), None);
        assert!(!store.exists(&"missing".into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_in_memory_rejects_duplicate_id() {
        let store = InMemoryReceiptStore::new();
        store.put(stored("r1", 28, 1)).await.unwrap();

        let result = store.put(stored("r1", 99, 2)).await;
        assert!(matches!(result, Err(ReceiptError::AlreadyExists(_))));

        // Original record is untouched
        assert_eq!(store.get_points(&"r1".into()).await.unwrap(), Some(28));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_in_memory_concurrent_puts() {
        let store = InMemoryReceiptStore::new();

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.put(stored(&format!("r{i}"), i, i as usize % 7)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.len().await, 50);
        for i in 0..50 {
            let receipt = store.get(&format!("r{i}").into()).await.unwrap().unwrap();
            assert_eq!(receipt.points, i);
            assert_eq!(receipt.receipt.items.len(), i as usize % 7);
        }
    }
}
