use receipt_processor::application::processor::ReceiptProcessor;
use receipt_processor::domain::ports::ReceiptStoreBox;
use receipt_processor::domain::receipt::ReceiptId;
use receipt_processor::infrastructure::in_memory::InMemoryReceiptStore;
use receipt_processor::infrastructure::sqlite::SqliteReceiptStore;
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::tempdir;

mod common;

async fn ingest_concurrently(store: ReceiptStoreBox) {
    let processor = Arc::new(ReceiptProcessor::new(store));

    let handles: Vec<_> = (0..32)
        .map(|tag| {
            let processor = Arc::clone(&processor);
            tokio::spawn(async move {
                let receipt = common::tagged_receipt(tag, 1 + tag % 6);
                let id = processor.process(receipt.clone()).await.unwrap();
                (id, receipt)
            })
        })
        .collect();

    let mut ingested: Vec<(ReceiptId, _)> = Vec::new();
    for handle in handles {
        ingested.push(handle.await.unwrap());
    }

    let ids: HashSet<_> = ingested.iter().map(|(id, _)| id.clone()).collect();
    assert_eq!(ids.len(), ingested.len(), "ids must be unique");

    for (id, receipt) in ingested {
        let stored = processor.receipt(&id).await.unwrap();
        assert_eq!(stored.receipt, receipt, "item set of {id} was mixed up");
        assert_eq!(processor.points(&id).await.unwrap(), stored.points);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ingest_in_memory() {
    ingest_concurrently(Box::new(InMemoryReceiptStore::new())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ingest_sqlite() {
    let dir = tempdir().unwrap();
    let store = SqliteReceiptStore::open(dir.path().join("receipts.db")).unwrap();
    ingest_concurrently(Box::new(store)).await;
}

#[tokio::test]
async fn test_store_as_trait_object_across_tasks() {
    let store: ReceiptStoreBox = Box::new(InMemoryReceiptStore::new());
    let processor = ReceiptProcessor::new(store);

    // Verify Send + Sync by moving the processor into a spawned task
    let handle = tokio::spawn(async move {
        let id = processor.process(common::target_receipt()).await.unwrap();
        processor.points(&id).await.unwrap()
    });

    assert_eq!(handle.await.unwrap(), 28);
}
