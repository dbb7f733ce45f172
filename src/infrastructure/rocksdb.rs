use crate::domain::ports::ReceiptStore;
use crate::domain::receipt::{Item, Receipt, ReceiptId, StoredReceipt};
use crate::error::{ReceiptError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options, WriteBatch};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for receipt headers and their scores.
pub const CF_RECEIPTS: &str = "receipts";
/// Column Family for items, keyed by receipt id and position.
pub const CF_ITEMS: &str = "items";

#[derive(Serialize, Deserialize)]
struct ReceiptHeader {
    retailer: String,
    purchase_date: String,
    purchase_time: String,
    total: String,
    points: i64,
    item_count: usize,
}

/// A persistent store implementation using RocksDB.
///
/// The header goes to the `receipts` Column Family and each item to `items`
/// under `<id>\0<position>`. A receipt is written as one `WriteBatch`, so the
/// header and all its items land atomically.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbReceiptStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDbReceiptStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("receipts" and "items") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_receipts = ColumnFamilyDescriptor::new(CF_RECEIPTS, Options::default());
        let cf_items = ColumnFamilyDescriptor::new(CF_ITEMS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_receipts, cf_items])?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| ReceiptError::persistence(format!("{name} column family not found")))
    }

    fn header(&self, id: &ReceiptId) -> Result<Option<ReceiptHeader>> {
        let cf = self.cf(CF_RECEIPTS)?;
        match self.db.get_cf(cf, id.as_str().as_bytes())? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| ReceiptError::PersistenceError(Box::new(e))),
            None => Ok(None),
        }
    }

    fn items(&self, id: &ReceiptId) -> Result<Vec<Item>> {
        let cf = self.cf(CF_ITEMS)?;
        let prefix = item_prefix(id);

        let mut items = Vec::new();
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(&prefix, Direction::Forward));
        for entry in iter {
            let (key, value) = entry?;
            if !key.starts_with(&prefix) {
                break;
            }
            let item = serde_json::from_slice(&value)
                .map_err(|e| ReceiptError::PersistenceError(Box::new(e)))?;
            items.push(item);
        }
        Ok(items)
    }
}

fn item_prefix(id: &ReceiptId) -> Vec<u8> {
    let mut prefix = id.as_str().as_bytes().to_vec();
    prefix.push(0);
    prefix
}

fn item_key(id: &ReceiptId, position: u32) -> Vec<u8> {
    let mut key = item_prefix(id);
    key.extend_from_slice(&position.to_be_bytes());
    key
}

#[async_trait]
impl ReceiptStore for RocksDbReceiptStore {
    async fn put(&self, stored: StoredReceipt) -> Result<()> {
        // Serializes the existence check with the batch write
        let _guard = self.write_lock.lock().await;

        if self.header(&stored.id)?.is_some() {
            return Err(ReceiptError::AlreadyExists(stored.id.to_string()));
        }

        let cf_receipts = self.cf(CF_RECEIPTS)?;
        let cf_items = self.cf(CF_ITEMS)?;
        let receipt = &stored.receipt;

        let header = ReceiptHeader {
            retailer: receipt.retailer.clone(),
            purchase_date: receipt.purchase_date.clone(),
            purchase_time: receipt.purchase_time.clone(),
            total: receipt.total.clone(),
            points: stored.points,
            item_count: receipt.items.len(),
        };

        let mut batch = WriteBatch::default();
        let value =
            serde_json::to_vec(&header).map_err(|e| ReceiptError::PersistenceError(Box::new(e)))?;
        batch.put_cf(cf_receipts, stored.id.as_str().as_bytes(), value);

        for (position, item) in receipt.items.iter().enumerate() {
            let value =
                serde_json::to_vec(item).map_err(|e| ReceiptError::PersistenceError(Box::new(e)))?;
            batch.put_cf(cf_items, item_key(&stored.id, position as u32), value);
        }

        self.db.write(batch)?;
        Ok(())
    }

    async fn get_points(&self, id: &ReceiptId) -> Result<Option<i64>> {
        Ok(self.header(id)?.map(|header| header.points))
    }

    async fn get(&self, id: &ReceiptId) -> Result<Option<StoredReceipt>> {
        let Some(header) = self.header(id)? else {
            return Ok(None);
        };

        let items = self.items(id)?;
        if items.len() != header.item_count {
            return Err(ReceiptError::persistence(format!(
                "receipt {id} has {} items, expected {}",
                items.len(),
                header.item_count
            )));
        }

        Ok(Some(StoredReceipt {
            id: id.clone(),
            receipt: Receipt {
                retailer: header.retailer,
                purchase_date: header.purchase_date,
                purchase_time: header.purchase_time,
                items,
                total: header.total,
            },
            points: header.points,
        }))
    }

    async fn exists(&self, id: &ReceiptId) -> Result<bool> {
        let cf = self.cf(CF_RECEIPTS)?;
        // Just check if the key exists without retrieving the value
        let result = self.db.get_pinned_cf(cf, id.as_str().as_bytes())?;
        Ok(result.is_some())
    }
}
