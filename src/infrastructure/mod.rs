//! Storage adapters implementing [`ReceiptStore`](crate::domain::ports::ReceiptStore).

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod sqlite;
