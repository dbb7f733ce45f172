use crate::domain::identifier::{IdGeneratorBox, UuidGenerator};
use crate::domain::points;
use crate::domain::ports::ReceiptStoreBox;
use crate::domain::receipt::{Receipt, ReceiptId, StoredReceipt};
use crate::error::{ReceiptError, Result};
use tracing::{info, warn};

/// Upper bound on fresh ids tried before giving up on an ingest.
pub const MAX_ID_ATTEMPTS: usize = 8;

/// The main entry point for ingesting receipts and querying their points.
///
/// `ReceiptProcessor` owns the storage backend. Points are computed once, at
/// ingest, and stored alongside the receipt; queries only read them back.
pub struct ReceiptProcessor {
    store: ReceiptStoreBox,
    ids: IdGeneratorBox,
}

impl ReceiptProcessor {
    /// Creates a processor that assigns random UUIDs.
    pub fn new(store: ReceiptStoreBox) -> Self {
        Self::with_id_generator(store, Box::new(UuidGenerator::new()))
    }

    pub fn with_id_generator(store: ReceiptStoreBox, ids: IdGeneratorBox) -> Self {
        Self { store, ids }
    }

    /// Scores and stores a receipt under a new id.
    ///
    /// The receipt is expected to have passed [`Receipt::validate`] already.
    pub async fn process(&self, receipt: Receipt) -> Result<ReceiptId> {
        let id = self.allocate_id().await?;
        let points = points::score(&receipt);

        self.store
            .put(StoredReceipt {
                id: id.clone(),
                receipt,
                points,
            })
            .await?;

        info!(%id, points, "processed receipt");
        Ok(id)
    }

    /// Returns the points stored for `id`.
    pub async fn points(&self, id: &ReceiptId) -> Result<i64> {
        self.store
            .get_points(id)
            .await?
            .ok_or_else(|| ReceiptError::NotFound(id.to_string()))
    }

    /// Returns the full stored receipt for `id`.
    pub async fn receipt(&self, id: &ReceiptId) -> Result<StoredReceipt> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ReceiptError::NotFound(id.to_string()))
    }

    async fn allocate_id(&self) -> Result<ReceiptId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.generate();
            if !self.store.exists(&id).await? {
                return Ok(id);
            }
            warn!(%id, "generated receipt id already in use, retrying");
        }
        Err(ReceiptError::persistence(format!(
            "could not allocate an unused receipt id in {MAX_ID_ATTEMPTS} attempts"
        )))
    }
}
