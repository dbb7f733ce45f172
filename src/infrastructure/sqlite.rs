use crate::domain::ports::ReceiptStore;
use crate::domain::receipt::{Item, Receipt, ReceiptId, StoredReceipt};
use crate::error::{ReceiptError, Result};
use async_trait::async_trait;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS receipt (
    id            TEXT PRIMARY KEY,
    retailer      TEXT NOT NULL,
    purchase_date TEXT NOT NULL,
    purchase_time TEXT NOT NULL,
    total         TEXT NOT NULL,
    points        INTEGER NOT NULL,
    created_at    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS item (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    short_description TEXT NOT NULL,
    price             TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS receipt_item (
    receipt_id TEXT NOT NULL REFERENCES receipt(id) ON DELETE CASCADE,
    item_id    INTEGER NOT NULL REFERENCES item(id) ON DELETE CASCADE,
    position   INTEGER NOT NULL,
    PRIMARY KEY (receipt_id, item_id)
);
";

/// A relational receipt store backed by SQLite.
///
/// Receipts live in three tables: `receipt` (header and score), `item`, and
/// the `receipt_item` link table. Items are inserted fresh for every receipt,
/// never shared. Each `put` runs in one transaction.
///
/// This struct is thread-safe (`Clone` shares the underlying connection).
#[derive(Clone)]
pub struct SqliteReceiptStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteReceiptStore {
    /// Opens or creates a SQLite database at the specified path.
    ///
    /// Ensures that the `receipt`, `item` and `receipt_item` tables exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Opens a private database that lives as long as the store.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` against the connection on the blocking thread pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|_| ReceiptError::persistence("SQLite connection mutex poisoned"))?;
            f(&mut conn)
        })
        .await?
    }
}

fn insert_receipt(conn: &mut Connection, stored: &StoredReceipt) -> Result<()> {
    let tx = conn.transaction()?;

    let receipt = &stored.receipt;
    tx.execute(
        "INSERT INTO receipt (id, retailer, purchase_date, purchase_time, total, points)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            stored.id.as_str(),
            receipt.retailer,
            receipt.purchase_date,
            receipt.purchase_time,
            receipt.total,
            stored.points,
        ],
    )
    .map_err(|e| match e.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => ReceiptError::AlreadyExists(stored.id.to_string()),
        _ => ReceiptError::from(e),
    })?;

    for (position, item) in receipt.items.iter().enumerate() {
        tx.execute(
            "INSERT INTO item (short_description, price) VALUES (?1, ?2)",
            params![item.short_description, item.price],
        )?;
        let item_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO receipt_item (receipt_id, item_id, position) VALUES (?1, ?2, ?3)",
            params![stored.id.as_str(), item_id, position as i64],
        )?;
    }

    // Any early return above drops `tx`, which rolls it back.
    tx.commit()?;
    Ok(())
}

fn select_receipt(conn: &Connection, id: &ReceiptId) -> Result<Option<StoredReceipt>> {
    let header = conn
        .query_row(
            "SELECT retailer, purchase_date, purchase_time, total, points
             FROM receipt WHERE id = ?1",
            params![id.as_str()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            },
        )
        .optional()?;

    let Some((retailer, purchase_date, purchase_time, total, points)) = header else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT i.short_description, i.price
         FROM receipt_item ri
         JOIN item i ON i.id = ri.item_id
         WHERE ri.receipt_id = ?1
         ORDER BY ri.position",
    )?;
    let items = stmt
        .query_map(params![id.as_str()], |row| {
            Ok(Item::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(Some(StoredReceipt {
        id: id.clone(),
        receipt: Receipt {
            retailer,
            purchase_date,
            purchase_time,
            items,
            total,
        },
        points,
    }))
}

#[async_trait]
impl ReceiptStore for SqliteReceiptStore {
    async fn put(&self, receipt: StoredReceipt) -> Result<()> {
        debug!(id = %receipt.id, items = receipt.receipt.items.len(), "inserting receipt");
        self.with_conn(move |conn| insert_receipt(conn, &receipt))
            .await
    }

    async fn get_points(&self, id: &ReceiptId) -> Result<Option<i64>> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let points = conn
                .query_row(
                    "SELECT points FROM receipt WHERE id = ?1",
                    params![id.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(points)
        })
        .await
    }

    async fn get(&self, id: &ReceiptId) -> Result<Option<StoredReceipt>> {
        let id = id.clone();
        self.with_conn(move |conn| select_receipt(conn, &id)).await
    }

    async fn exists(&self, id: &ReceiptId) -> Result<bool> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let found = conn
                .query_row(
                    "SELECT 1 FROM receipt WHERE id = ?1",
                    params![id.as_str()],
                    |_| Ok(()),
                )
                .optional()?;
            Ok(found.is_some())
        })
        .await
    }
}
