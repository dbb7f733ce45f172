use crate::domain::receipt::Receipt;
use crate::error::{ReceiptError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Reads a single receipt from a JSON source.
///
/// The document must carry every required field (camelCase names) and pass
/// [`Receipt::validate`]; anything else is reported as `InvalidInput`.
pub struct ReceiptReader<R: Read> {
    source: R,
}

impl<R: Read> ReceiptReader<R> {
    /// Creates a new `ReceiptReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Consumes the reader and returns the validated receipt.
    pub fn receipt(self) -> Result<Receipt> {
        let receipt: Receipt = serde_json::from_reader(self.source)
            .map_err(|e| ReceiptError::InvalidInput(e.to_string()))?;
        receipt.validate()?;
        Ok(receipt)
    }
}

impl ReceiptReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}
