use crate::error::{ReceiptError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned to a receipt at ingest time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(String);

impl ReceiptId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReceiptId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ReceiptId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single purchased line. Prices stay in their submitted text form; the
/// scoring rules parse them on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub short_description: String,
    pub price: String,
}

impl Item {
    pub fn new(short_description: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            short_description: short_description.into(),
            price: price.into(),
        }
    }
}

/// A submitted purchase receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub retailer: String,
    /// `YYYY-MM-DD`
    pub purchase_date: String,
    /// `HH:MM`, 24-hour clock
    pub purchase_time: String,
    pub items: Vec<Item>,
    pub total: String,
}

impl Receipt {
    /// Checks that every required field is present and non-empty.
    ///
    /// Only presence is enforced here. Dates, times and amounts that do not
    /// parse are accepted and simply earn nothing from the rules that need them.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("retailer", &self.retailer),
            ("purchaseDate", &self.purchase_date),
            ("purchaseTime", &self.purchase_time),
            ("total", &self.total),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(ReceiptError::InvalidInput(format!("{field} is required")));
            }
        }

        if self.items.is_empty() {
            return Err(ReceiptError::InvalidInput(
                "items must contain at least one item".to_string(),
            ));
        }

        for (index, item) in self.items.iter().enumerate() {
            if item.short_description.is_empty() {
                return Err(ReceiptError::InvalidInput(format!(
                    "items[{index}].shortDescription is required"
                )));
            }
            if item.price.is_empty() {
                return Err(ReceiptError::InvalidInput(format!(
                    "items[{index}].price is required"
                )));
            }
        }

        Ok(())
    }
}

/// A receipt as persisted: identifier, submitted fields, and the score
/// computed at ingest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredReceipt {
    pub id: ReceiptId,
    #[serde(flatten)]
    pub receipt: Receipt,
    pub points: i64,
}
