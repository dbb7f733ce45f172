#![allow(dead_code)]

use rand::Rng;
use receipt_processor::domain::receipt::{Item, Receipt};

pub fn target_receipt() -> Receipt {
    Receipt {
        retailer: "Target".to_string(),
        purchase_date: "2022-01-01".to_string(),
        purchase_time: "13:01".to_string(),
        items: vec![
            Item::new("Mountain Dew 12PK", "6.49"),
            Item::new("Emils Cheese Pizza", "12.25"),
            Item::new("Knorr Creamy Chicken", "1.26"),
            Item::new("Doritos Nacho Cheese", "3.35"),
            Item::new("   Klarbrunn 12-PK 12 FL OZ  ", "12.00"),
        ],
        total: "35.35".to_string(),
    }
}

pub fn target_json() -> String {
    serde_json::to_string(&target_receipt()).expect("receipt serializes")
}

/// A receipt with `items` distinct lines, tagged with `tag` so item sets
/// from different receipts can be told apart.
pub fn tagged_receipt(tag: usize, items: usize) -> Receipt {
    Receipt {
        retailer: format!("Store {tag}"),
        purchase_date: "2022-03-20".to_string(),
        purchase_time: "14:33".to_string(),
        items: (0..items)
            .map(|i| Item::new(format!("receipt {tag} item {i}"), "2.25"))
            .collect(),
        total: format!("{}.25", items * 2),
    }
}

/// Generates a receipt with a mix of well-formed and malformed fields.
pub fn random_receipt<R: Rng>(rng: &mut R) -> Receipt {
    const WORDS: &[&str] = &["Target", "M&M", "Corner", "Market", "7-Eleven", "  ", "Café", "&"];
    const PRICES: &[&str] = &["1.25", "6.49", "12.00", "0.01", "abc", "", "3.5e1", "-2.00"];

    let retailer = (0..rng.gen_range(0..4))
        .map(|_| WORDS[rng.gen_range(0..WORDS.len())])
        .collect::<Vec<_>>()
        .join(" ");

    let items = (0..rng.gen_range(1..8))
        .map(|_| {
            let description = "x".repeat(rng.gen_range(0..10));
            let price = PRICES[rng.gen_range(0..PRICES.len())];
            Item::new(format!(" {description} "), price)
        })
        .collect();

    let total = if rng.gen_bool(0.1) {
        "n/a".to_string()
    } else {
        format!("{}.{:02}", rng.gen_range(0..100), rng.gen_range(0..100))
    };

    Receipt {
        retailer,
        purchase_date: format!("2022-{:02}-{:02}", rng.gen_range(1..13), rng.gen_range(1..29)),
        purchase_time: format!("{:02}:{:02}", rng.gen_range(0..24), rng.gen_range(0..60)),
        items,
        total,
    }
}
