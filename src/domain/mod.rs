//! Receipt types, the scoring rules, and the storage port.

pub mod identifier;
pub mod points;
pub mod ports;
pub mod receipt;
