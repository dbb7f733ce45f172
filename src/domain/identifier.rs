use super::receipt::ReceiptId;
use uuid::Uuid;

/// Source of fresh receipt identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> ReceiptId;
}

pub type IdGeneratorBox = Box<dyn IdGenerator>;

/// Random (v4) UUIDs rendered as lowercase hyphenated text.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl UuidGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> ReceiptId {
        ReceiptId::new(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uuid_generator_format() {
        let id = UuidGenerator::new().generate();
        let parsed = Uuid::parse_str(id.as_str()).expect("id should be a UUID");
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(id.as_str(), id.as_str().to_lowercase());
    }

    #[test]
    fn test_uuid_generator_does_not_repeat() {
        let generator = UuidGenerator::new();
        let ids: HashSet<_> = (0..1000).map(|_| generator.generate()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
