use serde::{Deserialize, Serialize};

/// The fixed set of expense categories. The `expenses` table enforces the same set with a
/// `CHECK` constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
pub enum Category {
    #[default]
    Compulsory,
    Miscellaneous,
    Food,
    Grocery,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Compulsory,
        Category::Miscellaneous,
        Category::Food,
        Category::Grocery,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_matches_stored_text() {
        assert_eq!(Category::Compulsory.to_string(), "Compulsory");
        assert_eq!(Category::Grocery.to_string(), "Grocery");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Category::from_str("Food").unwrap(), Category::Food);
        assert!(Category::from_str("Invalid").is_err());
        assert!(Category::from_str("food").is_err());
    }

    #[test]
    fn test_default_is_compulsory() {
        assert_eq!(Category::default(), Category::Compulsory);
    }
}
