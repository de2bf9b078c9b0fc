//! Product categories and the catalog's category filter.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when a string is not one of the known category labels.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category {0:?}; expected one of: Smart Locks, Digital Locks, Lock Cylinders, Door Hardware, General")]
pub struct CategoryError(pub String);

/// The fixed set of product categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Category {
    SmartLocks,
    DigitalLocks,
    LockCylinders,
    DoorHardware,
    #[default]
    General,
}

impl Category {
    /// All categories in the order the catalog shows them.
    pub const ALL: [Self; 5] = [
        Self::SmartLocks,
        Self::DigitalLocks,
        Self::LockCylinders,
        Self::DoorHardware,
        Self::General,
    ];

    /// The label used on the wire and in the UI.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SmartLocks => "Smart Locks",
            Self::DigitalLocks => "Digital Locks",
            Self::LockCylinders => "Lock Cylinders",
            Self::DoorHardware => "Door Hardware",
            Self::General => "General",
        }
    }

    /// Parse a label, matching case-insensitively and ignoring surrounding
    /// whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError`] if the label is not a known category.
    pub fn parse(label: &str) -> Result<Self, CategoryError> {
        let trimmed = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CategoryError(trimmed.to_owned()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Category {
    /// Missing, empty and unrecognised labels all fall back to
    /// [`Category::General`] so one odd record can't break a whole listing.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
            return Ok(Self::General);
        };
        Ok(Self::parse(&raw).unwrap_or_else(|e| {
            tracing::warn!(category = %e.0, "Unknown product category, using General");
            Self::General
        }))
    }
}

/// The catalog's category selector: everything, or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// The tabs offered by the catalog: "All" followed by every category.
    #[must_use]
    pub fn tabs() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(Category::ALL.into_iter().map(Self::Only))
            .collect()
    }

    /// Whether a product in `category` passes this filter.
    #[must_use]
    pub fn accepts(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }

    /// Label shown on the filter tab.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(category) => category.label(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryFilter {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Category::parse(s).map(Self::Only)
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        Self::Only(category)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!(Category::parse("Smart Locks").unwrap(), Category::SmartLocks);
        assert_eq!(Category::parse(" door hardware ").unwrap(), Category::DoorHardware);
        assert!(Category::parse("Padlocks").is_err());
    }

    #[test]
    fn test_label_roundtrip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.label()).unwrap(), category);
        }
    }

    #[test]
    fn test_deserialize_falls_back_to_general() {
        assert_eq!(
            serde_json::from_str::<Category>("\"Lock Cylinders\"").unwrap(),
            Category::LockCylinders
        );
        assert_eq!(serde_json::from_str::<Category>("\"\"").unwrap(), Category::General);
        assert_eq!(serde_json::from_str::<Category>("null").unwrap(), Category::General);
        assert_eq!(
            serde_json::from_str::<Category>("\"Garden Gnomes\"").unwrap(),
            Category::General
        );
    }

    #[test]
    fn test_serialize_uses_label() {
        assert_eq!(
            serde_json::to_string(&Category::DigitalLocks).unwrap(),
            "\"Digital Locks\""
        );
    }

    #[test]
    fn test_filter_tabs() {
        let tabs: Vec<&str> = CategoryFilter::tabs().iter().map(|t| t.label()).collect();
        assert_eq!(
            tabs,
            [
                "All",
                "Smart Locks",
                "Digital Locks",
                "Lock Cylinders",
                "Door Hardware",
                "General"
            ]
        );
    }

    #[test]
    fn test_filter_accepts() {
        assert!(CategoryFilter::All.accepts(Category::General));
        assert!(CategoryFilter::Only(Category::SmartLocks).accepts(Category::SmartLocks));
        assert!(!CategoryFilter::Only(Category::SmartLocks).accepts(Category::General));
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("All".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "Digital Locks".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::DigitalLocks)
        );
        assert!("nope".parse::<CategoryFilter>().is_err());
    }
}
