//! The fixed journal entry category enumeration.
//!
//! Both create and update reject any value outside this set.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A journal entry category.
///
/// Serialized with its display name (e.g. `"Scenic Views"`) so the stored
/// value matches what clients render in pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Wildlife,
    Plants,
    #[serde(rename = "Scenic Views")]
    ScenicViews,
    Weather,
    Birds,
    Geology,
    #[serde(rename = "Water Bodies")]
    WaterBodies,
}

/// Every valid category, in display order.
pub const ALL_CATEGORIES: &[Category] = &[
    Category::Wildlife,
    Category::Plants,
    Category::ScenicViews,
    Category::Weather,
    Category::Birds,
    Category::Geology,
    Category::WaterBodies,
];

impl Category {
    /// The display name, also the persisted form.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Wildlife => "Wildlife",
            Category::Plants => "Plants",
            Category::ScenicViews => "Scenic Views",
            Category::Weather => "Weather",
            Category::Birds => "Birds",
            Category::Geology => "Geology",
            Category::WaterBodies => "Water Bodies",
        }
    }

    /// Parse a submitted category string, rejecting anything outside the
    /// enumeration. Matching is exact: category names are not free text.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        ALL_CATEGORIES
            .iter()
            .copied()
            .find(|c| c.as_str() == value)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid category '{value}'. Must be one of: {}",
                    ALL_CATEGORIES
                        .iter()
                        .map(|c| c.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
