//! Read-only reference data ("catalog") Trait

use serde::{Deserialize, Serialize};

/// A selectable option with a stable id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogOption {
    pub id: String,
    pub label: String,
}

impl CatalogOption {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Property type with its allowed subtypes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyTypeOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub subtypes: Vec<CatalogOption>,
}

/// Check-in method; some methods need written instructions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInMethodOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub requires_instructions: bool,
}

/// Stepper values offered for each capacity counter, ascending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityOptions {
    pub people: Vec<u32>,
    pub bedrooms: Vec<u32>,
    pub beds: Vec<u32>,
    pub bathrooms: Vec<u32>,
}

/// Catalog provider Trait
///
/// Supplies option sets that parameterize validation rules. The framework never
/// mutates catalog data.
pub trait CatalogProvider: Send + Sync {
    /// Check-in / checkout time slots in chronological order
    fn time_slots(&self) -> Vec<CatalogOption>;

    /// Property type taxonomy
    fn property_types(&self) -> Vec<PropertyTypeOption>;

    /// Cancellation policies
    fn cancellation_policies(&self) -> Vec<CatalogOption>;

    /// Check-in methods
    fn check_in_methods(&self) -> Vec<CheckInMethodOption>;

    /// Advance notice choices for availability
    fn advance_notice_options(&self) -> Vec<CatalogOption>;

    /// Capacity stepper values
    fn capacity_options(&self) -> CapacityOptions;
}
