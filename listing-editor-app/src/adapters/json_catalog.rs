//! JSON 文件形式的参考数据目录

use std::path::Path;

use listing_editor_core::error::{CoreError, CoreResult};
use listing_editor_core::traits::{
    CapacityOptions, CatalogOption, CatalogProvider, CheckInMethodOption, PropertyTypeOption,
};
use serde::{Deserialize, Serialize};

/// Catalog loaded once from JSON; every option set is optional in the file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonCatalog {
    #[serde(default)]
    time_slots: Vec<CatalogOption>,
    #[serde(default)]
    property_types: Vec<PropertyTypeOption>,
    #[serde(default)]
    cancellation_policies: Vec<CatalogOption>,
    #[serde(default)]
    check_in_methods: Vec<CheckInMethodOption>,
    #[serde(default)]
    advance_notice: Vec<CatalogOption>,
    #[serde(default)]
    capacity: CapacityOptions,
}

impl JsonCatalog {
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CoreError::ConfigError(format!("Invalid catalog: {e}")))
    }

    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ConfigError(format!("Failed to read catalog {}: {e}", path.display()))
        })?;
        let catalog = Self::from_json(&text)?;
        log::debug!(
            "Loaded catalog from {}: {} property types, {} time slots",
            path.display(),
            catalog.property_types.len(),
            catalog.time_slots.len()
        );
        Ok(catalog)
    }
}

impl CatalogProvider for JsonCatalog {
    fn time_slots(&self) -> Vec<CatalogOption> {
        self.time_slots.clone()
    }

    fn property_types(&self) -> Vec<PropertyTypeOption> {
        self.property_types.clone()
    }

    fn cancellation_policies(&self) -> Vec<CatalogOption> {
        self.cancellation_policies.clone()
    }

    fn check_in_methods(&self) -> Vec<CheckInMethodOption> {
        self.check_in_methods.clone()
    }

    fn advance_notice_options(&self) -> Vec<CatalogOption> {
        self.advance_notice.clone()
    }

    fn capacity_options(&self) -> CapacityOptions {
        self.capacity.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_catalog() {
        let catalog = JsonCatalog::from_json(
            r#"{
                "propertyTypes": [
                    { "id": "house", "label": "House", "subtypes": [{ "id": "villa", "label": "Villa" }] }
                ],
                "checkInMethods": [{ "id": "lockbox", "label": "Lockbox", "requiresInstructions": true }],
                "capacity": { "people": [1, 2, 3], "bedrooms": [0, 1], "beds": [1], "bathrooms": [1] }
            }"#,
        )
        .unwrap();
        assert_eq!(catalog.property_types()[0].subtypes[0].id, "villa");
        assert!(catalog.check_in_methods()[0].requires_instructions);
        assert_eq!(catalog.capacity_options().people, vec![1, 2, 3]);
        assert!(catalog.time_slots().is_empty());
    }

    #[test]
    fn malformed_catalog_is_config_error() {
        assert!(matches!(
            JsonCatalog::from_json(r#"{ "timeSlots": 5 }"#),
            Err(CoreError::ConfigError(_))
        ));
    }
}
