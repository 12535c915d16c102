//! 地址区块（slug `address`）

use serde::{Deserialize, Serialize};

use crate::controller::{FormController, SectionForm};
use crate::error::CoreResult;
use crate::traits::messages::keys;
use crate::traits::Messages;
use crate::types::{SectionSlug, Validation};
use crate::utils::coerce::{normalize_optional, normalize_text};
use crate::utils::deep_eq::{ComparatorOverrides, FieldComparison};
use crate::utils::rules::Checks;

const MAX_LINE_LEN: usize = 120;
const MAX_POSTAL_CODE_LEN: usize = 12;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub apartment: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country_code: String,
}

/// 地图标记
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationValues {
    #[serde(default)]
    pub location_data: LocationData,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDraft {
    pub location_data: AddressDraft,
    pub coordinates: Option<Coordinates>,
}

/// 地址文本输入
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDraft {
    pub street: String,
    pub apartment: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country_code: String,
}

/// 地址字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    Street,
    Apartment,
    City,
    State,
    PostalCode,
    CountryCode,
}

impl AddressField {
    /// 错误 key（dot-path）
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Street => "locationData.street",
            Self::Apartment => "locationData.apartment",
            Self::City => "locationData.city",
            Self::State => "locationData.state",
            Self::PostalCode => "locationData.postalCode",
            Self::CountryCode => "locationData.countryCode",
        }
    }

    fn slot(self, draft: &mut AddressDraft) -> &mut String {
        match self {
            Self::Street => &mut draft.street,
            Self::Apartment => &mut draft.apartment,
            Self::City => &mut draft.city,
            Self::State => &mut draft.state,
            Self::PostalCode => &mut draft.postal_code,
            Self::CountryCode => &mut draft.country_code,
        }
    }
}

fn valid_country_code(code: &str) -> bool {
    let code = code.trim();
    code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic())
}

pub struct Location;

impl SectionForm for Location {
    const SLUG: SectionSlug = SectionSlug::Address;
    type Baseline = LocationValues;
    type Draft = LocationDraft;
    type Rules = ();
    type Patch = LocationValues;

    fn to_draft(baseline: Option<&LocationValues>) -> LocationDraft {
        let Some(b) = baseline else {
            return LocationDraft::default();
        };
        let data = &b.location_data;
        LocationDraft {
            location_data: AddressDraft {
                street: data.street.clone(),
                apartment: data.apartment.clone().unwrap_or_default(),
                city: data.city.clone(),
                state: data.state.clone(),
                postal_code: data.postal_code.clone(),
                country_code: data.country_code.clone(),
            },
            coordinates: b.coordinates,
        }
    }

    fn comparators() -> &'static ComparatorOverrides {
        &[
            ("locationData.street", FieldComparison::TrimmedText),
            ("locationData.apartment", FieldComparison::TrimmedText),
            ("locationData.city", FieldComparison::TrimmedText),
            ("locationData.state", FieldComparison::TrimmedText),
            ("locationData.postalCode", FieldComparison::TrimmedText),
        ]
    }

    fn validate(draft: &LocationDraft, _rules: &(), messages: &dyn Messages) -> Validation {
        let mut checks = Checks::new(messages);
        let data = &draft.location_data;

        for (field, text) in [(AddressField::Street, &data.street), (AddressField::City, &data.city)] {
            if checks.required(field.key(), text) {
                checks.length(field.key(), text, None, MAX_LINE_LEN);
            }
        }
        checks.length(AddressField::Apartment.key(), &data.apartment, None, MAX_LINE_LEN);
        checks.length(AddressField::State.key(), &data.state, None, MAX_LINE_LEN);
        checks.length(
            AddressField::PostalCode.key(),
            &data.postal_code,
            None,
            MAX_POSTAL_CODE_LEN,
        );

        let country = AddressField::CountryCode.key();
        if checks.required(country, &data.country_code) && !valid_country_code(&data.country_code)
        {
            checks.fail(country, keys::COUNTRY_CODE, &[]);
        }
        checks.finish()
    }

    fn build_patch(draft: &LocationDraft, _rules: &()) -> LocationValues {
        let data = &draft.location_data;
        LocationValues {
            location_data: LocationData {
                street: normalize_text(&data.street),
                apartment: normalize_optional(&data.apartment),
                city: normalize_text(&data.city),
                state: normalize_text(&data.state),
                postal_code: normalize_text(&data.postal_code),
                country_code: data.country_code.trim().to_ascii_uppercase(),
            },
            coordinates: draft.coordinates,
        }
    }
}

impl FormController<Location> {
    pub fn set_address_field(
        &mut self,
        field: AddressField,
        value: impl Into<String>,
    ) -> CoreResult<()> {
        let value = value.into();
        self.edit(field.key(), |d| *field.slot(&mut d.location_data) = value)
    }

    /// 地图上放置 / 移动标记
    pub fn set_coordinates(&mut self, coordinates: Option<Coordinates>) -> CoreResult<()> {
        self.edit("coordinates", |d| d.coordinates = coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SectionController;
    use crate::test_utils::{context, messages};
    use serde_json::json;

    fn filled() -> FormController<Location> {
        let baseline: LocationValues = serde_json::from_value(json!({
            "locationData": {
                "street": "Av. San Martin 123",
                "city": "Santa Cruz de la Sierra",
                "state": "Santa Cruz",
                "postalCode": "",
                "countryCode": "BO"
            },
            "coordinates": { "lat": -17.76, "lng": -63.19 }
        }))
        .unwrap();
        FormController::new(context(), Some(&baseline), (), messages())
    }

    #[test]
    fn city_error_uses_location_data_path() {
        let mut c = filled();
        c.set_address_field(AddressField::City, "   ").unwrap();
        assert_eq!(
            c.field_error("locationData.city").as_deref(),
            Some("This field is required")
        );
    }

    #[test]
    fn country_code_must_be_two_letters() {
        let mut c = filled();
        c.set_address_field(AddressField::CountryCode, "BOL").unwrap();
        assert_eq!(
            c.field_error("locationData.countryCode").as_deref(),
            Some("Use a two-letter country code")
        );
        c.set_address_field(AddressField::CountryCode, "bo").unwrap();
        assert!(c.validate().is_valid());
        assert_eq!(
            c.build_patch().unwrap().section()["locationData"]["countryCode"],
            "BO"
        );
    }

    #[test]
    fn blank_apartment_is_sent_as_null() {
        let c = filled();
        let patch = c.build_patch().unwrap();
        assert_eq!(patch.section()["locationData"]["apartment"], serde_json::Value::Null);
        assert_eq!(patch.slug(), SectionSlug::Address);
    }

    #[test]
    fn moving_the_pin_is_a_change() {
        let mut c = filled();
        c.set_coordinates(Some(Coordinates {
            lat: -17.77,
            lng: -63.18,
        }))
        .unwrap();
        assert!(c.is_dirty());
    }
}
