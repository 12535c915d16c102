//! 到达指南：路线说明

use serde::{Deserialize, Serialize};

use crate::controller::{FormController, SectionForm};
use crate::error::CoreResult;
use crate::traits::Messages;
use crate::types::{SectionSlug, Validation};
use crate::utils::coerce::normalize_text;
use crate::utils::deep_eq::{ComparatorOverrides, FieldComparison};
use crate::utils::rules::Checks;

pub const MAX_DIRECTIONS_LEN: usize = 2000;
pub const MAX_PARKING_LEN: usize = 500;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsValues {
    #[serde(default)]
    pub directions: String,
    #[serde(default)]
    pub parking: String,
}

pub type DirectionsDraft = DirectionsValues;

pub struct Directions;

impl SectionForm for Directions {
    const SLUG: SectionSlug = SectionSlug::Directions;
    type Baseline = DirectionsValues;
    type Draft = DirectionsDraft;
    type Rules = ();
    type Patch = DirectionsValues;

    fn to_draft(baseline: Option<&DirectionsValues>) -> DirectionsDraft {
        baseline.cloned().unwrap_or_default()
    }

    fn comparators() -> &'static ComparatorOverrides {
        &[
            ("directions", FieldComparison::TrimmedText),
            ("parking", FieldComparison::TrimmedText),
        ]
    }

    fn validate(draft: &DirectionsDraft, _rules: &(), messages: &dyn Messages) -> Validation {
        let mut checks = Checks::new(messages);
        checks.length("directions", &draft.directions, None, MAX_DIRECTIONS_LEN);
        checks.length("parking", &draft.parking, None, MAX_PARKING_LEN);
        checks.finish()
    }

    fn build_patch(draft: &DirectionsDraft, _rules: &()) -> DirectionsValues {
        DirectionsValues {
            directions: normalize_text(&draft.directions),
            parking: normalize_text(&draft.parking),
        }
    }
}

impl FormController<Directions> {
    pub fn set_directions(&mut self, text: impl Into<String>) -> CoreResult<()> {
        let text = text.into();
        self.edit("directions", |d| d.directions = text)
    }

    pub fn set_parking(&mut self, text: impl Into<String>) -> CoreResult<()> {
        let text = text.into();
        self.edit("parking", |d| d.parking = text)
    }
}
