//! 可订日历区块

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::controller::{FormController, SectionForm};
use crate::error::CoreResult;
use crate::traits::messages::keys;
use crate::traits::{CatalogOption, CatalogProvider, Messages};
use crate::types::{SectionSlug, Validation};
use crate::utils::coerce::parse_whole;
use crate::utils::deep_eq::{ComparatorOverrides, FieldComparison};
use crate::utils::rules::{Checks, CountRange};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityValues {
    #[serde(default)]
    pub min_nights: Option<u32>,
    #[serde(default)]
    pub max_nights: Option<u32>,
    #[serde(default)]
    pub advance_notice_id: Option<String>,
    #[serde(default)]
    pub blocked_dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityDraft {
    pub min_nights: String,
    pub max_nights: String,
    pub advance_notice_id: Option<String>,
    /// 顺序无意义
    pub blocked_dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct AvailabilityRules {
    pub nights: CountRange,
    pub advance_notice: Vec<CatalogOption>,
}

impl AvailabilityRules {
    pub fn from_catalog(catalog: &dyn CatalogProvider) -> Self {
        Self {
            nights: CountRange::new(1, 365),
            advance_notice: catalog.advance_notice_options(),
        }
    }
}

pub struct Availability;

impl SectionForm for Availability {
    const SLUG: SectionSlug = SectionSlug::Availability;
    type Baseline = AvailabilityValues;
    type Draft = AvailabilityDraft;
    type Rules = AvailabilityRules;
    type Patch = AvailabilityValues;

    fn to_draft(baseline: Option<&AvailabilityValues>) -> AvailabilityDraft {
        let Some(b) = baseline else {
            return AvailabilityDraft::default();
        };
        AvailabilityDraft {
            min_nights: b.min_nights.map(|v| v.to_string()).unwrap_or_default(),
            max_nights: b.max_nights.map(|v| v.to_string()).unwrap_or_default(),
            advance_notice_id: b.advance_notice_id.clone(),
            blocked_dates: b.blocked_dates.clone(),
        }
    }

    fn comparators() -> &'static ComparatorOverrides {
        &[("blockedDates", FieldComparison::Unordered)]
    }

    fn validate(
        draft: &AvailabilityDraft,
        rules: &AvailabilityRules,
        messages: &dyn Messages,
    ) -> Validation {
        let mut checks = Checks::new(messages);
        let min = checks
            .whole("minNights", &draft.min_nights, true)
            .filter(|v| checks.within("minNights", *v, rules.nights));
        let max = checks
            .whole("maxNights", &draft.max_nights, false)
            .filter(|v| checks.within("maxNights", *v, rules.nights));
        if let (Some(min), Some(max)) = (min, max) {
            if max < min {
                checks.fail_all(&["minNights", "maxNights"], keys::MAX_NIGHTS_BELOW_MIN, &[]);
            }
        }
        checks.one_of(
            "advanceNoticeId",
            draft.advance_notice_id.as_deref(),
            rules.advance_notice.iter().map(|o| o.id.as_str()),
        );
        checks.finish()
    }

    fn build_patch(draft: &AvailabilityDraft, _rules: &AvailabilityRules) -> AvailabilityValues {
        let mut blocked_dates = draft.blocked_dates.clone();
        blocked_dates.sort_unstable();
        blocked_dates.dedup();
        AvailabilityValues {
            min_nights: parse_whole(&draft.min_nights),
            max_nights: parse_whole(&draft.max_nights),
            advance_notice_id: draft.advance_notice_id.clone(),
            blocked_dates,
        }
    }
}

impl FormController<Availability> {
    pub fn set_min_nights(&mut self, raw: impl Into<String>) -> CoreResult<()> {
        let raw = raw.into();
        self.edit("minNights", |d| d.min_nights = raw)
    }

    pub fn set_max_nights(&mut self, raw: impl Into<String>) -> CoreResult<()> {
        let raw = raw.into();
        self.edit("maxNights", |d| d.max_nights = raw)
    }

    pub fn set_advance_notice(&mut self, id: impl Into<String>) -> CoreResult<()> {
        let id = id.into();
        self.edit("advanceNoticeId", |d| d.advance_notice_id = Some(id))
    }

    /// 日历上点击某天：已屏蔽则恢复，否则屏蔽
    pub fn toggle_blocked_date(&mut self, date: NaiveDate) -> CoreResult<()> {
        self.edit("blockedDates", |d| {
            if let Some(pos) = d.blocked_dates.iter().position(|x| *x == date) {
                d.blocked_dates.remove(pos);
            } else {
                d.blocked_dates.push(date);
            }
        })
    }
}
