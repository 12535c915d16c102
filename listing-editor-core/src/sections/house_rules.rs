//! 房屋守则区块
//!
//! 入住 / 退房时间取自 catalog 的时间段，按 catalog 顺序比较先后。

use serde::{Deserialize, Serialize};

use crate::controller::{FormController, SectionForm};
use crate::error::CoreResult;
use crate::traits::messages::keys;
use crate::traits::{CatalogOption, CatalogProvider, Messages};
use crate::types::{SectionSlug, Validation};
use crate::utils::coerce::normalize_text;
use crate::utils::rules::Checks;

pub const MAX_ADDITIONAL_RULES_LEN: usize = 1000;

const CHECKIN_START: &str = "checkInOut.checkinStartId";
const CHECKIN_END: &str = "checkInOut.checkinEndId";
const CHECKOUT: &str = "checkInOut.checkoutId";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInOut {
    #[serde(default)]
    pub checkin_start_id: Option<String>,
    /// 缺省表示"不限"
    #[serde(default)]
    pub checkin_end_id: Option<String>,
    #[serde(default)]
    pub checkout_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseRulesValues {
    #[serde(default)]
    pub pets_allowed: bool,
    #[serde(default)]
    pub smoking_allowed: bool,
    #[serde(default)]
    pub events_allowed: bool,
    #[serde(default)]
    pub additional_rules: String,
    #[serde(default)]
    pub check_in_out: CheckInOut,
}

pub type HouseRulesDraft = HouseRulesValues;

#[derive(Debug, Clone, Default)]
pub struct HouseRulesRules {
    /// 按时间先后排列
    pub time_slots: Vec<CatalogOption>,
}

impl HouseRulesRules {
    pub fn from_catalog(catalog: &dyn CatalogProvider) -> Self {
        Self {
            time_slots: catalog.time_slots(),
        }
    }

    fn position(&self, id: Option<&str>) -> Option<usize> {
        let id = id?;
        self.time_slots.iter().position(|slot| slot.id == id)
    }

    fn ids(&self) -> impl Iterator<Item = &str> {
        self.time_slots.iter().map(|slot| slot.id.as_str())
    }
}

/// 开关类守则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFlag {
    Pets,
    Smoking,
    Events,
}

pub struct HouseRules;

impl SectionForm for HouseRules {
    const SLUG: SectionSlug = SectionSlug::HouseRules;
    type Baseline = HouseRulesValues;
    type Draft = HouseRulesDraft;
    type Rules = HouseRulesRules;
    type Patch = HouseRulesValues;

    fn to_draft(baseline: Option<&HouseRulesValues>) -> HouseRulesDraft {
        baseline.cloned().unwrap_or_default()
    }

    fn validate(
        draft: &HouseRulesDraft,
        rules: &HouseRulesRules,
        messages: &dyn Messages,
    ) -> Validation {
        let mut checks = Checks::new(messages);
        let times = &draft.check_in_out;

        checks.one_of(CHECKIN_START, times.checkin_start_id.as_deref(), rules.ids());
        if times.checkin_end_id.is_some() {
            checks.one_of(CHECKIN_END, times.checkin_end_id.as_deref(), rules.ids());
        }
        checks.one_of(CHECKOUT, times.checkout_id.as_deref(), rules.ids());

        let start = rules.position(times.checkin_start_id.as_deref());
        let end = rules.position(times.checkin_end_id.as_deref());
        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                checks.fail_all(&[CHECKIN_START, CHECKIN_END], keys::CHECKIN_WINDOW, &[]);
            }
        }

        checks.length(
            "additionalRules",
            &draft.additional_rules,
            None,
            MAX_ADDITIONAL_RULES_LEN,
        );
        checks.finish()
    }

    fn build_patch(draft: &HouseRulesDraft, _rules: &HouseRulesRules) -> HouseRulesValues {
        HouseRulesValues {
            additional_rules: normalize_text(&draft.additional_rules),
            ..draft.clone()
        }
    }
}

impl FormController<HouseRules> {
    pub fn set_flag(&mut self, flag: RuleFlag, allowed: bool) -> CoreResult<()> {
        let field = match flag {
            RuleFlag::Pets => "petsAllowed",
            RuleFlag::Smoking => "smokingAllowed",
            RuleFlag::Events => "eventsAllowed",
        };
        self.edit(field, |d| match flag {
            RuleFlag::Pets => d.pets_allowed = allowed,
            RuleFlag::Smoking => d.smoking_allowed = allowed,
            RuleFlag::Events => d.events_allowed = allowed,
        })
    }

    pub fn set_additional_rules(&mut self, text: impl Into<String>) -> CoreResult<()> {
        let text = text.into();
        self.edit("additionalRules", |d| d.additional_rules = text)
    }

    pub fn set_checkin_start(&mut self, slot_id: impl Into<String>) -> CoreResult<()> {
        let slot_id = slot_id.into();
        self.edit(CHECKIN_START, |d| d.check_in_out.checkin_start_id = Some(slot_id))
    }

    /// `None` 表示入住不设截止时间
    pub fn set_checkin_end(&mut self, slot_id: Option<String>) -> CoreResult<()> {
        self.edit(CHECKIN_END, |d| d.check_in_out.checkin_end_id = slot_id)
    }

    pub fn set_checkout(&mut self, slot_id: impl Into<String>) -> CoreResult<()> {
        let slot_id = slot_id.into();
        self.edit(CHECKOUT, |d| d.check_in_out.checkout_id = Some(slot_id))
    }
}
