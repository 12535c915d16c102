//! 价格区块
//!
//! 草稿保留原始输入文本；数值在校验与构建 patch 时以同一方式解析。

use serde::{Deserialize, Serialize};

use crate::controller::{FormController, SectionForm};
use crate::error::CoreResult;
use crate::traits::messages::keys;
use crate::traits::Messages;
use crate::types::{SectionSlug, Validation};
use crate::utils::coerce::parse_whole;
use crate::utils::rules::{Checks, CountRange};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceValues {
    #[serde(default)]
    pub base_price: Option<u32>,
    #[serde(default)]
    pub weekend_price: Option<u32>,
    #[serde(default)]
    pub discounts_enabled: bool,
    #[serde(default)]
    pub weekly_pct: Option<u32>,
    #[serde(default)]
    pub monthly_pct: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDraft {
    pub base_price: String,
    pub weekend_price: String,
    pub discounts_enabled: bool,
    pub weekly_pct: String,
    pub monthly_pct: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRules {
    /// 每晚价格范围
    pub nightly: CountRange,
    /// 折扣百分比范围
    pub discount: CountRange,
}

impl Default for PriceRules {
    fn default() -> Self {
        Self {
            nightly: CountRange::new(10, 10_000),
            discount: CountRange::new(0, 99),
        }
    }
}

fn optional_text(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub struct Price;

impl SectionForm for Price {
    const SLUG: SectionSlug = SectionSlug::Price;
    type Baseline = PriceValues;
    type Draft = PriceDraft;
    type Rules = PriceRules;
    type Patch = PriceValues;

    fn to_draft(baseline: Option<&PriceValues>) -> PriceDraft {
        let Some(b) = baseline else {
            return PriceDraft::default();
        };
        PriceDraft {
            base_price: optional_text(b.base_price),
            weekend_price: optional_text(b.weekend_price),
            discounts_enabled: b.discounts_enabled,
            weekly_pct: optional_text(b.weekly_pct),
            monthly_pct: optional_text(b.monthly_pct),
        }
    }

    fn validate(draft: &PriceDraft, rules: &PriceRules, messages: &dyn Messages) -> Validation {
        let mut checks = Checks::new(messages);

        if let Some(base) = checks.whole("basePrice", &draft.base_price, true) {
            checks.within("basePrice", base, rules.nightly);
        }
        if let Some(weekend) = checks.whole("weekendPrice", &draft.weekend_price, false) {
            checks.within("weekendPrice", weekend, rules.nightly);
        }

        if draft.discounts_enabled {
            let weekly = checks
                .whole("weeklyPct", &draft.weekly_pct, true)
                .filter(|v| checks.within("weeklyPct", *v, rules.discount));
            let monthly = checks
                .whole("monthlyPct", &draft.monthly_pct, true)
                .filter(|v| checks.within("monthlyPct", *v, rules.discount));
            if let (Some(weekly), Some(monthly)) = (weekly, monthly) {
                if monthly < weekly {
                    checks.fail_all(&["weeklyPct", "monthlyPct"], keys::MONTHLY_BELOW_WEEKLY, &[]);
                }
            }
        }
        checks.finish()
    }

    fn build_patch(draft: &PriceDraft, _rules: &PriceRules) -> PriceValues {
        let discount = |raw: &str| {
            if draft.discounts_enabled {
                parse_whole(raw)
            } else {
                None
            }
        };
        PriceValues {
            base_price: parse_whole(&draft.base_price),
            weekend_price: parse_whole(&draft.weekend_price),
            discounts_enabled: draft.discounts_enabled,
            weekly_pct: discount(&draft.weekly_pct),
            monthly_pct: discount(&draft.monthly_pct),
        }
    }
}

impl FormController<Price> {
    pub fn set_base_price(&mut self, raw: impl Into<String>) -> CoreResult<()> {
        let raw = raw.into();
        self.edit("basePrice", |d| d.base_price = raw)
    }

    pub fn set_weekend_price(&mut self, raw: impl Into<String>) -> CoreResult<()> {
        let raw = raw.into();
        self.edit("weekendPrice", |d| d.weekend_price = raw)
    }

    pub fn set_discounts_enabled(&mut self, enabled: bool) -> CoreResult<()> {
        self.edit("discountsEnabled", |d| d.discounts_enabled = enabled)
    }

    pub fn set_weekly_discount(&mut self, raw: impl Into<String>) -> CoreResult<()> {
        let raw = raw.into();
        self.edit("weeklyPct", |d| d.weekly_pct = raw)
    }

    /// 月折扣不得低于周折扣：低于时抬高到周折扣并留下提示
    pub fn set_monthly_discount(&mut self, raw: impl Into<String>) -> CoreResult<()> {
        let raw = raw.into();
        let weekly = if self.draft().discounts_enabled {
            parse_whole(&self.draft().weekly_pct)
        } else {
            None
        };
        let raised = match (weekly, parse_whole(&raw)) {
            (Some(weekly), Some(monthly)) if monthly < weekly => Some(weekly),
            _ => None,
        };

        let value = raised.map_or(raw, |weekly| weekly.to_string());
        self.edit("monthlyPct", |d| d.monthly_pct = value)?;
        if let Some(weekly) = raised {
            let hint = self
                .messages()
                .format(keys::MONTHLY_DISCOUNT_RAISED, &[("min", &weekly.to_string())]);
            self.set_notice("monthlyPct", hint);
        }
        Ok(())
    }
}
