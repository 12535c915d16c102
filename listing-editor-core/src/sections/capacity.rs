//! 容量区块（人数 / 卧室 / 床 / 卫生间）

use serde::{Deserialize, Serialize};

use crate::controller::{FormController, SectionForm};
use crate::error::CoreResult;
use crate::traits::{CatalogProvider, Messages};
use crate::types::{SectionSlug, Validation};
use crate::utils::rules::{Checks, CountRange};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityValues {
    #[serde(default)]
    pub people: u32,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub beds: u32,
    #[serde(default)]
    pub bathrooms: u32,
}

pub type CapacityDraft = CapacityValues;

/// 每个计数器的允许范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityRules {
    pub people: CountRange,
    pub bedrooms: CountRange,
    pub beds: CountRange,
    pub bathrooms: CountRange,
}

impl CapacityRules {
    /// 由 catalog 的步进值推导；catalog 为空时使用保守默认值
    pub fn from_catalog(catalog: &dyn CatalogProvider) -> Self {
        let options = catalog.capacity_options();
        Self {
            people: CountRange::from_steps(&options.people, CountRange::new(1, 16)),
            bedrooms: CountRange::from_steps(&options.bedrooms, CountRange::new(0, 50)),
            beds: CountRange::from_steps(&options.beds, CountRange::new(1, 50)),
            bathrooms: CountRange::from_steps(&options.bathrooms, CountRange::new(0, 50)),
        }
    }
}

/// 计数器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    People,
    Bedrooms,
    Beds,
    Bathrooms,
}

impl Counter {
    fn field(self) -> &'static str {
        match self {
            Self::People => "people",
            Self::Bedrooms => "bedrooms",
            Self::Beds => "beds",
            Self::Bathrooms => "bathrooms",
        }
    }

    fn slot(self, draft: &mut CapacityDraft) -> &mut u32 {
        match self {
            Self::People => &mut draft.people,
            Self::Bedrooms => &mut draft.bedrooms,
            Self::Beds => &mut draft.beds,
            Self::Bathrooms => &mut draft.bathrooms,
        }
    }
}

pub struct Capacity;

impl SectionForm for Capacity {
    const SLUG: SectionSlug = SectionSlug::Capacity;
    type Baseline = CapacityValues;
    type Draft = CapacityDraft;
    type Rules = CapacityRules;
    type Patch = CapacityValues;

    fn to_draft(baseline: Option<&CapacityValues>) -> CapacityDraft {
        baseline.cloned().unwrap_or_default()
    }

    fn validate(draft: &CapacityDraft, rules: &CapacityRules, messages: &dyn Messages) -> Validation {
        let mut checks = Checks::new(messages);
        checks.within("people", draft.people, rules.people);
        checks.within("bedrooms", draft.bedrooms, rules.bedrooms);
        checks.within("beds", draft.beds, rules.beds);
        checks.within("bathrooms", draft.bathrooms, rules.bathrooms);
        checks.finish()
    }

    fn build_patch(draft: &CapacityDraft, _rules: &CapacityRules) -> CapacityValues {
        draft.clone()
    }
}

impl FormController<Capacity> {
    pub fn set_count(&mut self, counter: Counter, value: u32) -> CoreResult<()> {
        self.edit(counter.field(), |d| *counter.slot(d) = value)
    }

    /// 步进器 +/-，在 0 处饱和
    pub fn step(&mut self, counter: Counter, delta: i32) -> CoreResult<()> {
        self.edit(counter.field(), |d| {
            let slot = counter.slot(d);
            *slot = slot.saturating_add_signed(delta);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SectionController;
    use crate::test_utils::{context, messages, FixedCatalog};
    use crate::traits::messages::keys;

    fn rules() -> CapacityRules {
        CapacityRules::from_catalog(&FixedCatalog)
    }

    #[test]
    fn zero_people_violates_minimum() {
        let baseline = CapacityValues {
            people: 2,
            bedrooms: 1,
            beds: 1,
            bathrooms: 1,
        };
        let mut c = FormController::<Capacity>::new(context(), Some(&baseline), rules(), messages());
        assert_eq!(rules().people, CountRange::new(1, 16));

        c.set_count(Counter::People, 0).unwrap();
        let Validation::Invalid(errors) = c.validate() else {
            panic!("expected invalid draft");
        };
        assert_eq!(
            errors.get("people"),
            Some(messages().format(keys::MIN, &[("min", "1")]).as_str())
        );
    }

    #[test]
    fn stepper_saturates_at_zero() {
        let mut c = FormController::<Capacity>::new(context(), None, rules(), messages());
        c.step(Counter::Bathrooms, -1).unwrap();
        assert_eq!(c.draft().bathrooms, 0);
        c.step(Counter::Beds, 2).unwrap();
        assert_eq!(c.draft().beds, 2);
    }

    #[test]
    fn above_catalog_maximum_is_rejected() {
        let mut c = FormController::<Capacity>::new(context(), None, rules(), messages());
        c.set_count(Counter::People, 17).unwrap();
        assert_eq!(c.field_error("people").as_deref(), Some("Must be at most 16"));
    }
}
