//! 取消政策区块

use serde::{Deserialize, Serialize};

use crate::controller::{FormController, SectionForm};
use crate::error::CoreResult;
use crate::traits::{CatalogOption, CatalogProvider, Messages};
use crate::types::{SectionSlug, Validation};
use crate::utils::rules::Checks;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationPolicyValues {
    #[serde(default)]
    pub policy_id: Option<String>,
}

pub type CancellationPolicyDraft = CancellationPolicyValues;

#[derive(Debug, Clone, Default)]
pub struct CancellationPolicyRules {
    pub policies: Vec<CatalogOption>,
}

impl CancellationPolicyRules {
    pub fn from_catalog(catalog: &dyn CatalogProvider) -> Self {
        Self {
            policies: catalog.cancellation_policies(),
        }
    }
}

pub struct CancellationPolicy;

impl SectionForm for CancellationPolicy {
    const SLUG: SectionSlug = SectionSlug::CancellationPolicy;
    type Baseline = CancellationPolicyValues;
    type Draft = CancellationPolicyDraft;
    type Rules = CancellationPolicyRules;
    type Patch = CancellationPolicyValues;

    fn to_draft(baseline: Option<&CancellationPolicyValues>) -> CancellationPolicyDraft {
        baseline.cloned().unwrap_or_default()
    }

    fn validate(
        draft: &CancellationPolicyDraft,
        rules: &CancellationPolicyRules,
        messages: &dyn Messages,
    ) -> Validation {
        let mut checks = Checks::new(messages);
        checks.one_of(
            "policyId",
            draft.policy_id.as_deref(),
            rules.policies.iter().map(|p| p.id.as_str()),
        );
        checks.finish()
    }

    fn build_patch(
        draft: &CancellationPolicyDraft,
        _rules: &CancellationPolicyRules,
    ) -> CancellationPolicyValues {
        draft.clone()
    }
}

impl FormController<CancellationPolicy> {
    pub fn set_policy(&mut self, policy_id: impl Into<String>) -> CoreResult<()> {
        let policy_id = policy_id.into();
        self.edit("policyId", |d| d.policy_id = Some(policy_id))
    }
}
