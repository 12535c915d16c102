//! 到达指南：入住方式

use serde::{Deserialize, Serialize};

use crate::controller::{FormController, SectionForm};
use crate::error::CoreResult;
use crate::traits::messages::keys;
use crate::traits::{CatalogProvider, CheckInMethodOption, Messages};
use crate::types::{SectionSlug, Validation};
use crate::utils::coerce::normalize_text;
use crate::utils::rules::Checks;

pub const MAX_INSTRUCTIONS_LEN: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInMethodValues {
    #[serde(default)]
    pub method_id: Option<String>,
    #[serde(default)]
    pub instructions: String,
}

pub type CheckInMethodDraft = CheckInMethodValues;

#[derive(Debug, Clone, Default)]
pub struct CheckInMethodRules {
    pub methods: Vec<CheckInMethodOption>,
}

impl CheckInMethodRules {
    pub fn from_catalog(catalog: &dyn CatalogProvider) -> Self {
        Self {
            methods: catalog.check_in_methods(),
        }
    }

    fn requires_instructions(&self, method_id: Option<&str>) -> bool {
        method_id.is_some_and(|id| {
            self.methods
                .iter()
                .any(|m| m.id == id && m.requires_instructions)
        })
    }
}

pub struct CheckInMethod;

impl SectionForm for CheckInMethod {
    const SLUG: SectionSlug = SectionSlug::CheckInMethod;
    type Baseline = CheckInMethodValues;
    type Draft = CheckInMethodDraft;
    type Rules = CheckInMethodRules;
    type Patch = CheckInMethodValues;

    fn to_draft(baseline: Option<&CheckInMethodValues>) -> CheckInMethodDraft {
        baseline.cloned().unwrap_or_default()
    }

    fn validate(
        draft: &CheckInMethodDraft,
        rules: &CheckInMethodRules,
        messages: &dyn Messages,
    ) -> Validation {
        let mut checks = Checks::new(messages);
        let method = draft.method_id.as_deref();
        checks.one_of("methodId", method, rules.methods.iter().map(|m| m.id.as_str()));

        if rules.requires_instructions(method) && draft.instructions.trim().is_empty() {
            checks.fail("instructions", keys::INSTRUCTIONS_REQUIRED, &[]);
        } else {
            checks.length("instructions", &draft.instructions, None, MAX_INSTRUCTIONS_LEN);
        }
        checks.finish()
    }

    fn build_patch(draft: &CheckInMethodDraft, _rules: &CheckInMethodRules) -> CheckInMethodValues {
        CheckInMethodValues {
            method_id: draft.method_id.clone(),
            instructions: normalize_text(&draft.instructions),
        }
    }
}

impl FormController<CheckInMethod> {
    pub fn set_method(&mut self, method_id: impl Into<String>) -> CoreResult<()> {
        let method_id = method_id.into();
        self.edit("methodId", |d| d.method_id = Some(method_id))
    }

    pub fn set_instructions(&mut self, text: impl Into<String>) -> CoreResult<()> {
        let text = text.into();
        self.edit("instructions", |d| d.instructions = text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SectionController;
    use crate::test_utils::{context, messages, FixedCatalog};

    fn controller() -> FormController<CheckInMethod> {
        FormController::new(
            context(),
            None,
            CheckInMethodRules::from_catalog(&FixedCatalog),
            messages(),
        )
    }

    #[test]
    fn lockbox_needs_instructions() {
        let mut c = controller();
        c.set_method("lockbox").unwrap();
        c.mark_submit_attempted();
        assert_eq!(
            c.field_error("instructions").as_deref(),
            Some("Add instructions for this check-in method")
        );

        c.set_instructions("Code 4411, box left of the gate").unwrap();
        assert!(c.validate().is_valid());
    }

    #[test]
    fn host_greeting_needs_no_instructions() {
        let mut c = controller();
        c.set_method("host-greets").unwrap();
        assert!(c.validate().is_valid());
    }
}
