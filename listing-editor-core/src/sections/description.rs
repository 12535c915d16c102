//! 描述区块
//!
//! 描述文本中不允许出现联系方式（邮箱、电话、链接）。

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::controller::{FormController, SectionForm};
use crate::error::CoreResult;
use crate::traits::messages::keys;
use crate::traits::Messages;
use crate::types::{SectionSlug, Validation};
use crate::utils::coerce::normalize_text;
use crate::utils::rules::Checks;

static CONTACT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}",
        r"(?i)\b(?:https?://|www\.)\S+",
        r"\+?\d(?:[\s().-]?\d){6,}",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

fn contains_contact_info(text: &str) -> bool {
    CONTACT_PATTERNS.iter().any(|re| re.is_match(text))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionValues {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub space: String,
    #[serde(default)]
    pub neighborhood: String,
}

pub type DescriptionDraft = DescriptionValues;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptionRules {
    pub summary_min: usize,
    pub summary_max: usize,
    pub detail_max: usize,
}

impl Default for DescriptionRules {
    fn default() -> Self {
        Self {
            summary_min: 20,
            summary_max: 500,
            detail_max: 1000,
        }
    }
}

pub struct Description;

impl SectionForm for Description {
    const SLUG: SectionSlug = SectionSlug::Description;
    type Baseline = DescriptionValues;
    type Draft = DescriptionDraft;
    type Rules = DescriptionRules;
    type Patch = DescriptionValues;

    fn to_draft(baseline: Option<&DescriptionValues>) -> DescriptionDraft {
        baseline.cloned().unwrap_or_default()
    }

    fn validate(
        draft: &DescriptionDraft,
        rules: &DescriptionRules,
        messages: &dyn Messages,
    ) -> Validation {
        let mut checks = Checks::new(messages);
        if checks.required("summary", &draft.summary) {
            checks.length(
                "summary",
                &draft.summary,
                Some(rules.summary_min),
                rules.summary_max,
            );
        }
        checks.length("space", &draft.space, None, rules.detail_max);
        checks.length("neighborhood", &draft.neighborhood, None, rules.detail_max);

        for (field, text) in [
            ("summary", &draft.summary),
            ("space", &draft.space),
            ("neighborhood", &draft.neighborhood),
        ] {
            if !checks.has_error(field) && contains_contact_info(text) {
                checks.fail(field, keys::CONTACT_INFO, &[]);
            }
        }
        checks.finish()
    }

    fn build_patch(draft: &DescriptionDraft, _rules: &DescriptionRules) -> DescriptionValues {
        DescriptionValues {
            summary: normalize_text(&draft.summary),
            space: normalize_text(&draft.space),
            neighborhood: normalize_text(&draft.neighborhood),
        }
    }
}

impl FormController<Description> {
    pub fn set_summary(&mut self, text: impl Into<String>) -> CoreResult<()> {
        let text = text.into();
        self.edit("summary", |d| d.summary = text)
    }

    pub fn set_space(&mut self, text: impl Into<String>) -> CoreResult<()> {
        let text = text.into();
        self.edit("space", |d| d.space = text)
    }

    pub fn set_neighborhood(&mut self, text: impl Into<String>) -> CoreResult<()> {
        let text = text.into();
        self.edit("neighborhood", |d| d.neighborhood = text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SectionController;
    use crate::test_utils::{context, messages};

    fn controller() -> FormController<Description> {
        FormController::new(context(), None, DescriptionRules::default(), messages())
    }

    #[test]
    fn detects_contact_details() {
        assert!(contains_contact_info("write to host@example.com"));
        assert!(contains_contact_info("call +591 7 123 4567"));
        assert!(contains_contact_info("see www.example.com"));
        assert!(!contains_contact_info("Sleeps 4, two blocks from the park"));
        assert!(!contains_contact_info("Built in 1998"));
    }

    #[test]
    fn contact_info_in_summary_is_rejected() {
        let mut c = controller();
        c.set_summary("Lovely loft near the park, call me at 555-123-4567")
            .unwrap();
        assert_eq!(
            c.field_error("summary").as_deref(),
            Some("Remove contact details such as emails, phone numbers or links")
        );
    }

    #[test]
    fn summary_has_minimum_length() {
        let mut c = controller();
        c.set_summary("Too short").unwrap();
        assert_eq!(
            c.field_error("summary").as_deref(),
            Some("Must be at least 20 characters")
        );
        c.set_summary("Bright loft with a balcony over the square").unwrap();
        assert!(c.validate().is_valid());
    }

    #[test]
    fn optional_fields_only_show_errors_once_touched() {
        let mut c = controller();
        c.set_space("Email: me@host.org").unwrap();
        assert!(c.field_error("space").is_some());
        assert!(c.field_error("summary").is_none());
    }
}
