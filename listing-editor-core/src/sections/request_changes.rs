//! 向平台提交修改请求

use serde::{Deserialize, Serialize};

use crate::controller::{FormController, SectionForm};
use crate::error::CoreResult;
use crate::traits::Messages;
use crate::types::{SectionSlug, Validation};
use crate::utils::coerce::normalize_text;
use crate::utils::rules::Checks;

pub const MIN_MESSAGE_LEN: usize = 10;
pub const MAX_MESSAGE_LEN: usize = 2000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestChangesValues {
    #[serde(default)]
    pub message: String,
}

pub type RequestChangesDraft = RequestChangesValues;

pub struct RequestChanges;

impl SectionForm for RequestChanges {
    const SLUG: SectionSlug = SectionSlug::RequestChanges;
    type Baseline = RequestChangesValues;
    type Draft = RequestChangesDraft;
    type Rules = ();
    type Patch = RequestChangesValues;

    fn to_draft(baseline: Option<&RequestChangesValues>) -> RequestChangesDraft {
        baseline.cloned().unwrap_or_default()
    }

    fn validate(draft: &RequestChangesDraft, _rules: &(), messages: &dyn Messages) -> Validation {
        let mut checks = Checks::new(messages);
        if checks.required("message", &draft.message) {
            checks.length(
                "message",
                &draft.message,
                Some(MIN_MESSAGE_LEN),
                MAX_MESSAGE_LEN,
            );
        }
        checks.finish()
    }

    fn build_patch(draft: &RequestChangesDraft, _rules: &()) -> RequestChangesValues {
        RequestChangesValues {
            message: normalize_text(&draft.message),
        }
    }
}

impl FormController<RequestChanges> {
    pub fn set_message(&mut self, text: impl Into<String>) -> CoreResult<()> {
        let text = text.into();
        self.edit("message", |d| d.message = text)
    }
}
