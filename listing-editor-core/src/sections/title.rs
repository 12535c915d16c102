//! 标题区块

use serde::{Deserialize, Serialize};

use crate::controller::{FormController, SectionForm};
use crate::error::CoreResult;
use crate::traits::Messages;
use crate::types::{SectionSlug, Validation};
use crate::utils::coerce::normalize_text;
use crate::utils::deep_eq::{ComparatorOverrides, FieldComparison};
use crate::utils::rules::Checks;

/// 标题最大长度（字符）
pub const MAX_TITLE_LEN: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleValues {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleDraft {
    pub title: String,
}

pub struct Title;

impl SectionForm for Title {
    const SLUG: SectionSlug = SectionSlug::Title;
    type Baseline = TitleValues;
    type Draft = TitleDraft;
    type Rules = ();
    type Patch = TitleValues;

    fn to_draft(baseline: Option<&TitleValues>) -> TitleDraft {
        TitleDraft {
            title: baseline.map(|b| b.title.clone()).unwrap_or_default(),
        }
    }

    /// 首尾空白不计入修改：只改空白的编辑不会让区块变脏
    fn comparators() -> &'static ComparatorOverrides {
        &[("title", FieldComparison::TrimmedText)]
    }

    fn validate(draft: &TitleDraft, _rules: &(), messages: &dyn Messages) -> Validation {
        let mut checks = Checks::new(messages);
        if checks.required("title", &draft.title) {
            checks.length("title", &draft.title, None, MAX_TITLE_LEN);
        }
        checks.finish()
    }

    fn build_patch(draft: &TitleDraft, _rules: &()) -> TitleValues {
        TitleValues {
            title: normalize_text(&draft.title),
        }
    }
}

impl FormController<Title> {
    pub fn set_title(&mut self, title: impl Into<String>) -> CoreResult<()> {
        let title = title.into();
        self.edit("title", |d| d.title = title)
    }
}
