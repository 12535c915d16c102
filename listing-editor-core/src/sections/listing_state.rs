//! 上架状态区块

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::controller::{FormController, SectionForm};
use crate::error::CoreResult;
use crate::traits::messages::keys;
use crate::traits::Messages;
use crate::types::{SectionSlug, Validation};
use crate::utils::rules::Checks;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListingStatus {
    #[default]
    Listed,
    Unlisted,
    /// 暂停接单至 `snoozeUntil`
    Snoozed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingStateValues {
    #[serde(default)]
    pub status: ListingStatus,
    #[serde(default)]
    pub snooze_until: Option<NaiveDate>,
}

pub type ListingStateDraft = ListingStateValues;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingStateRules {
    /// 挂载当天；暂停截止日必须晚于它
    pub today: NaiveDate,
}

pub struct ListingState;

impl SectionForm for ListingState {
    const SLUG: SectionSlug = SectionSlug::ListingState;
    type Baseline = ListingStateValues;
    type Draft = ListingStateDraft;
    type Rules = ListingStateRules;
    type Patch = ListingStateValues;

    fn to_draft(baseline: Option<&ListingStateValues>) -> ListingStateDraft {
        baseline.cloned().unwrap_or_default()
    }

    fn validate(
        draft: &ListingStateDraft,
        rules: &ListingStateRules,
        messages: &dyn Messages,
    ) -> Validation {
        let mut checks = Checks::new(messages);
        if draft.status == ListingStatus::Snoozed {
            match draft.snooze_until {
                None => checks.fail("snoozeUntil", keys::REQUIRED, &[]),
                Some(until) if until <= rules.today => checks.fail(
                    "snoozeUntil",
                    keys::DATE_NOT_AFTER,
                    &[("date", &rules.today.to_string())],
                ),
                Some(_) => {}
            }
        }
        checks.finish()
    }

    fn build_patch(draft: &ListingStateDraft, _rules: &ListingStateRules) -> ListingStateValues {
        ListingStateValues {
            status: draft.status,
            snooze_until: draft
                .snooze_until
                .filter(|_| draft.status == ListingStatus::Snoozed),
        }
    }
}

impl FormController<ListingState> {
    pub fn set_status(&mut self, status: ListingStatus) -> CoreResult<()> {
        self.edit("status", |d| d.status = status)
    }

    pub fn set_snooze_until(&mut self, date: Option<NaiveDate>) -> CoreResult<()> {
        self.edit("snoozeUntil", |d| d.snooze_until = date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SectionController;
    use crate::test_utils::{context, messages};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    fn controller() -> FormController<ListingState> {
        FormController::new(
            context(),
            None,
            ListingStateRules { today: day(10) },
            messages(),
        )
    }

    #[test]
    fn snooze_needs_future_date() {
        let mut c = controller();
        c.set_status(ListingStatus::Snoozed).unwrap();
        c.mark_submit_attempted();
        assert_eq!(
            c.field_error("snoozeUntil").as_deref(),
            Some("This field is required")
        );

        c.set_snooze_until(Some(day(10))).unwrap();
        assert_eq!(
            c.field_error("snoozeUntil").as_deref(),
            Some("Choose a date after 2026-05-10")
        );

        c.set_snooze_until(Some(day(20))).unwrap();
        assert!(c.validate().is_valid());
    }

    #[test]
    fn snooze_date_dropped_when_listed() {
        let mut c = controller();
        c.set_snooze_until(Some(day(20))).unwrap();
        c.set_status(ListingStatus::Unlisted).unwrap();
        let patch = c.build_patch().unwrap();
        assert_eq!(
            patch.section(),
            &serde_json::json!({ "status": "unlisted", "snoozeUntil": null })
        );
    }
}
