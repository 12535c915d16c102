//! 预订设置区块

use serde::{Deserialize, Serialize};

use crate::controller::{FormController, SectionForm};
use crate::error::CoreResult;
use crate::traits::Messages;
use crate::types::{SectionSlug, Validation};
use crate::utils::coerce::normalize_text;
use crate::utils::rules::Checks;

pub const MAX_WELCOME_LEN: usize = 500;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingValues {
    #[serde(default)]
    pub instant_book: bool,
    #[serde(default)]
    pub welcome_message: String,
}

pub type BookingDraft = BookingValues;

pub struct Booking;

impl SectionForm for Booking {
    const SLUG: SectionSlug = SectionSlug::Booking;
    type Baseline = BookingValues;
    type Draft = BookingDraft;
    type Rules = ();
    type Patch = BookingValues;

    fn to_draft(baseline: Option<&BookingValues>) -> BookingDraft {
        baseline.cloned().unwrap_or_default()
    }

    fn validate(draft: &BookingDraft, _rules: &(), messages: &dyn Messages) -> Validation {
        let mut checks = Checks::new(messages);
        // 即时预订的客人直接收到欢迎语
        if !draft.instant_book || checks.required("welcomeMessage", &draft.welcome_message) {
            checks.length("welcomeMessage", &draft.welcome_message, None, MAX_WELCOME_LEN);
        }
        checks.finish()
    }

    fn build_patch(draft: &BookingDraft, _rules: &()) -> BookingValues {
        BookingValues {
            instant_book: draft.instant_book,
            welcome_message: normalize_text(&draft.welcome_message),
        }
    }
}

impl FormController<Booking> {
    pub fn set_instant_book(&mut self, enabled: bool) -> CoreResult<()> {
        self.edit("instantBook", |d| d.instant_book = enabled)
    }

    pub fn set_welcome_message(&mut self, text: impl Into<String>) -> CoreResult<()> {
        let text = text.into();
        self.edit("welcomeMessage", |d| d.welcome_message = text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SectionController;
    use crate::test_utils::{context, messages};

    #[test]
    fn instant_book_requires_welcome_message() {
        let mut c = FormController::<Booking>::new(context(), None, (), messages());
        assert!(c.validate().is_valid());

        c.set_instant_book(true).unwrap();
        c.mark_submit_attempted();
        assert_eq!(
            c.field_error("welcomeMessage").as_deref(),
            Some("This field is required")
        );

        c.set_welcome_message("Welcome! The key is with the doorman.").unwrap();
        assert!(c.validate().is_valid());
    }

    #[test]
    fn toggling_back_is_not_dirty() {
        let mut c = FormController::<Booking>::new(context(), None, (), messages());
        c.set_instant_book(true).unwrap();
        c.set_instant_book(false).unwrap();
        assert!(!c.is_dirty());
    }
}
