//! Translation provider Trait
//!
//! Message strings are opaque to the framework. Implementations may return
//! `None` to fall back to the built-in English table.

/// Message keys used by validators, hints and notifications
pub mod keys {
    pub const REQUIRED: &str = "validation.required";
    pub const TOO_LONG: &str = "validation.too_long";
    pub const TOO_SHORT: &str = "validation.too_short";
    pub const NOT_A_NUMBER: &str = "validation.not_a_number";
    pub const MIN: &str = "validation.min";
    pub const MAX: &str = "validation.max";
    pub const UNKNOWN_OPTION: &str = "validation.unknown_option";
    pub const MAX_NIGHTS_BELOW_MIN: &str = "validation.max_nights_below_min";
    pub const MONTHLY_BELOW_WEEKLY: &str = "validation.monthly_below_weekly";
    pub const CHECKIN_WINDOW: &str = "validation.checkin_window";
    pub const CONTACT_INFO: &str = "validation.contact_info";
    pub const COUNTRY_CODE: &str = "validation.country_code";
    pub const DATE_NOT_AFTER: &str = "validation.date_not_after";
    pub const INSTRUCTIONS_REQUIRED: &str = "validation.instructions_required";
    pub const MONTHLY_DISCOUNT_RAISED: &str = "hint.monthly_discount_raised";
    pub const SAVED: &str = "toast.saved";
    pub const SAVE_FAILED: &str = "toast.save_failed";
    pub const ITEM_FAILED: &str = "toast.item_failed";
}

const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    (keys::REQUIRED, "This field is required"),
    (keys::TOO_LONG, "Must be at most {max} characters"),
    (keys::TOO_SHORT, "Must be at least {min} characters"),
    (keys::NOT_A_NUMBER, "Enter a whole number"),
    (keys::MIN, "Must be at least {min}"),
    (keys::MAX, "Must be at most {max}"),
    (keys::UNKNOWN_OPTION, "Choose one of the available options"),
    (
        keys::MAX_NIGHTS_BELOW_MIN,
        "Maximum nights must be greater than or equal to minimum nights",
    ),
    (
        keys::MONTHLY_BELOW_WEEKLY,
        "Monthly discount must be greater than or equal to the weekly discount",
    ),
    (keys::CHECKIN_WINDOW, "Check-in must end after it starts"),
    (
        keys::CONTACT_INFO,
        "Remove contact details such as emails, phone numbers or links",
    ),
    (keys::COUNTRY_CODE, "Use a two-letter country code"),
    (keys::DATE_NOT_AFTER, "Choose a date after {date}"),
    (
        keys::INSTRUCTIONS_REQUIRED,
        "Add instructions for this check-in method",
    ),
    (
        keys::MONTHLY_DISCOUNT_RAISED,
        "Monthly discount raised to {min}% to match the weekly discount",
    ),
    (keys::SAVED, "Changes saved"),
    (
        keys::SAVE_FAILED,
        "We couldn't save your changes. Please try again.",
    ),
    (
        keys::ITEM_FAILED,
        "We couldn't update this item. Please try again.",
    ),
];

/// Built-in English text for a key
#[must_use]
pub fn default_message(key: &str) -> Option<&'static str> {
    DEFAULT_MESSAGES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Translation provider Trait
pub trait Messages: Send + Sync {
    /// Look up a translated string
    fn lookup(&self, key: &str) -> Option<String>;

    /// Resolved text: translation, then built-in default, then the key itself
    fn text(&self, key: &str) -> String {
        self.lookup(key)
            .or_else(|| default_message(key).map(str::to_string))
            .unwrap_or_else(|| key.to_string())
    }

    /// Resolved text with `{name}` placeholders substituted
    fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter().fold(self.text(key), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
    }
}

/// Messages provider with no translations (English defaults only)
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinMessages;

impl Messages for BuiltinMessages {
    fn lookup(&self, _key: &str) -> Option<String> {
        None
    }
}
