//! Shared validation primitives.
//!
//! Every section validator collects errors through [`Checks`], so message keys and
//! coercions stay identical across sections.

use serde::{Deserialize, Serialize};

use crate::traits::messages::keys;
use crate::traits::Messages;
use crate::types::{FieldErrors, Validation};
use crate::utils::coerce::{char_len, parse_whole};

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Range spanned by catalog stepper values; `fallback` when the catalog is empty
    #[must_use]
    pub fn from_steps(steps: &[u32], fallback: Self) -> Self {
        match (steps.iter().min(), steps.iter().max()) {
            (Some(&min), Some(&max)) => Self { min, max },
            _ => fallback,
        }
    }

    #[must_use]
    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Error collector bound to a messages provider
pub struct Checks<'a> {
    errors: FieldErrors,
    messages: &'a dyn Messages,
}

impl<'a> Checks<'a> {
    #[must_use]
    pub fn new(messages: &'a dyn Messages) -> Self {
        Self {
            errors: FieldErrors::new(),
            messages,
        }
    }

    /// Record an error for `field`
    pub fn fail(&mut self, field: &str, key: &str, args: &[(&str, &str)]) {
        self.errors.insert(field, self.messages.format(key, args));
    }

    #[must_use]
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains(field)
    }

    /// Non-blank text
    pub fn required(&mut self, field: &str, text: &str) -> bool {
        if text.trim().is_empty() {
            self.fail(field, keys::REQUIRED, &[]);
            return false;
        }
        true
    }

    /// Text length bounds, measured after trimming
    pub fn length(&mut self, field: &str, text: &str, min: Option<usize>, max: usize) {
        let len = char_len(text);
        if let Some(min) = min {
            if len < min {
                self.fail(field, keys::TOO_SHORT, &[("min", &min.to_string())]);
                return;
            }
        }
        if len > max {
            self.fail(field, keys::TOO_LONG, &[("max", &max.to_string())]);
        }
    }

    /// Whole number typed as text; returns the parsed value when it is well-formed
    pub fn whole(&mut self, field: &str, raw: &str, required: bool) -> Option<u32> {
        if raw.trim().is_empty() {
            if required {
                self.fail(field, keys::REQUIRED, &[]);
            }
            return None;
        }
        let parsed = parse_whole(raw);
        if parsed.is_none() {
            self.fail(field, keys::NOT_A_NUMBER, &[]);
        }
        parsed
    }

    /// Value within an inclusive range, reporting the bound it violates
    pub fn within(&mut self, field: &str, value: u32, range: CountRange) -> bool {
        if value < range.min {
            self.fail(field, keys::MIN, &[("min", &range.min.to_string())]);
            false
        } else if value > range.max {
            self.fail(field, keys::MAX, &[("max", &range.max.to_string())]);
            false
        } else {
            true
        }
    }

    /// Selected id must be present and belong to the offered options
    pub fn one_of<'o>(
        &mut self,
        field: &str,
        selected: Option<&str>,
        mut options: impl Iterator<Item = &'o str>,
    ) -> bool {
        match selected {
            None => {
                self.fail(field, keys::REQUIRED, &[]);
                false
            }
            Some(id) if options.any(|o| o == id) => true,
            Some(_) => {
                self.fail(field, keys::UNKNOWN_OPTION, &[]);
                false
            }
        }
    }

    /// Report the same message on every listed field
    pub fn fail_all(&mut self, fields: &[&str], key: &str, args: &[(&str, &str)]) {
        for field in fields {
            self.fail(field, key, args);
        }
    }

    #[must_use]
    pub fn finish(self) -> Validation {
        Validation::from_errors(self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::BuiltinMessages;

    #[test]
    fn range_from_catalog_steps() {
        let range = CountRange::from_steps(&[1, 2, 3, 16], CountRange::new(1, 1));
        assert_eq!(range, CountRange::new(1, 16));
        assert_eq!(
            CountRange::from_steps(&[], CountRange::new(0, 5)),
            CountRange::new(0, 5)
        );
    }

    #[test]
    fn within_reports_violated_bound() {
        let mut checks = Checks::new(&BuiltinMessages);
        checks.within("people", 0, CountRange::new(1, 16));
        checks.within("beds", 20, CountRange::new(1, 16));
        let errors = checks.finish().into_errors();
        assert_eq!(errors.get("people"), Some("Must be at least 1"));
        assert_eq!(errors.get("beds"), Some("Must be at most 16"));
    }

    #[test]
    fn whole_distinguishes_blank_and_garbage() {
        let mut checks = Checks::new(&BuiltinMessages);
        assert_eq!(checks.whole("a", "", false), None);
        assert_eq!(checks.whole("b", "", true), None);
        assert_eq!(checks.whole("c", "x1", true), None);
        assert_eq!(checks.whole("d", "7", true), Some(7));
        let errors = checks.finish().into_errors();
        assert!(!errors.contains("a"));
        assert_eq!(errors.get("b"), Some("This field is required"));
        assert_eq!(errors.get("c"), Some("Enter a whole number"));
    }

    #[test]
    fn one_of_checks_membership() {
        let options = ["flexible", "strict"];
        let mut checks = Checks::new(&BuiltinMessages);
        assert!(checks.one_of("a", Some("strict"), options.iter().copied()));
        assert!(!checks.one_of("b", Some("lenient"), options.iter().copied()));
        assert!(!checks.one_of("c", None, options.iter().copied()));
        assert_eq!(checks.finish().into_errors().len(), 2);
    }
}
