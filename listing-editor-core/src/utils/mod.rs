//! 工具函数

pub mod coerce;
pub mod deep_eq;
pub mod rules;
pub(crate) mod sync;

pub use deep_eq::{deep_equal, draft_equal, ComparatorOverrides, FieldComparison};
