//! 类型定义模块

mod context;
mod field_errors;
mod listing;
mod patch;
mod slug;
mod submit;

pub use context::{EditMode, EditingContext, GalleryPhoto};
pub use field_errors::{FieldErrors, Validation};
pub use listing::{ListingId, ListingSnapshot};
pub use patch::PatchFragment;
pub use slug::SectionSlug;
pub use submit::{
    ItemMutation, Notification, NotificationKind, ServerValues, SubmitError,
};
