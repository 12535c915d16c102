//! Section controller contract and lifecycle.
//!
//! A controller is bound to exactly one section for as long as that section is
//! mounted. The orchestrator only talks to sections through [`SectionController`].

mod form;
mod registry;
mod watch;

pub use form::{FormController, SectionForm};
pub use registry::{ActiveController, ControllerRegistry};
pub use watch::{Subscription, WatchChannel};

use std::sync::{Arc, Mutex};

use crate::error::CoreResult;
use crate::types::{EditingContext, FieldErrors, PatchFragment, SectionSlug, Validation};

/// Callback type for dirty / validity notifications
pub type FlagCallback = Box<dyn Fn(bool) + Send + Sync>;

/// Uniform contract exposed by every mounted section
pub trait SectionController: Send {
    fn slug(&self) -> SectionSlug;

    /// Context injected at construction
    fn context(&self) -> &EditingContext;

    /// `false` for sections that persist every action on their own
    fn supports_footer_save(&self) -> bool;

    fn is_dirty(&self) -> bool;

    /// Pure: repeated calls on an unchanged draft return equal results
    fn validate(&self) -> Validation;

    /// Full section snapshot; fails when the draft does not validate
    fn build_patch(&self) -> CoreResult<PatchFragment>;

    /// A save was requested: client errors become visible for every field
    fn mark_submit_attempted(&mut self);

    /// Restore the draft to the baseline and clear every error
    fn discard(&mut self);

    /// Build the patch for a submit and remember the draft it was built from.
    ///
    /// 提交期间继续编辑不会影响 `rebase` 的目标
    fn begin_submit(&mut self) -> CoreResult<PatchFragment> {
        self.build_patch()
    }

    /// The draft captured by `begin_submit` becomes the new baseline; without
    /// one, the current draft does. Edits made after that capture stay dirty.
    fn rebase(&mut self);

    /// Server field errors; they win over client errors until the next edit
    fn apply_server_errors(&mut self, errors: FieldErrors);

    /// Errors to render right now
    fn visible_errors(&self) -> FieldErrors;

    fn watch_dirty(&self, callback: FlagCallback) -> Subscription;

    fn watch_validity(&self, callback: FlagCallback) -> Subscription;

    /// Called once on unregistration; afterwards the controller refuses changes
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

/// Controller as held by the registry
pub type SharedController = Arc<Mutex<dyn SectionController>>;
