//! Section orchestrator
//!
//! Owns the controller registry and drives navigation and the
//! validate → patch → submit → rebase-or-reconcile save sequence for whichever
//! section is active. Section internals are only reached through
//! [`SectionController`](crate::controller::SectionController).

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::ServiceContext;
use crate::controller::{ControllerRegistry, SharedController, Subscription, WatchChannel};
use crate::traits::messages::keys;
use crate::types::{FieldErrors, Notification, PatchFragment, SectionSlug, ServerValues, Validation};
use crate::utils::sync::lock;

/// What happens to unsaved edits when the user leaves a section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationPolicy {
    /// Leaving a dirty section needs explicit confirmation
    #[default]
    ConfirmDirty,
    /// Unsaved edits are dropped without asking
    DiscardSilently,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorOptions {
    pub navigation_policy: NavigationPolicy,
    /// Emit a success notification after each save
    pub notify_on_success: bool,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            navigation_policy: NavigationPolicy::ConfirmDirty,
            notify_on_success: true,
        }
    }
}

/// Save state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SaveState {
    #[default]
    Idle,
    Validating,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The requested section (or none) is now active
    Navigated { epoch: Option<u64> },
    /// The active section has unsaved edits; retry with `confirmed = true`
    ConfirmationRequired { from: SectionSlug },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Server accepted; the draft is the new baseline
    Saved {
        slug: SectionSlug,
        patch: PatchFragment,
        values: ServerValues,
    },
    /// Client validation failed; nothing was sent
    Invalid(FieldErrors),
    /// Server rejected specific fields; errors were applied to the section
    Rejected(FieldErrors),
    /// Transport or server fault; the draft is unchanged
    Failed { detail: String },
    /// A save is already in progress
    Busy,
    NoActiveSection,
    /// The active section saves itself per action
    NotSupported(SectionSlug),
    /// The section was replaced or disposed before the response arrived
    Stale,
}

/// Section orchestrator
pub struct SectionOrchestrator {
    ctx: Arc<ServiceContext>,
    registry: ControllerRegistry,
    options: OrchestratorOptions,
    state: Mutex<SaveState>,
    state_channel: WatchChannel<SaveState>,
}

/// Resets the save state to `Idle` when the save returns
struct SaveGuard<'a> {
    orchestrator: &'a SectionOrchestrator,
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        self.orchestrator.set_state(SaveState::Idle);
    }
}

impl SectionOrchestrator {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, options: OrchestratorOptions) -> Self {
        Self {
            ctx,
            registry: ControllerRegistry::new(),
            options,
            state: Mutex::new(SaveState::Idle),
            state_channel: WatchChannel::new(),
        }
    }

    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    pub fn active_slug(&self) -> Option<SectionSlug> {
        self.registry.active_slug()
    }

    /// Make `next` the active section.
    ///
    /// Always passes through the empty state, so nothing of the previous
    /// section is still wired when `next` is installed.
    pub fn navigate(&self, next: SharedController, confirmed: bool) -> NavigationOutcome {
        self.switch_to(Some(next), confirmed)
    }

    /// Close the active section without opening another
    pub fn leave(&self, confirmed: bool) -> NavigationOutcome {
        self.switch_to(None, confirmed)
    }

    fn switch_to(&self, next: Option<SharedController>, confirmed: bool) -> NavigationOutcome {
        if let Some(active) = self.registry.active() {
            let mut controller = lock(&active.controller);
            if controller.is_dirty() {
                if self.options.navigation_policy == NavigationPolicy::ConfirmDirty && !confirmed {
                    log::debug!("Leaving dirty {} section needs confirmation", active.slug);
                    return NavigationOutcome::ConfirmationRequired { from: active.slug };
                }
                log::debug!("Discarding unsaved edits of {} section", active.slug);
                controller.discard();
            }
        }

        self.registry.register(None);
        let epoch = next.and_then(|controller| self.registry.register(Some(controller)));
        NavigationOutcome::Navigated { epoch }
    }

    /// Restore the active section to its baseline
    pub fn discard(&self) -> bool {
        let Some(active) = self.registry.active() else {
            return false;
        };
        lock(&active.controller).discard();
        log::debug!("Discarded {} section", active.slug);
        true
    }

    /// Whether the footer save affordance should be enabled.
    ///
    /// 不锁控制器，可以在 dirty / validity 回调中调用
    pub fn can_save(&self) -> bool {
        self.save_state() == SaveState::Idle
            && self.registry.is_dirty()
            && self.registry.active_supports_footer_save()
    }

    pub fn is_dirty(&self) -> bool {
        self.registry.is_dirty()
    }

    pub fn is_valid(&self) -> bool {
        self.registry.is_valid()
    }

    pub fn save_state(&self) -> SaveState {
        *lock(&self.state)
    }

    pub fn is_submitting(&self) -> bool {
        self.save_state() == SaveState::Submitting
    }

    pub fn watch_save_state(
        &self,
        callback: impl Fn(SaveState) + Send + Sync + 'static,
    ) -> Subscription {
        self.state_channel.subscribe(callback)
    }

    fn set_state(&self, next: SaveState) {
        let changed = {
            let mut state = lock(&self.state);
            let changed = *state != next;
            *state = next;
            changed
        };
        if changed {
            log::debug!("Save state -> {next:?}");
            self.state_channel.emit(&next);
        }
    }

    fn begin_save(&self) -> Option<SaveGuard<'_>> {
        {
            let mut state = lock(&self.state);
            if *state != SaveState::Idle {
                return None;
            }
            *state = SaveState::Validating;
        }
        self.state_channel.emit(&SaveState::Validating);
        Some(SaveGuard { orchestrator: self })
    }

    /// Save the active section
    pub async fn save(&self) -> SaveOutcome {
        let Some(_guard) = self.begin_save() else {
            log::warn!("Save requested while another save is in progress");
            return SaveOutcome::Busy;
        };
        let Some(active) = self.registry.active() else {
            return SaveOutcome::NoActiveSection;
        };
        let slug = active.slug;
        if !active.footer_save {
            return SaveOutcome::NotSupported(slug);
        }

        let (listing_id, patch) = {
            let mut controller = lock(&active.controller);
            controller.mark_submit_attempted();
            if let Validation::Invalid(errors) = controller.validate() {
                log::debug!("{slug} save blocked by {} client error(s)", errors.len());
                return SaveOutcome::Invalid(errors);
            }
            match controller.begin_submit() {
                Ok(patch) => (controller.context().listing_id.clone(), patch),
                Err(e) => {
                    log::error!("Failed to build {slug} patch: {e}");
                    return SaveOutcome::Failed {
                        detail: e.to_string(),
                    };
                }
            }
        };

        self.set_state(SaveState::Submitting);
        let result = self.ctx.network.submit_patch(&listing_id, &patch).await;

        let mut controller = lock(&active.controller);
        if !self.registry.is_current(active.epoch) || controller.is_disposed() {
            log::warn!("Dropping {slug} save result: section is no longer active");
            return SaveOutcome::Stale;
        }

        match result {
            Ok(values) => {
                controller.rebase();
                drop(controller);
                log::info!("Saved {slug} section of listing {listing_id}");
                if self.options.notify_on_success {
                    self.ctx
                        .notifier
                        .notify(Notification::success(self.ctx.messages.text(keys::SAVED)));
                }
                SaveOutcome::Saved {
                    slug,
                    patch,
                    values,
                }
            }
            Err(err) => {
                if let Some(fields) = err.field_errors() {
                    log::warn!("{slug} save rejected with {} field error(s)", fields.len());
                    controller.apply_server_errors(fields.clone());
                    return SaveOutcome::Rejected(fields.clone());
                }
                drop(controller);
                log::error!("Saving {slug} section failed: {err}");
                self.ctx
                    .notifier
                    .notify(Notification::error(self.ctx.messages.text(keys::SAVE_FAILED)));
                SaveOutcome::Failed {
                    detail: err.to_string(),
                }
            }
        }
    }
}
