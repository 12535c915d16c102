//! Active controller slot.
//!
//! Two states: Empty and Active(controller). Installing a controller always
//! tears the previous one down first (subscriptions released, controller
//! disposed), so at most one controller is ever wired to the orchestrator.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::watch::{Subscription, WatchChannel};
use super::SharedController;
use crate::types::SectionSlug;
use crate::utils::sync::lock;

/// Snapshot of the active slot
#[derive(Clone)]
pub struct ActiveController {
    /// Registration epoch; changes on every registration
    pub epoch: u64,
    pub slug: SectionSlug,
    /// Recorded at registration, readable without locking the controller
    pub footer_save: bool,
    pub controller: SharedController,
}

struct Installed {
    epoch: u64,
    slug: SectionSlug,
    footer_save: bool,
    controller: SharedController,
    subscriptions: Vec<Subscription>,
}

/// Aggregated flags mirrored from the active controller
struct Flags {
    dirty: AtomicBool,
    valid: AtomicBool,
    dirty_channel: WatchChannel<bool>,
    validity_channel: WatchChannel<bool>,
}

impl Flags {
    fn set_dirty(&self, dirty: bool) {
        if self.dirty.swap(dirty, Ordering::SeqCst) != dirty {
            self.dirty_channel.emit(&dirty);
        }
    }

    fn set_valid(&self, valid: bool) {
        if self.valid.swap(valid, Ordering::SeqCst) != valid {
            self.validity_channel.emit(&valid);
        }
    }
}

/// Controller registry
pub struct ControllerRegistry {
    slot: Mutex<Option<Installed>>,
    next_epoch: AtomicU64,
    flags: Arc<Flags>,
}

impl ControllerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            next_epoch: AtomicU64::new(1),
            flags: Arc::new(Flags {
                dirty: AtomicBool::new(false),
                valid: AtomicBool::new(true),
                dirty_channel: WatchChannel::new(),
                validity_channel: WatchChannel::new(),
            }),
        }
    }

    /// Install `controller` (or clear the slot with `None`).
    ///
    /// Any previously active controller is unregistered before the new one is
    /// wired. Returns the new registration epoch.
    pub fn register(&self, controller: Option<SharedController>) -> Option<u64> {
        let previous = lock(&self.slot).take();
        if let Some(previous) = previous {
            Self::teardown(previous);
        }

        let Some(controller) = controller else {
            self.flags.set_dirty(false);
            self.flags.set_valid(true);
            return None;
        };
        let epoch = self.next_epoch.fetch_add(1, Ordering::SeqCst);

        let (slug, footer_save, dirty, valid, subscriptions) = {
            let c = lock(&controller);
            let dirty_flags = Arc::clone(&self.flags);
            let valid_flags = Arc::clone(&self.flags);
            let subscriptions = vec![
                c.watch_dirty(Box::new(move |dirty| dirty_flags.set_dirty(dirty))),
                c.watch_validity(Box::new(move |valid| valid_flags.set_valid(valid))),
            ];
            (
                c.slug(),
                c.supports_footer_save(),
                c.is_dirty(),
                c.validate().is_valid(),
                subscriptions,
            )
        };

        log::debug!("Registered {slug} controller (epoch {epoch})");
        let installed = Installed {
            epoch,
            slug,
            footer_save,
            controller,
            subscriptions,
        };
        let displaced = lock(&self.slot).replace(installed);
        if let Some(displaced) = displaced {
            Self::teardown(displaced);
        }

        // 锁外发布，回调可以安全地再次访问 registry
        self.flags.set_dirty(dirty);
        self.flags.set_valid(valid);
        Some(epoch)
    }

    /// Return to Empty
    pub fn clear(&self) {
        self.register(None);
    }

    fn teardown(installed: Installed) {
        let Installed {
            epoch,
            slug,
            controller,
            subscriptions,
            ..
        } = installed;
        for subscription in subscriptions {
            subscription.unsubscribe();
        }
        lock(&controller).dispose();
        log::debug!("Unregistered {slug} controller (epoch {epoch})");
    }

    #[must_use]
    pub fn active(&self) -> Option<ActiveController> {
        lock(&self.slot).as_ref().map(|installed| ActiveController {
            epoch: installed.epoch,
            slug: installed.slug,
            footer_save: installed.footer_save,
            controller: Arc::clone(&installed.controller),
        })
    }

    #[must_use]
    pub fn active_slug(&self) -> Option<SectionSlug> {
        lock(&self.slot).as_ref().map(|installed| installed.slug)
    }

    /// Whether `epoch` is still the active registration
    #[must_use]
    pub fn is_current(&self, epoch: u64) -> bool {
        lock(&self.slot)
            .as_ref()
            .is_some_and(|installed| installed.epoch == epoch)
    }

    /// Whether the active controller takes part in the footer save
    #[must_use]
    pub fn active_supports_footer_save(&self) -> bool {
        lock(&self.slot)
            .as_ref()
            .is_some_and(|installed| installed.footer_save)
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.flags.dirty.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.flags.valid.load(Ordering::SeqCst)
    }

    /// Callbacks may run while the setter still holds the controller lock, so
    /// they must only use queries that never lock a controller.
    pub fn watch_dirty(&self, callback: impl Fn(bool) + Send + Sync + 'static) -> Subscription {
        self.flags.dirty_channel.subscribe(callback)
    }

    pub fn watch_validity(&self, callback: impl Fn(bool) + Send + Sync + 'static) -> Subscription {
        self.flags.validity_channel.subscribe(callback)
    }
}

impl Default for ControllerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
