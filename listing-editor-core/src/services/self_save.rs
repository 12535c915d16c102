//! Optimistic self-save sections.
//!
//! These sections persist every discrete action (toggle an amenity, edit a photo
//! caption) with its own network call instead of a footer save. The local value
//! changes immediately; a failed call rolls back only the item it belongs to.

use std::fmt::{Debug, Display};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::join_all;

use super::optimistic::OptimisticMap;
use super::ServiceContext;
use crate::controller::{
    FlagCallback, SectionController, SharedController, Subscription, WatchChannel,
};
use crate::error::{CoreError, CoreResult};
use crate::traits::messages::keys;
use crate::types::{
    EditingContext, FieldErrors, GalleryPhoto, ItemMutation, PatchFragment, SectionSlug,
    Validation,
};
use crate::utils::sync::lock;

/// Maps an optimistic item change to the network mutation that persists it
pub trait SelfSaveModel: Send + Sync + 'static {
    type Key: Ord + Clone + Display + Debug + Send + Sync;
    type Value: Clone + Debug + Send + Sync;

    /// `next == None` removes the item
    fn mutation(key: &Self::Key, next: Option<&Self::Value>) -> ItemMutation;
}

/// Id-set selection (amenities, guest-safety)
#[derive(Debug, Clone, Copy)]
pub struct Selection;

impl SelfSaveModel for Selection {
    type Key = u32;
    type Value = ();

    fn mutation(key: &u32, next: Option<&()>) -> ItemMutation {
        let item_id = key.to_string();
        match next {
            Some(()) => ItemMutation::Select { item_id },
            None => ItemMutation::Deselect { item_id },
        }
    }
}

/// Photo captions keyed by photo id
#[derive(Debug, Clone, Copy)]
pub struct Captions;

impl SelfSaveModel for Captions {
    type Key = String;
    type Value = String;

    fn mutation(key: &String, next: Option<&String>) -> ItemMutation {
        ItemMutation::Caption {
            item_id: key.clone(),
            caption: next.cloned().unwrap_or_default(),
        }
    }
}

/// Result of one optimistic action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Server accepted; the optimistic value stays
    Confirmed,
    /// Server refused; the item was restored and `message` is on display
    RolledBack { message: String },
    /// The section was disposed while the request was in flight; nothing was touched
    Stale,
}

/// Self-saving section state
pub struct SelfSaveController<M: SelfSaveModel> {
    slug: SectionSlug,
    ctx: EditingContext,
    services: Arc<ServiceContext>,
    state: Mutex<OptimisticMap<M::Key, M::Value>>,
    disposed: AtomicBool,
    changed: WatchChannel<()>,
}

impl<M: SelfSaveModel> SelfSaveController<M> {
    pub fn new(
        slug: SectionSlug,
        ctx: EditingContext,
        services: Arc<ServiceContext>,
        initial: impl IntoIterator<Item = (M::Key, M::Value)>,
    ) -> Arc<Self> {
        Arc::new(Self {
            slug,
            ctx,
            services,
            state: Mutex::new(OptimisticMap::new(initial)),
            disposed: AtomicBool::new(false),
            changed: WatchChannel::new(),
        })
    }

    #[must_use]
    pub fn slug(&self) -> SectionSlug {
        self.slug
    }

    #[must_use]
    pub fn context(&self) -> &EditingContext {
        &self.ctx
    }

    /// Apply `next` locally, then persist it.
    ///
    /// Refuses the action when the section is read-only, disposed, or the same
    /// item already has a request in flight.
    pub async fn apply(&self, key: M::Key, next: Option<M::Value>) -> CoreResult<ItemOutcome> {
        if self.is_disposed() {
            return Err(CoreError::ControllerDisposed(self.slug));
        }
        if self.ctx.is_read_only() {
            log::warn!("Refused change of item {key} on read-only {} section", self.slug);
            return Err(CoreError::ReadOnlyViolation {
                slug: self.slug,
                field: key.to_string(),
            });
        }

        let change = lock(&self.state)
            .begin(key.clone(), next)
            .ok_or_else(|| CoreError::ItemPending {
                slug: self.slug,
                item: key.to_string(),
            })?;
        self.changed.emit(&());

        let mutation = M::mutation(&change.key, change.next.as_ref());
        let result = self
            .services
            .network
            .mutate_item(&self.ctx.listing_id, self.slug, &mutation)
            .await;

        if self.is_disposed() {
            log::warn!(
                "Dropping result for item {} of disposed {} section",
                change.key,
                self.slug
            );
            return Ok(ItemOutcome::Stale);
        }

        match result {
            Ok(()) => {
                lock(&self.state).succeed(&change);
                self.changed.emit(&());
                log::debug!("Item {} of {} saved", change.key, self.slug);
                if let Some(refresh) = &self.services.refresh {
                    refresh.refresh(&self.ctx.listing_id, self.slug).await;
                }
                Ok(ItemOutcome::Confirmed)
            }
            Err(err) => {
                let message = self.services.messages.text(keys::ITEM_FAILED);
                log::error!(
                    "Item {} of {} rolled back: {err}",
                    change.key,
                    self.slug
                );
                lock(&self.state).fail(&change, message.clone());
                self.changed.emit(&());
                Ok(ItemOutcome::RolledBack { message })
            }
        }
    }

    #[must_use]
    pub fn is_pending(&self, key: &M::Key) -> bool {
        lock(&self.state).is_pending(key)
    }

    #[must_use]
    pub fn pending(&self) -> Vec<M::Key> {
        lock(&self.state).pending().iter().cloned().collect()
    }

    /// Section-level error from the most recent failure
    #[must_use]
    pub fn error(&self) -> Option<String> {
        lock(&self.state).error().map(str::to_string)
    }

    #[must_use]
    pub fn item_error(&self, key: &M::Key) -> Option<String> {
        lock(&self.state).item_error(key).map(str::to_string)
    }

    pub fn dismiss_error(&self) {
        lock(&self.state).dismiss_error();
        self.changed.emit(&());
    }

    /// Fires after every local state change (optimistic write, confirmation, rollback)
    pub fn watch(&self, callback: impl Fn(()) + Send + Sync + 'static) -> Subscription {
        self.changed.subscribe(callback)
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Controller handle for the registry
    #[must_use]
    pub fn section(self: &Arc<Self>) -> SharedController {
        Arc::new(Mutex::new(SelfSaveSection {
            inner: Arc::clone(self),
            flags: WatchChannel::new(),
        }))
    }
}

impl SelfSaveController<Selection> {
    /// Flip one item's selection
    pub async fn toggle(&self, id: u32) -> CoreResult<ItemOutcome> {
        let next = if lock(&self.state).contains(&id) {
            None
        } else {
            Some(())
        };
        self.apply(id, next).await
    }

    /// Flip several items at once; each request succeeds or rolls back on its own
    pub async fn toggle_many(&self, ids: &[u32]) -> Vec<CoreResult<ItemOutcome>> {
        join_all(ids.iter().map(|id| self.toggle(*id))).await
    }

    /// Selected ids, ascending
    #[must_use]
    pub fn selected(&self) -> Vec<u32> {
        lock(&self.state).keys()
    }

    #[must_use]
    pub fn is_selected(&self, id: u32) -> bool {
        lock(&self.state).contains(&id)
    }
}

impl SelfSaveController<Captions> {
    /// 以已加载的相册初始化
    pub fn for_gallery(ctx: EditingContext, services: Arc<ServiceContext>) -> Arc<Self> {
        let captions: Vec<(String, String)> = ctx
            .gallery
            .iter()
            .filter_map(|photo| Some((photo.id.clone(), photo.caption.clone()?)))
            .collect();
        Self::new(SectionSlug::PhotoGallery, ctx, services, captions)
    }

    pub async fn set_caption(
        &self,
        photo_id: &str,
        caption: impl Into<String>,
    ) -> CoreResult<ItemOutcome> {
        if !self.ctx.gallery.iter().any(|photo| photo.id == photo_id) {
            return Err(CoreError::ValidationError(format!(
                "Photo {photo_id} is not in the gallery"
            )));
        }
        let caption = caption.into().trim().to_string();
        self.apply(photo_id.to_string(), Some(caption)).await
    }

    #[must_use]
    pub fn caption(&self, photo_id: &str) -> Option<String> {
        lock(&self.state).get(&photo_id.to_string()).cloned()
    }

    /// Gallery with the current (optimistic) captions
    #[must_use]
    pub fn photos(&self) -> Vec<GalleryPhoto> {
        let state = lock(&self.state);
        self.ctx
            .gallery
            .iter()
            .map(|photo| GalleryPhoto {
                caption: state.get(&photo.id).cloned(),
                ..photo.clone()
            })
            .collect()
    }
}

/// Registry-facing wrapper.
///
/// Never dirty and never saved by the footer; dirty/validity watchers therefore
/// never fire.
pub struct SelfSaveSection<M: SelfSaveModel> {
    inner: Arc<SelfSaveController<M>>,
    flags: WatchChannel<bool>,
}

impl<M: SelfSaveModel> SectionController for SelfSaveSection<M> {
    fn slug(&self) -> SectionSlug {
        self.inner.slug
    }

    fn context(&self) -> &EditingContext {
        &self.inner.ctx
    }

    fn supports_footer_save(&self) -> bool {
        false
    }

    fn is_dirty(&self) -> bool {
        false
    }

    fn validate(&self) -> Validation {
        Validation::Valid
    }

    fn build_patch(&self) -> CoreResult<PatchFragment> {
        Err(CoreError::UnsupportedSection(self.inner.slug))
    }

    fn mark_submit_attempted(&mut self) {}

    fn discard(&mut self) {}

    fn rebase(&mut self) {}

    fn apply_server_errors(&mut self, _errors: FieldErrors) {}

    fn visible_errors(&self) -> FieldErrors {
        lock(&self.inner.state)
            .failures()
            .map(|(key, message)| (key.to_string(), message.to_string()))
            .collect()
    }

    fn watch_dirty(&self, callback: FlagCallback) -> Subscription {
        self.flags.subscribe(callback)
    }

    fn watch_validity(&self, callback: FlagCallback) -> Subscription {
        self.flags.subscribe(callback)
    }

    fn dispose(&mut self) {
        self.inner.disposed.store(true, Ordering::SeqCst);
    }

    fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}
