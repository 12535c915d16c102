//! Platform-agnostic application bootstrap for the listing editor.
//!
//! Provides `EditorState` (one open listing plus its section orchestrator),
//! `EditorStateBuilder` (adapter injection) and the JSON configuration.

pub mod adapters;
pub mod config;

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use listing_editor_core::error::{CoreError, CoreResult};
use listing_editor_core::sections::{mount, MountedSection};
use listing_editor_core::services::{
    NavigationOutcome, SaveOutcome, SectionOrchestrator, ServiceContext,
};
use listing_editor_core::traits::{
    BuiltinMessages, CatalogProvider, ListingNetwork, LogNotifier, Messages, Notifier, RefreshHook,
};
use listing_editor_core::types::{
    EditMode, EditingContext, GalleryPhoto, ListingId, ListingSnapshot, SectionSlug,
};
use tokio::sync::RwLock;

use crate::adapters::{HttpListingNetwork, JsonCatalog};
use crate::config::EditorConfig;

/// Result of [`EditorState::open_section`]
pub enum OpenOutcome {
    /// The section is mounted and active
    Opened(MountedSection),
    /// The active section has unsaved edits; retry with `confirmed = true`
    ConfirmationRequired { from: SectionSlug },
}

/// Editing session for one listing.
///
/// Holds the fetched listing snapshot and the orchestrator. Every successful
/// footer save is merged back into the snapshot so reopening a section shows
/// the saved values.
pub struct EditorState {
    /// Service context (holds all collaborators)
    pub ctx: Arc<ServiceContext>,
    /// Section orchestrator
    pub orchestrator: SectionOrchestrator,
    editing: EditingContext,
    snapshot: RwLock<ListingSnapshot>,
    last_saved: Mutex<Option<(SectionSlug, DateTime<Utc>)>>,
}

impl EditorState {
    #[must_use]
    pub fn listing_id(&self) -> &ListingId {
        &self.editing.listing_id
    }

    #[must_use]
    pub fn editing_context(&self) -> &EditingContext {
        &self.editing
    }

    /// Current snapshot including every save merged so far
    pub async fn snapshot(&self) -> ListingSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Most recent successful footer save
    pub fn last_saved(&self) -> Option<(SectionSlug, DateTime<Utc>)> {
        *self.last_saved.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mount `slug` from the current snapshot and make it the active section.
    pub async fn open_section(
        &self,
        slug: SectionSlug,
        confirmed: bool,
    ) -> CoreResult<OpenOutcome> {
        let mounted = {
            let snapshot = self.snapshot.read().await;
            mount(slug, &snapshot, self.editing.clone(), &self.ctx)?
        };
        match self.orchestrator.navigate(mounted.controller(), confirmed) {
            NavigationOutcome::Navigated { .. } => Ok(OpenOutcome::Opened(mounted)),
            NavigationOutcome::ConfirmationRequired { from } => {
                log::debug!("Opening {slug} needs confirmation, {from} has unsaved edits");
                Ok(OpenOutcome::ConfirmationRequired { from })
            }
        }
    }

    /// Leave the active section without opening another one
    pub fn close_section(&self, confirmed: bool) -> NavigationOutcome {
        self.orchestrator.leave(confirmed)
    }

    /// Save the active section and merge the accepted patch into the snapshot.
    pub async fn save_active(&self) -> SaveOutcome {
        let outcome = self.orchestrator.save().await;
        if let SaveOutcome::Saved { slug, patch, .. } = &outcome {
            self.snapshot.write().await.apply_patch(patch);
            *self.last_saved.lock().unwrap_or_else(PoisonError::into_inner) =
                Some((*slug, Utc::now()));
        }
        outcome
    }

    /// Revert the active section's draft to its baseline
    pub fn discard_active(&self) -> bool {
        self.orchestrator.discard()
    }
}

/// Builder for constructing `EditorState` with platform-specific adapters.
///
/// # Required
/// - `network`: how patches and item mutations reach the server
/// - `catalog`: read-only option sets
/// - `snapshot`: the fetched listing
///
/// # Optional
/// - `messages`: defaults to `BuiltinMessages`
/// - `notifier`: defaults to `LogNotifier`
/// - `refresh`: only wired when `refreshAfterSelfSave` is enabled
pub struct EditorStateBuilder {
    network: Option<Arc<dyn ListingNetwork>>,
    catalog: Option<Arc<dyn CatalogProvider>>,
    messages: Option<Arc<dyn Messages>>,
    notifier: Option<Arc<dyn Notifier>>,
    refresh: Option<Arc<dyn RefreshHook>>,
    snapshot: Option<ListingSnapshot>,
    gallery: Vec<GalleryPhoto>,
    mode: EditMode,
    config: EditorConfig,
}

impl EditorStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            network: None,
            catalog: None,
            messages: None,
            notifier: None,
            refresh: None,
            snapshot: None,
            gallery: Vec::new(),
            mode: EditMode::Edit,
            config: EditorConfig::default(),
        }
    }

    /// Start from a config, wiring the HTTP network and JSON catalog it names.
    ///
    /// An empty `http.baseUrl` or a missing `catalogPath` leaves that adapter
    /// unset so the caller can inject its own.
    pub fn from_config(config: EditorConfig) -> CoreResult<Self> {
        let mut builder = Self::new();
        if !config.http.base_url.trim().is_empty() {
            builder.network = Some(Arc::new(HttpListingNetwork::new(&config.http)?));
        }
        if let Some(path) = &config.catalog_path {
            builder.catalog = Some(Arc::new(JsonCatalog::load(path)?));
        }
        builder.config = config;
        Ok(builder)
    }

    #[must_use]
    pub fn network(mut self, network: Arc<dyn ListingNetwork>) -> Self {
        self.network = Some(network);
        self
    }

    #[must_use]
    pub fn catalog(mut self, catalog: Arc<dyn CatalogProvider>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    #[must_use]
    pub fn messages(mut self, messages: Arc<dyn Messages>) -> Self {
        self.messages = Some(messages);
        self
    }

    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    #[must_use]
    pub fn refresh(mut self, refresh: Arc<dyn RefreshHook>) -> Self {
        self.refresh = Some(refresh);
        self
    }

    #[must_use]
    pub fn snapshot(mut self, snapshot: ListingSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    #[must_use]
    pub fn gallery(mut self, gallery: Vec<GalleryPhoto>) -> Self {
        self.gallery = gallery;
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: EditMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the `EditorState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<EditorState> {
        let network = self
            .network
            .ok_or_else(|| CoreError::ValidationError("network is required".to_string()))?;
        let catalog = self
            .catalog
            .ok_or_else(|| CoreError::ValidationError("catalog is required".to_string()))?;
        let snapshot = self
            .snapshot
            .ok_or_else(|| CoreError::ValidationError("snapshot is required".to_string()))?;
        let messages = self.messages.unwrap_or_else(|| Arc::new(BuiltinMessages));
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(LogNotifier));

        let mut ctx = ServiceContext::new(network, catalog, messages, notifier);
        match self.refresh {
            Some(refresh) if self.config.refresh_after_self_save => {
                ctx = ctx.with_refresh(refresh);
            }
            Some(_) => log::debug!("Refresh hook ignored, refreshAfterSelfSave is off"),
            None => {}
        }
        let ctx = Arc::new(ctx);

        let editing = EditingContext::new(snapshot.id.clone())
            .with_gallery(self.gallery)
            .with_mode(self.mode);
        let orchestrator = SectionOrchestrator::new(Arc::clone(&ctx), self.config.to_options());
        log::info!("Editor ready for listing {}", editing.listing_id);

        Ok(EditorState {
            ctx,
            orchestrator,
            editing,
            snapshot: RwLock::new(snapshot),
            last_saved: Mutex::new(None),
        })
    }
}

impl Default for EditorStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
