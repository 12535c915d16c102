//! Network collaborator abstract Trait

use async_trait::async_trait;

use crate::types::{ItemMutation, ListingId, PatchFragment, SectionSlug, ServerValues, SubmitError};

/// Listing network layer Trait
///
/// Timeouts and retries belong to the implementation; the framework only sees
/// the final [`SubmitError`].
///
/// Platform implementation:
/// - `listing-editor-app`: `HttpListingNetwork` (reqwest)
#[async_trait]
pub trait ListingNetwork: Send + Sync {
    /// Submit a section-scoped patch
    ///
    /// # Arguments
    /// * `listing_id` - Listing being edited
    /// * `patch` - Section snapshot nested under its patch path
    async fn submit_patch(
        &self,
        listing_id: &ListingId,
        patch: &PatchFragment,
    ) -> Result<ServerValues, SubmitError>;

    /// Apply a single item mutation for a self-saving section
    ///
    /// # Arguments
    /// * `listing_id` - Listing being edited
    /// * `slug` - Owning section
    /// * `mutation` - Item change
    async fn mutate_item(
        &self,
        listing_id: &ListingId,
        slug: SectionSlug,
        mutation: &ItemMutation,
    ) -> Result<(), SubmitError>;
}

/// Post-action refresh collaborator
///
/// Invoked after a successful optimistic mutation, e.g. to refetch listing
/// completeness indicators.
#[async_trait]
pub trait RefreshHook: Send + Sync {
    async fn refresh(&self, listing_id: &ListingId, slug: SectionSlug);
}
