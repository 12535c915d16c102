//! Listing Editor Core Library
//!
//! Section controller framework for editing a rental listing through many
//! independently mounted sections:
//! - Per-section draft store, validation and patch building (`FormController`)
//! - Controller registry with lifecycle-safe subscriptions
//! - Save orchestrator (validate → patch → submit → rebase or reconcile)
//! - Optimistic per-item self-save sections
//!
//! Network, catalog, translations and notifications are reached only through
//! the traits in [`traits`], so the core stays platform-independent.

pub mod controller;
pub mod error;
pub mod sections;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use controller::{ControllerRegistry, FormController, SectionController, SharedController};
pub use error::{CoreError, CoreResult};
pub use sections::{mount, MountedSection, SectionHandle};
pub use services::{SectionOrchestrator, ServiceContext};
pub use traits::{CatalogProvider, ListingNetwork, Messages, Notifier, RefreshHook};
