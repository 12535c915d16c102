//! Collaborator abstraction trait definition

mod catalog;
pub mod messages;
mod network;
mod notifier;

pub use catalog::{
    CapacityOptions, CatalogOption, CatalogProvider, CheckInMethodOption, PropertyTypeOption,
};
pub use messages::{BuiltinMessages, Messages};
pub use network::{ListingNetwork, RefreshHook};
pub use notifier::{LogNotifier, Notifier};
