//! Platform-agnostic adapters for the core collaborator traits.

mod http_network;
mod json_catalog;

pub use http_network::HttpListingNetwork;
pub use json_catalog::JsonCatalog;
