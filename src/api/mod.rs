// # Inventory API
//
// Thin REST layer over the inventory backend. The import flow only depends on
// the `InventoryBackend` trait; `ApiClient` is the reqwest implementation.

mod client;
mod models;

pub use client::{ApiClient, ApiError, InventoryBackend};
pub use models::{
    BulkImportCollectionRequest, Collection, Container, ImportSummary, InventoryObject,
    WireRecord,
};
