use crate::import::DistributionMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One record as shipped to the backend: a flat JSON object holding the
/// structured fields and every property side by side.
pub type WireRecord = serde_json::Map<String, serde_json::Value>;

/// Body of `POST /accounts/{id}/collections/{collection_id}/import`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkImportCollectionRequest {
    pub collection_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_container_id: Option<String>,
    pub distribution_mode: DistributionMode,
    /// Records are always sent pre-parsed
    pub format: &'static str,
    pub data: Vec<WireRecord>,
}

impl BulkImportCollectionRequest {
    pub fn new(
        collection_id: &str,
        target_container_id: Option<&str>,
        distribution_mode: DistributionMode,
        data: Vec<WireRecord>,
    ) -> Self {
        Self {
            collection_id: collection_id.to_string(),
            target_container_id: target_container_id.map(str::to_string),
            distribution_mode,
            format: "json",
            data,
        }
    }
}

/// Result counts reported by the backend after a bulk import
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImportSummary {
    #[serde(default)]
    pub imported: usize,
    #[serde(default)]
    pub failed: usize,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Collection {
    pub fn object_count(&self) -> usize {
        self.containers.iter().map(|c| c.objects.len()).sum()
    }

    /// Last modification time as shown on the collection page
    pub fn updated_label(&self) -> Option<String> {
        self.updated_at
            .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Container {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub objects: Vec<InventoryObject>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InventoryObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}
