use crate::api::{Collection, ImportSummary, InventoryBackend, WireRecord};
use crate::import::types::{DistributionMode, ImportRecord};
use crate::import::wizard::DispatchRequest;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Keys owned by the structured fields of a record
const RESERVED_KEYS: [&str; 5] = ["name", "description", "quantity", "unit", "tags"];

/// Which backend call an import resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchPlan {
    ToContainer { container_id: String },
    AcrossCollection { mode: DistributionMode },
}

impl DispatchPlan {
    pub fn for_request(request: &DispatchRequest) -> Self {
        match (&request.distribution_mode, &request.target_container_id) {
            (DistributionMode::Target, Some(container_id)) => DispatchPlan::ToContainer {
                container_id: container_id.clone(),
            },
            (mode, _) => DispatchPlan::AcrossCollection { mode: *mode },
        }
    }
}

/// State of the collection after a successful import
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionRefresh {
    Fresh(Collection),
    /// The re-fetch failed; callers keep whatever copy they already have
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Success {
        summary: ImportSummary,
        refresh: CollectionRefresh,
    },
    Failed(String),
}

/// Sends an import batch to the backend and re-fetches the collection
#[derive(Clone)]
pub struct DistributionDispatcher {
    backend: Arc<dyn InventoryBackend>,
}

impl DistributionDispatcher {
    pub fn new(backend: Arc<dyn InventoryBackend>) -> Self {
        Self { backend }
    }

    pub async fn dispatch(&self, user_id: &str, request: DispatchRequest) -> DispatchOutcome {
        let plan = DispatchPlan::for_request(&request);
        let records: Vec<WireRecord> = request.records.iter().map(to_wire_record).collect();

        info!(
            "Dispatching {} records to collection {} ({:?})",
            records.len(),
            request.collection_id,
            plan
        );

        let result = match &plan {
            DispatchPlan::ToContainer { container_id } => {
                self.backend
                    .import_to_container(user_id, &request.collection_id, container_id, records)
                    .await
            }
            DispatchPlan::AcrossCollection { mode } => {
                self.backend
                    .distribute_to_collection(user_id, &request.collection_id, records, *mode)
                    .await
            }
        };

        let summary = match result {
            Ok(summary) => summary,
            Err(e) => {
                error!("Import into {} failed: {}", request.collection_id, e);
                return DispatchOutcome::Failed(e.to_string());
            }
        };

        let refresh = match self
            .backend
            .get_collection(user_id, &request.collection_id)
            .await
        {
            Ok(collection) => CollectionRefresh::Fresh(collection),
            Err(e) => {
                warn!(
                    "Could not refresh collection {} after import: {}",
                    request.collection_id, e
                );
                CollectionRefresh::Stale
            }
        };

        DispatchOutcome::Success { summary, refresh }
    }
}

/// Flatten a record into the object the backend expects.
///
/// Structured fields are always present. Properties sit beside them; a
/// property named like a structured field is dropped.
pub fn to_wire_record(record: &ImportRecord) -> WireRecord {
    let mut wire = WireRecord::new();
    wire.insert("name".into(), Value::from(record.name.clone()));
    wire.insert(
        "description".into(),
        Value::from(record.description.clone().unwrap_or_default()),
    );
    wire.insert(
        "quantity".into(),
        record
            .quantity
            .and_then(serde_json::Number::from_f64)
            .map_or(Value::Null, Value::Number),
    );
    wire.insert(
        "unit".into(),
        Value::from(record.unit.clone().unwrap_or_default()),
    );
    wire.insert("tags".into(), Value::from(record.tags.clone()));

    for (key, value) in &record.properties {
        if RESERVED_KEYS.contains(&key.as_str()) {
            warn!(
                "Dropping property '{}' of '{}': it collides with a structured field",
                key, record.name
            );
            continue;
        }
        wire.insert(key.clone(), value.clone().into());
    }

    wire
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::types::PropertyValue;
    use crate::test_support::{BackendCall, MockBackend};
    use serde_json::json;

    fn request(mode: DistributionMode, container: Option<&str>) -> DispatchRequest {
        DispatchRequest {
            collection_id: "col-1".to_string(),
            target_container_id: container.map(str::to_string),
            distribution_mode: mode,
            records: vec![ImportRecord::named("Milk"), ImportRecord::named("Eggs")],
        }
    }

    #[test]
    fn test_wire_record_merges_properties_flat() {
        let mut record = ImportRecord::named("Milk");
        record.quantity = Some(2.0);
        record.unit = Some("liters".to_string());
        record.tags = vec!["dairy".to_string(), "fridge".to_string()];
        record
            .properties
            .insert("brand".to_string(), PropertyValue::from("Acme"));
        record
            .properties
            .insert("organic".to_string(), PropertyValue::Bool(true));

        let wire = Value::Object(to_wire_record(&record));

        assert_eq!(
            wire,
            json!({
                "name": "Milk",
                "description": "",
                "quantity": 2.0,
                "unit": "liters",
                "tags": ["dairy", "fridge"],
                "brand": "Acme",
                "organic": true,
            })
        );
    }

    #[test]
    fn test_wire_record_unset_quantity_is_null() {
        let wire = to_wire_record(&ImportRecord::named("Book"));

        assert_eq!(wire["quantity"], Value::Null);
        assert_eq!(wire["tags"], json!([]));
    }

    #[test]
    fn test_structured_fields_win_over_colliding_property() {
        let mut record = ImportRecord::named("Milk");
        record
            .properties
            .insert("name".to_string(), PropertyValue::from("Other"));
        record
            .properties
            .insert("unit".to_string(), PropertyValue::Number(3.0));

        let wire = to_wire_record(&record);

        assert_eq!(wire["name"], "Milk");
        assert_eq!(wire["unit"], "");
        assert_eq!(wire.len(), RESERVED_KEYS.len());
    }

    #[test]
    fn test_plan_selection() {
        assert_eq!(
            DispatchPlan::for_request(&request(DistributionMode::Target, Some("box-1"))),
            DispatchPlan::ToContainer {
                container_id: "box-1".to_string()
            }
        );
        assert_eq!(
            DispatchPlan::for_request(&request(DistributionMode::Target, None)),
            DispatchPlan::AcrossCollection {
                mode: DistributionMode::Target
            }
        );
        assert_eq!(
            DispatchPlan::for_request(&request(DistributionMode::Automatic, Some("box-1"))),
            DispatchPlan::AcrossCollection {
                mode: DistributionMode::Automatic
            }
        );
    }

    #[tokio::test]
    async fn test_dispatch_to_container_then_refetch() {
        let backend = Arc::new(MockBackend::new());
        let dispatcher = DistributionDispatcher::new(backend.clone());

        let outcome = dispatcher
            .dispatch("user-1", request(DistributionMode::Target, Some("box-1")))
            .await;

        match outcome {
            DispatchOutcome::Success { summary, refresh } => {
                assert_eq!(summary.imported, 2);
                assert!(matches!(refresh, CollectionRefresh::Fresh(_)));
            }
            other => panic!("expected success, got {:?}", other),
        }

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        match &calls[0] {
            BackendCall::ImportToContainer {
                user_id,
                container_id,
                records,
                ..
            } => {
                assert_eq!(user_id, "user-1");
                assert_eq!(container_id, "box-1");
                assert_eq!(records.len(), 2);
            }
            other => panic!("unexpected call {:?}", other),
        }
        assert!(matches!(calls[1], BackendCall::GetCollection { .. }));
    }

    #[tokio::test]
    async fn test_dispatch_automatic_uses_collection_call() {
        let backend = Arc::new(MockBackend::new());
        let dispatcher = DistributionDispatcher::new(backend.clone());

        dispatcher
            .dispatch("user-1", request(DistributionMode::Automatic, Some("box-1")))
            .await;

        assert!(matches!(
            &backend.calls()[0],
            BackendCall::DistributeToCollection {
                mode: DistributionMode::Automatic,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_skips_refetch() {
        let backend = Arc::new(MockBackend::new().fail_imports(500, "database unavailable"));
        let dispatcher = DistributionDispatcher::new(backend.clone());

        let outcome = dispatcher
            .dispatch("user-1", request(DistributionMode::Automatic, None))
            .await;

        match outcome {
            DispatchOutcome::Failed(message) => assert!(message.contains("database unavailable")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_refetch_failure_reports_stale() {
        let backend = Arc::new(MockBackend::new().fail_refresh());
        let dispatcher = DistributionDispatcher::new(backend);

        let outcome = dispatcher
            .dispatch("user-1", request(DistributionMode::Automatic, None))
            .await;

        assert!(matches!(
            outcome,
            DispatchOutcome::Success {
                refresh: CollectionRefresh::Stale,
                ..
            }
        ));
    }
}
