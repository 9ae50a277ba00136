// Test support utilities for both unit and integration tests

use crate::api::{ApiError, Collection, Container, ImportSummary, InventoryBackend, WireRecord};
use crate::import::{DistributionMode, FilePicker};
use std::path::PathBuf;
use std::sync::Mutex;

/// A backend call as seen by [`MockBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    ImportToContainer {
        user_id: String,
        collection_id: String,
        container_id: String,
        records: Vec<WireRecord>,
    },
    DistributeToCollection {
        user_id: String,
        collection_id: String,
        records: Vec<WireRecord>,
        mode: DistributionMode,
    },
    GetCollection {
        user_id: String,
        collection_id: String,
    },
}

/// Mock inventory backend for testing
///
/// Records every call and answers from memory. Imports report every record
/// as imported unless a failure is configured.
#[derive(Default)]
pub struct MockBackend {
    calls: Mutex<Vec<BackendCall>>,
    import_failure: Option<(u16, String)>,
    rejected_records: usize,
    refresh_fails: bool,
}

impl MockBackend {
    #[allow(unused)] // Used in tests
    pub fn new() -> Self {
        Self::default()
    }

    /// Make both import calls answer with an HTTP error
    #[allow(unused)]
    pub fn fail_imports(mut self, status: u16, message: &str) -> Self {
        self.import_failure = Some((status, message.to_string()));
        self
    }

    /// Report the last `count` records of each import as failed
    #[allow(unused)]
    pub fn reject_records(mut self, count: usize) -> Self {
        self.rejected_records = count;
        self
    }

    /// Make the post-import collection re-fetch fail
    #[allow(unused)]
    pub fn fail_refresh(mut self) -> Self {
        self.refresh_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Collection returned by `get_collection`
    pub fn collection(collection_id: &str) -> Collection {
        Collection {
            id: collection_id.to_string(),
            name: "Pantry".to_string(),
            containers: vec![Container {
                id: "box-1".to_string(),
                name: "Fridge".to_string(),
                description: String::new(),
                objects: Vec::new(),
            }],
            updated_at: None,
        }
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn import_result(&self, records: &[WireRecord]) -> Result<ImportSummary, ApiError> {
        match &self.import_failure {
            Some((status, message)) => Err(ApiError::Status {
                status: *status,
                message: message.clone(),
            }),
            None => {
                let failed = self.rejected_records.min(records.len());
                Ok(ImportSummary {
                    imported: records.len() - failed,
                    failed,
                    total: records.len(),
                    errors: (records.len() - failed..records.len())
                        .map(|i| format!("Record {}: rejected", i + 1))
                        .collect(),
                })
            }
        }
    }
}

#[async_trait::async_trait]
impl InventoryBackend for MockBackend {
    async fn import_to_container(
        &self,
        user_id: &str,
        collection_id: &str,
        container_id: &str,
        records: Vec<WireRecord>,
    ) -> Result<ImportSummary, ApiError> {
        let result = self.import_result(&records);
        self.record(BackendCall::ImportToContainer {
            user_id: user_id.to_string(),
            collection_id: collection_id.to_string(),
            container_id: container_id.to_string(),
            records,
        });
        result
    }

    async fn distribute_to_collection(
        &self,
        user_id: &str,
        collection_id: &str,
        records: Vec<WireRecord>,
        mode: DistributionMode,
    ) -> Result<ImportSummary, ApiError> {
        let result = self.import_result(&records);
        self.record(BackendCall::DistributeToCollection {
            user_id: user_id.to_string(),
            collection_id: collection_id.to_string(),
            records,
            mode,
        });
        result
    }

    async fn get_collection(
        &self,
        user_id: &str,
        collection_id: &str,
    ) -> Result<Collection, ApiError> {
        self.record(BackendCall::GetCollection {
            user_id: user_id.to_string(),
            collection_id: collection_id.to_string(),
        });

        if self.refresh_fails {
            return Err(ApiError::Status {
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }
        Ok(Self::collection(collection_id))
    }
}

/// Mock file chooser returning a fixed selection
pub struct MockFilePicker {
    selection: Option<PathBuf>,
    requested: Mutex<Vec<String>>,
}

impl MockFilePicker {
    pub fn returning(selection: Option<PathBuf>) -> Self {
        Self {
            selection,
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Extensions passed to the last `pick_file` call
    pub fn requested_extensions(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl FilePicker for MockFilePicker {
    async fn pick_file(&self, extensions: &[&str]) -> Option<PathBuf> {
        *self.requested.lock().unwrap() = extensions.iter().map(|e| e.to_string()).collect();
        self.selection.clone()
    }
}
