use crate::api::InventoryBackend;
use crate::config;
use crate::import;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub config: config::Config,
    pub backend: Arc<dyn InventoryBackend>,
    pub import_wizard: import::ImportWizardHandle,
}
