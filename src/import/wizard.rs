// # Import Wizard
//
// Four-step state machine behind the import dialog:
//
//   Upload -> Preview -> Settings -> Progress
//
// Back-navigation is allowed from Preview and Settings. Progress is terminal:
// only the dispatch result closes the session, never the user.

use crate::import::parser::{self, ParseError};
use crate::import::types::{DistributionMode, ImportBatch, ImportRecord};
use std::fmt;
use thiserror::Error;
use tracing::info;

/// How many records/errors the preview lists before summarizing the rest
pub const PREVIEW_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Upload,
    Preview,
    Settings,
    Progress,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Upload => 1,
            WizardStep::Preview => 2,
            WizardStep::Settings => 3,
            WizardStep::Progress => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Upload => "Upload",
            WizardStep::Preview => "Preview",
            WizardStep::Settings => "Settings",
            WizardStep::Progress => "Progress",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}: {}", self.number(), self.title())
    }
}

/// User actions the wizard understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    Load,
    Next,
    Back,
    ChooseMode,
    Import,
    Cancel,
}

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("{action:?} is not available on {step}")]
    InvalidAction {
        step: WizardStep,
        action: WizardAction,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("no valid items to import")]
    NothingToImport,
    #[error("no target container was selected for this import")]
    NoTargetContainer,
    #[error("import wizard service is not running")]
    ServiceStopped,
}

/// Everything the dispatcher needs to submit one import
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
    pub collection_id: String,
    pub target_container_id: Option<String>,
    pub distribution_mode: DistributionMode,
    pub records: Vec<ImportRecord>,
}

/// Session state of one import dialog
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    pub step: WizardStep,
    pub batch: Option<ImportBatch>,
    pub filename: String,
    pub target_container_id: Option<String>,
    pub distribution_mode: DistributionMode,
    pub collection_id: String,
}

impl WizardState {
    /// Start a session. A container id seeds the `target` distribution mode.
    pub fn new(collection_id: impl Into<String>, container_id: Option<String>) -> Self {
        let target_container_id = container_id.filter(|id| !id.trim().is_empty());
        let distribution_mode = if target_container_id.is_some() {
            DistributionMode::Target
        } else {
            DistributionMode::Automatic
        };

        Self {
            step: WizardStep::Upload,
            batch: None,
            filename: String::new(),
            target_container_id,
            distribution_mode,
            collection_id: collection_id.into(),
        }
    }

    /// Whether Settings offers the "import to selected container" option
    pub fn offers_target(&self) -> bool {
        self.target_container_id.is_some()
    }

    fn require(&self, step: WizardStep, action: WizardAction) -> Result<(), WizardError> {
        if self.step == step {
            Ok(())
        } else {
            Err(WizardError::InvalidAction {
                step: self.step,
                action,
            })
        }
    }

    /// Parse uploaded or pasted content and move to Preview.
    ///
    /// A structural parse error leaves the wizard on Upload.
    pub fn load(&mut self, content: &str, filename: &str) -> Result<(), WizardError> {
        self.require(WizardStep::Upload, WizardAction::Load)?;

        let batch = parser::parse(content, filename)?;
        info!(
            "Loaded {} ({} records, {} errors)",
            filename,
            batch.records.len(),
            batch.errors.len()
        );

        self.batch = Some(batch);
        self.filename = filename.to_string();
        self.step = WizardStep::Preview;
        Ok(())
    }

    /// Preview -> Settings
    pub fn next(&mut self) -> Result<(), WizardError> {
        self.require(WizardStep::Preview, WizardAction::Next)?;

        if self.record_count() == 0 {
            return Err(WizardError::NothingToImport);
        }
        self.step = WizardStep::Settings;
        Ok(())
    }

    /// Preview -> Upload, Settings -> Preview
    pub fn back(&mut self) -> Result<(), WizardError> {
        self.step = match self.step {
            WizardStep::Preview => WizardStep::Upload,
            WizardStep::Settings => WizardStep::Preview,
            step => {
                return Err(WizardError::InvalidAction {
                    step,
                    action: WizardAction::Back,
                })
            }
        };
        Ok(())
    }

    /// Choose a distribution option on Settings; the step does not change
    pub fn set_distribution_mode(&mut self, mode: DistributionMode) -> Result<(), WizardError> {
        self.require(WizardStep::Settings, WizardAction::ChooseMode)?;

        if mode == DistributionMode::Target && !self.offers_target() {
            return Err(WizardError::NoTargetContainer);
        }
        self.distribution_mode = mode;
        Ok(())
    }

    /// Settings -> Progress, handing back what has to be dispatched
    pub fn begin_import(&mut self) -> Result<DispatchRequest, WizardError> {
        self.require(WizardStep::Settings, WizardAction::Import)?;

        let records = self
            .batch
            .as_ref()
            .map(|batch| batch.records.clone())
            .filter(|records| !records.is_empty())
            .ok_or(WizardError::NothingToImport)?;

        self.step = WizardStep::Progress;
        Ok(DispatchRequest {
            collection_id: self.collection_id.clone(),
            target_container_id: self.target_container_id.clone(),
            distribution_mode: self.distribution_mode,
            records,
        })
    }

    /// The dialog may be closed by the user anywhere except Progress
    pub fn can_cancel(&self) -> bool {
        self.step != WizardStep::Progress
    }

    pub fn record_count(&self) -> usize {
        self.batch.as_ref().map_or(0, |batch| batch.records.len())
    }

    pub fn preview(&self) -> Option<BatchPreview> {
        self.batch
            .as_ref()
            .map(|batch| BatchPreview::new(&self.filename, batch))
    }
}

/// Condensed view of a batch for the Preview step
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPreview {
    pub filename: String,
    pub format: String,
    pub records: Vec<ImportRecord>,
    pub hidden_records: usize,
    pub errors: Vec<String>,
    pub hidden_errors: usize,
}

impl BatchPreview {
    fn new(filename: &str, batch: &ImportBatch) -> Self {
        Self {
            filename: filename.to_string(),
            format: batch.format.to_string(),
            records: batch.records.iter().take(PREVIEW_LIMIT).cloned().collect(),
            hidden_records: batch.records.len().saturating_sub(PREVIEW_LIMIT),
            errors: batch.errors.iter().take(PREVIEW_LIMIT).cloned().collect(),
            hidden_errors: batch.errors.len().saturating_sub(PREVIEW_LIMIT),
        }
    }

    pub fn total_records(&self) -> usize {
        self.records.len() + self.hidden_records
    }

    pub fn total_errors(&self) -> usize {
        self.errors.len() + self.hidden_errors
    }

    pub fn more_records_label(&self) -> Option<String> {
        (self.hidden_records > 0).then(|| format!("+{} more", self.hidden_records))
    }

    pub fn more_errors_label(&self) -> Option<String> {
        (self.hidden_errors > 0).then(|| format!("+{} more", self.hidden_errors))
    }
}
