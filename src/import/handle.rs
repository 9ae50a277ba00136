// # Import Wizard Handle
//
// Cloneable front door to the wizard service: send user actions, subscribe to
// updates. Commands are fire-and-forget; outcomes arrive as `WizardUpdate`s.

use crate::import::file_picker::SelectedFile;
use crate::import::service::WizardCommand;
use crate::import::types::DistributionMode;
use crate::import::updates::{WizardUpdate, WizardUpdates};
use crate::import::wizard::WizardError;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct ImportWizardHandle {
    command_tx: mpsc::UnboundedSender<WizardCommand>,
    updates: WizardUpdates,
}

impl ImportWizardHandle {
    pub(crate) fn new(
        command_tx: mpsc::UnboundedSender<WizardCommand>,
        updates: WizardUpdates,
    ) -> Self {
        Self {
            command_tx,
            updates,
        }
    }

    fn send(&self, command: WizardCommand) -> Result<(), WizardError> {
        self.command_tx
            .send(command)
            .map_err(|_| WizardError::ServiceStopped)
    }

    /// Start an import session for a collection, optionally from one container
    pub fn open(
        &self,
        collection_id: impl Into<String>,
        container_id: Option<String>,
    ) -> Result<(), WizardError> {
        self.send(WizardCommand::Open {
            collection_id: collection_id.into(),
            container_id,
        })
    }

    /// Hand a chosen or pasted file to the Upload step
    pub fn load(&self, file: SelectedFile) -> Result<(), WizardError> {
        self.send(WizardCommand::Load {
            content: file.content,
            filename: file.filename,
        })
    }

    pub fn next(&self) -> Result<(), WizardError> {
        self.send(WizardCommand::Next)
    }

    pub fn back(&self) -> Result<(), WizardError> {
        self.send(WizardCommand::Back)
    }

    pub fn set_distribution_mode(&self, mode: DistributionMode) -> Result<(), WizardError> {
        self.send(WizardCommand::SetDistributionMode(mode))
    }

    pub fn import(&self) -> Result<(), WizardError> {
        self.send(WizardCommand::Import)
    }

    pub fn cancel(&self) -> Result<(), WizardError> {
        self.send(WizardCommand::Cancel)
    }

    /// Stop the service worker. Pending commands after this are dropped.
    pub fn shutdown(&self) -> Result<(), WizardError> {
        self.send(WizardCommand::Shutdown)
    }

    /// Receive every update published from now on
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<WizardUpdate> {
        self.updates.subscribe()
    }
}
