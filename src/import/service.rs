// # Import Wizard Service
//
// Single owner of the active wizard session. The UI sends commands through
// `ImportWizardHandle`; every transition happens here, one command at a time.
// Dispatch runs on its own task and reports back through the same command
// channel, so the state is never touched from two places.

use crate::api::InventoryBackend;
use crate::import::dispatcher::{DispatchOutcome, DistributionDispatcher};
use crate::import::handle::ImportWizardHandle;
use crate::import::types::DistributionMode;
use crate::import::updates::{NoticeLevel, WizardUpdate, WizardUpdates};
use crate::import::wizard::{WizardAction, WizardError, WizardState, WizardStep};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Commands accepted by the service
#[derive(Debug)]
pub(crate) enum WizardCommand {
    Open {
        collection_id: String,
        container_id: Option<String>,
    },
    Load {
        content: String,
        filename: String,
    },
    Next,
    Back,
    SetDistributionMode(DistributionMode),
    Import,
    Cancel,
    DispatchFinished(DispatchOutcome),
    Shutdown,
}

/// Who the service acts for
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// `None` when nobody is signed in; imports are refused
    pub user_id: Option<String>,
}

pub struct ImportWizardService {
    session: Session,
    dispatcher: DistributionDispatcher,
    state: Option<WizardState>,
    command_tx: mpsc::UnboundedSender<WizardCommand>,
    command_rx: mpsc::UnboundedReceiver<WizardCommand>,
    update_tx: mpsc::UnboundedSender<WizardUpdate>,
}

impl ImportWizardService {
    /// Start the service worker, returning a handle for the UI
    pub fn start(
        runtime_handle: tokio::runtime::Handle,
        backend: Arc<dyn InventoryBackend>,
        session: Session,
    ) -> ImportWizardHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        let service = ImportWizardService {
            session,
            dispatcher: DistributionDispatcher::new(backend),
            state: None,
            command_tx: command_tx.clone(),
            command_rx,
            update_tx,
        };

        runtime_handle.spawn(service.listen_for_commands());

        let updates = WizardUpdates::new(update_rx, runtime_handle);
        ImportWizardHandle::new(command_tx, updates)
    }

    async fn listen_for_commands(mut self) {
        info!("Import wizard service started");

        while let Some(command) = self.command_rx.recv().await {
            if matches!(command, WizardCommand::Shutdown) {
                break;
            }
            self.handle_command(command);
        }

        info!("Import wizard service stopped");
    }

    fn handle_command(&mut self, command: WizardCommand) {
        match command {
            WizardCommand::Open {
                collection_id,
                container_id,
            } => self.open(collection_id, container_id),
            WizardCommand::Load { content, filename } => {
                self.apply(|state| state.load(&content, &filename))
            }
            WizardCommand::Next => self.apply(WizardState::next),
            WizardCommand::Back => self.apply(WizardState::back),
            WizardCommand::SetDistributionMode(mode) => {
                self.apply(|state| state.set_distribution_mode(mode))
            }
            WizardCommand::Import => self.start_import(),
            WizardCommand::Cancel => self.cancel(),
            WizardCommand::DispatchFinished(outcome) => self.finish_import(outcome),
            WizardCommand::Shutdown => {}
        }
    }

    fn open(&mut self, collection_id: String, container_id: Option<String>) {
        if self.state.is_some() {
            warn!("Refusing to open import wizard: a session is already active");
            self.notify(NoticeLevel::Error, "An import is already open");
            return;
        }

        let state = WizardState::new(collection_id, container_id);
        info!(
            "Opened import wizard for collection {} (mode {})",
            state.collection_id, state.distribution_mode
        );
        self.state = Some(state.clone());
        self.publish(WizardUpdate::StateChanged(state));
    }

    /// Run a transition on the active session and publish the result
    fn apply<F>(&mut self, transition: F)
    where
        F: FnOnce(&mut WizardState) -> Result<(), WizardError>,
    {
        let Some(state) = self.state.as_mut() else {
            warn!("Ignoring wizard command: no active session");
            return;
        };

        match transition(state) {
            Ok(()) => {
                info!("Import wizard at {}", state.step);
                let snapshot = state.clone();
                self.publish(WizardUpdate::StateChanged(snapshot));
            }
            Err(e) => {
                warn!("Wizard command refused: {}", e);
                self.notify(NoticeLevel::Error, e.to_string());
            }
        }
    }

    fn start_import(&mut self) {
        let Some(state) = self.state.as_mut() else {
            error!("Import requested without an active session");
            return;
        };

        let Some(user_id) = self.session.user_id.clone() else {
            error!("Import requested while not signed in");
            self.notify(NoticeLevel::Error, "Sign in to import items");
            return;
        };

        let request = match state.begin_import() {
            Ok(request) => request,
            Err(e @ WizardError::InvalidAction { .. }) => {
                warn!("Wizard command refused: {}", e);
                self.notify(NoticeLevel::Error, e.to_string());
                return;
            }
            Err(e) => {
                error!("Cannot start import: {}", e);
                self.notify(NoticeLevel::Error, e.to_string());
                return;
            }
        };

        let snapshot = state.clone();
        self.publish(WizardUpdate::StateChanged(snapshot));

        let dispatcher = self.dispatcher.clone();
        let command_tx = self.command_tx.clone();
        tokio::spawn(async move {
            let outcome = dispatcher.dispatch(&user_id, request).await;
            if command_tx
                .send(WizardCommand::DispatchFinished(outcome))
                .is_err()
            {
                warn!("Import finished after the wizard service stopped");
            }
        });
    }

    fn finish_import(&mut self, outcome: DispatchOutcome) {
        let at_progress = self
            .state
            .as_ref()
            .is_some_and(|state| state.step == WizardStep::Progress);
        if !at_progress {
            warn!("Dropping import result: no session is waiting for one");
            return;
        }
        self.state = None;

        match outcome {
            DispatchOutcome::Success { summary, refresh } => {
                info!(
                    "Import complete: {} imported, {} failed",
                    summary.imported, summary.failed
                );
                let message = if summary.failed > 0 {
                    format!(
                        "Successfully imported {} items ({} failed)",
                        summary.imported, summary.failed
                    )
                } else {
                    format!("Successfully imported {} items", summary.imported)
                };
                self.notify(NoticeLevel::Success, message);
                self.publish(WizardUpdate::Closed {
                    refresh: Some(refresh),
                });
            }
            DispatchOutcome::Failed(message) => {
                self.notify(NoticeLevel::Error, format!("Import failed: {}", message));
                self.publish(WizardUpdate::Closed { refresh: None });
            }
        }
    }

    fn cancel(&mut self) {
        let Some(step) = self.state.as_ref().map(|state| state.step) else {
            warn!("Ignoring cancel: no active session");
            return;
        };

        if step == WizardStep::Progress {
            let e = WizardError::InvalidAction {
                step,
                action: WizardAction::Cancel,
            };
            warn!("Wizard command refused: {}", e);
            self.notify(NoticeLevel::Error, e.to_string());
            return;
        }

        info!("Import wizard cancelled at {}", step);
        self.state = None;
        self.publish(WizardUpdate::Closed { refresh: None });
    }

    fn notify(&self, level: NoticeLevel, message: impl Into<String>) {
        self.publish(WizardUpdate::Notice {
            level,
            message: message.into(),
        });
    }

    fn publish(&self, update: WizardUpdate) {
        // Only fails once the fan-out task is gone, i.e. during shutdown
        let _ = self.update_tx.send(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::dispatcher::CollectionRefresh;
    use crate::import::file_picker::SelectedFile;
    use crate::test_support::{BackendCall, MockBackend};
    use tokio::sync::mpsc::UnboundedReceiver;

    fn start(backend: Arc<MockBackend>, user_id: Option<&str>) -> ImportWizardHandle {
        ImportWizardService::start(
            tokio::runtime::Handle::current(),
            backend,
            Session {
                user_id: user_id.map(str::to_string),
            },
        )
    }

    async fn next_state(rx: &mut UnboundedReceiver<WizardUpdate>) -> WizardState {
        match rx.recv().await {
            Some(WizardUpdate::StateChanged(state)) => state,
            other => panic!("expected state change, got {:?}", other),
        }
    }

    async fn next_notice(rx: &mut UnboundedReceiver<WizardUpdate>) -> (NoticeLevel, String) {
        match rx.recv().await {
            Some(WizardUpdate::Notice { level, message }) => (level, message),
            other => panic!("expected notice, got {:?}", other),
        }
    }

    async fn at_settings(handle: &ImportWizardHandle, rx: &mut UnboundedReceiver<WizardUpdate>) {
        handle.open("col-1", Some("box-1".to_string())).unwrap();
        next_state(rx).await;
        handle
            .load(SelectedFile {
                content: "name,quantity\nMilk,2\nEggs,12\n".to_string(),
                filename: "pantry.csv".to_string(),
            })
            .unwrap();
        next_state(rx).await;
        handle.next().unwrap();
        assert_eq!(next_state(rx).await.step, WizardStep::Settings);
    }

    #[tokio::test]
    async fn test_successful_import_closes_with_fresh_collection() {
        let backend = Arc::new(MockBackend::new());
        let handle = start(backend.clone(), Some("user-1"));
        let mut rx = handle.subscribe();
        at_settings(&handle, &mut rx).await;

        handle.import().unwrap();

        assert_eq!(next_state(&mut rx).await.step, WizardStep::Progress);
        assert_eq!(
            next_notice(&mut rx).await,
            (
                NoticeLevel::Success,
                "Successfully imported 2 items".to_string()
            )
        );
        match rx.recv().await {
            Some(WizardUpdate::Closed {
                refresh: Some(CollectionRefresh::Fresh(collection)),
            }) => assert_eq!(collection.id, "col-1"),
            other => panic!("expected close, got {:?}", other),
        }
        assert!(matches!(
            backend.calls()[0],
            BackendCall::ImportToContainer { .. }
        ));
    }

    #[tokio::test]
    async fn test_failed_import_dismisses_wizard() {
        let backend = Arc::new(MockBackend::new().fail_imports(400, "bad records"));
        let handle = start(backend, Some("user-1"));
        let mut rx = handle.subscribe();
        at_settings(&handle, &mut rx).await;

        handle.import().unwrap();
        next_state(&mut rx).await;

        let (level, message) = next_notice(&mut rx).await;
        assert_eq!(level, NoticeLevel::Error);
        assert!(message.starts_with("Import failed:"));
        assert!(message.contains("bad records"));
        assert_eq!(
            rx.recv().await,
            Some(WizardUpdate::Closed { refresh: None })
        );
    }

    #[tokio::test]
    async fn test_import_without_user_makes_no_call() {
        let backend = Arc::new(MockBackend::new());
        let handle = start(backend.clone(), None);
        let mut rx = handle.subscribe();
        at_settings(&handle, &mut rx).await;

        handle.import().unwrap();
        let (level, _) = next_notice(&mut rx).await;

        assert_eq!(level, NoticeLevel::Error);
        assert!(backend.calls().is_empty());

        // Still on Settings: going back works
        handle.back().unwrap();
        assert_eq!(next_state(&mut rx).await.step, WizardStep::Preview);
    }

    #[tokio::test]
    async fn test_second_open_is_refused() {
        let handle = start(Arc::new(MockBackend::new()), Some("user-1"));
        let mut rx = handle.subscribe();

        handle.open("col-1", None).unwrap();
        next_state(&mut rx).await;
        handle.open("col-2", None).unwrap();

        let (level, _) = next_notice(&mut rx).await;
        assert_eq!(level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_parse_error_keeps_upload_step() {
        let handle = start(Arc::new(MockBackend::new()), Some("user-1"));
        let mut rx = handle.subscribe();
        handle.open("col-1", None).unwrap();
        next_state(&mut rx).await;

        handle.load(SelectedFile::pasted("name\n")).unwrap();
        next_notice(&mut rx).await;

        // Upload still accepts a new file
        handle.load(SelectedFile::pasted("[{\"name\":\"Book\"}]")).unwrap();
        let state = next_state(&mut rx).await;
        assert_eq!(state.step, WizardStep::Preview);
        assert_eq!(state.record_count(), 1);
    }

    #[tokio::test]
    async fn test_partial_failure_reports_failed_count() {
        let backend = Arc::new(MockBackend::new().reject_records(1));
        let handle = start(backend, Some("user-1"));
        let mut rx = handle.subscribe();
        at_settings(&handle, &mut rx).await;

        handle.import().unwrap();
        next_state(&mut rx).await;

        assert_eq!(
            next_notice(&mut rx).await,
            (
                NoticeLevel::Success,
                "Successfully imported 1 items (1 failed)".to_string()
            )
        );
        assert!(matches!(
            rx.recv().await,
            Some(WizardUpdate::Closed {
                refresh: Some(CollectionRefresh::Fresh(_))
            })
        ));
    }

    #[tokio::test]
    async fn test_cancel_during_progress_is_refused() {
        let backend = Arc::new(MockBackend::new());
        let handle = start(backend.clone(), Some("user-1"));
        let mut rx = handle.subscribe();
        at_settings(&handle, &mut rx).await;

        // Queued behind Import, so it lands before the dispatch result
        handle.import().unwrap();
        handle.cancel().unwrap();

        assert_eq!(next_state(&mut rx).await.step, WizardStep::Progress);
        let (level, message) = next_notice(&mut rx).await;
        assert_eq!(level, NoticeLevel::Error);
        assert!(message.contains("Cancel is not available"));

        // The import still runs to completion
        let (level, _) = next_notice(&mut rx).await;
        assert_eq!(level, NoticeLevel::Success);
        assert!(matches!(
            rx.recv().await,
            Some(WizardUpdate::Closed {
                refresh: Some(CollectionRefresh::Fresh(_))
            })
        ));
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_cancel_closes_session_and_allows_reopen() {
        let handle = start(Arc::new(MockBackend::new()), Some("user-1"));
        let mut rx = handle.subscribe();
        at_settings(&handle, &mut rx).await;

        handle.cancel().unwrap();
        assert_eq!(
            rx.recv().await,
            Some(WizardUpdate::Closed { refresh: None })
        );

        handle.open("col-1", None).unwrap();
        assert_eq!(next_state(&mut rx).await.step, WizardStep::Upload);
    }
}
