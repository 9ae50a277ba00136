use crate::api::Collection;
use crate::import::{
    CollectionRefresh, ImportWizardHandle, NoticeLevel, WizardError, WizardState, WizardUpdate,
};
use crate::AppContext;
use dioxus::prelude::*;
use tracing::{error, trace};

/// Hook to access the import wizard service
pub fn use_import_wizard() -> ImportWizardHandle {
    let context = use_context::<AppContext>();
    context.import_wizard.clone()
}

/// A message shown in the toast area
#[derive(Debug, Clone, PartialEq)]
pub struct ToastMessage {
    /// Increases with every notice so a stale hide timer can tell it was replaced
    pub seq: u64,
    pub level: NoticeLevel,
    pub text: String,
}

/// UI-side mirror of the wizard service, written only by the subscriber loop
#[derive(Clone, Copy)]
pub struct SharedImportState {
    pub wizard: Signal<Option<WizardState>>,
    pub collection: Signal<Option<Collection>>,
    pub toast: Signal<Option<ToastMessage>>,
}

/// Provider component that keeps the import state in sync with the service
#[component]
pub fn ImportStateProvider(children: Element) -> Element {
    let shared_state = SharedImportState {
        wizard: use_signal(|| None),
        collection: use_signal(|| None),
        toast: use_signal(|| None),
    };
    use_context_provider(|| shared_state);

    let import_wizard = use_import_wizard();
    use_effect({
        let import_wizard = import_wizard.clone();
        let mut wizard = shared_state.wizard;
        let mut collection = shared_state.collection;
        let mut toast = shared_state.toast;
        move || {
            let import_wizard = import_wizard.clone();
            spawn(async move {
                let mut updates_rx = import_wizard.subscribe();
                let mut toast_seq = 0;
                while let Some(update) = updates_rx.recv().await {
                    trace!("Wizard update: {:?}", update);
                    match update {
                        WizardUpdate::StateChanged(state) => wizard.set(Some(state)),
                        WizardUpdate::Notice { level, message } => {
                            toast_seq += 1;
                            toast.set(Some(ToastMessage {
                                seq: toast_seq,
                                level,
                                text: message,
                            }));
                        }
                        WizardUpdate::Closed { refresh } => {
                            wizard.set(None);
                            if let Some(CollectionRefresh::Fresh(fresh)) = refresh {
                                collection.set(Some(fresh));
                            }
                        }
                    }
                }
            });
        }
    });

    rsx! {
        {children}
    }
}

/// Hook to access the import state mirrors
pub fn use_import_state() -> SharedImportState {
    use_context::<SharedImportState>()
}

/// Log a command that could not reach the service
pub fn log_send_error(result: Result<(), WizardError>) {
    if let Err(e) = result {
        error!("Failed to send wizard command: {}", e);
    }
}
