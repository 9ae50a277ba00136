use super::preview_step::PreviewStep;
use super::progress_step::ProgressStep;
use super::settings_step::SettingsStep;
use super::upload_step::UploadStep;
use crate::import::{WizardState, WizardStep};
use crate::ui::components::import_hooks::{log_send_error, use_import_state, use_import_wizard};
use dioxus::prelude::*;

/// Modal hosting the four import steps
#[component]
pub fn ImportDialog() -> Element {
    let import_wizard = use_import_wizard();
    let wizard = use_import_state().wizard;

    let Some(state) = wizard() else {
        return rsx! {};
    };
    let can_cancel = state.can_cancel();

    rsx! {
        div { class: "fixed inset-0 bg-black/50 flex items-center justify-center z-[3000]",
            div {
                class: "bg-gray-800 rounded-lg p-6 max-w-3xl w-full mx-4",
                onclick: move |evt| evt.stop_propagation(),
                div { class: "flex items-center justify-between mb-4",
                    h2 { class: "text-xl font-bold text-white", "Import Items" }
                    if can_cancel {
                        button {
                            class: "text-gray-400 hover:text-white",
                            onclick: move |_| log_send_error(import_wizard.cancel()),
                            "✕"
                        }
                    }
                }
                StepIndicator { step: state.step }
                StepBody { state }
            }
        }
    }
}

#[component]
fn StepIndicator(step: WizardStep) -> Element {
    let steps = [
        WizardStep::Upload,
        WizardStep::Preview,
        WizardStep::Settings,
        WizardStep::Progress,
    ];

    rsx! {
        div { class: "flex gap-2 mb-6",
            for s in steps {
                div {
                    class: if s == step { "flex-1 text-center text-sm py-1 border-b-2 border-blue-500 text-white" } else { "flex-1 text-center text-sm py-1 border-b-2 border-gray-700 text-gray-500" },
                    "{s}"
                }
            }
        }
    }
}

#[component]
fn StepBody(state: WizardState) -> Element {
    match state.step {
        WizardStep::Upload => rsx! { UploadStep {} },
        WizardStep::Preview => rsx! {
            PreviewStep {
                preview: state.preview(),
                record_count: state.record_count(),
            }
        },
        WizardStep::Settings => rsx! {
            SettingsStep {
                offers_target: state.offers_target(),
                mode: state.distribution_mode,
                record_count: state.record_count(),
            }
        },
        WizardStep::Progress => rsx! { ProgressStep { record_count: state.record_count() } },
    }
}
