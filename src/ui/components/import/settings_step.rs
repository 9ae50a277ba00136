use crate::import::DistributionMode;
use crate::ui::components::import_hooks::{log_send_error, use_import_wizard};
use dioxus::prelude::*;

/// Step 3: choose where the items go
#[component]
pub fn SettingsStep(offers_target: bool, mode: DistributionMode, record_count: usize) -> Element {
    let import_wizard = use_import_wizard();
    let target_wizard = import_wizard.clone();
    let automatic_wizard = import_wizard.clone();
    let back_wizard = import_wizard.clone();

    rsx! {
        div { class: "space-y-3",
            p { class: "text-gray-300", "Where should {record_count} items go?" }
            if offers_target {
                label { class: "flex items-start gap-3 bg-gray-900 rounded-lg p-3 cursor-pointer",
                    input {
                        r#type: "radio",
                        name: "distribution",
                        checked: mode == DistributionMode::Target,
                        onchange: move |_| {
                            log_send_error(target_wizard.set_distribution_mode(DistributionMode::Target))
                        },
                    }
                    div {
                        div { class: "text-white", "Import to selected container" }
                        div { class: "text-sm text-gray-500", "All items go into the container you started from." }
                    }
                }
            }
            label { class: "flex items-start gap-3 bg-gray-900 rounded-lg p-3 cursor-pointer",
                input {
                    r#type: "radio",
                    name: "distribution",
                    checked: mode == DistributionMode::Automatic,
                    onchange: move |_| {
                        log_send_error(
                            automatic_wizard.set_distribution_mode(DistributionMode::Automatic),
                        )
                    },
                }
                div {
                    div { class: "text-white", "Distribute automatically" }
                    div { class: "text-sm text-gray-500", "Items are placed across containers based on capacity and type." }
                }
            }
        }
        div { class: "flex justify-between mt-6",
            button {
                class: "px-4 py-2 bg-gray-700 hover:bg-gray-600 text-white rounded-lg",
                onclick: move |_| log_send_error(back_wizard.back()),
                "Back"
            }
            button {
                class: "px-4 py-2 bg-green-600 hover:bg-green-700 text-white rounded-lg",
                onclick: move |_| log_send_error(import_wizard.import()),
                "Import"
            }
        }
    }
}
