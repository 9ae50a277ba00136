use crate::import::{select_file, AcquireError, RfdFilePicker, SelectedFile};
use crate::ui::components::import_hooks::{log_send_error, use_import_wizard};
use dioxus::prelude::*;
use tracing::{debug, warn};

/// Step 1: choose a file or paste data
#[component]
pub fn UploadStep() -> Element {
    let import_wizard = use_import_wizard();
    let mut pasted = use_signal(String::new);
    let mut read_error = use_signal(|| None::<String>);
    let mut is_reading = use_signal(|| false);

    let choose_file = {
        let import_wizard = import_wizard.clone();
        move |_: MouseEvent| {
            let import_wizard = import_wizard.clone();
            spawn(async move {
                is_reading.set(true);
                read_error.set(None);

                match select_file(&RfdFilePicker).await {
                    Ok(file) => log_send_error(import_wizard.load(file)),
                    Err(AcquireError::NoFileSelected) => debug!("File selection dismissed"),
                    Err(e) => {
                        warn!("{}", e);
                        read_error.set(Some(e.to_string()));
                    }
                }

                is_reading.set(false);
            });
        }
    };

    let use_pasted = move |_: MouseEvent| {
        let text = pasted.read().clone();
        log_send_error(import_wizard.load(SelectedFile::pasted(text)));
    };

    rsx! {
        div { class: "space-y-4",
            p { class: "text-gray-300",
                "Upload a CSV or JSON file. Each row or object becomes one item; a name, title or item column is required."
            }
            button {
                class: "bg-blue-600 hover:bg-blue-700 text-white px-4 py-2 rounded-lg disabled:bg-gray-600",
                disabled: is_reading(),
                onclick: choose_file,
                if is_reading() {
                    "Reading..."
                } else {
                    "Select CSV or JSON File"
                }
            }
            if let Some(err) = read_error() {
                div { class: "bg-red-900 border border-red-700 text-red-100 px-4 py-2 rounded",
                    "{err}"
                }
            }
            div {
                label { class: "block text-sm font-medium text-gray-400 mb-2", "Or paste data" }
                textarea {
                    class: "w-full h-40 p-3 bg-gray-900 border border-gray-700 rounded-lg text-white font-mono text-sm",
                    placeholder: "name,quantity,unit\nMilk,2,liters",
                    value: "{pasted}",
                    oninput: move |evt| pasted.set(evt.value()),
                }
                button {
                    class: "mt-2 bg-gray-700 hover:bg-gray-600 text-white px-4 py-2 rounded-lg disabled:opacity-50",
                    disabled: pasted.read().trim().is_empty(),
                    onclick: use_pasted,
                    "Use Pasted Data"
                }
            }
        }
    }
}
