use crate::import::{BatchPreview, ImportRecord};
use crate::ui::components::import_hooks::{log_send_error, use_import_wizard};
use dioxus::prelude::*;

/// Step 2: show what was parsed
#[component]
pub fn PreviewStep(preview: Option<BatchPreview>, record_count: usize) -> Element {
    let import_wizard = use_import_wizard();
    let back_wizard = import_wizard.clone();

    rsx! {
        if let Some(preview) = preview {
            div { class: "space-y-4",
                p { class: "text-gray-300",
                    "{preview.filename} ({preview.format}): {preview.total_records()} items, {preview.total_errors()} errors"
                }
                if !preview.records.is_empty() {
                    div { class: "space-y-1",
                        for (i, record) in preview.records.iter().enumerate() {
                            RecordRow { key: "{i}", record: record.clone() }
                        }
                        if let Some(more) = preview.more_records_label() {
                            p { class: "text-sm text-gray-500", "{more}" }
                        }
                    }
                }
                if !preview.errors.is_empty() {
                    div { class: "bg-red-900/40 border border-red-800 rounded p-3 space-y-1",
                        for (i, message) in preview.errors.iter().enumerate() {
                            p { key: "{i}", class: "text-sm text-red-200", "{message}" }
                        }
                        if let Some(more) = preview.more_errors_label() {
                            p { class: "text-sm text-red-300", "{more}" }
                        }
                    }
                }
            }
        }
        if record_count == 0 {
            p { class: "mt-4 text-yellow-400", "No valid items to import." }
        }
        div { class: "flex justify-between mt-6",
            button {
                class: "px-4 py-2 bg-gray-700 hover:bg-gray-600 text-white rounded-lg",
                onclick: move |_| log_send_error(back_wizard.back()),
                "Back"
            }
            button {
                class: "px-4 py-2 bg-blue-600 hover:bg-blue-700 text-white rounded-lg disabled:bg-gray-600",
                disabled: record_count == 0,
                onclick: move |_| log_send_error(import_wizard.next()),
                "Next"
            }
        }
    }
}

#[component]
fn RecordRow(record: ImportRecord) -> Element {
    let quantity = match (record.quantity, record.unit.as_deref()) {
        (Some(q), Some(unit)) => format!("{} {}", q, unit),
        (Some(q), None) => q.to_string(),
        (None, _) => String::new(),
    };
    let tags = record.tags.join(", ");

    rsx! {
        div { class: "flex gap-4 text-sm bg-gray-900 rounded px-3 py-2",
            span { class: "font-medium text-white flex-1",
                if record.name.is_empty() {
                    span { class: "italic text-red-300", "(no name)" }
                } else {
                    "{record.name}"
                }
            }
            span { class: "text-gray-400 w-24", "{quantity}" }
            span { class: "text-gray-500 flex-1", "{tags}" }
        }
    }
}
