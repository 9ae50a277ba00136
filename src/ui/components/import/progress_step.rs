use dioxus::prelude::*;

/// Step 4: waiting on the backend. There is no way out until it answers.
#[component]
pub fn ProgressStep(record_count: usize) -> Element {
    rsx! {
        div { class: "flex flex-col items-center py-10",
            div { class: "animate-spin rounded-full h-12 w-12 border-b-2 border-blue-500 mb-4" }
            p { class: "text-gray-300", "Importing {record_count} items..." }
        }
    }
}
