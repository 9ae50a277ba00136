use dioxus::prelude::*;
use tracing::debug;

use super::collection_page::CollectionPage;
use super::import_hooks::ImportStateProvider;
use super::toast::Toast;

#[component]
pub fn App() -> Element {
    debug!("Rendering app component");

    rsx! {
        ImportStateProvider {
            div { class: "min-h-screen bg-gray-900 text-white",
                CollectionPage {}
                Toast {}
            }
        }
    }
}
