use crate::api::{Collection, Container};
use crate::ui::components::import::ImportDialog;
use crate::ui::components::import_hooks::{log_send_error, use_import_state, use_import_wizard};
use crate::AppContext;
use dioxus::prelude::*;
use tracing::{debug, error};

/// Collection overview with the import entry points
#[component]
pub fn CollectionPage() -> Element {
    let context = use_context::<AppContext>();
    let import_state = use_import_state();
    let mut collection = import_state.collection;
    let mut loading = use_signal(|| true);
    let mut load_error = use_signal(|| None::<String>);

    use_effect({
        let context = context.clone();
        move || {
            let context = context.clone();
            spawn(async move {
                let (Some(user_id), Some(collection_id)) = (
                    context.config.user_id.clone(),
                    context.config.collection_id.clone(),
                ) else {
                    load_error.set(Some(
                        "Set NISHIKI_USER_ID and NISHIKI_COLLECTION_ID to open a collection"
                            .to_string(),
                    ));
                    loading.set(false);
                    return;
                };

                debug!("Loading collection {}", collection_id);
                match context.backend.get_collection(&user_id, &collection_id).await {
                    Ok(fetched) => collection.set(Some(fetched)),
                    Err(e) => {
                        error!("Failed to load collection {}: {}", collection_id, e);
                        load_error.set(Some(format!("Failed to load collection: {}", e)));
                    }
                }
                loading.set(false);
            });
        }
    });

    rsx! {
        div { class: "container mx-auto p-6",
            if loading() {
                div { class: "flex justify-center items-center py-12",
                    div { class: "animate-spin rounded-full h-12 w-12 border-b-2 border-blue-500" }
                    p { class: "ml-4 text-gray-300", "Loading collection..." }
                }
            } else if let Some(err) = load_error() {
                div { class: "bg-red-900 border border-red-700 text-red-100 px-4 py-3 rounded mb-4",
                    "{err}"
                }
            } else if let Some(collection) = collection() {
                CollectionView { collection }
            }
        }
        if import_state.wizard.read().is_some() {
            ImportDialog {}
        }
    }
}

#[component]
fn CollectionView(collection: Collection) -> Element {
    let import_wizard = use_import_wizard();
    let collection_id = collection.id.clone();

    rsx! {
        div { class: "flex items-center justify-between mb-6",
            div {
                h1 { class: "text-3xl font-bold", "{collection.name}" }
                p { class: "text-gray-400",
                    "{collection.containers.len()} containers · {collection.object_count()} items"
                }
                if let Some(updated) = collection.updated_label() {
                    p { class: "text-sm text-gray-500", "Updated {updated}" }
                }
            }
            button {
                class: "bg-blue-600 hover:bg-blue-700 text-white font-bold py-2 px-4 rounded",
                onclick: move |_| log_send_error(import_wizard.open(collection_id.clone(), None)),
                "Import"
            }
        }

        if collection.containers.is_empty() {
            p { class: "text-gray-500", "This collection has no containers yet." }
        } else {
            div { class: "grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4",
                for container in collection.containers.clone() {
                    ContainerCard {
                        key: "{container.id}",
                        collection_id: collection.id.clone(),
                        container,
                    }
                }
            }
        }
    }
}

#[component]
fn ContainerCard(collection_id: String, container: Container) -> Element {
    let import_wizard = use_import_wizard();
    let container_id = container.id.clone();

    rsx! {
        div { class: "bg-gray-800 rounded-lg p-4",
            div { class: "flex items-center justify-between mb-2",
                h2 { class: "text-lg font-semibold", "{container.name}" }
                button {
                    class: "text-sm text-blue-400 hover:text-blue-300",
                    onclick: move |_| {
                        log_send_error(
                            import_wizard.open(collection_id.clone(), Some(container_id.clone())),
                        )
                    },
                    "Import here"
                }
            }
            if !container.description.is_empty() {
                p { class: "text-sm text-gray-400 mb-2", "{container.description}" }
            }
            ul { class: "text-sm text-gray-300 space-y-1",
                for object in container.objects.iter() {
                    li { key: "{object.id}",
                        "{object.name}"
                        if object.quantity > 0.0 {
                            span { class: "text-gray-500", " × {object.quantity} {object.unit}" }
                        }
                    }
                }
            }
        }
    }
}
