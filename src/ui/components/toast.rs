use crate::import::NoticeLevel;
use crate::ui::components::import_hooks::{use_import_state, ToastMessage};
use dioxus::prelude::*;
use std::time::Duration;

const TOAST_DURATION: Duration = Duration::from_secs(4);

/// Shows the latest wizard notice and hides it after a few seconds
#[component]
pub fn Toast() -> Element {
    let mut toast = use_import_state().toast;

    use_effect(move || {
        let Some(shown) = toast.read().as_ref().map(|message| message.seq) else {
            return;
        };
        spawn(async move {
            tokio::time::sleep(TOAST_DURATION).await;
            // A newer notice restarts its own timer
            if is_showing(toast.peek().as_ref(), shown) {
                toast.set(None);
            }
        });
    });

    let Some(message) = toast() else {
        return rsx! {};
    };

    let class = match message.level {
        NoticeLevel::Success => "bg-green-700 border-green-500",
        NoticeLevel::Info => "bg-gray-700 border-gray-500",
        NoticeLevel::Error => "bg-red-800 border-red-600",
    };

    rsx! {
        div { class: "fixed bottom-6 right-6 z-[4000] px-4 py-3 rounded-lg border text-white shadow-lg {class}",
            onclick: move |_| toast.set(None),
            "{message.text}"
        }
    }
}

/// Whether the toast on screen is still the one with sequence number `seq`
fn is_showing(current: Option<&ToastMessage>, seq: u64) -> bool {
    current.is_some_and(|message| message.seq == seq)
}
