use nishiki::api::ApiClient;
use nishiki::config::Config;
use nishiki::import::{ImportWizardService, Session};
use nishiki::ui::{make_config, App};
use nishiki::AppContext;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nishiki=info")),
        )
        .init();

    let config = Config::load().expect("Failed to load configuration");

    // Services run on their own runtime; the UI thread only talks to them by message
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let runtime_handle = runtime.handle().clone();

    let backend = {
        let _guard = runtime.enter();
        ApiClient::new(
            config.api_url.clone(),
            config.access_token.clone(),
            config.request_timeout,
        )
        .expect("Failed to create API client")
    };
    let backend = Arc::new(backend);

    let import_wizard = ImportWizardService::start(
        runtime_handle,
        backend.clone(),
        Session {
            user_id: config.user_id.clone(),
        },
    );

    let app_context = AppContext {
        config,
        backend,
        import_wizard,
    };

    info!("Starting desktop app");
    dioxus::LaunchBuilder::desktop()
        .with_cfg(make_config())
        .with_context(app_context)
        .launch(App);

    runtime.shutdown_background();
}
