use nishiki::import::{WizardState, WizardUpdate};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// Initialize tracing for tests with proper test output handling
pub fn tracing_init() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Wait for the next wizard update, failing the test if none arrives
pub async fn next_update(rx: &mut UnboundedReceiver<WizardUpdate>) -> WizardUpdate {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for wizard update")
        .expect("wizard update channel closed")
}

/// Wait for the next update and require it to be a state change
pub async fn next_state(rx: &mut UnboundedReceiver<WizardUpdate>) -> WizardState {
    match next_update(rx).await {
        WizardUpdate::StateChanged(state) => state,
        other => panic!("expected state change, got {:?}", other),
    }
}
