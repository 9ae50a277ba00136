// # Import Module
//
// Bulk import of CSV/JSON files into a collection:
//
// - **Parser**: Turns raw CSV or JSON text into an `ImportBatch`
// - **FilePicker**: Host file chooser plus text decoding
// - **Wizard**: Upload -> Preview -> Settings -> Progress state machine
// - **Dispatcher**: Sends records to the backend and re-fetches the collection
// - **ImportWizardService**: Owns the active session and runs the dispatch
//
// Public API:
// - `ImportWizardService`: Create and start the service
// - `ImportWizardHandle`: Send user actions and subscribe to updates
// - `WizardUpdate`: State changes, notices and session close events

mod dispatcher;
mod file_picker;
mod handle;
mod parser;
mod service;
mod types;
mod updates;
mod wizard;

pub use dispatcher::{
    to_wire_record, CollectionRefresh, DispatchOutcome, DispatchPlan, DistributionDispatcher,
};
pub use file_picker::{
    select_file, select_file_with, AcquireError, FilePicker, RfdFilePicker, SelectedFile,
    IMPORT_EXTENSIONS, PASTED_DATA_FILENAME,
};
pub use handle::ImportWizardHandle;
pub use parser::{detect_format, parse, parse_csv, parse_json, ParseError};
pub use service::{ImportWizardService, Session};
pub use types::{DistributionMode, ImportBatch, ImportFormat, ImportRecord, PropertyValue};
pub use updates::{NoticeLevel, WizardUpdate, WizardUpdates};
pub use wizard::{
    BatchPreview, DispatchRequest, WizardAction, WizardError, WizardState, WizardStep,
    PREVIEW_LIMIT,
};
