mod import_dialog;
mod preview_step;
mod progress_step;
mod settings_step;
mod upload_step;

pub use import_dialog::ImportDialog;
