pub mod app;
pub mod collection_page;
pub mod import;
pub mod import_hooks;
pub mod toast;

pub use app::App;
pub use collection_page::CollectionPage;
pub use import::ImportDialog;
pub use toast::Toast;
