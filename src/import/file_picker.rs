use chardetng::EncodingDetector;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Filename handed to the parser for pasted text. It carries no extension so
/// the format is always sniffed from the content.
pub const PASTED_DATA_FILENAME: &str = "pasted data";

/// Extensions the chooser offers
pub const IMPORT_EXTENSIONS: [&str; 2] = ["csv", "json"];

#[derive(Error, Debug)]
pub enum AcquireError {
    #[error("no file selected")]
    NoFileSelected,
    #[error("failed to read {filename}: {source}")]
    Read {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}

/// Raw file content ready for parsing
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub content: String,
    pub filename: String,
}

impl SelectedFile {
    /// Wrap text pasted by the user
    pub fn pasted(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            filename: PASTED_DATA_FILENAME.to_string(),
        }
    }
}

/// Host file chooser (allows mocking for tests)
#[async_trait::async_trait]
pub trait FilePicker: Send + Sync {
    /// Ask the user for one file restricted to `extensions`.
    /// Returns `None` when the user dismisses the chooser.
    async fn pick_file(&self, extensions: &[&str]) -> Option<PathBuf>;
}

/// Native file dialog
#[derive(Debug, Default, Clone)]
pub struct RfdFilePicker;

#[async_trait::async_trait]
impl FilePicker for RfdFilePicker {
    async fn pick_file(&self, extensions: &[&str]) -> Option<PathBuf> {
        rfd::AsyncFileDialog::new()
            .set_title("Select CSV or JSON File")
            .add_filter("CSV or JSON", extensions)
            .pick_file()
            .await
            .map(|handle| handle.path().to_path_buf())
    }
}

/// Let the user choose an import file and read it as text.
///
/// Resolves exactly once on every path: the file content, `NoFileSelected`
/// when the chooser is dismissed, or `Read` when the file can't be read.
pub async fn select_file(picker: &dyn FilePicker) -> Result<SelectedFile, AcquireError> {
    let path = picker
        .pick_file(&IMPORT_EXTENSIONS)
        .await
        .ok_or(AcquireError::NoFileSelected)?;

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());

    let content = read_text_file(&path)
        .await
        .map_err(|source| AcquireError::Read {
            filename: filename.clone(),
            source,
        })?;

    info!("Read import file {} ({} bytes)", filename, content.len());
    Ok(SelectedFile { content, filename })
}

/// Callback form of [`select_file`]. The callback is `FnOnce`, so it runs
/// exactly once whichever way selection ends.
pub async fn select_file_with<F>(picker: &dyn FilePicker, callback: F)
where
    F: FnOnce(Result<SelectedFile, AcquireError>),
{
    callback(select_file(picker).await);
}

/// Read a text file, falling back to encoding detection for non-UTF-8 data
async fn read_text_file(path: &Path) -> Result<String, std::io::Error> {
    let bytes = tokio::fs::read(path).await?;
    Ok(decode_text(&bytes, &path.display().to_string()))
}

fn decode_text(bytes: &[u8], label: &str) -> String {
    if let Ok(content) = std::str::from_utf8(bytes) {
        return content.strip_prefix('\u{feff}').unwrap_or(content).to_string();
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);

    // decode() also strips any BOM
    let (decoded, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        warn!(
            "Decoding errors occurred while reading {} with encoding {}",
            label,
            encoding.name()
        );
    }

    decoded.into_owned()
}
