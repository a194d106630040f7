use std::io;
use std::path::{Path, PathBuf};

/// The single file slot behind the upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    path: PathBuf,
    name: String,
}

impl PendingUpload {
    /// None if `path` doesn't end in a file name (e.g. `..` or `/`).
    pub fn new(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = path.file_name()?.to_string_lossy().into_owned();

        Some(Self { path, name })
    }

    pub fn path(&self) -> &Path { &self.path }
    pub fn name(&self) -> &str { &self.name }

    pub fn mime(&self) -> String {
        mime_guess::from_path(&self.path)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }

    pub async fn contents(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}
