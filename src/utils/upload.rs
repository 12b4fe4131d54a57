use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use super::error::LookupError;

/// A file staged in the upload directory for a single lookup.
///
/// The file is removed when this guard is dropped, so it disappears on every
/// exit path: after a successful read, after a failed read, and when parsing
/// fails later on.
#[derive(Debug)]
pub struct UploadedFile {
    path: PathBuf,
}

impl UploadedFile {
    /// Claims `name` inside `upload_dir`. Only a bare file name is accepted;
    /// anything that could resolve outside the directory is rejected before the
    /// filesystem is touched.
    pub fn claim(upload_dir: &Path, name: &str) -> Result<Self, LookupError> {
        let candidate = Path::new(name);
        let mut components = candidate.components();
        let is_plain_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if name.trim().is_empty() || !is_plain_name {
            return Err(LookupError::InvalidUploadPath(name.to_string()));
        }

        Ok(Self {
            path: upload_dir.join(candidate),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the upload's bytes and releases it. Uploads larger than
    /// `max_bytes` are refused from their metadata without being read.
    pub async fn read_and_release(self, max_bytes: u64) -> Result<Vec<u8>, LookupError> {
        let result = read_bounded(&self.path, max_bytes).await;
        drop(self);
        result
    }
}

/// Reads a whole file after checking its size against `max_bytes`.
pub async fn read_bounded(path: &Path, max_bytes: u64) -> Result<Vec<u8>, LookupError> {
    let read_error = |source| LookupError::Read {
        path: path.display().to_string(),
        source,
    };

    let size = tokio::fs::metadata(path).await.map_err(read_error)?.len();
    if size > max_bytes {
        debug!(target: "upload", path = %path.display(), size, max_bytes, "File exceeds size limit");
        return Err(LookupError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    tokio::fs::read(path).await.map_err(read_error)
}

impl Drop for UploadedFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(target: "upload", path = %self.path.display(), "Removed upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(target: "upload", path = %self.path.display(), "Failed to remove upload: {}", e)
            }
        }
    }
}
