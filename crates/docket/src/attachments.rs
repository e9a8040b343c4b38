//! attachment storage for record PDFs.
//!
//! each attachment-bearing record type gets one subdirectory under the
//! attachment root, and each record holds at most one file. stored
//! filenames are derived from the original name plus a creation
//! timestamp; what gets persisted in the database is always a path
//! relative to the root, never an absolute path.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// maximum accepted attachment size (10 MiB).
pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

/// the only accepted attachment content type.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// a single uploaded file as handed over by the transport layer.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// original filename as declared by the client.
    pub name: String,
    /// declared content type.
    pub content_type: String,
    /// file contents.
    pub data: Bytes,
}

/// errors from attachment storage operations.
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// declared content type is not pdf.
    #[error("invalid content type: {0} (only {PDF_CONTENT_TYPE} is accepted)")]
    InvalidContentType(String),

    /// upload exceeds [`MAX_ATTACHMENT_BYTES`].
    #[error("attachment too large: {0} bytes (limit {MAX_ATTACHMENT_BYTES})")]
    TooLarge(usize),

    /// original filename is empty or contains path components.
    #[error("invalid attachment filename: {0:?}")]
    InvalidName(String),

    /// resolved path escapes the attachment root.
    #[error("access denied: {0:?}")]
    OutsideRoot(String),

    /// attachment file does not exist.
    #[error("attachment not found: {0:?}")]
    NotFound(String),

    /// underlying filesystem fault.
    #[error("attachment io error: {0}")]
    Io(#[from] std::io::Error),
}

/// result type for attachment operations.
pub type Result<T> = std::result::Result<T, AttachmentError>;

/// the record types that may carry an attachment, doubling as the
/// category subdirectory names under the attachment root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// `investigation-order/`
    InvestigationOrder,
    /// `proceeding/`
    Proceeding,
    /// `asset/`
    Asset,
}

impl AttachmentKind {
    /// all categories, used to create subdirectories at startup.
    pub const ALL: [AttachmentKind; 3] = [
        AttachmentKind::InvestigationOrder,
        AttachmentKind::Proceeding,
        AttachmentKind::Asset,
    ];

    /// subdirectory name for this category.
    pub fn dir(&self) -> &'static str {
        match self {
            AttachmentKind::InvestigationOrder => "investigation-order",
            AttachmentKind::Proceeding => "proceeding",
            AttachmentKind::Asset => "asset",
        }
    }

    /// parse a category path segment. anything but the three known
    /// categories is rejected before the filesystem is touched.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "investigation-order" => Some(AttachmentKind::InvestigationOrder),
            "proceeding" => Some(AttachmentKind::Proceeding),
            "asset" => Some(AttachmentKind::Asset),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir())
    }
}

/// filesystem-backed attachment store.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    root: PathBuf,
}

impl AttachmentStore {
    /// create a store rooted at the given directory. call [`init`]
    /// before first use.
    ///
    /// [`init`]: AttachmentStore::init
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// the attachment root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// create the root and the category subdirectories if absent.
    pub async fn init(&self) -> Result<()> {
        for kind in AttachmentKind::ALL {
            fs::create_dir_all(self.root.join(kind.dir())).await?;
        }
        Ok(())
    }

    /// store an uploaded file under the category subdirectory.
    ///
    /// validation happens before any bytes are written: only pdf
    /// content is accepted and the size is bounded. returns the stored
    /// path relative to the attachment root.
    pub async fn store(&self, kind: AttachmentKind, file: &UploadedFile) -> Result<String> {
        // media type may carry parameters ("application/pdf; name=x")
        let declared = file
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        if !declared.eq_ignore_ascii_case(PDF_CONTENT_TYPE) {
            return Err(AttachmentError::InvalidContentType(
                file.content_type.clone(),
            ));
        }
        if file.data.len() > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge(file.data.len()));
        }

        let filename = stored_filename(&file.name, chrono::Utc::now().timestamp_millis())?;
        let full_path = self.root.join(kind.dir()).join(&filename);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // write to a temp name first so a crash never leaves a partial
        // file under the final name
        let temp_path = full_path.with_extension("tmp");
        let mut out = fs::File::create(&temp_path).await?;
        out.write_all(&file.data).await?;
        out.sync_all().await?;
        drop(out);
        fs::rename(&temp_path, &full_path).await?;

        let relative = format!("{}/{}", kind.dir(), filename);
        debug!(path = %relative, size = file.data.len(), "attachment stored");
        Ok(relative)
    }

    /// remove a stored attachment by its root-relative path.
    ///
    /// idempotent: removing an already-absent file returns `Ok(false)`
    /// so record mutations racing manual cleanup don't fail.
    pub async fn remove(&self, relative: &str) -> Result<bool> {
        reject_traversal(relative)?;
        let full_path = self.root.join(relative);
        if fs::try_exists(&full_path).await? {
            fs::remove_file(&full_path).await?;
            debug!(path = %relative, "attachment removed");
            Ok(true)
        } else {
            debug!(path = %relative, "attachment already absent");
            Ok(false)
        }
    }

    /// resolve a category + bare filename to an absolute path, verifying
    /// the canonicalized result is still a descendant of the attachment
    /// root. escapes via separators, `..` segments or symlinks are
    /// rejected, never served.
    pub async fn resolve(&self, kind: AttachmentKind, filename: &str) -> Result<PathBuf> {
        if filename.is_empty()
            || filename == "."
            || filename == ".."
            || filename.contains('/')
            || filename.contains('\\')
        {
            warn!(category = %kind, filename = %filename, "rejected attachment filename");
            return Err(AttachmentError::OutsideRoot(filename.to_string()));
        }

        let candidate = self.root.join(kind.dir()).join(filename);
        let canonical = fs::canonicalize(&candidate)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => AttachmentError::NotFound(filename.to_string()),
                _ => AttachmentError::Io(e),
            })?;
        let canonical_root = fs::canonicalize(&self.root).await?;

        if !canonical.starts_with(&canonical_root) {
            warn!(category = %kind, filename = %filename, "attachment path escapes root");
            return Err(AttachmentError::OutsideRoot(filename.to_string()));
        }

        Ok(canonical)
    }
}

/// reject root-relative paths that try to climb out of the root.
fn reject_traversal(relative: &str) -> Result<()> {
    let path = Path::new(relative);
    if path.is_absolute()
        || path
            .components()
            .any(|c| !matches!(c, std::path::Component::Normal(_)))
    {
        return Err(AttachmentError::OutsideRoot(relative.to_string()));
    }
    Ok(())
}

/// derive the stored filename: original stem + timestamp + original
/// extension. not collision-proof for identical names within one
/// millisecond, which is acceptable at the observed load.
fn stored_filename(original: &str, timestamp_millis: i64) -> Result<String> {
    if original.is_empty()
        || original == "."
        || original == ".."
        || original.contains('/')
        || original.contains('\\')
    {
        return Err(AttachmentError::InvalidName(original.to_string()));
    }

    let path = Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AttachmentError::InvalidName(original.to_string()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();

    Ok(format!("{}_{}{}", stem, timestamp_millis, extension))
}
