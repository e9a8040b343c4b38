//! authenticated file delivery for stored attachments.
//!
//! attachments are never served statically: every read passes the
//! session check and the path-containment check in
//! [`AttachmentStore::resolve`], so only real descendants of the
//! attachment root ever leave the process.
//!
//! [`AttachmentStore::resolve`]: crate::attachments::AttachmentStore::resolve

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::attachments::AttachmentKind;
use crate::AppState;

use super::auth::SessionContext;
use super::ApiError;

/// create the file delivery router.
pub fn router() -> Router<AppState> {
    Router::new().route("/{category}/{filename}", get(serve_file).head(file_info))
}

/// derive the response content type from the file extension.
fn content_type_for(filename: &str) -> &'static str {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// validate the category and resolve the file, running the shared
/// authorization-independent checks for both GET and HEAD.
async fn resolve_checked(
    state: &AppState,
    category: &str,
    filename: &str,
) -> Result<(std::path::PathBuf, std::fs::Metadata), ApiError> {
    // unknown categories are rejected before the filesystem is touched
    let kind = AttachmentKind::parse(category)
        .ok_or_else(|| ApiError::bad_request("invalid category"))?;

    let path = state.attachments.resolve(kind, filename).await?;
    let metadata = tokio::fs::metadata(&path)
        .await
        .map_err(ApiError::internal)?;
    Ok((path, metadata))
}

/// serve attachment bytes to an authenticated session.
///
/// `GET /files/{category}/{filename}` (any role)
async fn serve_file(
    _ctx: SessionContext,
    State(state): State<AppState>,
    Path((category, filename)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let (path, metadata) = resolve_checked(&state, &category, &filename).await?;

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(ApiError::internal)?;
    let stream = ReaderStream::new(file);

    debug!(category = %category, filename = %filename, size = metadata.len(), "serving attachment");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&filename))
        .header(header::CONTENT_LENGTH, metadata.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", filename),
        )
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(Body::from_stream(stream))
        .map_err(ApiError::internal)
}

/// existence/metadata check without transferring the file.
///
/// `HEAD /files/{category}/{filename}` (any role)
///
/// runs the same authorization and path-safety checks as GET but
/// returns only size and type metadata.
async fn file_info(
    _ctx: SessionContext,
    State(state): State<AppState>,
    Path((category, filename)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let (_path, metadata) = resolve_checked(&state, &category, &filename).await?;

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&filename))
        .header(header::CONTENT_LENGTH, metadata.len());

    if let Ok(modified) = metadata.modified() {
        let modified: chrono::DateTime<chrono::Utc> = modified.into();
        builder = builder.header(
            header::LAST_MODIFIED,
            modified.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
        );
    }

    builder.body(Body::empty()).map_err(ApiError::internal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("scan.pdf"), "application/pdf");
        assert_eq!(content_type_for("scan.PDF"), "application/pdf");
        assert_eq!(content_type_for("photo.jpg"), "image/jpeg");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("chart.png"), "image/png");
        assert_eq!(content_type_for("anim.gif"), "image/gif");
        assert_eq!(content_type_for("blob"), "application/octet-stream");
        assert_eq!(content_type_for("archive.zip"), "application/octet-stream");
    }
}
