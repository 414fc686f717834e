//! services/web/src/web/documents.rs
//!
//! The document index, the upload form handler and raw file downloads.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use study_hub_core::{
    filename::{extension, is_allowed_file, secure_filename},
    Document, PortError,
};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::web::{
    flash::{redirect_with_flash, Flash},
    internal_error, render_page,
    state::{AppState, AuthenticatedUser},
    HandlerError,
};

//=========================================================================================
// View Types
//=========================================================================================

/// One row of the document table.
#[derive(Serialize, ToSchema)]
pub struct DocumentView {
    pub filename: String,
    pub uploader_name: String,
    pub course: String,
    pub uploaded_at: String,
}

impl From<Document> for DocumentView {
    fn from(doc: Document) -> Self {
        Self {
            filename: doc.filename,
            uploader_name: doc.uploader_name,
            course: doc.course,
            uploaded_at: doc.uploaded_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

#[derive(Serialize)]
struct IndexBody {
    documents: Vec<DocumentView>,
}

/// Every stored document, oldest first, ready for a template.
pub(crate) async fn document_views(state: &AppState) -> Result<Vec<DocumentView>, HandlerError> {
    let documents = state
        .db
        .list_documents()
        .await
        .map_err(|e| internal_error("Failed to list documents", e))?;
    Ok(documents.into_iter().map(DocumentView::from).collect())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET / - The document table and, for logged-in users, the upload form
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Index page"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn index_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, HandlerError> {
    let documents = document_views(&state).await?;
    render_page(&state, &headers, "index.html", None, IndexBody { documents }).await
}

/// POST /upload - Store a document and record its metadata
///
/// Expects a multipart form with `file`, `name` and `course` parts. Problems
/// with the file itself come back as a flash on the index page; a form missing
/// `name` or `course` is rejected outright.
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content_type = "multipart/form-data", description = "The file plus the uploader's name and course."),
    responses(
        (status = 303, description = "Redirect to the index with a flash message"),
        (status = 400, description = "Malformed form (missing name or course)"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    mut multipart: Multipart,
) -> Result<Response, HandlerError> {
    // 1. Collect the form parts
    let mut file: Option<(String, Bytes)> = None;
    let mut uploader_name: Option<String> = None;
    let mut course: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (e.status(), e.body_text()))?
    {
        let part = field.name().map(str::to_string);
        match part.as_deref() {
            // A part without a `filename` attribute is a plain value, not an upload.
            Some("file") => {
                let Some(filename) = field.file_name().map(str::to_string) else {
                    continue;
                };
                let data = field.bytes().await.map_err(|e| (e.status(), e.body_text()))?;
                file = Some((filename, data));
            }
            Some("name") => {
                uploader_name = Some(field.text().await.map_err(|e| (e.status(), e.body_text()))?);
            }
            Some("course") => {
                course = Some(field.text().await.map_err(|e| (e.status(), e.body_text()))?);
            }
            _ => {}
        }
    }

    // 2. Validate the file part
    let Some((original_name, data)) = file else {
        return Ok(redirect_with_flash("/", Flash::NoFilePart));
    };
    if original_name.is_empty() {
        return Ok(redirect_with_flash("/", Flash::NoSelectedFile));
    }
    let filename = secure_filename(&original_name);
    if !is_allowed_file(&filename) {
        warn!("Rejected upload of {:?}: file type not allowed", original_name);
        return Ok(redirect_with_flash("/", Flash::FileTypeNotAllowed));
    }

    // 3. Validate the metadata
    let (Some(uploader_name), Some(course)) = (uploader_name, course) else {
        return Err((
            StatusCode::BAD_REQUEST,
            "The form must include name and course fields".to_string(),
        ));
    };

    // 4. Store the bytes, then the record. A same-named file is replaced.
    state
        .files
        .save(&filename, &data)
        .await
        .map_err(|e| internal_error("Failed to save file", e))?;
    let document = state
        .db
        .create_document(&filename, &uploader_name, &course)
        .await
        .map_err(|e| internal_error("Failed to record document", e))?;

    info!(
        "Account {} uploaded {} ({} bytes) as document {}",
        user.account_id,
        filename,
        data.len(),
        document.id
    );
    Ok(redirect_with_flash("/", Flash::UploadSucceeded))
}

/// GET /uploads/{filename} - The stored bytes of a document
#[utoipa::path(
    get,
    path = "/uploads/{filename}",
    params(("filename" = String, Path, description = "The stored (sanitized) filename.")),
    responses(
        (status = 200, description = "The file content"),
        (status = 404, description = "No such file"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn download_handler(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, HandlerError> {
    let bytes = match state.files.read(&filename).await {
        Ok(bytes) => bytes,
        Err(PortError::NotFound(_) | PortError::InvalidInput(_)) => {
            return Err((StatusCode::NOT_FOUND, "File not found".to_string()));
        }
        Err(e) => return Err(internal_error("Failed to read file", e)),
    };

    Ok(([(header::CONTENT_TYPE, content_type_for(&filename))], bytes).into_response())
}

fn content_type_for(filename: &str) -> &'static str {
    match extension(filename).as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_the_extension() {
        assert_eq!(content_type_for("notes.PDF"), "application/pdf");
        assert_eq!(content_type_for("a.txt"), "text/plain; charset=utf-8");
        assert_eq!(content_type_for("README"), "application/octet-stream");
    }
}
