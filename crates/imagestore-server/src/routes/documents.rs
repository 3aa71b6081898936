//! Document metadata route handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use imagestore_core::{DocumentId, Error};

use super::{parse_document_id, run_blocking};
use crate::context::AppContext;
use crate::error::AppError;

/// Response body for a newly created document.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CreatedResponse {
    pub id: i64,
}

/// URL of the image at `ordinal` (1-based) of a document.
pub fn image_url(id: DocumentId, ordinal: usize) -> String {
    format!("/document/{id}/image/{ordinal}")
}

/// Metadata is stored verbatim but must be a JSON object so the `images`
/// field can be merged into it on read.
fn ensure_object(metadata: &Value) -> Result<(), Error> {
    if metadata.is_object() {
        Ok(())
    } else {
        Err(Error::Validation("document metadata must be a JSON object".into()))
    }
}

/// POST /document
#[utoipa::path(
    post,
    path = "/document",
    request_body(content = Object, description = "Arbitrary JSON metadata"),
    responses(
        (status = 201, description = "Document created", body = CreatedResponse),
        (status = 400, description = "Metadata is not a JSON object")
    )
)]
pub async fn create_document(
    State(ctx): State<AppContext>,
    Json(metadata): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    ensure_object(&metadata)?;
    let documents = ctx.documents.clone();
    let id = run_blocking(move || documents.create(&metadata)).await?;
    tracing::info!(document_id = %id, "Document created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.get() })))
}

/// PUT /document/:id
#[utoipa::path(
    put,
    path = "/document/{id}",
    params(("id" = i64, Path, description = "Document ID")),
    request_body(content = Object, description = "Replacement JSON metadata"),
    responses(
        (status = 200, description = "Metadata replaced"),
        (status = 404, description = "Document not found")
    )
)]
pub async fn replace_document(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(metadata): Json<Value>,
) -> Result<StatusCode, AppError> {
    let id = parse_document_id(&id)?;
    ensure_object(&metadata)?;

    let documents = ctx.documents.clone();
    let replaced = run_blocking(move || documents.replace_metadata(id, &metadata)).await?;
    if !replaced {
        return Err(Error::not_found("document", id).into());
    }
    Ok(StatusCode::OK)
}

/// GET /document/:id
///
/// Returns the stored metadata with an `images` array of image URLs merged
/// in. A stored `images` key is shadowed by the generated one.
#[utoipa::path(
    get,
    path = "/document/{id}",
    params(("id" = i64, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Metadata with image URLs"),
        (status = 404, description = "Document not found")
    )
)]
pub async fn get_document(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_document_id(&id)?;
    let documents = ctx.documents.clone();
    let doc = run_blocking(move || documents.get(id)).await?;

    let urls: Vec<Value> = (1..=doc.images.len())
        .map(|n| Value::String(image_url(id, n)))
        .collect();

    let mut body = match doc.metadata {
        Value::Object(map) => map,
        other => {
            // Rows written by older clients may hold a non-object.
            let mut map = serde_json::Map::new();
            map.insert("metadata".into(), other);
            map
        }
    };
    body.insert("images".into(), Value::Array(urls));

    Ok(Json(Value::Object(body)))
}

/// DELETE /document/:id
///
/// Deletes the row, then every image file it listed. File removal is best
/// effort and never fails the request.
#[utoipa::path(
    delete,
    path = "/document/{id}",
    params(("id" = i64, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document and its images deleted"),
        (status = 404, description = "Document not found")
    )
)]
pub async fn delete_document(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_document_id(&id)?;
    let images = ctx.images.clone();
    run_blocking(move || images.delete_document(id)).await?;
    Ok(StatusCode::OK)
}
