//! Image collection route handlers.
//!
//! Uploads are raw bodies; the `Content-Type` header picks the stored
//! format. A missing header is treated as an unsupported media type once
//! the document is known to exist.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use super::{parse_document_id, parse_ordinal, run_blocking};
use crate::context::AppContext;
use crate::error::AppError;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImageQuery {
    /// Contrast level in [-100, 100]; out-of-range values are clamped.
    pub contrast: Option<f32>,
}

fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

/// POST /document/:id/image
#[utoipa::path(
    post,
    path = "/document/{id}/image",
    params(("id" = i64, Path, description = "Document ID")),
    request_body(content = Vec<u8>, description = "Raw image bytes", content_type = "image/*"),
    responses(
        (
            status = 201,
            description = "Image appended; returns the filename list",
            body = Vec<String>
        ),
        (status = 400, description = "Empty body"),
        (status = 404, description = "Document not found"),
        (status = 415, description = "Unsupported content type")
    )
)]
pub async fn add_image(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_document_id(&id)?;
    let content_type = content_type(&headers);
    let images = ctx.images.clone();

    let list = run_blocking(move || images.add(id, &content_type, &body)).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

/// PUT /document/:id/image/:n
#[utoipa::path(
    put,
    path = "/document/{id}/image/{n}",
    params(
        ("id" = i64, Path, description = "Document ID"),
        ("n" = i64, Path, description = "1-based image ordinal")
    ),
    request_body(content = Vec<u8>, description = "Raw image bytes", content_type = "image/*"),
    responses(
        (
            status = 200,
            description = "Image replaced; returns the filename list",
            body = Vec<String>
        ),
        (status = 404, description = "Document or image not found"),
        (status = 415, description = "Unsupported content type")
    )
)]
pub async fn replace_image(
    State(ctx): State<AppContext>,
    Path((id, n)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Vec<String>>, AppError> {
    let id = parse_document_id(&id)?;
    let ordinal = parse_ordinal(&n)?;
    let content_type = content_type(&headers);
    let images = ctx.images.clone();

    let list = run_blocking(move || images.replace(id, ordinal, &content_type, &body)).await?;
    Ok(Json(list))
}

/// GET /document/:id/image/:n
#[utoipa::path(
    get,
    path = "/document/{id}/image/{n}",
    params(
        ("id" = i64, Path, description = "Document ID"),
        ("n" = i64, Path, description = "1-based image ordinal"),
        ImageQuery
    ),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 400, description = "Invalid contrast value"),
        (status = 404, description = "Document or image not found"),
        (status = 422, description = "Stored image could not be processed")
    )
)]
pub async fn get_image(
    State(ctx): State<AppContext>,
    Path((id, n)): Path<(String, String)>,
    Query(query): Query<ImageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_document_id(&id)?;
    let ordinal = parse_ordinal(&n)?;
    let images = ctx.images.clone();

    let image = run_blocking(move || images.retrieve(id, ordinal, query.contrast)).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, image.content_type)],
        image.data,
    ))
}

/// DELETE /document/:id/image/:n
#[utoipa::path(
    delete,
    path = "/document/{id}/image/{n}",
    params(
        ("id" = i64, Path, description = "Document ID"),
        ("n" = i64, Path, description = "1-based image ordinal")
    ),
    responses(
        (status = 200, description = "Image removed"),
        (status = 404, description = "Document or image not found")
    )
)]
pub async fn delete_image(
    State(ctx): State<AppContext>,
    Path((id, n)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let id = parse_document_id(&id)?;
    let ordinal = parse_ordinal(&n)?;
    let images = ctx.images.clone();

    run_blocking(move || images.remove(id, ordinal)).await?;
    Ok(StatusCode::OK)
}
