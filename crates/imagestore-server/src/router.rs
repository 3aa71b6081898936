//! Axum router construction.
//!
//! Builds the application router with the document and image route groups,
//! the OpenAPI document, and the middleware layers.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health_check,
        routes::documents::create_document,
        routes::documents::replace_document,
        routes::documents::get_document,
        routes::documents::delete_document,
        routes::images::add_image,
        routes::images::replace_image,
        routes::images::get_image,
        routes::images::delete_image,
    ),
    components(schemas(routes::documents::CreatedResponse))
)]
struct ApiDoc;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = ctx.config.server.max_upload_bytes;

    let documents = Router::new()
        .route("/document", post(routes::documents::create_document))
        .route(
            "/document/:id",
            get(routes::documents::get_document)
                .put(routes::documents::replace_document)
                .delete(routes::documents::delete_document),
        );

    let images = Router::new()
        .route("/document/:id/image", post(routes::images::add_image))
        .route(
            "/document/:id/image/:n",
            get(routes::images::get_image)
                .put(routes::images::replace_image)
                .delete(routes::images::delete_image),
        );

    Router::new()
        .route("/", get(routes::health::health_check))
        .merge(documents)
        .merge(images)
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use imagestore_core::config::Config;
    use imagestore_db::InMemoryDocumentStore;
    use imagestore_images::LocalFileStore;
    use tower::ServiceExt;

    fn test_app() -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let files = LocalFileStore::new(dir.path().to_path_buf()).unwrap();
        let ctx = AppContext::new(
            Config::default(),
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(files),
        );
        (build_router(ctx), dir)
    }

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30]));
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router, body: &str) -> i64 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/document")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn health_check_ok() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn create_then_get_document() {
        let (app, _dir) = test_app();
        let id = create(&app, r#"{"test": "data"}"#).await;

        let response = app
            .oneshot(
                Request::get(format!("/document/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["test"], "data");
        assert_eq!(body["images"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn non_object_metadata_rejected() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(
                Request::post("/document")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("[1, 2, 3]"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "validation_error");
    }

    #[tokio::test]
    async fn non_numeric_id_is_bad_request() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(Request::get("/document/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(
                Request::get("/document/1")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn upload_and_fetch_image() {
        let (app, _dir) = test_app();
        let id = create(&app, "{}").await;
        let png = tiny_png();

        let response = app
            .clone()
            .oneshot(
                Request::post(format!("/document/{id}/image"))
                    .header(header::CONTENT_TYPE, "image/png")
                    .body(Body::from(png.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!([format!("img{id}_1.png")])
        );

        let response = app
            .oneshot(
                Request::get(format!("/document/{id}/image/1"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes.as_ref(), png.as_slice());
    }

    #[tokio::test]
    async fn unsupported_content_type_is_415() {
        let (app, _dir) = test_app();
        let id = create(&app, "{}").await;

        let response = app
            .oneshot(
                Request::post(format!("/document/{id}/image"))
                    .header(header::CONTENT_TYPE, "text/plain")
                    .body(Body::from("hello"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn image_on_missing_document_is_404() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(
                Request::get("/document/999/image/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn openapi_document_served() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["paths"]["/document/{id}"].is_object());
    }
}
