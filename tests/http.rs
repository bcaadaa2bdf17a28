//! End-to-end HTTP tests for the file2md service.
//!
//! The router is driven in-process via `tower::ServiceExt::oneshot`, so no
//! socket is bound and tests run concurrently without port contention.
//! Multipart bodies are assembled by hand — the service only ever sees what
//! a real client would put on the wire.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use file2md::{server, ServerConfig};
use http_body_util::BodyExt;
use std::io::Cursor;
use tower::util::ServiceExt;

const BOUNDARY: &str = "file2md-test-boundary";

fn app() -> Router {
    server::router(&ServerConfig::default())
}

/// Build a `POST /convert` request whose body contains the given parts.
/// A part with a filename becomes a file field; one without becomes a
/// plain form field.
fn convert_request(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, filename, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(f) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/convert")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request builds")
}

async fn json_body(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

fn sample_gif_bytes() -> Vec<u8> {
    let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        24,
        24,
        image::Rgba([30, 120, 220, 255]),
    ));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Gif)
        .expect("encode gif");
    buf
}

// ── Routing ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn index_serves_the_upload_page() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("service responds");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    let html = String::from_utf8_lossy(&bytes).to_lowercase();
    assert!(html.contains("<html"), "index should serve HTML");
}

#[tokio::test]
async fn get_on_convert_is_method_not_allowed() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/convert")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("service responds");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ── Validation errors ────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_file_field_is_rejected() {
    let response = app()
        .oneshot(convert_request(&[("note", None, b"not a file")]))
        .await
        .expect("service responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = json_body(response).await;
    assert_eq!(payload["error"], "No file uploaded");
}

#[tokio::test]
async fn empty_multipart_body_is_rejected() {
    let response = app()
        .oneshot(convert_request(&[]))
        .await
        .expect("service responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = json_body(response).await;
    assert_eq!(payload["error"], "No file uploaded");
}

#[tokio::test]
async fn empty_filename_is_rejected() {
    let response = app()
        .oneshot(convert_request(&[("file", Some(""), b"content")]))
        .await
        .expect("service responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = json_body(response).await;
    assert_eq!(payload["error"], "No file selected");
}

#[tokio::test]
async fn unsupported_extension_is_rejected() {
    let response = app()
        .oneshot(convert_request(&[(
            "file",
            Some("sample.exe"),
            b"not really an exe",
        )]))
        .await
        .expect("service responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = json_body(response).await;
    assert_eq!(payload["error"], "File type not supported");
}

#[tokio::test]
async fn filename_without_extension_is_rejected() {
    let response = app()
        .oneshot(convert_request(&[(
            "file",
            Some("noextension"),
            b"some content",
        )]))
        .await
        .expect("service responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dot_only_filename_is_rejected() {
    let response = app()
        .oneshot(convert_request(&[("file", Some("."), b"content")]))
        .await
        .expect("service responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn disguised_double_extension_is_rejected() {
    let response = app()
        .oneshot(convert_request(&[(
            "file",
            Some("archive.tar.exe"),
            b"payload",
        )]))
        .await
        .expect("service responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = json_body(response).await;
    assert_eq!(payload["error"], "File type not supported");
}

// ── Conversion failures ──────────────────────────────────────────────────────

#[tokio::test]
async fn corrupt_gif_is_an_internal_failure() {
    // Extension passes validation, but the pre-transform cannot decode it.
    let response = app()
        .oneshot(convert_request(&[(
            "file",
            Some("sample.gif"),
            b"these bytes are not a gif",
        )]))
        .await
        .expect("service responds");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = json_body(response).await;
    let message = payload["error"].as_str().expect("error is a string");
    assert!(
        message.starts_with("Failed to transcode GIF"),
        "got: {message:?}"
    );
}

// ── Successful conversions ───────────────────────────────────────────────────

#[tokio::test]
async fn html_upload_converts_to_markdown() {
    let response = app()
        .oneshot(convert_request(&[(
            "file",
            Some("sample.html"),
            b"<!doctype html><html><body><h1>Hello HTML</h1></body></html>",
        )]))
        .await
        .expect("service responds");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(payload["success"], true);
    let markdown = payload["markdown"].as_str().expect("markdown is a string");
    assert!(markdown.contains("Hello HTML"), "got: {markdown:?}");
}

#[tokio::test]
async fn extension_check_is_case_insensitive() {
    let response = app()
        .oneshot(convert_request(&[(
            "file",
            Some("sample.HTML"),
            b"<!doctype html><html><body><h1>Test</h1></body></html>",
        )]))
        .await
        .expect("service responds");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn traversal_filename_is_sanitised_and_still_converts() {
    let response = app()
        .oneshot(convert_request(&[(
            "file",
            Some("../../../etc/passwd.html"),
            b"<!doctype html><html><body>Test</body></html>",
        )]))
        .await
        .expect("service responds");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(payload["success"], true);
}

#[tokio::test]
async fn special_characters_in_filename_are_handled() {
    let response = app()
        .oneshot(convert_request(&[(
            "file",
            Some("sample@file#2024.html"),
            b"<!doctype html><html><body>Test</body></html>",
        )]))
        .await
        .expect("service responds");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_html_still_converts() {
    // The engine is lenient about broken markup.
    let response = app()
        .oneshot(convert_request(&[(
            "file",
            Some("sample.html"),
            b"<html><body>Unclosed tag",
        )]))
        .await
        .expect("service responds");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(payload["success"], true);
}

#[tokio::test]
async fn gif_upload_goes_through_the_png_pre_transform() {
    let gif = sample_gif_bytes();
    let response = app()
        .oneshot(convert_request(&[("file", Some("sample.gif"), &gif)]))
        .await
        .expect("service responds");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(payload["success"], true);
    assert!(payload["markdown"].is_string());
}

#[tokio::test]
async fn converting_the_same_bytes_twice_gives_the_same_outcome() {
    let body: &[u8] = b"<!doctype html><html><body><h1>Stable</h1></body></html>";

    let first = app()
        .oneshot(convert_request(&[("file", Some("sample.html"), body)]))
        .await
        .expect("service responds");
    let second = app()
        .oneshot(convert_request(&[("file", Some("sample.html"), body)]))
        .await
        .expect("service responds");

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    let first_payload = json_body(first).await;
    let second_payload = json_body(second).await;
    assert_eq!(first_payload["markdown"], second_payload["markdown"]);
}
