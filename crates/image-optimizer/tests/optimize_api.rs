//! End-to-end tests for the optimize endpoints
//!
//! A local axum server stands in for the remote image host and counts how
//! often each image is fetched.

use axum::{
    Router,
    http::{StatusCode, header},
    routing::get,
};
use axum_test::TestServer;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

use image_optimizer::{
    config::Config,
    models::{OutputFormat, TransformRequest},
    services::{ImageOptimizer, derive_key},
    web::{AppState, WebServer},
};

struct Origin {
    base_url: String,
    fetches: Arc<AtomicUsize>,
}

impl Origin {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

fn encoded(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 3) as u8, (y * 3) as u8, 90])
    }));
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), format).unwrap();
    out
}

async fn spawn_origin() -> Origin {
    let fetches = Arc::new(AtomicUsize::new(0));
    let png = encoded(ImageFormat::Png, 40, 20);
    let jpeg = encoded(ImageFormat::Jpeg, 40, 20);

    let png_counter = fetches.clone();
    let jpeg_counter = fetches.clone();
    let app = Router::new()
        .route(
            "/photo.png",
            get(move || {
                png_counter.fetch_add(1, Ordering::SeqCst);
                let body = png.clone();
                async move { ([(header::CONTENT_TYPE, "image/png")], body) }
            }),
        )
        .route(
            "/photo.jpg",
            get(move || {
                jpeg_counter.fetch_add(1, Ordering::SeqCst);
                let body = jpeg.clone();
                async move { ([(header::CONTENT_TYPE, "image/jpeg")], body) }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Origin {
        base_url: format!("http://{addr}"),
        fetches,
    }
}

async fn test_server(allowed_domains: &str) -> (TestServer, TempDir) {
    let output = TempDir::new().unwrap();
    let mut config = Config::default();
    config.storage.output_directory = output.path().to_path_buf();
    config.security.allowed_domains = allowed_domains.to_string();

    let optimizer = ImageOptimizer::from_config(&config).await.unwrap();
    let router = WebServer::create_router(AppState::new(&config, optimizer).unwrap());
    (TestServer::new(router).unwrap(), output)
}

fn entries(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_repeat_request_served_from_cache() {
    let origin = spawn_origin().await;
    let (server, output) = test_server("127.0.0.1").await;

    let first = server
        .get("/optimize")
        .add_query_param("url", origin.url("/photo.png"))
        .add_query_param("output", "webp")
        .await;
    first.assert_status_ok();
    assert_eq!(first.header("x-cache"), "MISS");
    assert_eq!(first.header(header::CONTENT_TYPE), "image/webp");
    assert_eq!(
        first.header(header::CACHE_CONTROL),
        "public, max-age=31536000, immutable"
    );

    let second = server
        .get("/optimize")
        .add_query_param("url", origin.url("/photo.png"))
        .add_query_param("output", "webp")
        .await;
    second.assert_status_ok();
    assert_eq!(second.header("x-cache"), "HIT");
    assert_eq!(first.as_bytes(), second.as_bytes());

    assert_eq!(origin.fetches(), 1);
    let names = entries(&output);
    assert_eq!(names.len(), 1);
    assert!(names[0].ends_with(".webp"));
    assert_eq!(names[0].len(), 64 + ".webp".len());
}

#[tokio::test]
async fn test_disallowed_host_is_forbidden_without_fetch() {
    let origin = spawn_origin().await;
    let (server, output) = test_server("example.com").await;

    let response = server
        .get("/optimize")
        .add_query_param("url", origin.url("/photo.png"))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.text(), "URL domain not allowed");
    assert_eq!(origin.fetches(), 0);
    assert!(entries(&output).is_empty());
}

#[tokio::test]
async fn test_unset_output_falls_back_to_source_format() {
    let origin = spawn_origin().await;
    let (server, _output) = test_server("*").await;

    let png = server
        .get("/optimize")
        .add_query_param("url", origin.url("/photo.png"))
        .await;
    png.assert_status_ok();
    assert_eq!(png.header(header::CONTENT_TYPE), "image/png");

    let jpeg = server
        .get("/optimize")
        .add_query_param("url", origin.url("/photo.jpg"))
        .await;
    jpeg.assert_status_ok();
    assert_eq!(jpeg.header(header::CONTENT_TYPE), "image/jpeg");

    let again = server
        .get("/optimize")
        .add_query_param("url", origin.url("/photo.png"))
        .await;
    assert_eq!(again.header("x-cache"), "HIT");
    assert_eq!(origin.fetches(), 2);
}

#[tokio::test]
async fn test_jpeg_quality_bounds_and_default() {
    let origin = spawn_origin().await;
    let (server, _output) = test_server("*").await;

    for quality in ["0", "100"] {
        let response = server
            .get("/optimize")
            .add_query_param("url", origin.url("/photo.png"))
            .add_query_param("output", "jpeg")
            .add_query_param("quality", quality)
            .await;
        response.assert_status_ok();
        assert_eq!(response.header(header::CONTENT_TYPE), "image/jpeg");
    }

    // an absent quality is the same entry as quality=0
    let defaulted = server
        .get("/optimize")
        .add_query_param("url", origin.url("/photo.png"))
        .add_query_param("output", "jpeg")
        .await;
    assert_eq!(defaulted.header("x-cache"), "HIT");
    assert_eq!(origin.fetches(), 2);
}

#[tokio::test]
async fn test_resolution_is_applied() {
    let origin = spawn_origin().await;
    let (server, _output) = test_server("*").await;

    let response = server
        .get("/optimize")
        .add_query_param("url", origin.url("/photo.png"))
        .add_query_param("output", "png")
        .add_query_param("resolution", "autox10")
        .await;
    response.assert_status_ok();

    let img = image::load_from_memory(response.as_bytes()).unwrap();
    assert_eq!((img.width(), img.height()), (20, 10));
}

#[tokio::test]
async fn test_invalid_resolution_is_bad_request() {
    let origin = spawn_origin().await;
    let (server, output) = test_server("*").await;

    let response = server
        .get("/optimize")
        .add_query_param("url", origin.url("/photo.png"))
        .add_query_param("resolution", "wide")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(origin.fetches(), 0);
    assert!(entries(&output).is_empty());
}

#[tokio::test]
async fn test_oversized_resolution_is_bad_request() {
    let origin = spawn_origin().await;
    let (server, output) = test_server("*").await;

    for (resolution, fetches) in [("1x4000000000", 0), ("autox30000", 1)] {
        let response = server
            .get("/optimize")
            .add_query_param("url", origin.url("/photo.png"))
            .add_query_param("output", "png")
            .add_query_param("resolution", resolution)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().starts_with("Error compressing image:"));
        assert_eq!(origin.fetches(), fetches, "{resolution}");
    }

    assert!(entries(&output).is_empty());
    server.get("/").await.assert_status_ok();
}

#[tokio::test]
async fn test_store_failure_is_server_error() {
    let origin = spawn_origin().await;
    let (server, output) = test_server("*").await;

    let url = origin.url("/photo.png");
    let entry = derive_key(&TransformRequest::new(url.as_str()).with_output(OutputFormat::Png))
        .entry_name(OutputFormat::Png)
        .to_string();
    let squatter = output.path().join(&entry);
    std::fs::create_dir(&squatter).unwrap();
    std::fs::write(squatter.join("keep"), b"x").unwrap();

    let response = server
        .get("/optimize")
        .add_query_param("url", &url)
        .add_query_param("output", "png")
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        response
            .text()
            .starts_with("Error opening compressed image file:")
    );
    assert_eq!(origin.fetches(), 1);
    assert_eq!(entries(&output), vec![entry]);
}

#[tokio::test]
async fn test_missing_url_is_bad_request() {
    let (server, _output) = test_server("*").await;

    let response = server.get("/optimize").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "url parameter is required");
}

#[tokio::test]
async fn test_unknown_output_is_rejected_before_fetch() {
    let origin = spawn_origin().await;
    let (server, _output) = test_server("*").await;

    let response = server
        .get("/optimize")
        .add_query_param("url", origin.url("/photo.png"))
        .add_query_param("output", "gif")
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().starts_with("Error downloading image:"));
    assert_eq!(origin.fetches(), 0);
}

#[tokio::test]
async fn test_unreachable_source_is_server_error() {
    let (server, output) = test_server("*").await;

    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = closed.local_addr().unwrap();
    drop(closed);

    let response = server
        .get("/optimize")
        .add_query_param("url", format!("http://{addr}/photo.png"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().starts_with("Error downloading image:"));
    assert!(entries(&output).is_empty());
}

#[tokio::test]
async fn test_filename_route_shares_cache_with_plain_route() {
    let origin = spawn_origin().await;
    let (server, _output) = test_server("*").await;

    let named = server
        .get("/optimize/holiday.webp")
        .add_query_param("url", origin.url("/photo.jpg"))
        .add_query_param("output", "webp")
        .await;
    named.assert_status_ok();
    assert_eq!(named.header("x-cache"), "MISS");

    let plain = server
        .get("/optimize")
        .add_query_param("url", origin.url("/photo.jpg"))
        .add_query_param("output", "webp")
        .await;
    assert_eq!(plain.header("x-cache"), "HIT");
    assert_eq!(origin.fetches(), 1);
}

#[tokio::test]
async fn test_version_token_forces_refetch() {
    let origin = spawn_origin().await;
    let (server, output) = test_server("*").await;

    for version in ["1", "2"] {
        let response = server
            .get("/optimize")
            .add_query_param("url", origin.url("/photo.jpg"))
            .add_query_param("output", "png")
            .add_query_param("v", version)
            .await;
        assert_eq!(response.header("x-cache"), "MISS");
    }

    assert_eq!(origin.fetches(), 2);
    assert_eq!(entries(&output).len(), 2);
}

#[tokio::test]
async fn test_liveness_and_health() {
    let (server, output) = test_server("*").await;

    let root = server.get("/").await;
    root.assert_status_ok();
    assert_eq!(root.text(), "ok!");

    let health = server.get("/health").await;
    health.assert_status_ok();
    let body: serde_json::Value = health.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(
        body["output_directory"],
        output.path().display().to_string()
    );
}
