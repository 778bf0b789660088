//! HTTP transport tests against a one-shot local server
//!
//! Each test binds an ephemeral port, answers exactly one request with a
//! canned response and hands the raw request text back for inspection.

use bgremove_client::{
    ClientConfig, ClientError, HttpRemovalService, ImageValidator, MockRemovalService,
    OperationError, Phase, RemovalService, SelectedFile, UploadPipeline, WorkflowController,
};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve one request with `status` and a JSON `body`; returns the base URL
async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (base_url, handle)
}

/// Read headers plus a Content-Length or chunked body
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 8192];

    loop {
        let read = socket.read(&mut chunk).await.unwrap();
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);

        let text = String::from_utf8_lossy(&buffer).to_string();
        let Some(header_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let headers = text[..header_end].to_lowercase();

        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok());

        let complete = match content_length {
            Some(length) => buffer.len() >= header_end + 4 + length,
            None if headers.contains("transfer-encoding: chunked") => {
                buffer.ends_with(b"0\r\n\r\n")
            },
            None => true,
        };
        if complete {
            break;
        }
    }

    String::from_utf8_lossy(&buffer).to_string()
}

fn config_for(base_url: &str) -> ClientConfig {
    ClientConfig::builder()
        .backend_base_url(base_url)
        .build()
        .unwrap()
}

fn photo() -> SelectedFile {
    SelectedFile::from_bytes("photo.png", "image/png", b"not really a png".to_vec())
}

#[tokio::test]
async fn test_health_check_returns_message() {
    let (base_url, server) =
        serve_once("200 OK", r#"{"message":"Background Removal API is running"}"#.to_string()).await;
    let service = HttpRemovalService::new(&config_for(&base_url)).unwrap();

    let message = service.health_check().await.unwrap();
    assert_eq!(message, "Background Removal API is running");

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/ HTTP/1.1"));
}

#[tokio::test]
async fn test_upload_is_multipart_with_file_field() {
    let body =
        serde_json::to_string(&MockRemovalService::success_response(1.234, 2_000_000, 500_000))
            .unwrap();
    let (base_url, server) = serve_once("200 OK", body).await;
    let service = Arc::new(HttpRemovalService::new(&config_for(&base_url)).unwrap());

    let asset = ImageValidator::new().validate(photo()).unwrap();
    let result = UploadPipeline::new(service).submit(&asset).await.unwrap();
    assert_eq!(result.stats.processing_time_seconds, 1.234);
    assert_eq!(result.stats.original_size_bytes, 2_000_000);
    assert_eq!(result.processed_image.mime_type(), "image/png");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/remove-background-base64 HTTP/1.1"));
    let lowered = request.to_lowercase();
    assert!(lowered.contains("multipart/form-data"));
    assert!(lowered.contains("name=\"file\""));
    assert!(lowered.contains("filename=\"photo.png\""));
    assert!(lowered.contains("content-type: image/png"));
    assert!(request.contains("not really a png"));
}

#[tokio::test]
async fn test_error_detail_becomes_remote_error() {
    let (base_url, server) = serve_once(
        "500 Internal Server Error",
        r#"{"detail":"Processing failed: out of memory"}"#.to_string(),
    )
    .await;
    let service = HttpRemovalService::new(&config_for(&base_url)).unwrap();
    let asset = ImageValidator::new().validate(photo()).unwrap();

    let err = service.remove_background(&asset).await.unwrap_err();
    assert!(matches!(&err, ClientError::Remote(detail) if detail == "Processing failed: out of memory"));
    assert_eq!(
        OperationError::from(&err).message(),
        "Processing failed: out of memory"
    );
    server.await.unwrap();
}

#[tokio::test]
async fn test_error_without_detail_uses_fallback() {
    let (base_url, server) = serve_once("502 Bad Gateway", r#"{"oops":true}"#.to_string()).await;
    let service = HttpRemovalService::new(&config_for(&base_url)).unwrap();
    let asset = ImageValidator::new().validate(photo()).unwrap();

    let err = service.remove_background(&asset).await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert_eq!(OperationError::from(&err).message(), "Failed to process image");
    server.await.unwrap();
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let (base_url, server) = serve_once("200 OK", r#"{"processed_image":1}"#.to_string()).await;
    let service = HttpRemovalService::new(&config_for(&base_url)).unwrap();
    let asset = ImageValidator::new().validate(photo()).unwrap();

    let err = service.remove_background(&asset).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn test_controller_over_http() {
    let body = serde_json::to_string(&MockRemovalService::success_response(0.75, 1024, 512))
        .unwrap();
    let (base_url, server) = serve_once("200 OK", body).await;
    let config = config_for(&base_url);
    let service = Arc::new(HttpRemovalService::new(&config).unwrap());
    let mut controller = WorkflowController::new(&config, service).unwrap();

    controller.select_file(photo());
    let state = controller.settle().await;
    assert_eq!(state.phase(), Phase::Result);

    let stats = state.formatted_stats().unwrap();
    assert_eq!(stats.processing_time, "0.75s");
    assert_eq!(stats.original_size, "1 KB");
    assert_eq!(stats.processed_size, "512 Bytes");
    server.await.unwrap();
}
