//! HTTPバックエンドの統合テスト
//!
//! ローカルに1回だけ応答する偽サーバを立て、ステータスごとのエラー分類を検証

use solar_diag::analyzer::{AnalysisBackend, HttpBackend};
use solar_diag_common::{AnalysisError, AnalysisRequest, ImageClass, RequestId, UploadSelection};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const VALID_BODY: &str =
    r#"{"healthScore":72,"faults":["Crack"],"confidence":88,"recommendations":["Replace panel"]}"#;

/// 1接続だけ受けて固定応答を返す。受け取ったリクエスト全文を返す
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/analyze", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 8192];

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&buf).to_string()
    });

    (url, handle)
}

fn request() -> AnalysisRequest {
    AnalysisRequest {
        id: RequestId(3),
        selection: UploadSelection::new("panel1.jpg", b"abc".to_vec()).unwrap(),
        image_class: ImageClass::Thermal,
    }
}

fn backend(url: String, api_key: Option<&str>) -> HttpBackend {
    HttpBackend::new(url, api_key.map(String::from), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_success_response_is_parsed() {
    let (url, server) = serve_once("200 OK", VALID_BODY).await;

    let result = backend(url, Some("secret-key")).analyze(&request()).await.unwrap();
    assert_eq!(result.health_score(), 72);
    assert_eq!(result.faults(), ["Crack"]);
    assert_eq!(result.confidence(), 88);
    assert_eq!(result.recommendations(), ["Replace panel"]);

    let raw = server.await.unwrap();
    let lower = raw.to_lowercase();
    assert!(raw.starts_with("POST /analyze"));
    assert!(lower.contains("authorization: bearer secret-key"));

    let body = &raw[raw.find("\r\n\r\n").unwrap() + 4..];
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(json["requestId"], 3);
    assert_eq!(json["fileName"], "panel1.jpg");
    assert_eq!(json["imageClass"], "thermal");
    assert_eq!(json["imageBase64"], "YWJj");
}

#[tokio::test]
async fn test_no_auth_header_without_key() {
    let (url, server) = serve_once("200 OK", VALID_BODY).await;
    backend(url, None).analyze(&request()).await.unwrap();

    let raw = server.await.unwrap().to_lowercase();
    assert!(!raw.contains("authorization:"));
}

#[tokio::test]
async fn test_client_error_is_rejected() {
    let (url, _server) = serve_once("400 Bad Request", r#"{"error":"bad image"}"#).await;

    let err = backend(url, None).analyze(&request()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::BackendRejected(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_server_error_is_unavailable() {
    let (url, _server) = serve_once("503 Service Unavailable", "{}").await;

    let err = backend(url, None).analyze(&request()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::BackendUnavailable(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let (url, _server) = serve_once("200 OK", "not json at all").await;

    let err = backend(url, None).analyze(&request()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::BackendRejected(_)));
}

#[tokio::test]
async fn test_out_of_range_score_is_rejected() {
    let (url, _server) = serve_once(
        "200 OK",
        r#"{"healthScore":140,"faults":[],"confidence":90,"recommendations":[]}"#,
    )
    .await;

    let err = backend(url, None).analyze(&request()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::BackendRejected(_)));
}

#[tokio::test]
async fn test_connection_refused_is_unavailable() {
    // 空きポートを確保してすぐ閉じる
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/analyze", listener.local_addr().unwrap());
    drop(listener);

    let err = backend(url, None).analyze(&request()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::BackendUnavailable(_)));
}
