//! Client tests against a one-shot local HTTP stub

use classgate_client::{
    ApiClient, ClientError, ClientSession, CourseCatalogClient, LiveScheduleClient, MockTestClient,
};
use classgate_util::MockTestId;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve exactly one response and hand back the raw request head
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();

        String::from_utf8_lossy(&request).into_owned()
    });

    (base_url, handle)
}

fn api(base_url: &str, token: Option<&str>) -> ApiClient {
    let session = ClientSession::new(base_url)
        .unwrap()
        .with_token(token.map(String::from));
    ApiClient::new(session).unwrap()
}

#[tokio::test]
async fn student_schedule_sends_token_and_parses_sessions() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"success": true, "data": [
            {"_id": "s1", "title": "QA Live", "startTime": "2025-03-01T10:00:00Z",
             "endTime": "2025-03-01T11:00:00Z", "joinLink": "https://meet.example.com/s1"},
            {"_id": "s2", "startTime": null, "endTime": "2025-03-02T11:00:00Z"}
        ]}"#,
    )
    .await;

    let client = LiveScheduleClient::new(api(&base_url, Some("tok-123")));
    let sessions = client.student_schedule().await.unwrap();

    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].display_title(), "QA Live");
    assert!(sessions[0].window().is_some());
    assert!(sessions[1].window().is_none());

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/live-batches/student/schedule HTTP/1.1"));
    assert!(request.to_lowercase().contains("authorization: bearer tok-123"));
}

#[tokio::test]
async fn live_classes_without_token() {
    let (base_url, server) = serve_once("200 OK", r#"[{"_id": "c1"}]"#).await;

    let client = LiveScheduleClient::new(api(&base_url, None));
    let sessions = client.live_classes().await.unwrap();
    assert_eq!(sessions.len(), 1);

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/live-classes HTTP/1.1"));
    assert!(!request.to_lowercase().contains("authorization:"));
}

#[tokio::test]
async fn error_status_is_reported() {
    let (base_url, _server) =
        serve_once("401 Unauthorized", r#"{"message": "Token expired"}"#).await;

    let client = CourseCatalogClient::new(api(&base_url, Some("stale")));
    let err = client.my_courses().await.unwrap_err();

    match err {
        ClientError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Token expired"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let (base_url, _server) = serve_once("200 OK", r#"{"courses": "nope"}"#).await;

    let client = CourseCatalogClient::new(api(&base_url, None));
    let err = client.available_courses().await.unwrap_err();

    assert!(matches!(err, ClientError::Decode { ref path, .. } if path == "/api/courses"));
}

#[tokio::test]
async fn mock_test_details_by_id() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"data": {"_id": "m1", "title": "Full Mock 1", "duration": 120, "instructions": "Read carefully"}}"#,
    )
    .await;

    let client = MockTestClient::new(api(&base_url, None));
    let details = client.test_details(&MockTestId::from("m1")).await.unwrap();

    assert_eq!(details.summary.title, "Full Mock 1");
    assert_eq!(details.summary.duration_minutes, Some(120));
    assert_eq!(details.instructions.as_deref(), Some("Read carefully"));

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/mock-tests/m1 HTTP/1.1"));
}

#[tokio::test]
async fn mock_test_attempts() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"[{"_id": "a1", "startedAt": "2025-03-01T10:00:00Z", "submittedAt": "2025-03-01T11:50:00Z", "score": 87.5}]"#,
    )
    .await;

    let client = MockTestClient::new(api(&base_url, None));
    let attempts = client.attempts(&MockTestId::from("m1")).await.unwrap();

    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].score, Some(87.5));

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/mock-tests/m1/attempts HTTP/1.1"));
}
