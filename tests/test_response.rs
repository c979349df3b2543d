use rawhttp::http::response::{default_headers, StatusCode};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
    assert_eq!(StatusCode::Other(404).as_u16(), 404);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
    assert_eq!(StatusCode::Other(404).reason_phrase(), "");
}

#[test]
fn test_status_code_from_u16() {
    assert_eq!(StatusCode::from(200), StatusCode::Ok);
    assert_eq!(StatusCode::from(400), StatusCode::BadRequest);
    assert_eq!(StatusCode::from(500), StatusCode::InternalServerError);
    assert_eq!(StatusCode::from(204), StatusCode::Other(204));
}

#[test]
fn test_default_headers() {
    let headers = default_headers(42);

    assert_eq!(headers.len(), 3);
    assert_eq!(headers.get("Content-Length"), Some("42"));
    assert_eq!(headers.get("Connection"), Some("close"));
    assert_eq!(headers.get("Content-Type"), Some("text/plain"));
}

#[test]
fn test_default_headers_can_be_switched_to_chunked() {
    let mut headers = default_headers(0);
    headers.remove("Content-Length");
    headers.set("Transfer-Encoding", "chunked");

    assert!(!headers.contains("content-length"));
    assert_eq!(headers.get("transfer-encoding"), Some("chunked"));
}
