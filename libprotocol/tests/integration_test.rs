use libprotocol::{parse_batch, validate, LoadTestRequest, ProtocolError};

fn request(url: &str, qps: u32) -> LoadTestRequest {
    LoadTestRequest { url: url.to_string(), qps }
}

#[test]
fn it_check_validate_with_valid_request() {
    validate(&request("http://localhost:8080/ok", 2)).unwrap();
    validate(&request("https://example.com", 1)).unwrap();
}

#[test]
fn it_check_validate_rejects_zero_qps() {
    let err = validate(&request("http://localhost/ok", 0)).unwrap_err();
    match err {
        ProtocolError::Validation(e) => {
            assert_eq!(1, e.items.len());
            assert_eq!("/qps", e.items[0].path);
        }
        other => panic!("Expected Validation error, got: {other:?}"),
    }
}

#[test]
fn it_check_validate_collects_all_errors_for_an_invalid_request() {
    let err = validate(&request("ftp://example.com", 0)).unwrap_err();
    match err {
        ProtocolError::Validation(e) => {
            insta::assert_debug_snapshot!(e);
        }
        other => panic!("Expected Validation error, got: {other:?}"),
    }
}

#[test]
fn it_check_validate_rejects_empty_url() {
    let err = validate(&request("", 1)).unwrap_err();
    match err {
        ProtocolError::Validation(e) => {
            assert_eq!(1, e.items.len());
            assert_eq!("required", e.items[0].code);
        }
        other => panic!("Expected Validation error, got: {other:?}"),
    }
}

#[test]
fn it_check_parse_batch_with_valid_body() {
    let batch = parse_batch(r#"{"latencies": [0.1, 0.2, 0.3], "error_rate": 0.25}"#).unwrap();
    assert_eq!(3, batch.len());
    assert_eq!(0.25, batch.error_rate);
}

#[test]
fn it_check_parse_batch_with_broken_json() {
    let err = parse_batch(r#"{"latencies": ["#).unwrap_err();
    match err {
        ProtocolError::Json(e) => {
            assert_eq!(1, e.line);
            assert!(e.message.contains("EOF"));
        }
        other => panic!("Expected Json error, got: {other:?}"),
    }
}
