use super::*;

#[derive(Debug, thiserror::Error)]
#[error("board not found")]
struct Missing;

impl ErrorCode for Missing {
    fn error_code(&self) -> &'static str {
        "E_NOT_FOUND"
    }
}

#[derive(Debug, thiserror::Error)]
#[error("disk busy")]
struct Busy;

impl ErrorCode for Busy {
    fn error_code(&self) -> &'static str {
        "E_BUSY"
    }

    fn retryable(&self) -> bool {
        true
    }
}

#[test]
fn error_json_carries_code_and_message() {
    let body = error_json(&Missing);
    assert_eq!(body["error"]["code"], "E_NOT_FOUND");
    assert_eq!(body["error"]["message"], "board not found");
    assert_eq!(body["error"]["retryable"], false);
}

#[test]
fn retryable_is_reported() {
    assert_eq!(error_json(&Busy)["error"]["retryable"], true);
}
