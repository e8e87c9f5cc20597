//! Response Envelopes
//!
//! Every JSON body the API emits is one of these two shapes:
//! `{"status":"success","data":...}` or `{"status":"error","message":"..."}`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Successful response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            data,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub status: ResponseStatus,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let json = serde_json::to_value(ApiResponse::success(vec!["admin"])).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"][0], "admin");
    }

    #[test]
    fn test_error_envelope() {
        let json = serde_json::to_value(ErrorBody::new("Unauthorized: token expired")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "message": "Unauthorized: token expired"})
        );
    }
}
