//! Unit tests for error classification

mod tests {
    use kube::error::ErrorResponse;

    use crate::error::{ControllerError, is_conflict};

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: format!("{reason} error"),
            reason: reason.to_string(),
            code,
        })
    }

    #[test]
    fn test_conflict_detection() {
        assert!(is_conflict(&api_error(409, "AlreadyExists")));
        assert!(!is_conflict(&api_error(500, "InternalError")));
        assert!(!is_conflict(&api_error(404, "NotFound")));
    }

    #[test]
    fn test_permanent_classification() {
        assert!(
            ControllerError::Permanent("create failed".to_string()).is_permanent(),
            "Creation failures are never retried"
        );
        assert!(ControllerError::InvalidConfig("missing name".to_string()).is_permanent());
        assert!(
            !ControllerError::Kube(api_error(500, "InternalError")).is_permanent(),
            "API errors are left to redelivery"
        );
        assert!(!ControllerError::Watch("stream closed".to_string()).is_permanent());
    }
}
