use formadmin::error::failure_message;
use formadmin::ApiError;
use serde_json::{json, Value};

#[test]
fn test_structured_body_embeds_status_and_detail() {
    let err = ApiError::Status {
        status: 400,
        body: Some(json!({ "error": "Campo inválido", "detalle": "Falta nombre_campo" })),
    };
    assert_eq!(failure_message(&err), "Error 400: Campo inválido - Falta nombre_campo");
}

#[test]
fn test_framework_detail_is_recognized() {
    let err = ApiError::Status {
        status: 403,
        body: Some(json!({ "detail": "CSRF Failed" })),
    };
    assert_eq!(failure_message(&err), "Error 403: CSRF Failed");
}

#[test]
fn test_headline_alone_is_enough() {
    let err = ApiError::Status {
        status: 409,
        body: Some(json!({ "error": "Duplicado", "detalle": "   " })),
    };
    assert_eq!(err.detail_text().as_deref(), Some("Duplicado"));
}

#[test]
fn test_plain_text_body_falls_back_to_status_text() {
    let err = ApiError::Status {
        status: 500,
        body: Some(Value::String("Internal server error".into())),
    };
    assert_eq!(err.detail_text(), None);
    assert_eq!(failure_message(&err), "Request failed with status code 500");
}

#[test]
fn test_transport_error_message_is_kept() {
    let err = ApiError::Transport("Error en campo 2".into());
    assert_eq!(failure_message(&err), "Error en campo 2");
}

#[test]
fn test_only_cancelled_reports_cancellation() {
    assert!(ApiError::Cancelled.is_cancelled());
    assert!(!ApiError::EmptyResponse.is_cancelled());
}
