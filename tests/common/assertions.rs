//! Custom assertion macros
//!
//! Every failure response has the shape
//! `{ "error": { "message", "status", "fields"? } }`.

/// Assert a response status and error message
#[macro_export]
macro_rules! assert_error {
    ($response:expr, $status:expr) => {{
        let response = &$response;
        assert_eq!(response.status, $status, "unexpected body: {:?}", response.body);
        assert_eq!(response.body["error"]["status"], $status.as_u16());
    }};
    ($response:expr, $status:expr, $message:expr) => {{
        let response = &$response;
        $crate::assert_error!(response, $status);
        assert_eq!(response.error_message(), $message);
    }};
}

/// Assert a 400 with a validation error for `field`
#[macro_export]
macro_rules! assert_field_error {
    ($response:expr, $field:expr) => {{
        let response = &$response;
        assert_eq!(response.status, axum::http::StatusCode::BAD_REQUEST, "unexpected body: {:?}", response.body);
        let fields = response.body["error"]["fields"]
            .as_array()
            .expect("validation errors carry fields");
        assert!(
            fields.iter().any(|f| f["field"] == $field),
            "no error for field {}: {:?}",
            $field,
            fields
        );
    }};
}
