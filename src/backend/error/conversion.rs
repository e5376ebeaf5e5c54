/**
 * Error Conversion
 *
 * All backend errors implement `IntoResponse` from Axum, allowing them to be
 * returned directly from handlers.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": {
 *     "message": "Invalid email format",
 *     "status": 400,
 *     "fields": [{ "field": "email", "message": "Invalid email format" }]
 *   }
 * }
 * ```
 *
 * `fields` is only present for validation failures.
 */

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::backend::error::types::BackendError;
use crate::shared::FieldError;

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a [FieldError]>,
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorEnvelope {
            error: ErrorBody {
                message: self.message(),
                status: status.as_u16(),
                fields: self.fields(),
            },
        };

        (status, Json(body)).into_response()
    }
}
