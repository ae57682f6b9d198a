//! JSON extractor whose rejections use the API error envelope

use axum::{
    Json as AxumJson,
    extract::{FromRequest, Request, rejection::JsonRejection as AxumJsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiErrorType};

/// Drop-in replacement for `axum::Json`.
///
/// Malformed bodies are answered with `{"error": {...}}` instead of axum's
/// plain-text rejection, and a missing or mistyped field is reported in
/// `param` when serde names it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug)]
pub struct JsonRejection {
    status: StatusCode,
    message: String,
    param: Option<String>,
}

impl JsonRejection {
    fn from_axum(rejection: &AxumJsonRejection) -> Self {
        let (message, param) = match rejection {
            AxumJsonRejection::JsonDataError(err) => {
                let text = err.body_text();
                let param = offending_field(&text);
                (format!("Invalid request body: {}", text), param)
            }
            AxumJsonRejection::JsonSyntaxError(err) => {
                (format!("Invalid JSON syntax: {}", err.body_text()), None)
            }
            AxumJsonRejection::MissingJsonContentType(_) => (
                "Missing Content-Type header. Expected 'application/json'.".to_string(),
                None,
            ),
            AxumJsonRejection::BytesRejection(err) => {
                (format!("Failed to read request body: {}", err.body_text()), None)
            }
            _ => ("Invalid JSON request".to_string(), None),
        };

        Self {
            status: rejection.status(),
            message,
            param,
        }
    }
}

/// Pull the field name out of serde messages such as
/// "missing field `ph`" or "Hardness: invalid type: string ..."
fn offending_field(text: &str) -> Option<String> {
    if let Some(start) = text.find("missing field `") {
        let rest = &text[start + "missing field `".len()..];
        return rest.find('`').map(|end| rest[..end].to_string());
    }

    let (_, body) = text.split_once("target type: ")?;
    let (path, _) = body.split_once(": ")?;
    let looks_like_field = !path.is_empty()
        && path.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    looks_like_field.then(|| path.to_string())
}

impl IntoResponse for JsonRejection {
    fn into_response(self) -> Response {
        let mut error = ApiError::new(self.status, ApiErrorType::InvalidRequestError, self.message)
            .with_code("json_parse_error");
        if let Some(param) = self.param {
            error = error.with_param(param);
        }
        error.into_response()
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        AxumJson::<T>::from_request(req, state)
            .await
            .map(|AxumJson(value)| Json(value))
            .map_err(|rejection| JsonRejection::from_axum(&rejection))
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}
