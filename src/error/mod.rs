use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The page could not be fetched from its origin.
    #[error("Fetch error: {0}")]
    Fetch(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(
            e.field_errors()
                .values()
                .flat_map(|v| v.iter())
                .filter_map(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, String) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Fetch(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;
    use validator::Validate;

    async fn body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_returns_400() {
        let response = AppError::Validation("invalid input".into()).into_response();
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn fetch_error_returns_502() {
        let response = AppError::Fetch("Failed to fetch URL".into()).into_response();
        assert_eq!(response.status(), axum::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn validation_error_body_has_error_key() {
        let response = AppError::Validation("invalid input".into()).into_response();
        let json = body_json(response.into_body()).await;
        assert_eq!(json["error"], "invalid input");
    }

    #[tokio::test]
    async fn fetch_error_body_has_error_key() {
        let response = AppError::Fetch("Failed to fetch URL".into()).into_response();
        let json = body_json(response.into_body()).await;
        assert_eq!(json["error"], "Failed to fetch URL");
    }

    #[derive(Validate)]
    struct Short {
        #[validate(length(max = 2, message = "too long"))]
        value: String,
    }

    #[test]
    fn validation_errors_collect_messages() {
        let err = Short {
            value: "abc".into(),
        }
        .validate()
        .unwrap_err();
        match AppError::from(err) {
            AppError::Validation(msg) => assert_eq!(msg, "too long"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
