pub mod auth;
pub mod events;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use daybook_core::StoreError;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// All routes, with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(events::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors a handler can end with, one per status code it can produce
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    NameTaken(String),
    Unauthorized,
    BadRequest(String),
    /// Damaged stored data; the message is shown to the client
    Corrupt(anyhow::Error),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::NameTaken(name) => {
                (StatusCode::CONFLICT, format!("User name already used: {name}"))
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Invalid credentials".into()),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Corrupt(err) => {
                tracing::error!(error = %err, "stored data is corrupt");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        let mut response = (status, Json(ErrorResponse { error: message })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Basic realm=\"daybook\""),
            );
        }
        response
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidUserName(_)
            | StoreError::InvalidEvent(_)
            | StoreError::UnknownEvent { .. } => AppError::BadRequest(err.to_string()),
            StoreError::UnknownUser(_) => AppError::Unauthorized,
            StoreError::Corrupt { .. } | StoreError::CorruptCounter(_) => {
                AppError::Corrupt(err.into())
            }
            StoreError::MissingRoot(_) | StoreError::Io(_) => AppError::Internal(err.into()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{TestServer, json};
    use axum::http::Method;

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let server = TestServer::new();
        let response = server.send(Method::GET, "/calendars", None, None).await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let server = TestServer::new();
        let response = server
            .send(Method::GET, "/events/2024/3/5", Some(("ghost", "pw")), None)
            .await;

        assert_eq!(response.status(), 401);
        assert!(response.headers().contains_key("www-authenticate"));
        let body = json(response).await;
        assert_eq!(body["error"], "Invalid credentials");
    }
}
