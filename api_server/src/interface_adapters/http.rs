// Global error boundary: every failure leaving the router is rendered here
// as a JSON error envelope.

use std::any::Any;

use axum::{
    Json,
    body::to_bytes,
    extract::{OriginalUri, Request, State},
    http::{Method, StatusCode, Uri, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::domain::errors::AppError;
use crate::interface_adapters::state::ErrorBoundary;
use crate::use_cases::normalize_error::resolve_status;

// Largest plain-text rejection body the boundary reads back as a message.
const REJECTION_BODY_LIMIT: usize = 64 * 1024;

// Failure waiting in the response extensions for the boundary to render it.
#[derive(Clone)]
struct PendingError(AppError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(resolve_status(&self))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = status.into_response();
        response.extensions_mut().insert(PendingError(self));
        response
    }
}

// Outermost application middleware; the single place envelopes are written.
pub async fn normalize_errors(
    State(boundary): State<ErrorBoundary>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = original_url(req.uri());

    let mut response = next.run(req).await;

    if let Some(PendingError(error)) = response.extensions_mut().remove::<PendingError>() {
        return render(&boundary, &error, &path);
    }

    // The router answers a known path with an unsupported method on its own;
    // report it the same way as an unknown route.
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        let error = route_not_found_error(&method, &path);
        return render(&boundary, &error, &path);
    }

    // Built-in extractor rejections (path, query, body limits) arrive as
    // plain text. The documentation challenge keeps its own shape.
    let status = response.status();
    let is_failure = status.is_client_error() || status.is_server_error();
    if is_failure && !response.headers().contains_key(header::WWW_AUTHENTICATE) {
        let error = rejection_error(status, response).await;
        return render(&boundary, &error, &path);
    }

    response
}

async fn rejection_error(status: StatusCode, response: Response) -> AppError {
    let text = match to_bytes(response.into_body(), REJECTION_BODY_LIMIT).await {
        Ok(body) => String::from_utf8_lossy(&body).trim().to_string(),
        Err(e) => {
            tracing::debug!(error = %e, "rejection body could not be read");
            String::new()
        }
    };
    let message = if text.is_empty() {
        status.canonical_reason().unwrap_or_default().to_string()
    } else {
        text
    };
    AppError::http(status.as_u16(), message)
}

fn render(boundary: &ErrorBoundary, error: &AppError, path: &str) -> Response {
    let envelope = boundary.envelope(error, path);
    let status =
        StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        tracing::error!(
            status = envelope.status_code,
            path = %envelope.path,
            message = %envelope.message,
            "request failed"
        );
    } else {
        tracing::warn!(
            status = envelope.status_code,
            path = %envelope.path,
            message = %envelope.message,
            "request rejected"
        );
    }

    (status, Json(envelope)).into_response()
}

// Path plus query string, as the client sent it.
fn original_url(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

fn route_not_found_error(method: &Method, path: &str) -> AppError {
    let path = path.split('?').next().unwrap_or(path);
    AppError::not_found(format!("Cannot {method} {path}"))
}

// Fallback for requests that match no route; nested routers see the full URI.
pub async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    route_not_found_error(&method, uri.path())
}

// Handler for `CatchPanicLayer`: a panic becomes an unclassified failure.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let error = if let Some(message) = payload.downcast_ref::<String>() {
        AppError::internal(message.clone())
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        AppError::internal(*message)
    } else {
        AppError::unknown()
    };

    error.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_app_error_becomes_a_response_then_status_is_resolved_and_error_is_pending() {
        let response = AppError::not_found("Not Found").into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<PendingError>().is_some());
    }

    #[test]
    fn when_generic_error_becomes_a_response_then_status_is_500() {
        let response = AppError::internal("boom").into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn when_panic_payload_is_text_then_it_becomes_the_message() {
        let response = panic_response(Box::new("widget exploded"));

        let pending = response
            .extensions()
            .get::<PendingError>()
            .expect("expected pending error");
        assert_eq!(pending.0, AppError::internal("widget exploded"));
    }

    #[test]
    fn when_panic_payload_is_opaque_then_error_is_unknown() {
        let response = panic_response(Box::new(42_u8));

        let pending = response
            .extensions()
            .get::<PendingError>()
            .expect("expected pending error");
        assert_eq!(pending.0, AppError::Unknown);
    }

    #[test]
    fn when_url_has_query_then_it_is_kept() {
        let uri: Uri = "/api/v1/widgets?page=2".parse().expect("expected uri");

        assert_eq!(original_url(&uri), "/api/v1/widgets?page=2");
    }

    #[tokio::test]
    async fn when_rejection_is_plain_text_then_body_becomes_the_message() {
        let response = (StatusCode::BAD_REQUEST, "Invalid URL: bad id").into_response();

        let error = rejection_error(StatusCode::BAD_REQUEST, response).await;

        assert_eq!(error, AppError::http(400, "Invalid URL: bad id"));
    }

    #[tokio::test]
    async fn when_rejection_has_no_body_then_reason_phrase_is_the_message() {
        let response = StatusCode::PAYLOAD_TOO_LARGE.into_response();

        let error = rejection_error(StatusCode::PAYLOAD_TOO_LARGE, response).await;

        assert_eq!(error, AppError::http(413, "Payload Too Large"));
    }

    #[test]
    fn when_route_is_unknown_then_message_names_method_and_path() {
        let error = route_not_found_error(&Method::POST, "/api/v1/health?x=1");

        assert_eq!(error, AppError::not_found("Cannot POST /api/v1/health"));
    }
}
