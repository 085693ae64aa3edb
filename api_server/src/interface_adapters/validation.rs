// Validated JSON request bodies.
//
// Fields a payload type does not declare are dropped during deserialization,
// so handlers only ever see recognised input.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;

use crate::domain::errors::AppError;

/// Field-level rules for an incoming payload.
///
/// Returns every violated rule so the client can fix them in one round trip.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<String>>;
}

/// JSON body extractor that runs [`Validate`] after deserializing.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value.validate().map_err(AppError::validation)?;

        Ok(Self(value))
    }
}

// Malformed or mistyped payloads are a bad request; anything else (content
// type, body size) keeps the status the extractor chose.
fn rejection_to_error(rejection: JsonRejection) -> AppError {
    let status = match &rejection {
        JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
            StatusCode::BAD_REQUEST
        }
        _ => rejection.status(),
    };
    AppError::http(status.as_u16(), rejection.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorMessage;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct CreateWidget {
        name: String,
        quantity: i64,
    }

    impl Validate for CreateWidget {
        fn validate(&self) -> Result<(), Vec<String>> {
            let mut violations = Vec::new();
            if self.name.trim().is_empty() {
                violations.push("name should not be empty".to_string());
            }
            if self.quantity <= 0 {
                violations.push("quantity must be a positive number".to_string());
            }
            if violations.is_empty() {
                Ok(())
            } else {
                Err(violations)
            }
        }
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/api/v1/widgets")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .expect("expected request to build")
    }

    #[tokio::test]
    async fn when_payload_has_unknown_fields_then_they_are_stripped() {
        let request = json_request(r#"{"name":"bolt","quantity":3,"is_admin":true}"#);

        let ValidatedJson(widget) = ValidatedJson::<CreateWidget>::from_request(request, &())
            .await
            .expect("expected payload to be accepted");

        assert_eq!(widget.name, "bolt");
        assert_eq!(widget.quantity, 3);
    }

    #[tokio::test]
    async fn when_payload_breaks_rules_then_all_violations_are_reported() {
        let request = json_request(r#"{"name":" ","quantity":0}"#);

        let result = ValidatedJson::<CreateWidget>::from_request(request, &()).await;

        match result {
            Err(AppError::Http {
                status, response, ..
            }) => {
                assert_eq!(status, 400);
                assert_eq!(
                    response,
                    Some(ErrorMessage::List(vec![
                        "name should not be empty".to_string(),
                        "quantity must be a positive number".to_string(),
                    ]))
                );
            }
            _ => panic!("expected validation error"),
        }
    }

    #[tokio::test]
    async fn when_body_is_not_json_then_returns_400() {
        let request = json_request("not json");

        let result = ValidatedJson::<CreateWidget>::from_request(request, &()).await;

        assert!(matches!(result, Err(AppError::Http { status: 400, .. })));
    }

    #[tokio::test]
    async fn when_required_field_is_missing_then_returns_400() {
        let request = json_request(r#"{"name":"bolt"}"#);

        let result = ValidatedJson::<CreateWidget>::from_request(request, &()).await;

        assert!(matches!(result, Err(AppError::Http { status: 400, .. })));
    }

    #[tokio::test]
    async fn when_body_is_larger_than_the_limit_then_returns_413() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/widgets")
            .header("content-type", "application/json")
            .body(Body::from(vec![b' '; 3 * 1024 * 1024]))
            .expect("expected request to build");

        let result = ValidatedJson::<CreateWidget>::from_request(request, &()).await;

        assert!(matches!(result, Err(AppError::Http { status: 413, .. })));
    }

    #[tokio::test]
    async fn when_content_type_is_missing_then_returns_415() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/widgets")
            .body(Body::from(r#"{"name":"bolt","quantity":3}"#))
            .expect("expected request to build");

        let result = ValidatedJson::<CreateWidget>::from_request(request, &()).await;

        assert!(matches!(result, Err(AppError::Http { status: 415, .. })));
    }
}
