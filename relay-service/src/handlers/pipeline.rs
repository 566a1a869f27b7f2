//! Shared request pipeline for the relay endpoints.
//!
//! Every endpoint runs the same steps: CORS preflight, method check, JSON body
//! parse, validation, delegation, response envelope. An [`Endpoint`] only
//! supplies the method, the validation step and the delegate.

use crate::AppState;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use service_core::error::AppError;

#[async_trait]
pub trait Endpoint: Send + Sync + 'static {
    /// Name used in logs and metrics.
    const NAME: &'static str;

    /// The one method accepted besides `OPTIONS`.
    const METHOD: Method;

    /// Raw JSON body.
    type Body: DeserializeOwned + Send;

    /// Input after validation.
    type Input: Send;

    type Output: Serialize + Send;

    /// Reject a body with [`AppError::BadRequest`] or turn it into the input.
    fn validate(body: Self::Body) -> Result<Self::Input, AppError>;

    async fn delegate(state: &AppState, input: Self::Input) -> Result<Self::Output, AppError>;
}

/// axum handler running `E` through the pipeline. Mount with `any(...)` so the
/// pipeline sees every method.
pub async fn handle<E: Endpoint>(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    let mut response = dispatch::<E>(&state, &method, &body).await;
    apply_cors(response.headers_mut(), &E::METHOD);
    response
}

async fn dispatch<E: Endpoint>(state: &AppState, method: &Method, body: &[u8]) -> Response {
    if *method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    if *method != E::METHOD {
        tracing::debug!(endpoint = E::NAME, method = %method, "Rejected method");
        return AppError::MethodNotAllowed.into_response();
    }

    match run::<E>(state, body).await {
        Ok(output) => (StatusCode::OK, Json(output)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn run<E: Endpoint>(state: &AppState, body: &[u8]) -> Result<E::Output, AppError> {
    let body: E::Body = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(endpoint = E::NAME, error = %e, "Unparseable request body");
        AppError::InternalError(anyhow::anyhow!("Invalid JSON body: {}", e))
    })?;

    let input = E::validate(body)?;
    E::delegate(state, input).await
}

fn apply_cors(headers: &mut HeaderMap, method: &Method) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    if let Ok(methods) = HeaderValue::from_str(&format!("{}, OPTIONS", method)) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, methods);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_headers_name_the_endpoint_method() {
        let mut headers = HeaderMap::new();
        apply_cors(&mut headers, &Method::GET);

        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization"
        );
    }
}
