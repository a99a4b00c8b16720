//! Body and query extractors whose rejections use the `{error, message}`
//! shape of `errors::json_error`.
//!
//! Axum's own `Json`/`Query` reject with 422 and a plain-text body, which
//! would collide with the ledger's 422 stock errors.

use axum::async_trait;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::app::errors;

/// JSON request body; malformed bodies answer 400 `validation_error`.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection_to_response(rejection)),
        }
    }
}

/// Query string; malformed parameters answer 400 `validation_error`.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(query_rejection_to_response(rejection)),
        }
    }
}

pub fn json_rejection_to_response(rejection: JsonRejection) -> Response {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => errors::json_error(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "unsupported_media_type",
            rejection.body_text(),
        ),
        _ => errors::json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text()),
    }
}

pub fn query_rejection_to_response(rejection: QueryRejection) -> Response {
    errors::json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text())
}
