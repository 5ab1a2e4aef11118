//! Request extractors whose rejections are reported as [`ApiError`], so every
//! failure leaves the API as a JSON `{"error": ...}` body with status 400.

use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};

use crate::error::ApiError;

/// A JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// A typed path parameter.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);

/// A `multipart/form-data` upload.
pub struct Upload(pub Multipart);

impl<S> FromRequest<S> for Upload
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    Ok(Upload(Multipart::from_request(req, state).await?))
  }
}
