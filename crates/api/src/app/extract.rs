//! Request-body extraction that keeps the uniform failure envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::Response;

use crate::app::errors::json_fail;

/// `axum::Json` with its rejection mapped into the API's
/// `{"status": "fail", "message": …}` envelope, so a malformed body reads
/// like every other client error.
pub struct Json<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_fail(rejection.status(), rejection.body_text())),
        }
    }
}
