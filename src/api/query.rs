use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Query string extractor that rejects with the JSON [`ApiError`] body
/// instead of axum's plain-text one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Size {
        width: Option<u32>,
    }

    async fn extract(uri: &str) -> Result<ApiQuery<Size>, ApiError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        ApiQuery::<Size>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_valid_query_is_extracted() {
        let ApiQuery(size) = extract("/x?width=12").await.unwrap();
        assert_eq!(size.width, Some(12));

        let ApiQuery(size) = extract("/x").await.unwrap();
        assert_eq!(size.width, None);
    }

    #[tokio::test]
    async fn test_malformed_query_is_bad_request() {
        let error = extract("/x?width=abc").await.unwrap_err();
        assert!(matches!(error, ApiError::BadRequest(_)));
        assert!(error.to_string().contains("width"));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
