use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

/// Caller identity taken from the `X-User-Id` header.
///
/// The portal gateway authenticates citizens and forwards their ID in
/// this header; the service itself performs no authentication. Absent
/// or non-ASCII headers leave the tag empty, which scopes operations
/// to anonymous drafts only.
#[derive(Debug, Clone, Default)]
pub struct OwnerTag(pub Option<String>);

impl OwnerTag {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for OwnerTag
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Infallible> {
        let tag = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        Ok(OwnerTag(tag))
    }
}
