use axum::{
	body::Body,
	extract::{FromRequest, FromRequestParts, Request},
	http::{request, Response},
	response::IntoResponse,
};
use serde::de;
use uuid::Uuid;

use crate::{error::Error, identity};

/// Extractor that deserializes a JSON body and validates it.
pub struct Json<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
	T: de::DeserializeOwned + validator::Validate,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let result = axum::extract::Json::<T>::from_request(req, state).await?.0;

		result.validate().map_err(Error::Validation)?;
		Ok(Self(result))
	}
}

impl<T> IntoResponse for Json<T>
where
	T: serde::Serialize,
{
	fn into_response(self) -> Response<Body> {
		axum::extract::Json(self.0).into_response()
	}
}

/// Extractor that deserializes a query string and validates it.
pub struct Query<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
	T: de::DeserializeOwned + validator::Validate,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let result = axum::extract::Query::<T>::from_request_parts(parts, state)
			.await?
			.0;

		result.validate().map_err(Error::Validation)?;
		Ok(Self(result))
	}
}

/// The anonymous identity presented by the client.
///
/// Rejects with [`Error::NoIdentity`] when no identity cookie is present;
/// handlers that need attribution (voting) use this to refuse rather than
/// act, leaving the client to fetch `/identity` first.
#[derive(Debug)]
pub struct Identity(pub Uuid);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Identity
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		_state: &S,
	) -> Result<Self, Self::Rejection> {
		identity::from_headers(&parts.headers)
			.map(Self)
			.ok_or(Error::NoIdentity)
	}
}

/// Like [`Identity`], but infallible. Used where a missing identity means
/// "mint one" rather than "refuse".
#[derive(Debug)]
pub struct MaybeIdentity(pub Option<Uuid>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeIdentity
where
	S: Send + Sync,
{
	type Rejection = std::convert::Infallible;

	async fn from_request_parts(
		parts: &mut request::Parts,
		_state: &S,
	) -> Result<Self, Self::Rejection> {
		Ok(Self(identity::from_headers(&parts.headers)))
	}
}
