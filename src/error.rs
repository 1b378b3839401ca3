use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::store;

/// Error type for the application.
///
/// The Display output is logged server-side and may name internals; the
/// JSON body for store failures is deliberately empty. Every variant is
/// non-fatal: the request fails, the feed keeps whatever snapshot was last
/// applied, and nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("query error: {0}")]
	Query(#[from] rejection::QueryRejection),
	/// Post content was empty after trimming; nothing was written.
	#[error("post content is empty")]
	EmptyPost,
	/// No identity cookie was presented, so voting is refused.
	#[error("no identity cookie")]
	NoIdentity,
	#[error("unknown post {0}")]
	UnknownPost(Uuid),
	/// One of the two feed reads failed; no partial feed is kept.
	#[error("feed load failed: {0}")]
	FetchFailed(#[source] store::Error),
	#[error("post creation failed: {0}")]
	CreateFailed(#[source] store::Error),
	#[error("vote failed: {0}")]
	VoteFailed(#[source] store::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub success: bool,
	pub errors: Vec<String>,
}

fn respond(status: StatusCode, errors: Vec<String>) -> Response<Body> {
	(
		status,
		Json(ErrorResponse {
			success: false,
			errors,
		}),
	)
		.into_response()
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		match self {
			Error::Validation(errors) => respond(
				StatusCode::BAD_REQUEST,
				errors
					.field_errors()
					.into_iter()
					.flat_map(|(field, errors)| {
						errors.iter().map(move |error| format!("{field}: {error}"))
					})
					.collect(),
			),
			Error::Json(error) => respond(StatusCode::BAD_REQUEST, vec![error.to_string()]),
			Error::Query(error) => respond(StatusCode::BAD_REQUEST, vec![error.to_string()]),
			error @ Error::EmptyPost => {
				respond(StatusCode::BAD_REQUEST, vec![error.to_string()])
			}
			error @ Error::NoIdentity => {
				respond(StatusCode::UNAUTHORIZED, vec![error.to_string()])
			}
			error @ Error::UnknownPost(..) => {
				respond(StatusCode::NOT_FOUND, vec![error.to_string()])
			}
			error @ (Error::FetchFailed(..) | Error::CreateFailed(..) | Error::VoteFailed(..)) => {
				tracing::error!(%error, "store operation failed");

				respond(StatusCode::INTERNAL_SERVER_ERROR, Vec::new())
			}
		}
	}
}
