use axum::{http::header, response::IntoResponse, routing::get, Router};
use uuid::Uuid;

use crate::{
	extract::{Json, MaybeIdentity},
	identity,
	model::IdentityResponse,
	AppState,
};

pub fn routes() -> Router<AppState> {
	Router::new().route("/", get(get_identity))
}

/// Returns the client's anonymous identifier, minting one and asking the
/// client to persist it if the request carried none. Repeat calls with the
/// cookie intact return the same value; clearing the cookie starts over
/// with a fresh identity.
async fn get_identity(MaybeIdentity(existing): MaybeIdentity) -> impl IntoResponse {
	match existing {
		Some(user_id) => Json(IdentityResponse { user_id }).into_response(),
		None => {
			let user_id = Uuid::new_v4();
			let cookie = identity::create_cookie(user_id);

			(
				[(header::SET_COOKIE, cookie.to_string())],
				Json(IdentityResponse { user_id }),
			)
				.into_response()
		}
	}
}
