use axum::http::{header, HeaderMap};
use uuid::Uuid;

pub const COOKIE_NAME: &str = "oneline_id";

/// Creates the long-lived identity cookie.
///
/// The identifier is attribution, not a credential, but the consumer is a
/// single-page app on another origin, so the cookie must be `SameSite=None`
/// or browsers drop it from cross-site requests and every client degrades
/// to having no identity. Browsers only accept `SameSite=None` together
/// with `Secure`. Expiry is the longest browsers still honor; clearing the
/// cookie mints a new identity on the next visit.
pub fn create_cookie(user_id: Uuid) -> cookie::Cookie<'static> {
	cookie::Cookie::build((COOKIE_NAME, user_id.to_string()))
		.path("/")
		.same_site(cookie::SameSite::None)
		// development runs over plain http
		.secure(!cfg!(debug_assertions))
		.max_age(cookie::time::Duration::days(400))
		.into()
}

/// Reads the identity cookie from request headers, if a valid one was
/// presented. An unparsable value is treated as absent.
pub fn from_headers(headers: &HeaderMap) -> Option<Uuid> {
	headers
		.get_all(header::COOKIE)
		.into_iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(cookie::Cookie::split_parse)
		.filter_map(Result::ok)
		.find(|cookie| cookie.name() == COOKIE_NAME)
		.and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

#[cfg(test)]
mod test {
	use axum::http::{header, HeaderMap, HeaderValue};
	use uuid::Uuid;

	use super::{create_cookie, from_headers, COOKIE_NAME};

	#[test]
	fn test_cookie_round_trips_through_headers() {
		let user_id = Uuid::new_v4();
		let mut headers = HeaderMap::new();

		headers.insert(
			header::COOKIE,
			HeaderValue::from_str(&format!("{COOKIE_NAME}={user_id}; other=1")).unwrap(),
		);

		assert_eq!(from_headers(&headers), Some(user_id));
	}

	#[test]
	fn test_garbage_cookie_counts_as_absent() {
		let mut headers = HeaderMap::new();

		headers.insert(
			header::COOKIE,
			HeaderValue::from_str(&format!("{COOKIE_NAME}=not-a-uuid")).unwrap(),
		);

		assert_eq!(from_headers(&headers), None);
	}

	#[test]
	fn test_created_cookie_carries_the_id() {
		let user_id = Uuid::new_v4();
		let cookie = create_cookie(user_id);

		assert_eq!(cookie.name(), COOKIE_NAME);
		assert_eq!(cookie.value(), user_id.to_string());
	}

	#[test]
	fn test_cookie_survives_cross_site_requests() {
		let cookie = create_cookie(Uuid::new_v4());

		assert_eq!(cookie.same_site(), Some(cookie::SameSite::None));
		assert_eq!(cookie.path(), Some("/"));
	}
}
