use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	routing::{get, post},
	Router,
};
use uuid::Uuid;

use crate::{
	extract::{Identity, Json, Query},
	feed, model, store, tags, AppState, Error,
};

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/", get(get_feed).post(create_post))
		.route("/:id/votes", post(cast_vote))
}

/// Returns the aggregated feed: every post, newest first, with its upvote
/// count attached. A non-empty `tag` query keeps only posts with a tag
/// containing it; an absent or empty one bypasses filtering entirely.
async fn get_feed(
	State(state): State<AppState>,
	Query(query): Query<model::FeedQuery>,
) -> Result<impl IntoResponse, Error> {
	let posts = state
		.feed
		.refresh(state.store.as_ref())
		.await
		.map_err(Error::FetchFailed)?;

	let posts = match query.tag.as_deref() {
		Some(tag) if !tag.is_empty() => feed::filter_by_tag(&posts, tag),
		_ => posts.as_ref().clone(),
	};

	Ok(Json(posts))
}

/// Creates a post from free text, extracting its `#hashtags`, then
/// reloads the feed before responding so the caller's next view already
/// contains the new post. Whitespace-only content is rejected without
/// touching the store.
async fn create_post(
	State(state): State<AppState>,
	Json(input): Json<model::CreatePostInput>,
) -> Result<impl IntoResponse, Error> {
	if input.content.trim().is_empty() {
		return Err(Error::EmptyPost);
	}

	let tags = tags::parse(&input.content);

	let created = state
		.store
		.insert_post(&input.content, &tags)
		.await
		.map_err(Error::CreateFailed)?;

	state
		.feed
		.refresh(state.store.as_ref())
		.await
		.map_err(Error::FetchFailed)?;

	Ok(Json(created))
}

/// Records one upvote for the authenticated-by-cookie anonymous identity,
/// then reloads the feed. Voting twice on the same post is a successful
/// no-op; voting without an identity is refused by the extractor.
async fn cast_vote(
	State(state): State<AppState>,
	Identity(user_id): Identity,
	Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, Error> {
	state
		.store
		.insert_vote(user_id, post_id)
		.await
		.map_err(|error| match error {
			store::Error::UnknownPost(id) => Error::UnknownPost(id),
			error => Error::VoteFailed(error),
		})?;

	state
		.feed
		.refresh(state.store.as_ref())
		.await
		.map_err(Error::FetchFailed)?;

	Ok(StatusCode::OK)
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_tags_are_extracted_and_lowercased() {
		let server = server();

		let response = server
			.post("/posts")
			.json(&json!({ "content": "hello #Foo #bar" }))
			.await;

		assert_eq!(response.status_code(), 200);

		let created = response.json::<serde_json::Value>();

		assert_eq!(created["content"], "hello #Foo #bar");
		assert_eq!(created["tags"], json!(["foo", "bar"]));
	}

	#[tokio::test]
	async fn test_untagged_post_defaults_to_random() {
		let server = server();

		let response = server
			.post("/posts")
			.json(&json!({ "content": "no tags here" }))
			.await;

		assert_eq!(
			response.json::<serde_json::Value>()["tags"],
			json!(["random"])
		);
	}

	#[tokio::test]
	async fn test_whitespace_only_post_is_rejected_without_a_write() {
		let server = server();

		let response = server.post("/posts").json(&json!({ "content": "   " })).await;

		assert_eq!(response.status_code(), 400);

		let feed = server.get("/posts").await.json::<serde_json::Value>();

		assert_eq!(feed.as_array().unwrap().len(), 0);
	}

	#[tokio::test]
	async fn test_feed_is_newest_first_with_upvote_counts() {
		let mut server = server();

		let older = server
			.post("/posts")
			.json(&json!({ "content": "first #cat" }))
			.await
			.json::<serde_json::Value>();
		let newer = server
			.post("/posts")
			.json(&json!({ "content": "second #random" }))
			.await
			.json::<serde_json::Value>();

		let older_id = older["id"].as_str().unwrap();
		let newer_id = newer["id"].as_str().unwrap();

		// two voters, tracked by their identity cookies
		server.get("/identity").await;
		server.post(&format!("/posts/{newer_id}/votes")).await;
		server.post(&format!("/posts/{older_id}/votes")).await;

		server.clear_cookies();
		server.get("/identity").await;
		server.post(&format!("/posts/{newer_id}/votes")).await;

		let feed = server.get("/posts").await.json::<serde_json::Value>();
		let feed = feed.as_array().unwrap();

		assert_eq!(feed.len(), 2);
		assert_eq!(feed[0]["id"], newer["id"]);
		assert_eq!(feed[0]["upvotes"], 2);
		assert_eq!(feed[1]["id"], older["id"]);
		assert_eq!(feed[1]["upvotes"], 1);
	}

	#[tokio::test]
	async fn test_voting_twice_counts_once() {
		let server = server();

		let created = server
			.post("/posts")
			.json(&json!({ "content": "#once" }))
			.await
			.json::<serde_json::Value>();
		let id = created["id"].as_str().unwrap();

		server.get("/identity").await;

		assert_eq!(
			server
				.post(&format!("/posts/{id}/votes"))
				.await
				.status_code(),
			200
		);
		assert_eq!(
			server
				.post(&format!("/posts/{id}/votes"))
				.await
				.status_code(),
			200
		);

		let feed = server.get("/posts").await.json::<serde_json::Value>();

		assert_eq!(feed[0]["upvotes"], 1);
	}

	#[tokio::test]
	async fn test_voting_without_an_identity_is_refused() {
		let server = server();

		let created = server
			.post("/posts")
			.json(&json!({ "content": "#nope" }))
			.await
			.json::<serde_json::Value>();
		let id = created["id"].as_str().unwrap();

		let response = server.post(&format!("/posts/{id}/votes")).await;

		assert_eq!(response.status_code(), 401);

		let feed = server.get("/posts").await.json::<serde_json::Value>();

		assert_eq!(feed[0]["upvotes"], 0);
	}

	#[tokio::test]
	async fn test_voting_on_an_unknown_post_is_404() {
		let server = server();

		server.get("/identity").await;

		let response = server
			.post(&format!("/posts/{}/votes", uuid::Uuid::new_v4()))
			.await;

		assert_eq!(response.status_code(), 404);
	}

	#[tokio::test]
	async fn test_tag_query_filters_by_substring() {
		let server = server();

		server
			.post("/posts")
			.json(&json!({ "content": "plain post" }))
			.await;
		server
			.post("/posts")
			.json(&json!({ "content": "about #cats" }))
			.await;

		let feed = server.get("/posts?tag=ran").await.json::<serde_json::Value>();
		let feed = feed.as_array().unwrap();

		// "ran" matches the default "random" tag only
		assert_eq!(feed.len(), 1);
		assert_eq!(feed[0]["tags"], json!(["random"]));

		let all = server.get("/posts?tag=").await.json::<serde_json::Value>();

		assert_eq!(all.as_array().unwrap().len(), 2);
	}
}
