use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A single anonymous post.
///
/// `id` and `created_at` are assigned by the store. `upvotes` is derived
/// from the vote rows at read time and never persisted; stores return it
/// as zero and the feed aggregator fills it in.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Post {
	pub id: Uuid,
	pub content: String,
	/// Lower-cased tag names in the order they appeared. Never empty.
	pub tags: Vec<String>,
	pub created_at: DateTime<Utc>,
	#[sqlx(default)]
	pub upvotes: i64,
}

/// One upvote event. Never updated or deleted.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Vote {
	pub user_id: Uuid,
	pub post_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostInput {
	/// Free text; `#hashtags` anywhere in it become the post's tags.
	#[validate(length(max = 512))]
	pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FeedQuery {
	/// Case-insensitive substring to match against post tags.
	#[validate(length(max = 64))]
	pub tag: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityResponse {
	pub user_id: Uuid,
}
