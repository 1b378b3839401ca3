mod memory;
mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::Post;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(Uuid),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

/// The data backend, reduced to the four operations the feed depends on.
///
/// Implementations assign `id` and `created_at` on insert and enforce the
/// data-model constraints (one vote per `(user_id, post_id)` pair, votes
/// only on known posts). Reads never join or aggregate; counting happens
/// in [`crate::feed`].
#[async_trait]
pub trait Store: Send + Sync {
	/// Inserts a post, returning it with its assigned id and timestamp.
	async fn insert_post(&self, content: &str, tags: &[String]) -> Result<Post, Error>;

	/// All posts, newest first. Tie order on equal timestamps is whatever
	/// the backend returns.
	async fn posts_newest_first(&self) -> Result<Vec<Post>, Error>;

	/// The `post_id` column of every vote row.
	async fn vote_post_ids(&self) -> Result<Vec<Uuid>, Error>;

	/// Records an upvote. Idempotent: a repeated vote for the same pair
	/// succeeds without adding a row.
	async fn insert_vote(&self, user_id: Uuid, post_id: Uuid) -> Result<(), Error>;
}
