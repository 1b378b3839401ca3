use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::model::Post;

use super::{Error, Store};

/// Postgres-backed store. Vote uniqueness and the vote→post reference are
/// table constraints (see `migrations/`), so this layer only has to map
/// violations back to store errors.
pub struct PgStore {
	pool: PgPool,
}

impl PgStore {
	/// Connects to the database and brings the schema up to date.
	pub async fn connect(url: &str) -> Result<Self, Error> {
		let pool = PgPool::connect(url).await?;

		sqlx::migrate!()
			.run(&pool)
			.await
			.map_err(sqlx::Error::from)?;

		Ok(Self { pool })
	}
}

#[async_trait]
impl Store for PgStore {
	async fn insert_post(&self, content: &str, tags: &[String]) -> Result<Post, Error> {
		let post = sqlx::query_as::<_, Post>(
			r#"
				INSERT INTO post (content, tags)
				VALUES ($1, $2)
				RETURNING id, content, tags, created_at
			"#,
		)
		.bind(content)
		.bind(tags)
		.fetch_one(&self.pool)
		.await?;

		Ok(post)
	}

	async fn posts_newest_first(&self) -> Result<Vec<Post>, Error> {
		let posts = sqlx::query_as::<_, Post>(
			r#"
				SELECT id, content, tags, created_at FROM post
				ORDER BY created_at DESC
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		Ok(posts)
	}

	async fn vote_post_ids(&self) -> Result<Vec<Uuid>, Error> {
		let post_ids = sqlx::query_scalar::<_, Uuid>("SELECT post_id FROM vote")
			.fetch_all(&self.pool)
			.await?;

		Ok(post_ids)
	}

	async fn insert_vote(&self, user_id: Uuid, post_id: Uuid) -> Result<(), Error> {
		sqlx::query(
			r#"
				INSERT INTO vote (user_id, post_id)
				VALUES ($1, $2)
				ON CONFLICT (user_id, post_id) DO NOTHING
			"#,
		)
		.bind(user_id)
		.bind(post_id)
		.execute(&self.pool)
		.await
		.map_err(|e| match e {
			sqlx::Error::Database(ref d) if d.constraint() == Some("vote_post_id_fkey") => {
				Error::UnknownPost(post_id)
			}
			e => Error::Database(e),
		})?;

		Ok(())
	}
}
