use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::model::{Post, Vote};

use super::{Error, Store};

/// In-process store, used by the test suite and as a fallback when no
/// `DATABASE_URL` is configured. Mutations go through a single lock and
/// honor the same constraints the Postgres schema expresses.
#[derive(Debug, Default)]
pub struct MemStore {
	inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
	posts: Vec<Post>,
	votes: Vec<Vote>,
	voted: HashSet<(Uuid, Uuid)>,
}

#[async_trait]
impl Store for MemStore {
	async fn insert_post(&self, content: &str, tags: &[String]) -> Result<Post, Error> {
		let post = Post {
			id: Uuid::new_v4(),
			content: content.to_owned(),
			tags: tags.to_vec(),
			created_at: Utc::now(),
			upvotes: 0,
		};

		self.inner.write().await.posts.push(post.clone());

		Ok(post)
	}

	async fn posts_newest_first(&self) -> Result<Vec<Post>, Error> {
		let mut posts = self.inner.read().await.posts.clone();

		// stable, so equal timestamps keep insertion order
		posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

		Ok(posts)
	}

	async fn vote_post_ids(&self) -> Result<Vec<Uuid>, Error> {
		Ok(self
			.inner
			.read()
			.await
			.votes
			.iter()
			.map(|vote| vote.post_id)
			.collect())
	}

	async fn insert_vote(&self, user_id: Uuid, post_id: Uuid) -> Result<(), Error> {
		let mut inner = self.inner.write().await;

		if !inner.posts.iter().any(|post| post.id == post_id) {
			return Err(Error::UnknownPost(post_id));
		}

		if inner.voted.insert((user_id, post_id)) {
			inner.votes.push(Vote { user_id, post_id });
		}

		Ok(())
	}
}

#[cfg(test)]
mod test {
	use uuid::Uuid;

	use super::{Error, MemStore, Store};

	#[tokio::test]
	async fn test_repeated_vote_adds_no_row() {
		let store = MemStore::default();
		let post = store.insert_post("hi", &["random".into()]).await.unwrap();
		let user = Uuid::new_v4();

		store.insert_vote(user, post.id).await.unwrap();
		store.insert_vote(user, post.id).await.unwrap();

		assert_eq!(store.vote_post_ids().await.unwrap(), [post.id]);
	}

	#[tokio::test]
	async fn test_vote_on_unknown_post_is_rejected() {
		let store = MemStore::default();
		let missing = Uuid::new_v4();

		let result = store.insert_vote(Uuid::new_v4(), missing).await;

		assert!(matches!(result, Err(Error::UnknownPost(id)) if id == missing));
		assert!(store.vote_post_ids().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_posts_come_back_newest_first() {
		let store = MemStore::default();
		let older = store.insert_post("first", &["a".into()]).await.unwrap();
		let newer = store.insert_post("second", &["b".into()]).await.unwrap();

		let posts = store.posts_newest_first().await.unwrap();

		assert_eq!(posts[0].id, newer.id);
		assert_eq!(posts[1].id, older.id);
	}
}
