use std::{
	collections::HashMap,
	sync::{
		atomic::{AtomicU64, Ordering},
		Arc,
	},
};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
	model::Post,
	store::{self, Store},
};

/// Attaches per-post upvote counts to `posts`.
///
/// `votes` is the flat `post_id` column of the vote table. Counts are
/// grouped in one pass; posts keep their input order and posts with no
/// votes get zero.
pub fn attach_upvotes(mut posts: Vec<Post>, votes: &[Uuid]) -> Vec<Post> {
	let mut counts: HashMap<Uuid, i64> = HashMap::new();

	for post_id in votes {
		*counts.entry(*post_id).or_insert(0) += 1;
	}

	for post in &mut posts {
		post.upvotes = counts.get(&post.id).copied().unwrap_or(0);
	}

	posts
}

/// Keeps the posts with at least one tag containing `query`,
/// case-insensitively. An empty query is the caller's concern; handlers
/// bypass filtering instead of passing one in.
pub fn filter_by_tag(posts: &[Post], query: &str) -> Vec<Post> {
	let query = query.to_lowercase();

	posts
		.iter()
		.filter(|post| post.tags.iter().any(|tag| tag.contains(&query)))
		.cloned()
		.collect()
}

/// The shared feed snapshot.
///
/// Loads are not serialized against each other; two rapid mutations each
/// trigger their own load. Every load takes its sequence number before
/// reading the store, and a finished load is applied only if nothing newer
/// has been applied yet, so a slow response can never overwrite a fresher
/// snapshot. The snapshot is only ever replaced wholesale.
#[derive(Debug, Default)]
pub struct Feed {
	next_seq: AtomicU64,
	applied: RwLock<Applied>,
}

#[derive(Debug, Default)]
struct Applied {
	seq: u64,
	posts: Arc<Vec<Post>>,
}

impl Feed {
	/// Re-reads posts and votes from the store and aggregates them into a
	/// new snapshot.
	///
	/// Both reads must succeed; if either fails the previously applied
	/// snapshot is left untouched and the error is returned. On success,
	/// returns the snapshot current after this load settled, which may be
	/// a newer one than this call produced.
	pub async fn refresh(&self, store: &dyn Store) -> Result<Arc<Vec<Post>>, store::Error> {
		let seq = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;

		let posts = store.posts_newest_first().await?;
		let votes = store.vote_post_ids().await?;

		Ok(self.apply(seq, attach_upvotes(posts, &votes)).await)
	}

	/// The last applied snapshot, without touching the store.
	pub async fn snapshot(&self) -> Arc<Vec<Post>> {
		self.applied.read().await.posts.clone()
	}

	async fn apply(&self, seq: u64, posts: Vec<Post>) -> Arc<Vec<Post>> {
		let mut applied = self.applied.write().await;

		if seq > applied.seq {
			applied.seq = seq;
			applied.posts = Arc::new(posts);
		}

		applied.posts.clone()
	}
}
