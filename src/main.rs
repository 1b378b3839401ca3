#![warn(clippy::pedantic)]

mod error;
mod extract;
mod feed;
mod identity;
mod model;
mod route;
mod store;
mod tags;

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, normalize_path::NormalizePathLayer, trace::TraceLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use error::Error;

pub type AppState = State;

/// The shared application state: the data backend and the feed snapshot
/// aggregated from it.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub store: Arc<dyn store::Store>,
	pub feed: Arc<feed::Feed>,
}

fn app(state: State) -> Router {
	Router::new()
		.nest("/identity", route::identity::routes())
		.nest("/posts", route::post::routes())
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(NormalizePathLayer::trim_trailing_slash())
				// the consumer is a single-page app on another origin
				.layer(CorsLayer::permissive()),
		)
		.with_state(state)
}

#[tokio::main]
async fn main() {
	tracing_subscriber::registry()
		.with(
			EnvFilter::builder()
				.with_default_directive(LevelFilter::INFO.into())
				.from_env_lossy(),
		)
		.with(tracing_subscriber::fmt::layer().with_ansi(true))
		.init();

	dotenvy::dotenv().ok();

	let store: Arc<dyn store::Store> = match std::env::var("DATABASE_URL") {
		Ok(url) => Arc::new(
			store::PgStore::connect(&url)
				.await
				.expect("failed to connect to database"),
		),
		Err(_) => {
			tracing::warn!("DATABASE_URL not set, using the in-memory store");

			Arc::new(store::MemStore::default())
		}
	};

	let state = State {
		store,
		feed: Arc::new(feed::Feed::default()),
	};

	let port = std::env::var("PORT").map_or_else(
		|_| 3000,
		|port| port.parse().expect("PORT must be a number"),
	);

	let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", port);

	axum::serve(listener, app(state)).await.unwrap();
}
