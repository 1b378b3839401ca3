pub mod identity;
pub mod post;
