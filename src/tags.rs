/// Tag applied to posts whose content contains no hashtags.
pub const DEFAULT_TAG: &str = "random";

/// Extracts hashtags from post content.
///
/// The content is split on whitespace; each token beginning with `#` is a
/// tag. Leading `#` characters are stripped and the rest is lower-cased.
/// Interior punctuation is kept as typed, order and duplicates are
/// preserved, and tags that are empty after stripping (a bare `#`) are
/// dropped. If nothing remains, the result is `[DEFAULT_TAG]`, so a
/// post's tag list is never empty.
pub fn parse(content: &str) -> Vec<String> {
	let mut tags: Vec<String> = content
		.split_whitespace()
		.filter(|word| word.starts_with('#'))
		.map(|word| word.trim_start_matches('#').to_lowercase())
		.filter(|tag| !tag.is_empty())
		.collect();

	if tags.is_empty() {
		tags.push(DEFAULT_TAG.to_owned());
	}

	tags
}
