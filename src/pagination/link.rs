//! `Link` response header parsing (RFC 8288 subset).
//!
//! Header format: `<url>; rel="next", <url>; rel="self"`. Entries that do not start with a
//! `<url>` reference are skipped instead of failing the whole header, so a malformed header
//! simply yields fewer links.

// self
use crate::_prelude::*;

/// One entry of a `Link` header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Link {
	/// Target URL exactly as it appeared between `<` and `>`.
	pub url: String,
	/// Relation value (may hold several space-separated relation types).
	pub rel: String,
	/// Remaining parameters keyed by lowercase name.
	pub params: BTreeMap<String, String>,
}
impl Link {
	/// Returns `true` when one of the space-separated relation types equals `rel`.
	pub fn has_rel(&self, rel: &str) -> bool {
		self.rel.split_ascii_whitespace().any(|value| value.eq_ignore_ascii_case(rel))
	}
}

/// Parses a single `Link` header value.
pub fn parse(header: &str) -> Vec<Link> {
	header.split(',').filter_map(parse_entry).collect()
}

/// Parses every value of a repeated `Link` header.
pub fn parse_all<S>(values: &[S]) -> Vec<Link>
where
	S: AsRef<str>,
{
	values.iter().flat_map(|value| parse(value.as_ref())).collect()
}

/// Returns the URL of the `rel="next"` entry, if any.
///
/// When several entries claim `next`, the last one wins.
pub fn next_url<S>(values: &[S]) -> Option<String>
where
	S: AsRef<str>,
{
	parse_all(values).into_iter().rev().find(|link| link.has_rel("next")).map(|link| link.url)
}

fn parse_entry(entry: &str) -> Option<Link> {
	let entry = entry.trim();
	let rest = entry.strip_prefix('<')?;
	let (url, params) = rest.split_once('>')?;
	let url = url.trim();

	if url.is_empty() {
		return None;
	}

	let mut link = Link { url: url.to_owned(), ..Default::default() };

	for param in params.split(';') {
		let param = param.trim();

		if param.is_empty() {
			continue;
		}

		let (key, value) = match param.split_once('=') {
			Some((key, value)) => (key.trim(), value.trim().trim_matches('"').trim_matches('\'')),
			None => (param, ""),
		};
		let key = key.to_ascii_lowercase();

		if key == "rel" {
			// Only the first `rel` parameter counts.
			if link.rel.is_empty() {
				link.rel = value.to_owned();
			}
		} else {
			link.params.insert(key, value.to_owned());
		}
	}

	Some(link)
}
