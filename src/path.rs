use regex::Regex;
use tracing::warn;

/// A compiled route pattern.
///
/// Literal characters are copied verbatim into the matcher. A segment
/// beginning with `:` after a `/` becomes a named capture matching one or
/// more word characters (`[0-9A-Za-z_]+`). Each capture records its distance
/// in `/` separators from the previous capture so values can be located
/// again in any uri the pattern matched.
#[derive(Debug, Clone)]
pub struct PathPattern {
	matcher: Option<Regex>,
	captures: Vec<Capture>,
}

#[derive(Debug, Clone)]
struct Capture {
	/// Count of `/` separators since the previous capture (or pattern start).
	distance: usize,
	name: String,
}

impl PathPattern {
	pub fn new(pattern: &str) -> Self {
		let mut source = String::with_capacity(pattern.len());
		let mut captures = Vec::new();
		let mut distance = 0;

		let mut chars = pattern.chars().peekable();
		while let Some(ch) = chars.next() {
			source.push(ch);
			if ch != '/' {
				continue;
			}

			distance += 1;
			if chars.peek() == Some(&':') {
				chars.next();
				source.push_str(r"(?-u:\w+)");

				let mut name = String::new();
				while let Some(&ch) = chars.peek() {
					if ch == '/' {
						break;
					}
					name.push(ch);
					chars.next();
				}

				captures.push(Capture { distance, name });
				distance = 0;
			}
		}

		let matcher = match Regex::new(&source) {
			Ok(regex) => Some(regex),
			Err(err) => {
				warn!(pattern, %err, "route pattern failed to compile; it will never match");
				None
			}
		};

		Self { matcher, captures }
	}

	/// Match the pattern against `uri`, anchored at the start. Returns the
	/// length of the matched prefix. An empty match counts as no match.
	pub fn match_len(&self, uri: &str) -> Option<usize> {
		let found = self.matcher.as_ref()?.find(uri)?;
		if found.start() != 0 || found.end() == 0 {
			return None;
		}
		Some(found.end())
	}

	/// Re-walk the recorded captures over a uri this pattern matched,
	/// yielding `(name, value)` pairs in pattern order.
	pub fn extract(&self, uri: &str) -> Vec<(String, String)> {
		let mut pairs = Vec::with_capacity(self.captures.len());
		let mut start = 1;

		for capture in &self.captures {
			// Locate the capture's segment by counting separators.
			for _ in 1..capture.distance {
				match uri.get(start..).and_then(|rest| rest.find('/')) {
					Some(offset) => start += offset + 1,
					None => return pairs,
				}
			}

			let rest = match uri.get(start..) {
				Some(rest) => rest,
				None => return pairs,
			};
			let stop = rest.find('/').unwrap_or(rest.len());

			pairs.push((capture.name.clone(), rest[..stop].to_owned()));
			start += stop + 1;
		}

		pairs
	}
}

#[cfg(test)]
mod test {
	use super::PathPattern;

	#[test]
	fn matches_literal_paths() {
		let pattern = PathPattern::new("/tweet");
		assert_eq!(pattern.match_len("/tweet"), Some(6));
		assert_eq!(pattern.match_len("/tweet/extra"), Some(6));
		assert_eq!(pattern.match_len("/nope"), None);
	}

	#[test]
	fn match_is_anchored() {
		let pattern = PathPattern::new("/tweet");
		assert_eq!(pattern.match_len("/birds/tweet"), None);
	}

	#[test]
	fn captures_named_segments() {
		let pattern = PathPattern::new("/users/:id");
		assert_eq!(pattern.match_len("/users/42"), Some(9));
		assert_eq!(
			pattern.extract("/users/42"),
			vec![("id".to_owned(), "42".to_owned())]
		);
	}

	#[test]
	fn matched_prefix_excludes_trailing_segments() {
		let pattern = PathPattern::new("/users/:id");
		assert_eq!(pattern.match_len("/users/42/extra"), Some(9));
		assert_eq!(
			pattern.extract("/users/42"),
			vec![("id".to_owned(), "42".to_owned())]
		);
	}

	#[test]
	fn extracts_multiple_captures_in_pattern_order() {
		let pattern = PathPattern::new("/users/:user/posts/:post");
		let uri = "/users/alice/posts/9";
		assert_eq!(pattern.match_len(uri), Some(uri.len()));
		assert_eq!(
			pattern.extract(uri),
			vec![
				("user".to_owned(), "alice".to_owned()),
				("post".to_owned(), "9".to_owned()),
			]
		);
	}

	#[test]
	fn adjacent_captures() {
		let pattern = PathPattern::new("/:a/:b");
		assert_eq!(
			pattern.extract("/x/y"),
			vec![
				("a".to_owned(), "x".to_owned()),
				("b".to_owned(), "y".to_owned()),
			]
		);
	}

	#[test]
	fn capture_stops_at_non_word_characters() {
		let pattern = PathPattern::new("/users/:id");
		// `-` is not a word character, so the capture cannot span it.
		assert_eq!(pattern.match_len("/users/4-2"), Some(8));
	}

	#[test]
	fn root_pattern_matches_one_byte() {
		let pattern = PathPattern::new("/");
		assert_eq!(pattern.match_len("/birds/tweet"), Some(1));
	}

	#[test]
	fn invalid_patterns_never_match() {
		let pattern = PathPattern::new("/broken(");
		assert_eq!(pattern.match_len("/broken("), None);
	}
}
