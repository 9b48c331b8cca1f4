/// Characters that must be escaped when a glob literal lands in a regex.
const REGEX_SPECIALS: &str = r"\.+()[]{}^$|";

/// Converts a glob fragment (no capture groups) into an unanchored regex fragment.
///
/// `**/` matches zero or more directory levels, a bare `**` matches across
/// separators, `*` matches within one path segment, and `?` matches a single
/// non-separator character. Everything else is matched literally.
pub fn glob_to_regex_fragment(glob: &str) -> String {
	let mut regex = String::with_capacity(glob.len() * 2);
	let mut chars = glob.chars().peekable();

	while let Some(c) = chars.next() {
		match c {
			'*' => {
				if chars.peek() == Some(&'*') {
					chars.next();
					if chars.peek() == Some(&'/') {
						chars.next();
						regex.push_str("(?:.*/)?");
					} else {
						regex.push_str(".*");
					}
				} else {
					regex.push_str("[^/]*");
				}
			}
			'?' => regex.push_str("[^/]"),
			c if REGEX_SPECIALS.contains(c) => {
				regex.push('\\');
				regex.push(c);
			}
			c => regex.push(c),
		}
	}

	regex
}

#[cfg(test)]
mod tests {
	use super::*;
	use regex::Regex;

	fn anchored(glob: &str) -> Regex {
		Regex::new(&format!("^{}$", glob_to_regex_fragment(glob))).unwrap()
	}

	#[test]
	fn test_literal_characters_are_escaped() {
		assert_eq!(glob_to_regex_fragment("run.log"), r"run\.log");
		assert!(anchored("run.log").is_match("run.log"));
		assert!(!anchored("run.log").is_match("runxlog"));
	}

	#[test]
	fn test_single_star_stays_within_a_segment() {
		let regex = anchored("build/*/run.log");
		assert!(regex.is_match("build/alpha/run.log"));
		assert!(!regex.is_match("build/alpha/beta/run.log"));
	}

	#[test]
	fn test_double_star_spans_segments() {
		let regex = anchored("build/**/run.log");
		assert!(regex.is_match("build/run.log"));
		assert!(regex.is_match("build/alpha/run.log"));
		assert!(regex.is_match("build/alpha/beta/run.log"));
	}

	#[test]
	fn test_trailing_double_star() {
		let regex = anchored("-y**");
		assert!(regex.is_match("-y"));
		assert!(regex.is_match("-y some/lib"));
	}

	#[test]
	fn test_question_mark_matches_one_character() {
		let regex = anchored("run?.log");
		assert!(regex.is_match("run1.log"));
		assert!(!regex.is_match("run12.log"));
		assert!(!regex.is_match("run/.log"));
	}
}
