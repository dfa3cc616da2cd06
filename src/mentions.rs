// 📣 Mention Parser - extract @student@domain.tld mentions from free text
//
// A mention is an '@' immediately followed by an email address:
//   "Hello @alice@school.edu!"  →  alice@school.edu
//
// The leading '@' must start the text or follow a character that cannot be
// part of an address, so "x@a@b.com" mentions nobody.
//
// Local part: letters, digits, . _ % + -
// Domain:     letters, digits, . -
// TLD:        2-4 letters, ending at a word boundary

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static MENTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^A-Za-z0-9._%+\-@])@([A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,4})\b")
        .expect("mention pattern is a valid regex")
});

/// Distinct student identities mentioned in `text`, sorted.
///
/// No mentions yields an empty set.
pub fn parse_mentions(text: &str) -> BTreeSet<String> {
    MENTION_REGEX
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_two_mentions() {
        let result = parse_mentions("ping @a@b.com and @c@d.co");
        assert_eq!(result, set(&["a@b.com", "c@d.co"]));
    }

    #[test]
    fn test_no_mentions() {
        assert!(parse_mentions("no mentions here").is_empty());
        assert!(parse_mentions("").is_empty());
    }

    #[test]
    fn test_duplicate_mentions_collapse() {
        let result = parse_mentions("@a@b.com @a@b.com");
        assert_eq!(result, set(&["a@b.com"]));
    }

    #[test]
    fn test_plain_email_is_not_a_mention() {
        assert!(parse_mentions("write to alice@school.edu").is_empty());
    }

    #[test]
    fn test_mention_must_start_a_token() {
        assert!(parse_mentions("x@a@b.com").is_empty());
        assert!(parse_mentions("reply to bob@@a@b.com").is_empty());

        assert_eq!(parse_mentions("@a@b.com first"), set(&["a@b.com"]));
        assert_eq!(parse_mentions("hi,@a@b.com"), set(&["a@b.com"]));
        assert_eq!(
            parse_mentions("@a@b.com,@c@d.com"),
            set(&["a@b.com", "c@d.com"])
        );
    }

    #[test]
    fn test_trailing_period_is_not_captured() {
        let result = parse_mentions("Hello students! @studentagnes@gmail.com.");
        assert_eq!(result, set(&["studentagnes@gmail.com"]));
    }

    #[test]
    fn test_trailing_punctuation() {
        let result = parse_mentions("(@x@school.edu), @y@school.org!");
        assert_eq!(result, set(&["x@school.edu", "y@school.org"]));
    }

    #[test]
    fn test_tld_longer_than_four_letters_does_not_match() {
        assert!(parse_mentions("hi @a@b.abcdef").is_empty());
    }

    #[test]
    fn test_subdomains_and_local_part_symbols() {
        let result = parse_mentions("cc @first.last+tag@mail.school.edu.sg");
        assert_eq!(result, set(&["first.last+tag@mail.school.edu.sg"]));
    }
}
