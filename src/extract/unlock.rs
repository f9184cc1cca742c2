use regex::Regex;
use std::sync::OnceLock;

fn unlock_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)unlocked\s+(?:via|by\s+completing)\s+the\s+['‘’]?(.+?)['‘’]?\s+challenge").ok())
        .as_ref()
}

/// Parses the challenge name out of free-text skill notes
///
/// Matches sentences like `Unlocked via the 'Verified' Challenge.` and
/// returns `None` when the notes say something else, so callers keep the rest
/// of the skill and skip only the unlock.
///
/// # Examples
///
/// ```
/// use handbook_scraper::extract::parse_unlock;
///
/// assert_eq!(parse_unlock("Unlocked via the Verified Challenge.").as_deref(), Some("Verified"));
/// assert_eq!(parse_unlock("Fires a piercing bullet."), None);
/// ```
pub fn parse_unlock(notes: &str) -> Option<String> {
    let captures = unlock_pattern()?.captures(notes)?;
    let name = captures.get(1)?.as_str().trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_sentence() {
        assert_eq!(
            parse_unlock("Unlocked via the Verified Challenge.").as_deref(),
            Some("Verified")
        );
    }

    #[test]
    fn test_quoted_name_and_surrounding_text() {
        assert_eq!(
            parse_unlock("Ignites enemies. Unlocked via the 'Bookworm' Challenge.").as_deref(),
            Some("Bookworm")
        );
    }

    #[test]
    fn test_multi_word_name() {
        assert_eq!(
            parse_unlock("Unlocked via the Death From Above Challenge.").as_deref(),
            Some("Death From Above")
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            parse_unlock("unlocked via the Rapidfire challenge").as_deref(),
            Some("Rapidfire")
        );
    }

    #[test]
    fn test_no_match() {
        assert_eq!(parse_unlock("Cooldown is reduced by 2s."), None);
        assert_eq!(parse_unlock(""), None);
    }
}
