/// Converts table header text into a camelCase key
///
/// The text is split on whitespace and at lowercase-to-uppercase boundaries.
/// The first token is lowercased and every following token is lowercased
/// with its first character uppercased. Tokens are joined with no separator.
///
/// Splitting at case boundaries keeps the function idempotent, so an already
/// normalized key maps to itself. Mixed case inside a single word is read as
/// a word boundary.
///
/// # Examples
///
/// ```
/// use handbook_scraper::extract::camel_case_key;
///
/// assert_eq!(camel_case_key("Proc Coefficient"), "procCoefficient");
/// assert_eq!(camel_case_key("PROC  COEFFICIENT"), "procCoefficient");
/// assert_eq!(camel_case_key("procCoefficient"), "procCoefficient");
/// ```
pub fn camel_case_key(text: &str) -> String {
    let mut key = String::with_capacity(text.len());

    for (i, token) in tokens(text).into_iter().enumerate() {
        let lower = token.to_lowercase();
        if i == 0 {
            key.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            key.extend(first.to_uppercase());
            key.push_str(chars.as_str());
        }
    }

    key
}

fn tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();

    for word in text.split_whitespace() {
        let mut current = String::new();
        let mut prev_lower = false;
        for c in word.chars() {
            if prev_lower && c.is_uppercase() && !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            prev_lower = c.is_lowercase();
            current.push(c);
        }
        if !current.is_empty() {
            tokens.push(current);
        }
    }

    tokens
}
