//! String case transforms used by [`super::DerivationConfig`]'s naming
//! policies.

/// Converts `CamelCase`/`camelCase`/`snake_case` input to `snake_case`.
///
/// A new word starts at every uppercase letter (itself lowercased) that
/// follows a lowercase letter or digit, and at every existing `_`/`-`
/// separator (normalized to `_`).
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev_lower_or_digit = false;
    for c in s.chars() {
        if c == '-' {
            out.push('_');
            prev_lower_or_digit = false;
        } else if c.is_uppercase() {
            if prev_lower_or_digit {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower_or_digit = false;
        } else {
            out.push(c);
            prev_lower_or_digit = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

/// Converts input to `PascalCase`: the leading character is uppercased: the
/// rest of the string is preserved verbatim (no word-splitting), so
/// `first_name` becomes `First_name`, not `FirstName`.
pub fn to_pascal_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Converts `snake_case`/`kebab-case`/`PascalCase` input to `camelCase` by
/// joining words with every word but the first capitalized.
pub fn to_camel_case(s: &str) -> String {
    let mut words = split_words(s);
    let first = match words.next() {
        Some(word) => {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_lowercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        }
        None => return String::new(),
    };
    words.fold(first, |mut acc, word| {
        let mut chars = word.chars();
        if let Some(c) = chars.next() {
            acc.push_str(&c.to_uppercase().collect::<String>());
            acc.push_str(chars.as_str());
        }
        acc
    })
}

fn split_words(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| c == '_' || c == '-' || c == ' ').filter(|w| !w.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_splits_on_uppercase_transitions() {
        assert_eq!(to_snake_case("firstName"), "first_name");
        assert_eq!(to_snake_case("UserId"), "user_id");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn pascal_case_uppercases_only_the_leading_character() {
        assert_eq!(to_pascal_case("first_name"), "First_name");
        assert_eq!(to_pascal_case("kebab-case-name"), "Kebab-case-name");
        assert_eq!(to_pascal_case("firstName"), "FirstName");
    }

    #[test]
    fn camel_case_lowercases_leading_word() {
        assert_eq!(to_camel_case("first_name"), "firstName");
    }
}
