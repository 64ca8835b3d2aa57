use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::config::TextCase;

/// Compares two names ignoring ASCII case, in a total order usable for
/// sorting and binary search.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|b| b.to_ascii_lowercase())
        .cmp(b.bytes().map(|b| b.to_ascii_lowercase()))
}

/// Returns `true` if the names are equal ignoring ASCII case, `-` and `_`.
///
/// ```
/// use vc_jsv::access::eq_stripped;
///
/// assert!(eq_stripped("FooBar", "foo_bar"));
/// assert!(eq_stripped("FooBar", "FOO-BAR"));
/// assert!(!eq_stripped("FooBar", "foo.bar"));
/// ```
pub fn eq_stripped(a: &str, b: &str) -> bool {
    let strip = |s: &str| {
        s.bytes()
            .filter(|b| !matches!(b, b'-' | b'_'))
            .map(|b| b.to_ascii_lowercase())
            .collect::<Vec<_>>()
    };
    strip(a) == strip(b)
}

/// Lowercases `name` and removes `-` and `_`.
pub fn strip_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Splits an identifier into words at `_`, `-` and lower-to-upper
/// boundaries.
fn words(name: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut prev_lower = false;
    for (index, c) in name.char_indices() {
        if c == '_' || c == '-' {
            if start < index {
                words.push(&name[start..index]);
            }
            start = index + c.len_utf8();
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && start < index {
            words.push(&name[start..index]);
            start = index;
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
    }
    if start < name.len() {
        words.push(&name[start..]);
    }
    words
}

fn push_capitalized(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
}

/// `user_id` and `UserId` become `userId`.
pub fn to_camel_case(name: &str) -> String {
    let pascal = to_pascal_case(name);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(pascal.len());
            out.extend(first.to_lowercase());
            out.push_str(chars.as_str());
            out
        }
        None => pascal,
    }
}

/// `user_id` and `userId` become `UserId`.
pub fn to_pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in words(name) {
        push_capitalized(&mut out, word);
    }
    out
}

/// `UserId` and `userId` become `user_id`.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (index, word) in words(name).into_iter().enumerate() {
        if index > 0 {
            out.push('_');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

/// Converts `name` to `case`, or returns it unchanged for [`TextCase::Default`].
pub fn convert_case(name: &str, case: TextCase) -> String {
    match case {
        TextCase::Default => String::from(name),
        TextCase::PascalCase => to_pascal_case(name),
        TextCase::CamelCase => to_camel_case(name),
        TextCase::SnakeCase => to_snake_case(name),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::cmp::Ordering;

    use super::{cmp_ignore_case, eq_stripped, to_camel_case, to_pascal_case, to_snake_case};

    #[test]
    fn case_conversions() {
        assert_eq!(to_camel_case("user_id"), "userId");
        assert_eq!(to_camel_case("UserId"), "userId");
        assert_eq!(to_pascal_case("user_id"), "UserId");
        assert_eq!(to_pascal_case("name"), "Name");
        assert_eq!(to_snake_case("UserId"), "user_id");
        assert_eq!(to_snake_case("userId2"), "user_id2");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn ignore_case_order() {
        assert_eq!(cmp_ignore_case("Name", "name"), Ordering::Equal);
        assert_eq!(cmp_ignore_case("age", "Name"), Ordering::Less);
        assert!(!eq_stripped("FooBar", "FooBaz"));
    }
}
