//! The `restaurant` query parameter.
//!
//! Slugs use `+` for spaces. Standard query decoding turns that `+` back
//! into a space, so readers of the parameter see spaces; venue lookup
//! normalizes them again.

pub const RESTAURANT_PARAM: &str = "restaurant";

/// Value of the `restaurant` parameter in a URL search string
/// (`?a=1&restaurant=Pizza+Roma`), form-decoded. Blank values are `None`.
pub fn restaurant_param(search: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(key, _)| form_decode(key) == RESTAURANT_PARAM)
        .map(|(_, value)| form_decode(value))
        .filter(|value| !value.trim().is_empty())
}

/// Search string to push for a selection, or to clear it.
///
/// The slug's `+` is kept literal so URLs read like the CMS slugs.
pub fn link_search(slug: Option<&str>) -> String {
    match slug {
        Some(slug) => format!("?{RESTAURANT_PARAM}={}", encode_value(slug)),
        None => String::new(),
    }
}

fn encode_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            ' ' => out.push('+'),
            '&' | '#' | '%' | '=' | '?' => out.push_str(&format!("%{:02X}", ch as u32)),
            c => out.push(c),
        }
    }
    out
}

/// `application/x-www-form-urlencoded` decoding. Malformed escapes are kept
/// verbatim.
fn form_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => match (
                bytes.get(i + 1).copied().and_then(hex),
                bytes.get(i + 2).copied().and_then(hex),
            ) {
                (Some(hi), Some(lo)) => {
                    out.push((hi << 4) | lo);
                    i += 2;
                }
                _ => out.push(b'%'),
            },
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{link_search, restaurant_param};

    #[test]
    fn reads_and_decodes_the_parameter() {
        assert_eq!(
            restaurant_param("?utm=x&restaurant=Pizza+Roma"),
            Some("Pizza Roma".to_string())
        );
        assert_eq!(
            restaurant_param("restaurant=Caf%C3%A9%20Noir"),
            Some("Café Noir".to_string())
        );
        assert_eq!(restaurant_param("?restaurant=%2"), Some("%2".to_string()));
    }

    #[test]
    fn blank_or_missing_parameter_is_none() {
        assert_eq!(restaurant_param(""), None);
        assert_eq!(restaurant_param("?restaurant="), None);
        assert_eq!(restaurant_param("?restaurant"), None);
        assert_eq!(restaurant_param("?other=1"), None);
    }

    #[test]
    fn pushes_slug_with_literal_plus() {
        assert_eq!(link_search(Some("Pizza+Roma")), "?restaurant=Pizza+Roma");
        assert_eq!(link_search(Some("A&B")), "?restaurant=A%26B");
        assert_eq!(link_search(None), "");
    }
}
