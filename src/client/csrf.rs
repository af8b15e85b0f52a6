//! CSRF token lookup.
//!
//! The backend expects the token of the `csrftoken` cookie in the
//! `X-CSRFToken` header of every mutating request.

/// Value of cookie `name` in a `Cookie` header, percent-decoded.
///
/// Returns `None` when the cookie is absent, empty or not valid UTF-8 once
/// decoded.
pub fn token_from_cookie_header(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .map(str::trim)
        .find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key.trim() == name).then_some(value.trim())
        })
        .filter(|value| !value.is_empty())
        .and_then(|value| urlencoding::decode(value).ok())
        .map(|decoded| decoded.into_owned())
}
