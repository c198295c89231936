/// The reserved token that marks a request for the default page.
///
/// It is never produced from a path segment's text: segments can't contain `/`.
pub const DEFAULT_PAGE: &str = "/";

/// Splits a request target into the ordered tokens the matcher consumes.
///
/// `target` can be a bare path (`/a/b?x=1`) or an absolute URL (`http://host/a/b`).
/// Empty segments are dropped. The [`DEFAULT_PAGE`] token is appended when no segment
/// is left, or when the path ends with `/`, so `/test/` yields `["test", "/"]`.
///
/// Tokens are not percent-decoded.
pub fn segment(target: &str) -> Vec<&str> {
    let path = path_of(target);

    let mut tokens = path.split('/').filter(|token| !token.is_empty()).collect::<Vec<_>>();

    if tokens.is_empty() || path.ends_with('/') {
        tokens.push(DEFAULT_PAGE);
    }

    tokens
}

/// Strips scheme, authority, query and fragment, leaving the path.
fn path_of(target: &str) -> &str {
    let without_origin = match target.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => match rest.find(['/', '?', '#']) {
            Some(index) if rest[index..].starts_with('/') => &rest[index..],
            _ => "",
        },
        _ => target,
    };

    match without_origin.find(['?', '#']) {
        Some(index) => &without_origin[..index],
        None => without_origin,
    }
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
