const BEARER_PREFIX: &str = "Bearer ";

/// Removes one leading `"Bearer "` so callers may use either convention.
pub fn strip_bearer(credential: &str) -> &str {
    credential.strip_prefix(BEARER_PREFIX).unwrap_or(credential)
}

/// Picks the first credential that is present and non-blank: body field,
/// then `Authorization` header, then the server's own fallback key.
pub fn resolve<'a>(
    body: Option<&'a str>,
    header: Option<&'a str>,
    fallback: Option<&'a str>,
) -> Option<&'a str> {
    [body, header, fallback]
        .into_iter()
        .flatten()
        .find(|candidate| !strip_bearer(candidate).trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_prefix_exactly_once() {
        assert_eq!(strip_bearer("Bearer abc123"), "abc123");
        assert_eq!(strip_bearer("Bearer Bearer abc123"), "Bearer abc123");
    }

    #[test]
    fn leaves_plain_key_unchanged() {
        assert_eq!(strip_bearer("abc123"), "abc123");
        assert_eq!(strip_bearer("bearer abc123"), "bearer abc123");
    }

    #[test]
    fn resolve_prefers_body_then_header_then_fallback() {
        assert_eq!(
            resolve(Some("body"), Some("Bearer header"), Some("server")),
            Some("body")
        );
        assert_eq!(
            resolve(None, Some("Bearer header"), Some("server")),
            Some("Bearer header")
        );
        assert_eq!(resolve(Some("  "), None, Some("server")), Some("server"));
        assert_eq!(resolve(None, Some("Bearer "), None), None);
    }
}
