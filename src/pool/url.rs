//! URL normalization and target joining.

/// Strip any trailing slashes from a backend base URL.
pub fn normalize_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Join a backend base URL and an inbound request path with exactly one
/// slash at the seam.
pub fn join_target(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        assert_eq!(normalize_base("http://a.com/"), "http://a.com");
        assert_eq!(normalize_base("http://a.com"), "http://a.com");
    }

    #[test]
    fn join_never_doubles_the_slash() {
        assert_eq!(join_target("http://a.com/", "/foo"), "http://a.com/foo");
        assert_eq!(join_target("http://a.com", "/foo"), "http://a.com/foo");
    }

    #[test]
    fn join_inserts_missing_slash() {
        assert_eq!(join_target("http://a.com", "foo"), "http://a.com/foo");
        assert_eq!(join_target("http://a.com/", "foo"), "http://a.com/foo");
    }

    #[test]
    fn join_preserves_query() {
        assert_eq!(
            join_target("http://a.com", "/foo?x=1&y=2"),
            "http://a.com/foo?x=1&y=2"
        );
    }
}
