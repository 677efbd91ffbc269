//! Pure helpers deriving stable tokens from protocol-assigned identifiers.

/// Path marker that precedes the routable entry id in an edit link.
const ENTRY_PATH_MARKER: &str = "/atom/entry/";

/// Extracts the short identity token from a full protocol identifier.
///
/// Hatena entry ids look like `tag:blog.hatena.ne.jp,2013:blog-<user>-<id>`;
/// the identity is the last `-`-separated component, and only identifiers
/// that split into at least three components are considered trackable.
/// Callers must treat `None` as "unmatched", never as an error.
pub fn extract_identity(protocol_id: &str) -> Option<&str> {
    let parts: Vec<&str> = protocol_id.split('-').collect();
    if parts.len() >= 3 {
        parts.last().copied()
    } else {
        None
    }
}

/// Extracts the member id an update or delete must be routed to, from the
/// entry's edit link. `None` when the link does not contain the member path.
pub fn extract_entry_target(edit_url: &str) -> Option<&str> {
    let start = edit_url.find(ENTRY_PATH_MARKER)? + ENTRY_PATH_MARKER.len();
    let rest = &edit_url[start..];
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_last_component_of_three_or_more() {
        assert_eq!(
            extract_identity("tag:blog.hatena.ne.jp,2013:blog-someone-6801883189000000"),
            Some("6801883189000000")
        );
        assert_eq!(extract_identity("a-b-c-d"), Some("d"));
    }

    #[test]
    fn identifiers_with_fewer_than_three_components_are_untrackable() {
        assert_eq!(extract_identity(""), None);
        assert_eq!(extract_identity("plain"), None);
        assert_eq!(extract_identity("two-parts"), None);
    }

    #[test]
    fn entry_target_follows_member_path_marker() {
        assert_eq!(
            extract_entry_target(
                "https://blog.hatena.ne.jp/someone/someone.hatenablog.com/atom/entry/6801883189"
            ),
            Some("6801883189")
        );
    }

    #[test]
    fn entry_target_absent_marker_or_empty_tail() {
        assert_eq!(extract_entry_target("https://example.com/feed"), None);
        assert_eq!(
            extract_entry_target("https://blog.hatena.ne.jp/x/y/atom/entry/"),
            None
        );
    }
}
