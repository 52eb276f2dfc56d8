//! Repository hints from commit links

use url::Url;

use deploynotes_core::{is_path_segment, RepoRef};

/// Extract `owner/repo` from a commit link of the form
/// `https://<host>/<owner>/<repo>/commit/<sha>`.
///
/// Returns `None` unless the link is HTTPS on exactly `expected_host`, carries
/// no credentials or port, and has exactly that path shape. Links that merely
/// look similar on another host are never trusted.
pub fn parse_commit_link(link: &str, expected_host: &str) -> Option<RepoRef> {
    let url = Url::parse(link.trim()).ok()?;

    if url.scheme() != "https" {
        return None;
    }
    if !url.username().is_empty() || url.password().is_some() || url.port().is_some() {
        return None;
    }
    let host = url.host_str()?;
    if !host.eq_ignore_ascii_case(expected_host) {
        return None;
    }

    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [owner, repo, "commit", sha]
            if is_path_segment(owner)
                && is_path_segment(repo)
                && sha.chars().all(|c| c.is_ascii_hexdigit()) =>
        {
            Some(RepoRef::new(*owner, *repo))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_link() {
        let link = "https://github.com/OctopusSolutionsEngineering/OctopusCopilot/commit/7bc3c67b83d8124fbaf4c5adfae805592fb0385b";
        assert_eq!(
            parse_commit_link(link, "github.com"),
            Some(RepoRef::new("OctopusSolutionsEngineering", "OctopusCopilot"))
        );
    }

    #[test]
    fn test_parse_host_is_case_insensitive() {
        let link = "https://GitHub.com/owner/repo/commit/abc123";
        assert_eq!(
            parse_commit_link(link, "github.com"),
            Some(RepoRef::new("owner", "repo"))
        );
    }

    #[test]
    fn test_rejects_other_host() {
        assert!(parse_commit_link("https://evil.com/owner/repo/commit/abc123", "github.com").is_none());
        assert!(parse_commit_link("https://github.com.evil.com/owner/repo/commit/abc123", "github.com").is_none());
        assert!(parse_commit_link("https://evil.com/owner/repo/commit/x", "github.com").is_none());
    }

    #[test]
    fn test_rejects_userinfo_trick() {
        assert!(parse_commit_link("https://github.com@evil.com/owner/repo/commit/abc123", "github.com").is_none());
        assert!(parse_commit_link("https://user@github.com/owner/repo/commit/abc123", "github.com").is_none());
    }

    #[test]
    fn test_rejects_wrong_shape() {
        assert!(parse_commit_link("https://example.com/not/github", "github.com").is_none());
        assert!(parse_commit_link("https://github.com/owner/repo/pull/3", "github.com").is_none());
        assert!(parse_commit_link("https://github.com/owner/repo/commit/abc/extra", "github.com").is_none());
        assert!(parse_commit_link("http://github.com/owner/repo/commit/abc123", "github.com").is_none());
        assert!(parse_commit_link("not a url", "github.com").is_none());
    }

    #[test]
    fn test_custom_host() {
        let link = "https://git.example.org/team/service/commit/deadbeef";
        assert_eq!(
            parse_commit_link(link, "git.example.org"),
            Some(RepoRef::new("team", "service"))
        );
        assert!(parse_commit_link(link, "github.com").is_none());
    }
}
