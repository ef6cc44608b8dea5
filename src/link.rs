//! Normalization of repository links into `owner/repo` identities

use crate::prompt::Prompt;
use crate::types::{PackageMetadata, RepositoryIdentity};
use tracing::{debug, warn};

/// Host prefixes removed from a link, in order.
///
/// Each is removed at its first occurrence, so `git+https://github.com/...`
/// is reduced to `git+owner/repo` and then loses the `git+` below.
const HOST_PREFIXES: [&str; 7] = [
    "https://github.com/",
    "http://github.com/",
    "git+ssh://git@github.com:",
    "git+ssh://git@github.com/",
    "git@github.com:",
    "git://github.com/",
    "github.com/",
];

/// Find the repository link of a package and normalize it.
///
/// The link comes from the manifest's `repository`, then `homepage`, then the
/// operator. The operator is only asked when the manifest has neither.
pub fn normalize(
    metadata: &PackageMetadata,
    package_name: &str,
    prompt: &dyn Prompt,
) -> RepositoryIdentity {
    identity_of(&raw_link(metadata, package_name, prompt))
}

/// The `owner/repo` identity behind a raw repository link
pub fn identity_of(link: &str) -> RepositoryIdentity {
    let identity = RepositoryIdentity::from_canonical(&canonicalize(link));
    debug!("Repository link '{}' -> {}", link, identity);
    identity
}

/// The unprocessed repository link of a package
pub fn raw_link(metadata: &PackageMetadata, package_name: &str, prompt: &dyn Prompt) -> String {
    let from_manifest = non_blank(metadata.repository.as_ref().and_then(|r| r.url()))
        .or_else(|| non_blank(metadata.homepage.as_deref()));

    if let Some(link) = from_manifest {
        return link.to_string();
    }

    let question = format!(
        "Can't find the Github repository of the package: {}. Please copy the Github link and input here",
        package_name
    );
    match prompt.input(&question) {
        Ok(answer) => answer,
        Err(e) => {
            warn!("No repository link for {}: {}", package_name, e);
            String::new()
        }
    }
}

fn non_blank(link: Option<&str>) -> Option<&str> {
    link.map(str::trim).filter(|link| !link.is_empty())
}

/// Reduce a repository link to its `owner/repo` part.
///
/// Links with more than two path segments keep the first two; links with
/// fewer come back truncated rather than as an error.
pub fn canonicalize(link: &str) -> String {
    let mut link = link.trim().to_string();

    for prefix in HOST_PREFIXES {
        link = link.replacen(prefix, "", 1);
    }

    link = remove_git_suffix(&link);

    if let Some(rest) = link.strip_prefix("git+") {
        link = rest.to_string();
    }

    if let Some(idx) = link.find('#') {
        link.truncate(idx);
    }
    if let Some(idx) = link.find('?') {
        link.truncate(idx);
    }

    link.split('/').take(2).collect::<Vec<_>>().join("/")
}

/// Remove the first `.git` that ends a path segment (`bar.git`, `bar.git#x`,
/// `bar.git/tree`), leaving names like `bar.github.io` alone
fn remove_git_suffix(link: &str) -> String {
    const SUFFIX: &str = ".git";

    let found = link.match_indices(SUFFIX).find(|(idx, _)| {
        matches!(
            link[idx + SUFFIX.len()..].chars().next(),
            None | Some('#' | '?' | '/')
        )
    });

    match found {
        Some((idx, _)) => format!("{}{}", &link[..idx], &link[idx + SUFFIX.len()..]),
        None => link.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::testing::ScriptedPrompt;
    use crate::prompt::NonInteractivePrompt;
    use crate::types::RepositoryReference;

    #[test]
    fn test_canonicalize_known_forms() {
        let test_cases = vec![
            ("https://github.com/serde-rs/serde", "serde-rs/serde"),
            ("http://github.com/serde-rs/serde", "serde-rs/serde"),
            ("https://github.com/serde-rs/serde.git", "serde-rs/serde"),
            ("git+https://github.com/serde-rs/serde.git", "serde-rs/serde"),
            ("git+ssh://git@github.com:foo/bar.git#readme", "foo/bar"),
            ("git+ssh://git@github.com/foo/bar.git", "foo/bar"),
            ("git@github.com:foo/bar.git", "foo/bar"),
            ("git://github.com/foo/bar.git", "foo/bar"),
            ("github.com/foo/bar", "foo/bar"),
            ("https://github.com/foo/bar?tab=readme", "foo/bar"),
            ("https://github.com/foo/bar#readme", "foo/bar"),
            ("foo/bar", "foo/bar"),
        ];

        for (link, expected) in test_cases {
            assert_eq!(canonicalize(link), expected, "link: {}", link);
        }
    }

    #[test]
    fn test_canonicalize_keeps_first_two_segments() {
        assert_eq!(canonicalize("foo/bar/tree/main"), "foo/bar");
        assert_eq!(
            canonicalize("https://github.com/lodash/lodash/tree/main/packages"),
            "lodash/lodash"
        );
        assert_eq!(canonicalize("https://github.com/foo/bar.git/tree/main"), "foo/bar");
    }

    #[test]
    fn test_canonicalize_truncated_input() {
        assert_eq!(canonicalize("https://github.com/foo"), "foo");
        assert_eq!(canonicalize(""), "");
    }

    #[test]
    fn test_canonicalize_preserves_case_and_dotted_names() {
        assert_eq!(canonicalize("https://github.com/Foo/Bar"), "Foo/Bar");
        assert_eq!(
            canonicalize("https://github.com/owner/owner.github.io"),
            "owner/owner.github.io"
        );
    }

    #[test]
    fn test_normalize_prefers_repository_then_homepage() {
        let prompt = ScriptedPrompt::default();
        let metadata = PackageMetadata {
            repository: Some(RepositoryReference::Object {
                url: Some("git+https://github.com/a/b.git".to_string()),
            }),
            homepage: Some("https://github.com/c/d#readme".to_string()),
            declared_license: None,
        };
        assert_eq!(normalize(&metadata, "b", &prompt), RepositoryIdentity::new("a", "b"));

        let homepage_only = PackageMetadata {
            repository: Some(RepositoryReference::Object { url: None }),
            ..metadata
        };
        assert_eq!(
            normalize(&homepage_only, "d", &prompt),
            RepositoryIdentity::new("c", "d")
        );
        assert!(prompt.asked.borrow().is_empty());
    }

    #[test]
    fn test_normalize_blank_repository_falls_back_to_homepage() {
        let prompt = ScriptedPrompt::default();
        for blank in ["", "   "] {
            let metadata = PackageMetadata {
                repository: Some(RepositoryReference::Url(blank.to_string())),
                homepage: Some("https://github.com/c/d".to_string()),
                declared_license: None,
            };
            assert_eq!(
                normalize(&metadata, "pkg", &prompt),
                RepositoryIdentity::new("c", "d"),
                "repository: {:?}",
                blank
            );
        }

        let blank_object = PackageMetadata {
            repository: Some(RepositoryReference::Object {
                url: Some(" ".to_string()),
            }),
            homepage: Some("  ".to_string()),
            declared_license: None,
        };
        let asking = ScriptedPrompt::with_answers(&["e/f"]);
        assert_eq!(
            normalize(&blank_object, "pkg", &asking),
            RepositoryIdentity::new("e", "f")
        );
        assert!(prompt.asked.borrow().is_empty());
        assert_eq!(asking.asked.borrow().len(), 1);
    }

    #[test]
    fn test_normalize_asks_operator_as_last_resort() {
        let prompt = ScriptedPrompt::with_answers(&["https://github.com/x/y"]);
        let identity = normalize(&PackageMetadata::default(), "mystery", &prompt);

        assert_eq!(identity, RepositoryIdentity::new("x", "y"));
        let asked = prompt.asked.borrow();
        assert_eq!(asked.len(), 1);
        assert!(asked[0].contains("mystery"));
    }

    #[test]
    fn test_normalize_without_answer_is_empty() {
        let identity = normalize(&PackageMetadata::default(), "mystery", &NonInteractivePrompt);
        assert!(identity.is_incomplete());
    }
}
