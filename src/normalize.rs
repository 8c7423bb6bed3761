//! Reference target normalization and base-url joining.

/// Reduce a raw reference target to the canonical document URL form:
/// strip the site base url (when non-empty) and drop any `#fragment`.
///
/// The base url is only stripped at a path boundary, so `/garden` never eats
/// the front of `/gardening/`. Stripping repeats until no boundary-aligned
/// base prefix remains, which makes the function idempotent.
pub fn normalize(raw_target: &str, base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let mut rest = raw_target;

    if !base.is_empty() {
        while let Some(stripped) = strip_base_at_boundary(rest, base) {
            rest = stripped;
        }
    }

    let without_fragment = rest.split_once('#').map_or(rest, |(path, _fragment)| return path);
    return without_fragment.to_string();
}

/// Strip `base` from the front of `target` if what follows starts a new path
/// segment, a fragment, or nothing at all.
fn strip_base_at_boundary<'a>(target: &'a str, base: &str) -> Option<&'a str> {
    let rest = target.strip_prefix(base)?;
    if rest.is_empty() || rest.starts_with('/') || rest.starts_with('#') {
        return Some(rest);
    }
    return None;
}

/// Join a site-relative URL onto the base url, the way the host's
/// `relative_url` filter renders links.
pub fn relative_url(base_url: &str, url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if url.is_empty() {
        return if base.is_empty() { String::new() } else { format!("{base}/") };
    }
    if url.starts_with('/') {
        return format!("{base}{url}");
    }
    return format!("{base}/{url}");
}

/// Join two URL path pieces with exactly one slash between them.
pub fn join_url_path(left: &str, right: &str) -> String {
    let left = left.trim_end_matches('/');
    let right = right.trim_start_matches('/');
    if right.is_empty() {
        return left.to_string();
    }
    return format!("{left}/{right}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fragment() {
        assert_eq!(normalize("/notes/a/#heading", ""), "/notes/a/");
    }

    #[test]
    fn strips_base_url_then_fragment() {
        assert_eq!(normalize("/garden/notes/a/#h", "/garden"), "/notes/a/");
        assert_eq!(normalize("/garden/notes/a/", "/garden/"), "/notes/a/");
    }

    #[test]
    fn leaves_lookalike_prefix_alone() {
        assert_eq!(normalize("/gardening/", "/garden"), "/gardening/");
    }

    #[test]
    fn empty_in_empty_out() {
        assert_eq!(normalize("", ""), "");
        assert_eq!(normalize("", "/garden"), "");
        assert_eq!(normalize("#only-anchor", ""), "");
    }

    #[test]
    fn idempotent_on_awkward_inputs() {
        let cases = [
            ("/g/g/a/", "/g"),
            ("/g#/g", "/g"),
            ("/g", "/g"),
            ("a#b#c", ""),
            ("/x/#", "/x"),
            ("/garden/garden/#x", "/garden/"),
        ];
        for (raw, base) in cases {
            let once = normalize(raw, base);
            assert_eq!(normalize(&once, base), once, "not idempotent for {raw:?} / {base:?}");
        }
    }

    #[test]
    fn relative_url_joins_base() {
        assert_eq!(relative_url("", "/notes/a/"), "/notes/a/");
        assert_eq!(relative_url("/garden", "/notes/a/"), "/garden/notes/a/");
        assert_eq!(relative_url("/garden/", "notes/a/"), "/garden/notes/a/");
        assert_eq!(relative_url("", ""), "");
    }

    #[test]
    fn join_url_path_collapses_slashes() {
        assert_eq!(join_url_path("/assets", "js"), "/assets/js");
        assert_eq!(join_url_path("/assets/", "/custom_scripts_path"), "/assets/custom_scripts_path");
        assert_eq!(join_url_path("/assets", ""), "/assets");
    }
}
