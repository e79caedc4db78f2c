//! # Route lists and normalization.
//!
//! Routes arrive from the config file or a CSV file and may be written as
//! bare record identifiers rather than URL paths. [`RouteRules`] maps both
//! spellings onto the canonical `/path` form the renderer expects.
//!
//! ## Normalization
//! ```text
//! rules: id_prefix = "bdr:", id_route = "/show/"
//!
//! "/about"       → "/about"              (already a path)
//! "bdr:W123"     → "/show/bdr:W123"      (prefixed identifier)
//! "W123"         → "/show/bdr:W123"      (bare identifier)
//! ```
//! Without configured rules a bare route just gains a leading slash.

use std::path::Path;

use crate::error::SetupError;

/// Identifier-to-route mapping rules, usually read from the config file.
#[derive(Clone, Debug, Default)]
pub struct RouteRules {
    /// Identifier namespace prefix, e.g. `bdr:`.
    pub id_prefix: Option<String>,
    /// Route template the identifier is appended to, e.g. `/show/`.
    pub id_route: Option<String>,
}

/// Normalizes one raw route into canonical `/path` form.
pub fn normalize_route(raw: &str, rules: &RouteRules) -> String {
    if raw.starts_with('/') {
        return raw.to_string();
    }
    match (&rules.id_prefix, &rules.id_route) {
        (Some(prefix), Some(route)) => {
            if raw.starts_with(prefix.as_str()) {
                format!("{route}{raw}")
            } else {
                format!("{route}{prefix}{raw}")
            }
        }
        _ => format!("/{raw}"),
    }
}

/// Reads a CSV route list: one route per line, trimmed; blank lines and
/// `#` comments are ignored. Routes are returned unnormalized.
pub async fn parse_route_csv(path: &Path) -> Result<Vec<String>, SetupError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SetupError::RoutesRead {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Appends a `key=value` query suffix to a route, using `?` or `&` as
/// appropriate.
pub fn append_query(route: &str, query: &str) -> String {
    if route.contains('?') {
        format!("{route}&{query}")
    } else {
        format!("{route}?{query}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bdr_rules() -> RouteRules {
        RouteRules {
            id_prefix: Some("bdr:".into()),
            id_route: Some("/show/".into()),
        }
    }

    #[test]
    fn test_path_routes_pass_through() {
        assert_eq!(normalize_route("/about", &bdr_rules()), "/about");
        assert_eq!(normalize_route("/", &bdr_rules()), "/");
    }

    #[test]
    fn test_prefixed_identifier_gets_the_route() {
        assert_eq!(normalize_route("bdr:W123", &bdr_rules()), "/show/bdr:W123");
    }

    #[test]
    fn test_bare_identifier_gets_prefix_and_route() {
        assert_eq!(normalize_route("W123", &bdr_rules()), "/show/bdr:W123");
    }

    #[test]
    fn test_no_rules_just_adds_a_slash() {
        assert_eq!(normalize_route("about", &RouteRules::default()), "/about");
    }

    #[test]
    fn test_append_query() {
        assert_eq!(append_query("/about", "uilang=bo"), "/about?uilang=bo");
        assert_eq!(append_query("/about?x=1", "uilang=bo"), "/about?x=1&uilang=bo");
    }

    #[tokio::test]
    async fn test_csv_skips_blanks_and_comments() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("routes.csv");
        tokio::fs::write(&file, "# generated list\n/about\n\n  bdr:W123  \n# trailer\n")
            .await
            .unwrap();

        let routes = parse_route_csv(&file).await.unwrap();
        assert_eq!(routes, vec!["/about", "bdr:W123"]);
    }

    #[tokio::test]
    async fn test_missing_csv_is_a_setup_error() {
        let err = parse_route_csv(Path::new("/nonexistent/routes.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::RoutesRead { .. }));
    }
}
