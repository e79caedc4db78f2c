//! # Output-path mapping and page persistence.
//!
//! Every route maps deterministically onto one file under the output
//! directory; rendering the same route always yields the same path.
//!
//! ## Mapping rules
//! ```text
//! "/"                        → <out>/index.html          (both modes)
//!
//! nested (flat_output = false):
//! "/about"                   → <out>/about/index.html
//! "/about?x=1"               → <out>/about/index.html?x=1
//! "/show/bdr:W123"           → <out>/show/bdr:W123/index.html
//! "/?x=1"                    → <out>/root/index.html?x=1
//!
//! flat (flat_output = true), only slashes are replaced:
//! "/about"                   → <out>/about.html
//! "/about?x=1"               → <out>/about?x=1.html
//! "/show/bdr:W123"           → <out>/show-bdr:W123.html
//! ```
//!
//! A query string becomes part of the file name on disk, never a URL
//! parameter; static hosts that strip the query at request time then serve
//! the matching snapshot.

use std::path::{Path, PathBuf};

use crate::error::PrerenderError;

/// Computes the output file for `route` under `out_dir`.
pub fn output_path(out_dir: &Path, route: &str, flat_output: bool) -> PathBuf {
    if route == "/" {
        return out_dir.join("index.html");
    }

    if flat_output {
        let safe = strip_leading_slash(route).replace('/', "-");
        let safe = if safe.is_empty() { "root" } else { &safe };
        return out_dir.join(format!("{safe}.html"));
    }

    let (path, query) = match route.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (route, None),
    };
    let path = strip_leading_slash(path);
    let path = if path.is_empty() { "root" } else { path };
    let file = match query {
        Some(query) => format!("index.html?{query}"),
        None => "index.html".to_string(),
    };
    out_dir.join(path).join(file)
}

/// Writes one rendered page, creating parent directories as needed.
///
/// Overwrites an existing file at the same path.
pub(crate) async fn write_page(target: &Path, html: &str) -> Result<(), PrerenderError> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| PrerenderError::WriteFailure {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(target, html)
        .await
        .map_err(|source| PrerenderError::WriteFailure {
            path: target.to_path_buf(),
            source,
        })
}

/// Strips exactly one leading slash, mirroring the route normalization the
/// rest of the pipeline produces.
fn strip_leading_slash(s: &str) -> &str {
    s.strip_prefix('/').unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn out() -> PathBuf {
        PathBuf::from("/tmp/out")
    }

    #[test]
    fn test_root_route_maps_to_index_in_both_modes() {
        assert_eq!(output_path(&out(), "/", false), out().join("index.html"));
        assert_eq!(output_path(&out(), "/", true), out().join("index.html"));
    }

    #[test]
    fn test_nested_route() {
        assert_eq!(
            output_path(&out(), "/about", false),
            out().join("about").join("index.html")
        );
        assert_eq!(
            output_path(&out(), "/show/bdr:W123", false),
            out().join("show/bdr:W123").join("index.html")
        );
    }

    #[test]
    fn test_nested_route_with_query_keeps_query_in_file_name() {
        assert_eq!(
            output_path(&out(), "/about?x=1", false),
            out().join("about").join("index.html?x=1")
        );
    }

    #[test]
    fn test_flat_route_replaces_slashes_only() {
        assert_eq!(
            output_path(&out(), "/about", true),
            out().join("about.html")
        );
        assert_eq!(
            output_path(&out(), "/show/bdr:W123", true),
            out().join("show-bdr:W123.html")
        );
        // The query delimiter is not a slash, so it survives sanitization.
        assert_eq!(
            output_path(&out(), "/about?x=1", true),
            out().join("about?x=1.html")
        );
    }

    #[test]
    fn test_empty_path_falls_back_to_root() {
        assert_eq!(
            output_path(&out(), "/?uilang=bo", false),
            out().join("root").join("index.html?uilang=bo")
        );
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let a = output_path(&out(), "/blog/post-1", false);
        let b = output_path(&out(), "/blog/post-1", false);
        assert_eq!(a, b);
    }
}
