//! # The `prerender.toml` file format.
//!
//! Everything is optional; the CLI overlays flags on top of whatever the
//! file provides and falls back to built-in defaults for the rest.
//!
//! ```toml
//! routes = ["/", "/about", "bdr:W123"]
//! out_dir = "static-pages"
//! serve_dir = "build"
//! flat_output = false
//! skip_existing = false
//! serve_command = ["npx", "serve", "-s", "{dir}", "-l", "{port}"]
//! id_prefix = "bdr:"
//! id_route = "/show/"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::SetupError;
use crate::input::routes::RouteRules;

/// Deserialized `prerender.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Routes to render, in order. Raw form; normalization happens later.
    #[serde(default)]
    pub routes: Vec<String>,
    /// Output directory, relative to the working directory unless absolute.
    pub out_dir: Option<PathBuf>,
    /// Build directory the static server exposes.
    pub serve_dir: Option<PathBuf>,
    /// One sanitized file per route instead of nested directories.
    #[serde(default)]
    pub flat_output: bool,
    /// Do not re-render routes whose output file already exists.
    #[serde(default)]
    pub skip_existing: bool,
    /// Static-server argv template with `{dir}`/`{port}` placeholders.
    pub serve_command: Option<Vec<String>>,
    /// Identifier namespace prefix for route normalization.
    pub id_prefix: Option<String>,
    /// Route template identifiers are appended to.
    pub id_route: Option<String>,
}

impl ConfigFile {
    /// Loads and parses the file at `path`.
    pub async fn load(path: &Path) -> Result<Self, SetupError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SetupError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
        toml::from_str(&text).map_err(|source| SetupError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the file if it exists; a missing file yields the defaults.
    pub async fn load_optional(path: &Path) -> Result<Self, SetupError> {
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            Self::load(path).await
        } else {
            Ok(Self::default())
        }
    }

    /// The route-normalization rules this file configures.
    pub fn route_rules(&self) -> RouteRules {
        RouteRules {
            id_prefix: self.id_prefix.clone(),
            id_route: self.id_route.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_file_parses() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("prerender.toml");
        tokio::fs::write(
            &file,
            r#"
routes = ["/", "bdr:W123"]
out_dir = "static-pages"
serve_dir = "build"
flat_output = true
serve_command = ["python3", "-m", "http.server", "{port}", "-d", "{dir}"]
id_prefix = "bdr:"
id_route = "/show/"
"#,
        )
        .await
        .unwrap();

        let cfg = ConfigFile::load(&file).await.unwrap();
        assert_eq!(cfg.routes, vec!["/", "bdr:W123"]);
        assert_eq!(cfg.out_dir.as_deref(), Some(Path::new("static-pages")));
        assert!(cfg.flat_output);
        assert!(!cfg.skip_existing);
        assert_eq!(cfg.route_rules().id_prefix.as_deref(), Some("bdr:"));
    }

    #[tokio::test]
    async fn test_unknown_field_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("prerender.toml");
        tokio::fs::write(&file, "routez = []\n").await.unwrap();

        let err = ConfigFile::load(&file).await.unwrap_err();
        assert!(matches!(err, SetupError::ConfigParse { .. }));
    }

    #[tokio::test]
    async fn test_missing_optional_file_yields_defaults() {
        let cfg = ConfigFile::load_optional(Path::new("/nonexistent/prerender.toml"))
            .await
            .unwrap();
        assert!(cfg.routes.is_empty());
        assert!(cfg.out_dir.is_none());
    }
}
