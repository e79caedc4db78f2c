//! # Output-directory preparation and build-asset copying.
//!
//! Three filesystem helpers bracketing a render session:
//!
//! - [`ensure_index`] validates the build before anything starts;
//! - [`clean_output`] removes stale output from a previous run;
//! - [`copy_assets`] mirrors the build's static files (JS, CSS, images)
//!   into the output directory after a successful run, skipping `*.html`
//!   so rendered snapshots are never overwritten by the build's shell page.

use std::path::Path;

use crate::error::SetupError;

/// Refuses to start when the build directory has no `index.html`.
pub async fn ensure_index(serve_dir: &Path) -> Result<(), SetupError> {
    let index = serve_dir.join("index.html");
    if tokio::fs::try_exists(&index).await.unwrap_or(false) {
        Ok(())
    } else {
        Err(SetupError::MissingIndex {
            serve_dir: serve_dir.to_path_buf(),
        })
    }
}

/// Removes the output directory. A missing directory is fine.
pub async fn clean_output(out_dir: &Path) -> Result<(), SetupError> {
    match tokio::fs::remove_dir_all(out_dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(SetupError::AssetCopy {
            path: out_dir.to_path_buf(),
            source,
        }),
    }
}

/// Recursively copies `serve_dir` into `out_dir`, skipping `*.html` files.
///
/// Directory traversal is iterative; `tokio::fs` has no recursive copy and
/// async recursion would need boxing.
pub async fn copy_assets(serve_dir: &Path, out_dir: &Path) -> Result<(), SetupError> {
    let mut pending = vec![serve_dir.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let rel = dir.strip_prefix(serve_dir).unwrap_or(&dir);
        let dest_dir = out_dir.join(rel);
        tokio::fs::create_dir_all(&dest_dir)
            .await
            .map_err(|source| SetupError::AssetCopy {
                path: dest_dir.clone(),
                source,
            })?;

        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|source| SetupError::AssetCopy {
                path: dir.clone(),
                source,
            })?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| SetupError::AssetCopy {
                path: dir.clone(),
                source,
            })?
        {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|source| SetupError::AssetCopy {
                    path: path.clone(),
                    source,
                })?;

            if file_type.is_dir() {
                pending.push(path);
                continue;
            }
            if path.extension().is_some_and(|ext| ext == "html") {
                continue;
            }

            let dest = dest_dir.join(entry.file_name());
            tokio::fs::copy(&path, &dest)
                .await
                .map_err(|source| SetupError::AssetCopy {
                    path: path.clone(),
                    source,
                })?;
        }
    }
    Ok(())
}
