//! Setup collaborators: everything that happens around a render session.
//!
//! - [`config_file`]: the `prerender.toml` file format;
//! - [`routes`]: route lists (CSV), normalization rules, query suffixes;
//! - [`assets`]: output cleaning, build-asset copying, build validation.
//!
//! Nothing here touches the browser or the server; these are plain
//! filesystem and parsing helpers the CLI composes into a
//! [`RenderRequest`](crate::RenderRequest).

pub mod assets;
pub mod config_file;
pub mod routes;

pub use assets::{clean_output, copy_assets, ensure_index};
pub use config_file::ConfigFile;
pub use routes::{append_query, normalize_route, parse_route_csv, RouteRules};
