//! Command-line entry point.
//!
//! Composes the setup collaborators into a [`RenderRequest`], wires the
//! event bus to the stdout progress reporter, races the render session
//! against the OS shutdown signal, and maps outcomes to exit codes:
//!
//! - completed run → asset copy (unless disabled), exit 0
//! - interrupt → forced teardown, short final delay, exit 0
//! - fatal error → diagnostic on stderr, exit 1

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use prerender::input::{
    append_query, clean_output, copy_assets, ensure_index, normalize_route, parse_route_csv,
    ConfigFile,
};
use prerender::{
    wait_for_shutdown_signal, Bus, Outcome, ProgressWriter, RenderRequest, RouteRenderer,
    SessionConfig, Subscribe, SubscriberSet,
};

/// Prerender SPA routes to static HTML with a real headless browser.
#[derive(Debug, Parser)]
#[command(name = "prerender", version, about)]
struct Cli {
    /// Config file (TOML). The default is only read if it exists.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// CSV route list; overrides the routes from the config file.
    #[arg(long, value_name = "FILE")]
    routes_csv: Option<PathBuf>,

    /// Build directory served to the browser.
    #[arg(long, value_name = "DIR")]
    serve_dir: Option<PathBuf>,

    /// Output directory for rendered pages.
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// One sanitized file per route instead of nested directories.
    #[arg(long)]
    flat: bool,

    /// Do not re-render routes whose output file already exists.
    #[arg(long)]
    skip_existing: bool,

    /// Keep the existing output directory instead of cleaning it first.
    #[arg(long)]
    no_clean: bool,

    /// Do not copy build assets into the output directory afterwards.
    #[arg(long)]
    no_assets: bool,

    /// Append a query parameter (`key=value`) to every route.
    #[arg(long, value_name = "K=V")]
    query: Option<String>,

    /// Forward the static server's stdout/stderr to the terminal.
    #[arg(long, env = "PRERENDER_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => ConfigFile::load(path).await?,
        None => ConfigFile::load_optional(Path::new("prerender.toml")).await?,
    };

    let raw_routes = match &cli.routes_csv {
        Some(path) => parse_route_csv(path).await?,
        None => file.routes.clone(),
    };
    if raw_routes.is_empty() {
        bail!("no routes to render; add them to prerender.toml or pass --routes-csv");
    }

    let rules = file.route_rules();
    let routes: Vec<String> = raw_routes
        .iter()
        .map(|raw| {
            let route = normalize_route(raw, &rules);
            match &cli.query {
                Some(query) => append_query(&route, query),
                None => route,
            }
        })
        .collect();

    let cwd = std::env::current_dir().context("cannot resolve working directory")?;
    let serve_dir = absolute(
        &cwd,
        cli.serve_dir
            .or(file.serve_dir)
            .unwrap_or_else(|| PathBuf::from("build")),
    );
    let out_dir = absolute(
        &cwd,
        cli.out_dir
            .or(file.out_dir)
            .unwrap_or_else(|| PathBuf::from("static-pages")),
    );

    ensure_index(&serve_dir).await?;
    if !cli.no_clean {
        clean_output(&out_dir).await?;
    }

    let mut config = SessionConfig::default();
    if let Some(serve_command) = file.serve_command {
        config.serve_command = serve_command;
    }
    config.forward_server_output = cli.debug;

    let request = RenderRequest {
        routes,
        out_dir: out_dir.clone(),
        serve_dir: serve_dir.clone(),
        flat_output: cli.flat || file.flat_output,
        skip_existing: cli.skip_existing || file.skip_existing,
    };

    let bus = Bus::new(config.bus_capacity);
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(ProgressWriter)];
    let set = SubscriberSet::attach(&bus, subs);

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if wait_for_shutdown_signal().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let exit_delay = config.exit_delay;
    let renderer = RouteRenderer::new(request, config, bus);
    let result = renderer.run(cancel).await;
    set.shutdown().await;

    match result {
        Ok(Outcome::Completed { rendered, skipped }) => {
            if !cli.no_assets {
                copy_assets(&serve_dir, &out_dir).await?;
            }
            println!(
                "done: {rendered} rendered, {skipped} skipped → {}",
                out_dir.display()
            );
            Ok(())
        }
        Ok(Outcome::Interrupted) => {
            // Let kill signals issued during teardown land before this
            // process itself exits.
            tokio::time::sleep(exit_delay).await;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn absolute(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}
