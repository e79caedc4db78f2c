//! End-to-end pipeline over a scripted navigator: raw route list in,
//! rendered file tree out, then an idempotent resume pass.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use prerender::input::{normalize_route, RouteRules};
use prerender::{
    Bus, LiveSession, Navigate, Outcome, PrerenderError, RenderRequest, RouteRenderer, Serve,
    SessionConfig,
};

struct ScriptedBrowser {
    visits: Arc<AtomicUsize>,
}

#[async_trait]
impl Navigate for ScriptedBrowser {
    async fn goto(&mut self, url: &str, _timeout: Duration) -> Result<String, PrerenderError> {
        self.visits.fetch_add(1, Ordering::SeqCst);
        Ok(format!("<html><body data-url=\"{url}\">rendered</body></html>"))
    }
    async fn close(&mut self) {}
    async fn kill(&mut self) {}
}

struct FixedServer;

#[async_trait]
impl Serve for FixedServer {
    fn port(&self) -> u16 {
        5050
    }
    async fn restart(&mut self) -> Result<(), PrerenderError> {
        Ok(())
    }
    async fn stop(&mut self) {}
}

fn session(visits: &Arc<AtomicUsize>) -> LiveSession {
    let mut live = LiveSession::new();
    live.attach_server(Box::new(FixedServer));
    live.attach_browser(Box::new(ScriptedBrowser {
        visits: Arc::clone(visits),
    }));
    live
}

fn request(out_dir: &std::path::Path, skip_existing: bool) -> RenderRequest {
    let rules = RouteRules {
        id_prefix: Some("bdr:".into()),
        id_route: Some("/show/".into()),
    };
    let routes = ["/", "/about", "bdr:W123"]
        .iter()
        .map(|raw| normalize_route(raw, &rules))
        .collect();
    RenderRequest {
        routes,
        out_dir: out_dir.to_path_buf(),
        serve_dir: out_dir.to_path_buf(),
        flat_output: false,
        skip_existing,
    }
}

#[tokio::test]
async fn test_raw_routes_become_a_rendered_tree() {
    let out = tempfile::tempdir().unwrap();
    let visits = Arc::new(AtomicUsize::new(0));

    let renderer = RouteRenderer::new(
        request(out.path(), false),
        SessionConfig::default(),
        Bus::new(64),
    );
    let outcome = renderer
        .run_session(session(&visits), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Completed {
            rendered: 3,
            skipped: 0
        }
    );
    assert_eq!(visits.load(Ordering::SeqCst), 3);
    assert!(out.path().join("index.html").exists());
    assert!(out.path().join("about/index.html").exists());
    assert!(out.path().join("show/bdr:W123/index.html").exists());

    let page = std::fs::read_to_string(out.path().join("show/bdr:W123/index.html")).unwrap();
    assert!(page.contains("http://localhost:5050/show/bdr:W123"));
}

#[tokio::test]
async fn test_resume_pass_renders_nothing() {
    let out = tempfile::tempdir().unwrap();
    let visits = Arc::new(AtomicUsize::new(0));

    let first = RouteRenderer::new(
        request(out.path(), true),
        SessionConfig::default(),
        Bus::new(64),
    );
    first
        .run_session(session(&visits), CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(visits.load(Ordering::SeqCst), 3);

    let second = RouteRenderer::new(
        request(out.path(), true),
        SessionConfig::default(),
        Bus::new(64),
    );
    let outcome = second
        .run_session(session(&visits), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Completed {
            rendered: 0,
            skipped: 3
        }
    );
    assert_eq!(visits.load(Ordering::SeqCst), 3);
}
