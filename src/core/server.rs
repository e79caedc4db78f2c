//! # Static-file-server supervision.
//!
//! [`ServerSupervisor`] owns one static-server child process for the
//! lifetime of a session:
//!
//! ```text
//! spawn (own process group) ──► liveness probe ──► serving
//!                                                    │
//!                         restart (stop + respawn) ◄─┤ every N renders
//!                                                    │
//!                               graduated stop ◄─────┘ end of session
//! ```
//!
//! ## Rules
//! - The child runs in its **own process group**, so a group signal reaches
//!   every descendant the launcher forks (`npx` → `node` → worker).
//! - Liveness means the root answers HTTP with a **success status**; error
//!   statuses during warmup keep the probe going. The probe runs once per
//!   interval for a bounded number of attempts.
//! - The graduated stop is best-effort and never raises: group SIGTERM,
//!   bounded wait for exit, then SIGKILL for whatever still holds the port.
//! - A restart reuses the original port, so in-flight page URLs stay valid.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::{Child, Command};

use crate::config::SessionConfig;
use crate::error::PrerenderError;

/// Server-side of the session seam. The production implementation is
/// [`ServerSupervisor`]; tests substitute scripted fakes.
#[async_trait]
pub trait Serve: Send {
    /// Port the server is bound to.
    fn port(&self) -> u16;

    /// Stops the current child and spawns a fresh one on the same port,
    /// probing it back to liveness.
    async fn restart(&mut self) -> Result<(), PrerenderError>;

    /// Graduated stop: group signal, bounded wait, port reclamation.
    async fn stop(&mut self);
}

/// Supervised static-server child process.
#[derive(Debug)]
pub struct ServerSupervisor {
    child: Option<Child>,
    port: u16,
    argv: Vec<String>,
    probe_attempts: u32,
    probe_interval: Duration,
    stop_grace: Duration,
    forward_output: bool,
    client: reqwest::Client,
}

impl ServerSupervisor {
    /// Spawns the static server on `port` serving `serve_dir` and waits for
    /// it to answer HTTP.
    ///
    /// On probe timeout the partially started child is killed before the
    /// error propagates.
    pub async fn start(
        port: u16,
        serve_dir: &Path,
        config: &SessionConfig,
    ) -> Result<Self, PrerenderError> {
        let client = reqwest::Client::builder()
            .timeout(config.probe_interval)
            .build()
            .map_err(|e| PrerenderError::ServerSpawn {
                source: std::io::Error::other(e),
            })?;

        let mut supervisor = Self {
            child: None,
            port,
            argv: config.serve_argv(serve_dir, port),
            probe_attempts: config.probe_attempts,
            probe_interval: config.probe_interval,
            stop_grace: config.stop_grace,
            forward_output: config.forward_server_output,
            client,
        };
        supervisor.spawn_and_probe().await?;
        Ok(supervisor)
    }

    async fn spawn_and_probe(&mut self) -> Result<(), PrerenderError> {
        let child = spawn_in_own_group(&self.argv, self.forward_output)
            .map_err(|source| PrerenderError::ServerSpawn { source })?;
        tracing::info!(port = self.port, pid = child.id(), "static server spawned");
        self.child = Some(child);

        if self.probe_until_live().await {
            tracing::debug!(port = self.port, "static server answered liveness probe");
            return Ok(());
        }

        // Never leave a half-started child behind a fatal error.
        self.stop().await;
        Err(PrerenderError::ServerStartTimeout {
            port: self.port,
            attempts: self.probe_attempts,
        })
    }

    /// Probes `http://127.0.0.1:<port>/` once per interval. The server
    /// counts as live once the root answers with a success status.
    async fn probe_until_live(&mut self) -> bool {
        let url = format!("http://127.0.0.1:{}/", self.port);
        for attempt in 1..=self.probe_attempts {
            // A child that already exited will never answer.
            if let Some(child) = self.child.as_mut() {
                if let Ok(Some(status)) = child.try_wait() {
                    tracing::warn!(port = self.port, %status, "static server exited during startup");
                    return false;
                }
            }
            match self.client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => return true,
                Ok(resp) => {
                    tracing::debug!(
                        port = self.port,
                        attempt,
                        status = %resp.status(),
                        "liveness probe answered with an error status"
                    );
                }
                Err(_) => {
                    tracing::debug!(port = self.port, attempt, "liveness probe unanswered");
                }
            }
            tokio::time::sleep(self.probe_interval).await;
        }
        false
    }
}

#[async_trait]
impl Serve for ServerSupervisor {
    fn port(&self) -> u16 {
        self.port
    }

    async fn restart(&mut self) -> Result<(), PrerenderError> {
        tracing::info!(port = self.port, "recycling static server");
        self.stop().await;
        self.spawn_and_probe().await
    }

    async fn stop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        signal_group_term(&child);

        match tokio::time::timeout(self.stop_grace, child.wait()).await {
            Ok(Ok(status)) => {
                tracing::debug!(port = self.port, %status, "static server exited");
            }
            Ok(Err(e)) => {
                tracing::warn!(port = self.port, error = %e, "waiting for static server failed");
            }
            Err(_) => {
                tracing::warn!(
                    port = self.port,
                    grace = ?self.stop_grace,
                    "static server ignored the stop signal, reclaiming the port"
                );
                let _ = child.start_kill();
            }
        }

        reclaim_port(self.port).await;
    }
}

/// Spawns the argv as a child in its own process group.
fn spawn_in_own_group(argv: &[String], forward_output: bool) -> std::io::Result<Child> {
    let (program, args) = argv.split_first().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty serve command")
    })?;

    let mut cmd = Command::new(program);
    cmd.args(args).kill_on_drop(true);
    if forward_output {
        cmd.stdout(std::process::Stdio::inherit())
            .stderr(std::process::Stdio::inherit());
    } else {
        cmd.stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());
    }

    #[cfg(unix)]
    unsafe {
        cmd.pre_exec(|| {
            if libc::setsid() == -1 {
                Err(std::io::Error::last_os_error())
            } else {
                Ok(())
            }
        });
    }

    cmd.spawn()
}

/// Signals the child's whole process group to terminate.
#[cfg(unix)]
fn signal_group_term(child: &Child) {
    let Some(pid) = child.id() else {
        return;
    };
    // setsid made the child the group leader, so -pid addresses the group.
    let rc = unsafe { libc::kill(-(pid as i32), libc::SIGTERM) };
    if rc == -1 {
        tracing::debug!(pid, "process group already gone");
    }
}

#[cfg(not(unix))]
fn signal_group_term(_child: &Child) {}

/// Kills whatever still listens on `port` after the graceful window.
///
/// Resolves holders with `lsof -ti tcp:<port>` and SIGKILLs each, skipping
/// this process. Best-effort on every step.
#[cfg(unix)]
pub(crate) async fn reclaim_port(port: u16) {
    let output = Command::new("lsof")
        .arg("-ti")
        .arg(format!("tcp:{port}"))
        .output()
        .await;
    let output = match output {
        Ok(o) => o,
        Err(e) => {
            tracing::debug!(port, error = %e, "lsof unavailable, skipping port reclamation");
            return;
        }
    };

    let own_pid = std::process::id() as i32;
    for line in String::from_utf8_lossy(&output.stdout).lines() {
        let Ok(pid) = line.trim().parse::<i32>() else {
            continue;
        };
        if pid == own_pid {
            continue;
        }
        tracing::warn!(port, pid, "killing leftover port holder");
        unsafe {
            libc::kill(pid, libc::SIGKILL);
        }
    }
}

#[cfg(not(unix))]
pub(crate) async fn reclaim_port(_port: u16) {}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config(serve_command: Vec<String>) -> SessionConfig {
        SessionConfig {
            probe_attempts: 2,
            probe_interval: Duration::from_millis(50),
            stop_grace: Duration::from_millis(100),
            serve_command,
            ..SessionConfig::default()
        }
    }

    #[tokio::test]
    async fn test_unspawnable_command_is_a_spawn_error() {
        let cfg = quick_config(vec!["definitely-not-a-real-command-zz".into()]);
        let err = ServerSupervisor::start(59_999, Path::new("/tmp"), &cfg)
            .await
            .unwrap_err();
        assert!(matches!(err, PrerenderError::ServerSpawn { .. }));
    }

    #[tokio::test]
    async fn test_silent_child_times_out_and_is_killed() {
        // `sleep` never answers HTTP, so the probe budget runs out.
        let cfg = quick_config(vec!["sleep".into(), "60".into()]);
        let err = ServerSupervisor::start(59_998, Path::new("/tmp"), &cfg)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PrerenderError::ServerStartTimeout { port: 59_998, attempts: 2 }
        ));
    }

    #[tokio::test]
    async fn test_exited_child_fails_fast() {
        // `true` exits immediately; the probe loop notices instead of
        // burning the whole attempt budget.
        let cfg = quick_config(vec!["true".into()]);
        let err = ServerSupervisor::start(59_997, Path::new("/tmp"), &cfg)
            .await
            .unwrap_err();
        assert!(matches!(err, PrerenderError::ServerStartTimeout { .. }));
    }

    fn python_http_config() -> SessionConfig {
        SessionConfig {
            probe_attempts: 50,
            probe_interval: Duration::from_millis(100),
            stop_grace: Duration::from_secs(3),
            serve_command: vec![
                "python3".into(),
                "-m".into(),
                "http.server".into(),
                "{port}".into(),
                "-d".into(),
                "{dir}".into(),
            ],
            ..SessionConfig::default()
        }
    }

    #[tokio::test]
    async fn test_graduated_stop_releases_the_port() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();

        let cfg = python_http_config();
        let port = crate::core::port::allocate_port(48_000).await.unwrap();
        let mut sup = ServerSupervisor::start(port, dir.path(), &cfg).await.unwrap();

        sup.stop().await;

        // Nothing of the session may still hold the port.
        assert!(tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_restart_recycles_in_place() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();

        let cfg = python_http_config();
        let port = crate::core::port::allocate_port(48_100).await.unwrap();
        let mut sup = ServerSupervisor::start(port, dir.path(), &cfg).await.unwrap();

        sup.restart().await.unwrap();
        assert_eq!(sup.port(), port);

        sup.stop().await;
        assert!(tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_error_status_does_not_count_as_live() {
        // A warming-up server answering 503 on every request must keep the
        // probe going until the attempt budget runs out.
        let script = concat!(
            "from http.server import BaseHTTPRequestHandler, HTTPServer\n",
            "class H(BaseHTTPRequestHandler):\n",
            "    def do_GET(self): self.send_response(503); self.end_headers()\n",
            "    def log_message(self, *args): pass\n",
            "HTTPServer(('127.0.0.1', {port}), H).serve_forever()\n",
        );
        let cfg = SessionConfig {
            probe_attempts: 5,
            probe_interval: Duration::from_millis(200),
            stop_grace: Duration::from_millis(500),
            serve_command: vec!["python3".into(), "-c".into(), script.into()],
            ..SessionConfig::default()
        };

        let port = crate::core::port::allocate_port(48_200).await.unwrap();
        let err = ServerSupervisor::start(port, Path::new("/tmp"), &cfg)
            .await
            .unwrap_err();
        assert!(matches!(err, PrerenderError::ServerStartTimeout { .. }));
    }
}
