//! Managed app processes - spawning and readiness polling

use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::{E2eError, E2eResult};

/// Handle to a running app process (backend or frontend dev server)
pub struct ServerHandle {
    child: Child,
    name: String,
    pub ready_url: String,
}

impl ServerHandle {
    /// Spawn the process and wait until its ready URL answers
    pub async fn spawn(config: &ServerConfig) -> E2eResult<Self> {
        info!("Spawning {}: {} {}", config.name, config.command, config.args.join(" "));

        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args).envs(&config.env);
        if let Some(cwd) = &config.cwd {
            cmd.current_dir(cwd);
        }

        cmd.stdout(Stdio::null())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().map_err(|e| E2eError::ServerStartup {
            name: config.name.clone(),
            reason: format!("failed to spawn {}: {}", config.command, e),
        })?;

        let mut handle = ServerHandle {
            child,
            name: config.name.clone(),
            ready_url: config.ready_url.clone(),
        };

        handle.wait_for_ready(config.startup_timeout()).await?;

        info!("{} is ready at {}", handle.name, handle.ready_url);
        Ok(handle)
    }

    /// Poll the ready URL until it returns 2xx or the timeout elapses
    async fn wait_for_ready(&mut self, timeout_duration: Duration) -> E2eResult<()> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        let start = std::time::Instant::now();
        let mut attempts = 0;

        while start.elapsed() < timeout_duration {
            attempts += 1;

            if let Some(status) = self.child.try_wait()? {
                return Err(E2eError::ServerStartup {
                    name: self.name.clone(),
                    reason: format!("exited early with {}", status),
                });
            }

            match client.get(&self.ready_url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    return Ok(());
                }
                Ok(resp) => {
                    warn!("{} readiness check returned {}", self.name, resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("Waiting for {} to start...", self.name);
                    }
                    // Connection refused is expected while the process boots
                    if !e.is_connect() {
                        warn!("{} readiness check error: {}", self.name, e);
                    }
                }
            }

            sleep(Duration::from_millis(250)).await;
        }

        Err(E2eError::ServerNotReady {
            name: self.name.clone(),
            url: self.ready_url.clone(),
            attempts,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop the process
    pub fn stop(&mut self) -> E2eResult<()> {
        if let Ok(Some(_)) = self.child.try_wait() {
            return Ok(());
        }

        info!("Stopping {} (pid: {})", self.name, self.child.id());

        // Try graceful shutdown first
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(self.child.id() as i32);
            if kill(pid, Signal::SIGTERM).is_ok() {
                std::thread::sleep(Duration::from_millis(500));
            }
        }

        // Force kill if still running
        let _ = self.child.kill();
        let _ = self.child.wait();

        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
